use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use gesturewatch::classifier::{rank, PrototypeTable};
use gesturewatch::config::WINDOW_LEN;
use gesturewatch::events::Window;
use gesturewatch::features::{extract, extract_samples, FEATURE_NAMES};
use gesturewatch::model_params::{CENTROIDS, LABELS};
use gesturewatch::recording::load_recording;

const USAGE: &str = "usage: replay_csv [--dump-features] [--strict] <recording.csv>";

struct ReplayOptions {
    dump_features: bool,
    strict: bool,
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut dump_features = false;
    let mut strict = false;
    let mut csv_path: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dump-features" => dump_features = true,
            "--strict" => strict = true,
            "-h" | "--help" => bail!(USAGE),
            _ => {
                if csv_path.is_some() {
                    bail!(USAGE);
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("missing recording path\n{}", USAGE))?;
    Ok((
        csv_path,
        ReplayOptions {
            dump_features,
            strict,
        },
    ))
}

fn main() -> Result<()> {
    let (csv_path, opts) = parse_args()?;
    println!("Replaying {:?}", csv_path);

    let recording = load_recording(&csv_path)?;
    let count = recording.samples.len();
    let features = if opts.strict {
        extract(&Window::from_samples(recording.samples, WINDOW_LEN)?)
    } else {
        if count != WINDOW_LEN {
            println!("note: {} samples, the device window is {}", count, WINDOW_LEN);
        }
        extract_samples(&recording.samples)
    };

    let table = PrototypeTable::load(LABELS, CENTROIDS)?;
    let ranked = rank(&features, &table)?;
    let best = ranked
        .first()
        .ok_or_else(|| anyhow!("prototype table is empty"))?;

    println!("\nrecorded as : {}", recording.label);
    println!("classified  : {} (d²={:.4})", best.label, best.distance);
    if best.label != recording.label {
        println!("MISMATCH");
    }

    println!("\nDistances:");
    for (idx, r) in ranked.iter().enumerate() {
        println!("  {:>2}. {:<12} {:>14.4}", idx + 1, r.label, r.distance);
    }

    if opts.dump_features {
        println!("\nFeatures:");
        for (name, value) in FEATURE_NAMES.iter().zip(features.as_slice()) {
            println!("  {:<12} {:>14.6}", name, value);
        }
    }

    Ok(())
}
