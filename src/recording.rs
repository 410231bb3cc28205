// GestureWatch - Recording Format
//
// Labeled recordings are CSV files with the header
// `ts_ms,ax,ay,az,gx,gy,gz,label`, one row per sample, one label per file.
// The device side of that exchange is the `imu-stream` firmware mode, which
// prints the same rows without the label column.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::events::Sample;

pub const RECORDING_COLUMNS: [&str; 8] = ["ts_ms", "ax", "ay", "az", "gx", "gy", "gz", "label"];
pub const STREAM_HEADER: &str = "ts_ms,ax,ay,az,gx,gy,gz";

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("cannot open recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected header {found:?}, expected {expected:?}")]
    Header { found: Vec<String>, expected: Vec<String> },

    #[error("row {row}: column '{column}' is not a number: {value:?}")]
    Field {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: label '{found}' differs from '{expected}'")]
    MixedLabels {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("recording has no rows")]
    Empty,
}

/// One labeled take.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub label: String,
    pub samples: Vec<Sample>,
}

pub fn load_recording(path: impl AsRef<Path>) -> Result<Recording, RecordingError> {
    let file = File::open(path.as_ref())?;
    parse_recording(file)
}

pub fn parse_recording<R: Read>(reader: R) -> Result<Recording, RecordingError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header != RECORDING_COLUMNS {
        return Err(RecordingError::Header {
            found: header,
            expected: RECORDING_COLUMNS.iter().map(|c| c.to_string()).collect(),
        });
    }

    let mut label: Option<String> = None;
    let mut samples = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        // Axes are read as f64 and narrowed, the same path the trainer's
        // loader takes.
        let sample = Sample {
            timestamp_ms: field::<u64>(&record, row, 0)?,
            ax: field::<f64>(&record, row, 1)? as f32,
            ay: field::<f64>(&record, row, 2)? as f32,
            az: field::<f64>(&record, row, 3)? as f32,
            gx: field::<f64>(&record, row, 4)? as f32,
            gy: field::<f64>(&record, row, 5)? as f32,
            gz: field::<f64>(&record, row, 6)? as f32,
        };

        let row_label = &record[7];
        match &label {
            None => label = Some(row_label.to_string()),
            Some(expected) if expected != row_label => {
                return Err(RecordingError::MixedLabels {
                    row,
                    expected: expected.clone(),
                    found: row_label.to_string(),
                });
            }
            Some(_) => {}
        }
        samples.push(sample);
    }

    let label = label.ok_or(RecordingError::Empty)?;
    Ok(Recording { label, samples })
}

fn field<T: FromStr>(record: &StringRecord, row: usize, col: usize) -> Result<T, RecordingError> {
    let raw = &record[col];
    raw.parse::<T>().map_err(|_| RecordingError::Field {
        row,
        column: RECORDING_COLUMNS[col],
        value: raw.to_string(),
    })
}

/// Console line for one streamed sample, matching [`STREAM_HEADER`].
pub fn stream_row(s: &Sample) -> String {
    format!(
        "{},{:.5},{:.5},{:.5},{:.3},{:.3},{:.3}",
        s.timestamp_ms, s.ax, s.ay, s.az, s.gx, s.gy, s.gz
    )
}
