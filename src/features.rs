// GestureWatch - Feature Extraction
//
// Reduces a window to ten numbers: mean, population std, min, max and
// mean-square energy of the acceleration magnitude series, then the same five
// for the angular-rate magnitude series. The offline trainer computes exactly
// this, in this order, so any change here invalidates `model_params`.

use crate::config::FEATURE_COUNT;
use crate::events::{Sample, Window};

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "accel_mean",
    "accel_std",
    "accel_min",
    "accel_max",
    "accel_energy",
    "gyro_mean",
    "gyro_std",
    "gyro_min",
    "gyro_max",
    "gyro_energy",
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn accel(&self) -> SeriesStats {
        SeriesStats::from_slice(&self.0[..5])
    }

    pub fn gyro(&self) -> SeriesStats {
        SeriesStats::from_slice(&self.0[5..])
    }
}

/// Five summary statistics of one magnitude series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f32,
    pub std: f32,
    pub min: f32,
    pub max: f32,
    pub energy: f32,
}

impl SeriesStats {
    fn from_slice(v: &[f32]) -> Self {
        Self {
            mean: v[0],
            std: v[1],
            min: v[2],
            max: v[3],
            energy: v[4],
        }
    }

    fn to_array(self) -> [f32; 5] {
        [self.mean, self.std, self.min, self.max, self.energy]
    }

    /// Sums run in f64 over f32 inputs, so the mean of a constant series is
    /// exactly that constant.
    fn of(series: &[f32]) -> Self {
        let n = series.len() as f64;
        let mean = series.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = series
            .iter()
            .map(|&v| (v as f64 - mean) * (v as f64 - mean))
            .sum::<f64>()
            / n;
        let energy = series.iter().map(|&v| v as f64 * v as f64).sum::<f64>() / n;
        let min = series.iter().copied().fold(f32::INFINITY, f32::min);
        let max = series.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Self {
            mean: mean as f32,
            std: var.sqrt() as f32,
            min,
            max,
            energy: energy as f32,
        }
    }
}

/// Euclidean norm in f32, as the trainer computes it.
fn norm([x, y, z]: [f32; 3]) -> f32 {
    (x * x + y * y + z * z).sqrt()
}

/// Extract the feature vector of a full window.
pub fn extract(window: &Window) -> FeatureVector {
    extract_samples(window.samples())
}

/// Same computation over a bare slice; used by the replay tool on recordings
/// whose length differs from the live window. `samples` must be non-empty.
pub fn extract_samples(samples: &[Sample]) -> FeatureVector {
    let accel: Vec<f32> = samples.iter().map(|s| norm(s.accel())).collect();
    let gyro: Vec<f32> = samples.iter().map(|s| norm(s.gyro())).collect();

    let mut out = [0.0f32; FEATURE_COUNT];
    out[..5].copy_from_slice(&SeriesStats::of(&accel).to_array());
    out[5..].copy_from_slice(&SeriesStats::of(&gyro).to_array());
    FeatureVector(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_of(samples: Vec<Sample>) -> Window {
        let n = samples.len();
        Window::from_samples(samples, n).unwrap()
    }

    fn sample(accel: [f32; 3], gyro: [f32; 3]) -> Sample {
        Sample {
            timestamp_ms: 0,
            ax: accel[0],
            ay: accel[1],
            az: accel[2],
            gx: gyro[0],
            gy: gyro[1],
            gz: gyro[2],
        }
    }

    #[test]
    fn constant_window_collapses() {
        let s = sample([0.1, -0.3, 0.95], [12.0, -4.5, 3.25]);
        let fv = extract(&window_of(vec![s; 150]));

        for stats in [fv.accel(), fv.gyro()] {
            assert_eq!(stats.std, 0.0);
            assert_eq!(stats.min, stats.mean);
            assert_eq!(stats.max, stats.mean);
            let rel = (stats.energy - stats.mean * stats.mean).abs() / stats.energy;
            assert!(rel < 1e-6, "energy {} vs mean² {}", stats.energy, stats.mean * stats.mean);
        }
    }

    #[test]
    fn order_and_length_are_fixed() {
        // Magnitudes are 1,2 (accel) and 3,4 (gyro), whatever the signs.
        let samples = vec![
            sample([-1.0, 0.0, 0.0], [0.0, -3.0, 0.0]),
            sample([0.0, 0.0, 2.0], [0.0, 0.0, -4.0]),
        ];
        let fv = extract(&window_of(samples));

        assert_eq!(fv.as_slice().len(), FEATURE_COUNT);
        assert_eq!(fv.0, [1.5, 0.5, 1.0, 2.0, 2.5, 3.5, 0.5, 3.0, 4.0, 12.5]);
    }

    #[test]
    fn std_is_population_not_sample() {
        let samples = vec![
            sample([0.0, 0.0, 1.0], [0.0; 3]),
            sample([0.0, 0.0, 3.0], [0.0; 3]),
            sample([0.0, 0.0, 1.0], [0.0; 3]),
            sample([0.0, 0.0, 3.0], [0.0; 3]),
        ];
        let stats = extract(&window_of(samples)).accel();
        // sample std would be sqrt(4/3)
        assert_eq!(stats.std, 1.0);
        assert_eq!(stats.energy, 5.0);
    }

    #[test]
    fn gyro_series_is_independent_of_accel() {
        let quiet = extract(&window_of(vec![sample([0.0, 0.0, 1.0], [0.0; 3]); 10]));
        let spun = extract(&window_of(vec![sample([0.0, 0.0, 1.0], [30.0, 40.0, 0.0]); 10]));
        assert_eq!(quiet.accel(), spun.accel());
        assert_eq!(spun.gyro().mean, 50.0);
        assert_eq!(quiet.gyro().energy, 0.0);
    }

    #[test]
    fn extraction_is_deterministic() {
        let samples: Vec<Sample> = (0..150)
            .map(|i| {
                let t = i as f32 * 0.02;
                sample([t.sin(), t.cos(), 0.9], [t * 10.0, -t, 2.0])
            })
            .collect();
        let w = window_of(samples);
        assert_eq!(extract(&w), extract(&w));
    }
}
