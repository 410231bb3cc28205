// GestureWatch - Data Types
//
// A `Sample` is one calibrated 6-axis reading; a `Window` is a full run of
// samples analysed as one classification unit.

use crate::error::WindowError;

// ---------------------------------------------------------------------------
// Sensor Data (6-axis IMU reading from MPU6050)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    /// Monotonic milliseconds at which the burst read was issued.
    pub timestamp_ms: u64,
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
}

impl Sample {
    pub fn accel(&self) -> [f32; 3] {
        [self.ax, self.ay, self.az]
    }

    pub fn gyro(&self) -> [f32; 3] {
        [self.gx, self.gy, self.gz]
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A complete window. There is no way to build a partially filled one, so
/// anything holding a `Window` holds exactly the expected sample count.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    samples: Vec<Sample>,
}

impl Window {
    pub fn from_samples(samples: Vec<Sample>, expected_len: usize) -> Result<Self, WindowError> {
        if expected_len == 0 {
            return Err(WindowError::Empty);
        }
        if samples.len() != expected_len {
            return Err(WindowError::Incomplete {
                expected: expected_len,
                actual: samples.len(),
            });
        }
        Ok(Self { samples })
    }

    /// Scheduler hand-off: the caller has counted the samples itself.
    pub(crate) fn filled(samples: Vec<Sample>) -> Self {
        debug_assert!(!samples.is_empty());
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a constructed window.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
