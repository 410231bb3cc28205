// GestureWatch - Error Taxonomy
//
// Sensor faults abandon the current window and are recoverable; classifier
// faults are startup configuration errors that keep the loop from starting.

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("IMU bus transaction failed: {0:?}")]
    Bus(ErrorKind),

    #[error("IMU burst returned {actual} bytes, expected {expected}")]
    Malformed { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("prototype table is empty")]
    EmptyPrototypeTable,

    #[error("prototype '{label}' has {actual} features, expected {expected}")]
    FeatureDimensionMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("label '{0}' is listed but has no centroid")]
    MissingPrototype(String),

    #[error("label '{0}' appears more than once")]
    DuplicateLabel(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    #[error("window length must be non-zero")]
    Empty,

    #[error("window holds {actual} samples, expected {expected}")]
    Incomplete { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("window duration must be non-zero")]
    ZeroWindow,

    #[error("{rate_hz} Hz does not give a whole-millisecond period")]
    UnevenPeriod { rate_hz: u32 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    #[error("display bus write failed: {0:?}")]
    Bus(ErrorKind),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    #[error("indicator LED write failed")]
    Led,

    #[error("buzzer duty update failed")]
    Buzzer,
}
