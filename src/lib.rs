// GestureWatch - gesture recognition on an MPU6050 wrist unit.
//
// Everything except the ESP-IDF entry point lives here and builds on the host,
// so the pipeline is tested against fake buses, pins and clocks.

pub mod actuation;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod features;
pub mod model_params;
pub mod recording;
pub mod scheduler;
pub mod tasks;
