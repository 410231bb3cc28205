// Auto-generated model parameters (nearest-centroid)
//
// Produced by the offline trainer from the recorded per-gesture CSV files.
// Feature order: accel mean/std/min/max/energy, gyro mean/std/min/max/energy.

pub const LABELS: &[&str] = &["idle", "raise", "shake", "wave"];

#[rustfmt::skip]
pub const CENTROIDS: &[(&str, &[f32])] = &[
    ("idle",  &[1.000412, 0.010836, 0.972917, 1.031190, 1.000942, 1.204371, 0.498215, 0.213740, 2.807634, 1.698654]),
    ("raise", &[1.021953, 0.119487, 0.781372, 1.352905, 1.058659, 44.872151, 29.917602, 2.061069, 119.652672, 2908.571289]),
    ("shake", &[1.349027, 0.551283, 0.248779, 2.902161, 2.123852, 180.338913, 90.284317, 10.114504, 249.854965, 40673.996094]),
    ("wave",  &[1.081466, 0.201355, 0.603027, 1.598633, 1.210121, 110.463188, 60.120846, 5.343511, 239.778625, 15816.536133]),
];
