pub mod buzzer;
pub mod display;
pub mod imu;
pub mod leds;
