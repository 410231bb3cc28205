// GestureWatch - Hardware & System Configuration
// Target: ESP32-S3 dev board running ESP-IDF (std)

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 14;
pub const PIN_I2C_SCL: i32 = 2;
pub const PIN_LED_LEFT: i32 = 1;
pub const PIN_LED_CENTER: i32 = 44;
pub const PIN_LED_RIGHT: i32 = 43;
pub const PIN_BUZZER: i32 = 21;

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_ADDR_OLED: u8 = 0x3C; // some panels strap to 0x3D

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// Fixed two-line result layout plus a status line.
pub const TITLE_TEXT: &str = "GESTURE:";
pub const TITLE_POS: (i32, i32) = (0, 0);
pub const LABEL_POS: (i32, i32) = (0, 14);
pub const STATUS_POS: (i32, i32) = (0, 34);

// ---------------------------------------------------------------------------
// MPU6050 Sensor
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_2G: f32 = 16384.0; // LSB/g   at ±2 g
pub const GYRO_SCALE_250: f32 = 131.0;   // LSB/°/s at ±250 °/s
pub const IMU_SETTLE_MS: u32 = 50;       // after wake + range writes

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------
pub const BUZZER_FREQ_HZ: u32 = 1500;
pub const BUZZER_DUTY: u16 = 400;       // out of BUZZER_DUTY_MAX
pub const BUZZER_DUTY_MAX: u16 = 1023;  // 10-bit LEDC resolution

// ---------------------------------------------------------------------------
// Sampling & Model Contract
// ---------------------------------------------------------------------------
pub const SAMPLE_RATE_HZ: u32 = 50;
pub const WINDOW_SECONDS: u32 = 3;
pub const WINDOW_LEN: usize = (SAMPLE_RATE_HZ * WINDOW_SECONDS) as usize; // 150
pub const FEATURE_COUNT: usize = 10;

/// Consecutive abandoned windows between escalated error reports.
pub const SENSOR_FAILURE_REPORT_EVERY: u32 = 50;

/// Stack for the pipeline thread; the window buffer lives on the heap.
pub const PIPELINE_TASK_STACK: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// Sampling cadence shared with the offline trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub sample_rate_hz: u32,
    pub window_seconds: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            window_seconds: WINDOW_SECONDS,
        }
    }
}

impl PipelineConfig {
    /// Reject cadences the millisecond scheduler cannot hold exactly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.window_seconds == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if 1000 % self.sample_rate_hz != 0 {
            return Err(ConfigError::UnevenPeriod {
                rate_hz: self.sample_rate_hz,
            });
        }
        Ok(())
    }

    pub fn period_ms(&self) -> u64 {
        1000 / self.sample_rate_hz as u64
    }

    pub fn window_len(&self) -> usize {
        (self.sample_rate_hz * self.window_seconds) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_trainer_window() {
        let cfg = PipelineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.period_ms(), 20);
        assert_eq!(cfg.window_len(), WINDOW_LEN);
        assert_eq!(WINDOW_LEN, 150);
    }

    #[test]
    fn rejects_bad_cadence() {
        let zero = PipelineConfig {
            sample_rate_hz: 0,
            window_seconds: 3,
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroSampleRate)));

        let empty = PipelineConfig {
            sample_rate_hz: 50,
            window_seconds: 0,
        };
        assert!(matches!(empty.validate(), Err(ConfigError::ZeroWindow)));

        let uneven = PipelineConfig {
            sample_rate_hz: 60,
            window_seconds: 2,
        };
        assert!(matches!(
            uneven.validate(),
            Err(ConfigError::UnevenPeriod { rate_hz: 60 })
        ));
    }
}
