// GestureWatch - MPU6050 IMU Driver
//
// Register-level driver over any embedded-hal 1.0 I2C bus. The ranges are
// fixed at ±2 g / ±250 °/s to match the scale used when the prototypes were
// recorded.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};

use crate::config::*;
use crate::error::SensorError;
use crate::events::Sample;

// MPU6050 register addresses
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 14-byte sensor burst
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub const BURST_LEN: usize = 14;

/// Anything that can hand the scheduler one calibrated sample per tick.
pub trait SampleSource {
    fn read_sample(&mut self, timestamp_ms: u64) -> Result<Sample, SensorError>;
}

pub struct Mpu6050<I2C> {
    bus: I2C,
    address: u8,
}

impl<I2C: I2c> Mpu6050<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self::with_address(bus, I2C_ADDR_MPU6050)
    }

    /// AD0 pulled high moves the device to 0x69.
    pub fn with_address(bus: I2C, address: u8) -> Self {
        Self { bus, address }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&mut self) -> bool {
        let mut buf = [0u8; 1];
        match self.bus.write_read(self.address, &[REG_WHO_AM_I], &mut buf) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor and select ±2 g / ±250 °/s, then wait for it to settle.
    /// Must complete before the first `read_sample`.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SensorError> {
        // Wake up (clear SLEEP bit)
        self.write_reg(REG_PWR_MGMT_1, 0x00)?;

        // Accelerometer: ±2 g
        self.write_reg(REG_ACCEL_CONFIG, 0x00)?;

        // Gyroscope: ±250 °/s
        self.write_reg(REG_GYRO_CONFIG, 0x00)?;

        delay.delay_ms(IMU_SETTLE_MS);

        log::info!("MPU6050 initialised (±2g, ±250°/s)");
        Ok(())
    }

    pub fn release(self) -> I2C {
        self.bus
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.bus
            .write(self.address, &[reg, value])
            .map_err(|e| SensorError::Bus(e.kind()))
    }
}

impl<I2C: I2c> SampleSource for Mpu6050<I2C> {
    /// Burst-read all 6 axes and convert to physical units.
    fn read_sample(&mut self, timestamp_ms: u64) -> Result<Sample, SensorError> {
        let mut raw = [0u8; BURST_LEN];
        self.bus
            .write_read(self.address, &[REG_ACCEL_XOUT_H], &mut raw)
            .map_err(|e| SensorError::Bus(e.kind()))?;
        decode_burst(&raw, timestamp_ms)
    }
}

/// Decode a `ACCEL_XOUT_H..GYRO_ZOUT_L` burst: seven big-endian i16 fields
/// `[ax, ay, az, temp, gx, gy, gz]`. Temperature is skipped.
pub fn decode_burst(raw: &[u8], timestamp_ms: u64) -> Result<Sample, SensorError> {
    if raw.len() != BURST_LEN {
        return Err(SensorError::Malformed {
            expected: BURST_LEN,
            actual: raw.len(),
        });
    }

    let field = |i: usize| i16::from_be_bytes([raw[2 * i], raw[2 * i + 1]]) as f32;

    Ok(Sample {
        timestamp_ms,
        ax: field(0) / ACCEL_SCALE_2G,
        ay: field(1) / ACCEL_SCALE_2G,
        az: field(2) / ACCEL_SCALE_2G,
        // field(3) = temperature
        gx: field(4) / GYRO_SCALE_250,
        gy: field(5) / GYRO_SCALE_250,
        gz: field(6) / GYRO_SCALE_250,
    })
}
