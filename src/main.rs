// GestureWatch - Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the shared I2C bus (OLED + MPU6050).
//   2. Probe both devices and log the result.
//   3. Wake and range the IMU, initialise the OLED.
//   4. Load the prototype table; a bad table stops the boot.
//   5. Run the gesture pipeline forever (or the raw IMU stream with
//      the `imu-stream` feature).
//
// All hardware is owned by a single pipeline thread. Nothing runs beside it.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("GestureWatch firmware starting");

    let pipeline = std::thread::Builder::new()
        .name("gesture".into())
        .stack_size(gesturewatch::config::PIPELINE_TASK_STACK)
        .spawn(firmware::run)?;

    match pipeline.join() {
        Ok(result) => result,
        Err(_) => anyhow::bail!("pipeline thread panicked"),
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("gesturewatch is ESP-IDF firmware; use `replay_csv` to classify recordings on the host");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::Mutex;

    use anyhow::Context;
    use embedded_hal_bus::i2c::MutexDevice;
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use gesturewatch::clock::MonotonicClock;
    use gesturewatch::config::*;
    use gesturewatch::drivers::imu::Mpu6050;
    use gesturewatch::scheduler::SamplingScheduler;

    #[cfg(not(feature = "imu-stream"))]
    use esp_idf_hal::{
        gpio::{OutputPin, PinDriver},
        ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution},
    };
    #[cfg(not(feature = "imu-stream"))]
    use gesturewatch::{
        actuation::Actuators,
        classifier::PrototypeTable,
        drivers::{
            buzzer::Buzzer,
            display::Ssd1306,
            leds::{IndicatorLeds, LedPattern},
        },
        model_params::{CENTROIDS, LABELS},
        tasks::gesture::GesturePipeline,
    };

    pub fn run() -> anyhow::Result<()> {
        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        let config = PipelineConfig::default();

        // ---- I2C bus (shared between OLED and MPU6050) ------------------------
        let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            pins.gpio14, // PIN_I2C_SDA
            pins.gpio2,  // PIN_I2C_SCL
            &i2c_config,
        )?;
        let i2c_bus = Mutex::new(i2c);

        // ---- IMU ---------------------------------------------------------------
        let mut imu = Mpu6050::new(MutexDevice::new(&i2c_bus));
        let imu_ok = imu.is_connected();
        if !imu_ok {
            log::error!("MPU6050 not found at 0x{:02X}", I2C_ADDR_MPU6050);
        }
        imu.init(&mut FreeRtos).context("MPU6050 init")?;

        let scheduler = SamplingScheduler::new(imu, MonotonicClock::new(), &config)?;

        #[cfg(feature = "imu-stream")]
        {
            log::info!("Boot check - IMU:{}", imu_ok);
            let mut stream = gesturewatch::tasks::stream::StreamTask::new(scheduler, std::io::stdout());
            stream.run()
        }

        #[cfg(not(feature = "imu-stream"))]
        {
            // ---- OLED --------------------------------------------------------------
            let mut display = Ssd1306::new(MutexDevice::new(&i2c_bus));
            let oled_ok = display.is_connected();
            log::info!("Boot check - OLED:{} IMU:{}", oled_ok, imu_ok);
            if let Err(e) = display.init() {
                // The pipeline still runs headless.
                log::error!("OLED init failed: {}", e);
            }

            // ---- LEDs + buzzer -------------------------------------------------------
            let leds = IndicatorLeds::new(
                PinDriver::output(pins.gpio1.downgrade_output())?,  // PIN_LED_LEFT
                PinDriver::output(pins.gpio44.downgrade_output())?, // PIN_LED_CENTER
                PinDriver::output(pins.gpio43.downgrade_output())?, // PIN_LED_RIGHT
            );

            let timer = LedcTimerDriver::new(
                peripherals.ledc.timer0,
                &TimerConfig::new()
                    .frequency(BUZZER_FREQ_HZ.Hz().into())
                    .resolution(Resolution::Bits10),
            )?;
            let buzzer = Buzzer::new(LedcDriver::new(
                peripherals.ledc.channel0,
                &timer,
                pins.gpio21, // PIN_BUZZER
            )?);

            let mut outputs = Actuators { leds, buzzer };
            outputs.leds.set(LedPattern::OFF)?;
            outputs.buzzer.off()?;

            // ---- Model -------------------------------------------------------------
            let table = PrototypeTable::load(LABELS, CENTROIDS).context("prototype table")?;

            let mut pipeline = GesturePipeline::new(scheduler, table, display, outputs)?;
            log::info!("Boot complete - sampling at {} Hz", config.sample_rate_hz);

            Err(pipeline.run().into())
        }
    }
}
