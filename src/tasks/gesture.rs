// GestureWatch - Gesture Task
//
// The whole application runs as one loop on one thread:
//   1. collect a full window (the actuation schedule advances on every tick),
//   2. extract features,
//   3. classify against the prototype table,
//   4. start the output pattern for the result.
// A sensor fault drops the window and the loop starts over. Classifier faults
// are configuration errors and stop the loop.

use thiserror::Error;

use crate::actuation::{ActuationController, ActuatorOutputs, Gesture};
use crate::classifier::{classify, PrototypeTable};
use crate::clock::Clock;
use crate::config::*;
use crate::drivers::display::GestureDisplay;
use crate::drivers::imu::SampleSource;
use crate::error::{ClassifierError, SensorError};
use crate::features::{self, FeatureVector};
use crate::scheduler::SamplingScheduler;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    #[error("window abandoned: {0}")]
    Sensor(#[from] SensorError),

    #[error("classifier misconfigured: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Summary of one completed cycle, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub label: String,
    pub distance: f32,
    pub gesture: Gesture,
    pub features: FeatureVector,
}

pub struct GesturePipeline<S, C, D, O> {
    scheduler: SamplingScheduler<S, C>,
    table: PrototypeTable,
    controller: ActuationController,
    display: D,
    outputs: O,
    consecutive_failures: u32,
}

impl<S, C, D, O> GesturePipeline<S, C, D, O>
where
    S: SampleSource,
    C: Clock,
    D: GestureDisplay,
    O: ActuatorOutputs,
{
    /// Refuses to build around a table that would make every result
    /// meaningless.
    pub fn new(
        scheduler: SamplingScheduler<S, C>,
        table: PrototypeTable,
        display: D,
        outputs: O,
    ) -> Result<Self, ClassifierError> {
        table.validate()?;
        Ok(Self {
            scheduler,
            table,
            controller: ActuationController::new(),
            display,
            outputs,
            consecutive_failures: 0,
        })
    }

    /// One full collect → extract → classify → actuate pass.
    pub fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let controller = &mut self.controller;
        let outputs = &mut self.outputs;
        let collected = self.scheduler.collect_window_with(|_, now_ms| {
            controller.advance(now_ms, outputs);
        });
        let window = match collected {
            Ok(window) => window,
            Err(e) => {
                // No more ticks this window: a playing pattern must still end.
                let now_ms = self.scheduler.clock().now_ms();
                self.controller.advance(now_ms, &mut self.outputs);
                return Err(e.into());
            }
        };

        let features = features::extract(&window);
        let result = classify(&features, &self.table)?;
        log::debug!("Features: {:?}", features.as_slice());

        let now_ms = self.scheduler.clock().now_ms();
        let gesture = self
            .controller
            .begin(&result, now_ms, &mut self.display, &mut self.outputs);

        log::info!(
            "Gesture: {} ({:?}, d²={:.4})",
            result.label,
            gesture,
            result.distance
        );

        Ok(CycleReport {
            label: result.label.to_string(),
            distance: result.distance,
            gesture,
            features,
        })
    }

    /// Run until a configuration fault. Sensor faults are counted and logged
    /// but never end the loop.
    pub fn run(&mut self) -> ClassifierError {
        loop {
            match self.run_cycle() {
                Ok(_) => self.consecutive_failures = 0,
                Err(CycleError::Sensor(e)) => self.record_sensor_failure(e),
                Err(CycleError::Classifier(e)) => {
                    log::error!("Classifier fault - stopping: {}", e);
                    return e;
                }
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn record_sensor_failure(&mut self, e: SensorError) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures % SENSOR_FAILURE_REPORT_EVERY == 0 {
            log::error!(
                "IMU has failed {} windows in a row: {}",
                self.consecutive_failures,
                e
            );
        } else {
            log::warn!("IMU read error, window discarded: {}", e);
        }
    }

    pub fn table(&self) -> &PrototypeTable {
        &self.table
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }
}
