// GestureWatch - Stream Task
//
// Data-collection mode (`imu-stream` feature): no inference, every sample is
// printed to the console as a CSV row so takes can be captured over serial
// and labeled on the host.

use std::io::Write;

use crate::clock::Clock;
use crate::drivers::imu::SampleSource;
use crate::error::SensorError;
use crate::recording::{stream_row, STREAM_HEADER};
use crate::scheduler::SamplingScheduler;

pub struct StreamTask<S, C, W> {
    scheduler: SamplingScheduler<S, C>,
    out: W,
    header_written: bool,
}

impl<S: SampleSource, C: Clock, W: Write> StreamTask<S, C, W> {
    pub fn new(scheduler: SamplingScheduler<S, C>, out: W) -> Self {
        Self {
            scheduler,
            out,
            header_written: false,
        }
    }

    /// Print one window's worth of rows. The header goes out once, before the
    /// first row. Returns the number of samples collected.
    pub fn stream_window(&mut self) -> Result<usize, SensorError> {
        if !self.header_written {
            if let Err(e) = writeln!(self.out, "{}", STREAM_HEADER) {
                log::warn!("Console write failed: {}", e);
            }
            self.header_written = true;
        }

        let out = &mut self.out;
        let window = self.scheduler.collect_window_with(|sample, _| {
            if let Err(e) = writeln!(out, "{}", stream_row(sample)) {
                log::warn!("Console write failed: {}", e);
            }
        })?;

        if let Err(e) = self.out.flush() {
            log::warn!("Console flush failed: {}", e);
        }
        Ok(window.len())
    }

    pub fn run(&mut self) -> ! {
        log::info!("Streaming IMU samples");
        loop {
            if let Err(e) = self.stream_window() {
                log::warn!("IMU read error, stream window cut short: {}", e);
            }
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::scheduler::tests::{JitterySource, SimClock};
    use std::cell::Cell;
    use std::rc::Rc;

    fn task(fail_at: Option<usize>) -> StreamTask<JitterySource, SimClock, Vec<u8>> {
        let now = Rc::new(Cell::new(0));
        let source = JitterySource {
            now: Rc::clone(&now),
            read_cost_ms: 1,
            stalls: Vec::new(),
            fail_at,
            reads: 0,
        };
        let clock = SimClock {
            now,
            sleeps: Vec::new(),
        };
        let cfg = PipelineConfig {
            sample_rate_hz: 50,
            window_seconds: 1,
        };
        StreamTask::new(SamplingScheduler::new(source, clock, &cfg).unwrap(), Vec::new())
    }

    #[test]
    fn header_then_one_row_per_tick() {
        let mut t = task(None);
        assert_eq!(t.stream_window().unwrap(), 50);
        assert_eq!(t.stream_window().unwrap(), 50);

        let text = String::from_utf8(t.into_output()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 101);
        assert_eq!(lines[0], STREAM_HEADER);
        assert_eq!(lines[1], "0,0.00000,0.00000,1.00000,0.000,0.000,0.000");
        assert!(lines[2].starts_with("20,"));
        assert_eq!(lines.iter().filter(|l| **l == STREAM_HEADER).count(), 1);
    }

    #[test]
    fn rows_before_a_failure_are_kept() {
        let mut t = task(Some(3));
        assert!(t.stream_window().is_err());
        let text = String::from_utf8(t.into_output()).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
