// GestureWatch - Sampling Scheduler
//
// Collects one window at a fixed rate. Deadlines advance by adding the period
// to the previous deadline, never to "now", so a late tick costs at most that
// tick and the phase stays locked to the window start. A tick that is already
// past its deadline simply runs without sleeping.
//
// A failed read ends the window: the partial buffer is dropped and the error
// goes to the caller once that tick's deadline has passed, so a dead sensor
// is retried at the sampling rate and never in a tight loop.

use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::drivers::imu::SampleSource;
use crate::error::{ConfigError, SensorError};
use crate::events::{Sample, Window};

pub struct SamplingScheduler<S, C> {
    source: S,
    clock: C,
    period_ms: u64,
    window_len: usize,
    deadline_ms: u64,
}

impl<S: SampleSource, C: Clock> SamplingScheduler<S, C> {
    pub fn new(source: S, clock: C, config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            clock,
            period_ms: config.period_ms(),
            window_len: config.window_len(),
            deadline_ms: 0,
        })
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Deadline of the most recent tick.
    pub fn phase_deadline(&self) -> u64 {
        self.deadline_ms
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn collect_window(&mut self) -> Result<Window, SensorError> {
        self.collect_window_with(|_, _| {})
    }

    /// Like [`collect_window`](Self::collect_window), calling
    /// `on_tick(&sample, now_ms)` once per sample so time-driven outputs
    /// advance at the sampling rate.
    pub fn collect_window_with<F>(&mut self, mut on_tick: F) -> Result<Window, SensorError>
    where
        F: FnMut(&Sample, u64),
    {
        let mut buf: Vec<Sample> = Vec::with_capacity(self.window_len);
        self.deadline_ms = self.clock.now_ms();

        for _ in 0..self.window_len {
            let read = self.source.read_sample(self.clock.now_ms());
            self.deadline_ms += self.period_ms;
            let sample = match read {
                Ok(sample) => sample,
                Err(e) => {
                    self.sleep_to_deadline();
                    return Err(e);
                }
            };
            on_tick(&sample, self.clock.now_ms());
            buf.push(sample);

            self.sleep_to_deadline();
        }

        Ok(Window::filled(buf))
    }

    fn sleep_to_deadline(&mut self) {
        if self.clock.now_ms() < self.deadline_ms {
            self.clock.sleep_until(self.deadline_ms);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Simulated time; sleeping jumps straight to the deadline.
    pub(crate) struct SimClock {
        pub now: Rc<Cell<u64>>,
        pub sleeps: Vec<u64>,
    }

    impl Clock for SimClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }

        fn sleep_until(&mut self, deadline_ms: u64) {
            self.sleeps.push(deadline_ms);
            if deadline_ms > self.now.get() {
                self.now.set(deadline_ms);
            }
        }
    }

    /// Each read costs `read_cost_ms`, plus any one-off stall injected for a
    /// given tick index.
    pub(crate) struct JitterySource {
        pub now: Rc<Cell<u64>>,
        pub read_cost_ms: u64,
        pub stalls: Vec<(usize, u64)>,
        pub fail_at: Option<usize>,
        pub reads: usize,
    }

    impl SampleSource for JitterySource {
        fn read_sample(&mut self, timestamp_ms: u64) -> Result<Sample, SensorError> {
            let idx = self.reads;
            self.reads += 1;
            if self.fail_at == Some(idx) {
                return Err(SensorError::Malformed {
                    expected: 14,
                    actual: 0,
                });
            }
            let stall = self
                .stalls
                .iter()
                .find(|(i, _)| *i == idx)
                .map_or(0, |(_, ms)| *ms);
            self.now.set(self.now.get() + self.read_cost_ms + stall);
            Ok(Sample {
                timestamp_ms,
                az: 1.0,
                ..Sample::default()
            })
        }
    }

    fn rig(
        start: u64,
        window_seconds: u32,
        stalls: Vec<(usize, u64)>,
    ) -> SamplingScheduler<JitterySource, SimClock> {
        let now = Rc::new(Cell::new(start));
        let source = JitterySource {
            now: Rc::clone(&now),
            read_cost_ms: 1,
            stalls,
            fail_at: None,
            reads: 0,
        };
        let clock = SimClock {
            now,
            sleeps: Vec::new(),
        };
        let cfg = PipelineConfig {
            sample_rate_hz: 50,
            window_seconds,
        };
        SamplingScheduler::new(source, clock, &cfg).unwrap()
    }

    #[test]
    fn produces_exactly_one_window() {
        let mut sched = rig(0, 3, Vec::new());
        let window = sched.collect_window().unwrap();
        assert_eq!(window.len(), 150);
        let stamps: Vec<u64> = window.samples().iter().take(3).map(|s| s.timestamp_ms).collect();
        assert_eq!(stamps, vec![0, 20, 40]);
    }

    #[test]
    fn overruns_do_not_shift_the_phase() {
        // Tick 3 overruns by 35 ms, tick 40 by 90 ms.
        let start = 1_000;
        let mut sched = rig(start, 1, vec![(3, 35), (40, 90)]);
        let period = sched.period_ms();

        let mut ticks = 0u64;
        let window = sched.collect_window_with(|_, _| ticks += 1).unwrap();

        assert_eq!(ticks, 50);
        assert_eq!(sched.phase_deadline(), start + ticks * period);

        // The tick after a stall runs late, then samples are back on the grid.
        let stamps: Vec<u64> = window.samples().iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(stamps[3], start + 3 * period);
        assert_eq!(stamps[4], start + 96);
        assert_eq!(stamps[5], start + 5 * period);
        assert_eq!(stamps[41], start + 891);
        assert_eq!(stamps[45], start + 45 * period);
        assert_eq!(stamps[49], start + 49 * period);
    }

    #[test]
    fn late_tick_does_not_sleep() {
        let mut sched = rig(0, 1, vec![(0, 45)]);
        sched.collect_window().unwrap();
        // Tick 0 finished at 46 > 20 and tick 1 at 47 > 40: neither slept.
        assert!(!sched.clock().sleeps.contains(&20));
        assert!(!sched.clock().sleeps.contains(&40));
        assert!(sched.clock().sleeps.contains(&60));
    }

    #[test]
    fn failed_read_waits_out_its_tick() {
        let mut sched = rig(0, 1, Vec::new());
        sched.source_mut().fail_at = Some(0);
        assert!(sched.collect_window().is_err());
        assert_eq!(sched.clock().sleeps, vec![20]);
        assert_eq!(sched.clock().now_ms(), 20);
        assert_eq!(sched.phase_deadline(), 20);
    }

    #[test]
    fn invalid_config_is_refused() {
        let now = Rc::new(Cell::new(0));
        let source = JitterySource {
            now: Rc::clone(&now),
            read_cost_ms: 1,
            stalls: Vec::new(),
            fail_at: None,
            reads: 0,
        };
        let clock = SimClock {
            now,
            sleeps: Vec::new(),
        };
        let cfg = PipelineConfig {
            sample_rate_hz: 0,
            window_seconds: 3,
        };
        assert!(matches!(
            SamplingScheduler::new(source, clock, &cfg),
            Err(ConfigError::ZeroSampleRate)
        ));
    }

    #[test]
    fn read_failure_abandons_window() {
        let mut sched = rig(0, 3, Vec::new());
        sched.source_mut().fail_at = Some(77);
        assert!(sched.collect_window().is_err());
        assert_eq!(sched.source_mut().reads, 78);

        // The next window starts from scratch and is complete.
        let window = sched.collect_window().unwrap();
        assert_eq!(window.len(), 150);
    }
}
