// GestureWatch - Actuation Controller
//
// Turns a classification into LED, buzzer and display output. Every gesture
// maps to a short fixed list of timed steps; `begin` renders the display and
// arms the list, and `advance` is called from the sampling loop on every tick
// to apply whatever steps have come due. Nothing here sleeps, so buzzer pulses
// play out while the next window is being sampled.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::classifier::ClassificationResult;
use crate::config::*;
use crate::drivers::buzzer::Buzzer;
use crate::drivers::display::GestureDisplay;
use crate::drivers::leds::{IndicatorLeds, LedPattern};
use crate::error::{ActuatorError, DisplayError};

// ---------------------------------------------------------------------------
// Gestures
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Alert,
    Greet,
    Raised,
    /// Any label the firmware has no pattern for. Inert.
    Unknown,
}

impl Gesture {
    /// Map a classifier label to its output pattern.
    pub fn from_label(label: &str) -> Self {
        match label {
            "idle" => Self::Idle,
            "shake" => Self::Alert,
            "wave" => Self::Greet,
            "raise" => Self::Raised,
            _ => Self::Unknown,
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Idle => "Status: calm",
            Self::Alert => "Action: alert",
            Self::Greet => "Action: greet",
            Self::Raised => "Action: up",
            Self::Unknown => "Unknown",
        }
    }

    /// Timed steps, offsets in ms from `begin`, sorted by offset.
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Self::Idle | Self::Unknown => &QUIET_STEPS,
            Self::Alert => &ALERT_STEPS,
            Self::Greet => &GREET_STEPS,
            Self::Raised => &RAISED_STEPS,
        }
    }

    /// Total length of the pattern in ms.
    pub fn duration_ms(&self) -> u64 {
        self.steps().last().map_or(0, |s| s.at_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCommand {
    Leds(LedPattern),
    Tone(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub at_ms: u64,
    pub command: OutputCommand,
}

const fn step(at_ms: u64, command: OutputCommand) -> Step {
    Step { at_ms, command }
}

const QUIET_STEPS: [Step; 2] = [
    step(0, OutputCommand::Leds(LedPattern::OFF)),
    step(0, OutputCommand::Tone(false)),
];

// Three 60 ms chirps.
const ALERT_STEPS: [Step; 7] = [
    step(0, OutputCommand::Leds(LedPattern::ALL)),
    step(0, OutputCommand::Tone(true)),
    step(60, OutputCommand::Tone(false)),
    step(120, OutputCommand::Tone(true)),
    step(180, OutputCommand::Tone(false)),
    step(240, OutputCommand::Tone(true)),
    step(300, OutputCommand::Tone(false)),
];

// LEDs first, then one 180 ms pulse after a short pause.
const GREET_STEPS: [Step; 3] = [
    step(0, OutputCommand::Leds(LedPattern::OUTER)),
    step(80, OutputCommand::Tone(true)),
    step(260, OutputCommand::Tone(false)),
];

const RAISED_STEPS: [Step; 3] = [
    step(0, OutputCommand::Leds(LedPattern::CENTER)),
    step(0, OutputCommand::Tone(true)),
    step(450, OutputCommand::Tone(false)),
];

// ---------------------------------------------------------------------------
// Output handles
// ---------------------------------------------------------------------------

/// The discrete outputs a pattern drives.
pub trait ActuatorOutputs {
    fn set_leds(&mut self, pattern: LedPattern) -> Result<(), ActuatorError>;
    fn set_tone(&mut self, on: bool) -> Result<(), ActuatorError>;
}

pub struct Actuators<P, B> {
    pub leds: IndicatorLeds<P>,
    pub buzzer: Buzzer<B>,
}

impl<P: OutputPin, B: SetDutyCycle> ActuatorOutputs for Actuators<P, B> {
    fn set_leds(&mut self, pattern: LedPattern) -> Result<(), ActuatorError> {
        self.leds.set(pattern)
    }

    fn set_tone(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on {
            self.buzzer.tone_on()
        } else {
            self.buzzer.off()
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActuationState {
    gesture: Gesture,
    started_ms: u64,
    next_step: usize,
}

#[derive(Debug, Default)]
pub struct ActuationController {
    state: Option<ActuationState>,
}

impl ActuationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the pattern for a fresh result. Whatever the previous pattern
    /// had left is dropped and the buzzer is silenced first. The display is
    /// rendered here; its failures are logged and never stop the cycle.
    pub fn begin<D, O>(
        &mut self,
        result: &ClassificationResult<'_>,
        now_ms: u64,
        display: &mut D,
        outputs: &mut O,
    ) -> Gesture
    where
        D: GestureDisplay,
        O: ActuatorOutputs,
    {
        let gesture = Gesture::from_label(result.label);

        if !self.is_finished() {
            log::debug!("Dropping unfinished {:?} pattern", self.gesture());
            if let Err(e) = outputs.set_tone(false) {
                log::warn!("Buzzer off failed: {}", e);
            }
        }

        if let Err(e) = render(display, result.label, gesture) {
            log::warn!("Display error: {}", e);
        }

        self.state = Some(ActuationState {
            gesture,
            started_ms: now_ms,
            next_step: 0,
        });
        self.advance(now_ms, outputs);
        gesture
    }

    /// Apply every step that is due at `now_ms`. Returns how many ran.
    pub fn advance<O: ActuatorOutputs>(&mut self, now_ms: u64, outputs: &mut O) -> usize {
        let Some(state) = self.state.as_mut() else {
            return 0;
        };
        let steps = state.gesture.steps();
        let elapsed = now_ms.saturating_sub(state.started_ms);

        let mut applied = 0;
        while let Some(step) = steps.get(state.next_step) {
            if step.at_ms > elapsed {
                break;
            }
            let outcome = match step.command {
                OutputCommand::Leds(pattern) => outputs.set_leds(pattern),
                OutputCommand::Tone(on) => outputs.set_tone(on),
            };
            if let Err(e) = outcome {
                log::warn!("{:?} step {:?} failed: {}", state.gesture, step.command, e);
            }
            state.next_step += 1;
            applied += 1;
        }
        applied
    }

    pub fn is_finished(&self) -> bool {
        self.state
            .map_or(true, |s| s.next_step >= s.gesture.steps().len())
    }

    /// Pattern currently (or most recently) playing.
    pub fn gesture(&self) -> Option<Gesture> {
        self.state.map(|s| s.gesture)
    }
}

fn render<D: GestureDisplay>(display: &mut D, label: &str, gesture: Gesture) -> Result<(), DisplayError> {
    display.clear()?;
    display.draw_text(TITLE_TEXT, TITLE_POS.0, TITLE_POS.1)?;
    display.draw_text(&label.to_uppercase(), LABEL_POS.0, LABEL_POS.1)?;
    display.draw_text(gesture.status_text(), STATUS_POS.0, STATUS_POS.1)?;
    display.present()
}
