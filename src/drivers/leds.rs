// GestureWatch - Indicator LEDs
//
// Three discrete GPIO outputs driven together as one pattern.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::ActuatorError;

/// On/off state for [left, center, right].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedPattern(pub [bool; 3]);

impl LedPattern {
    pub const OFF: Self = Self([false, false, false]);
    pub const ALL: Self = Self([true, true, true]);
    pub const OUTER: Self = Self([true, false, true]);
    pub const CENTER: Self = Self([false, true, false]);
}

pub struct IndicatorLeds<P> {
    pins: [P; 3],
    current: Option<LedPattern>,
}

impl<P: OutputPin> IndicatorLeds<P> {
    pub fn new(left: P, center: P, right: P) -> Self {
        Self {
            pins: [left, center, right],
            current: None,
        }
    }

    pub fn set(&mut self, pattern: LedPattern) -> Result<(), ActuatorError> {
        for (pin, on) in self.pins.iter_mut().zip(pattern.0) {
            pin.set_state(PinState::from(on))
                .map_err(|_| ActuatorError::Led)?;
        }
        self.current = Some(pattern);
        Ok(())
    }

    /// Last pattern written successfully, if any.
    pub fn current(&self) -> Option<LedPattern> {
        self.current
    }
}
