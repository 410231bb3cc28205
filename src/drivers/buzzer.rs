// GestureWatch - Buzzer Driver
//
// Passive piezo on a PWM channel. The carrier frequency is fixed when the
// timer is configured; here we only gate it by switching the duty cycle.
// Pulse timing belongs to the actuation schedule, never to this driver.

use embedded_hal::pwm::SetDutyCycle;

use crate::config::*;
use crate::error::ActuatorError;

pub struct Buzzer<P> {
    pwm: P,
}

impl<P: SetDutyCycle> Buzzer<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn tone_on(&mut self) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fraction(BUZZER_DUTY, BUZZER_DUTY_MAX)
            .map_err(|_| ActuatorError::Buzzer)
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::Buzzer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::pwm::{ErrorKind, ErrorType};

    struct FakePwm {
        max: u16,
        duty: u16,
    }

    impl ErrorType for FakePwm {
        type Error = ErrorKind;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn tone_uses_configured_duty() {
        let mut buzzer = Buzzer::new(FakePwm {
            max: BUZZER_DUTY_MAX,
            duty: 0,
        });
        buzzer.tone_on().unwrap();
        assert_eq!(buzzer.pwm.duty, BUZZER_DUTY);

        buzzer.off().unwrap();
        assert_eq!(buzzer.pwm.duty, 0);
    }

    #[test]
    fn duty_scales_to_timer_resolution() {
        let mut buzzer = Buzzer::new(FakePwm { max: 8191, duty: 0 });
        buzzer.tone_on().unwrap();
        let expected = (8191u32 * BUZZER_DUTY as u32 / BUZZER_DUTY_MAX as u32) as u16;
        assert_eq!(buzzer.pwm.duty, expected);
    }
}
