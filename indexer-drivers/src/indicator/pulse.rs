//! Servo-style pulse light controller
//!
//! The light controller reads a 50 Hz pulse train and maps the pulse width
//! to a pattern: 1000 µs is pattern -1.0, 2000 µs is pattern 1.0.

use embedded_hal::pwm::SetDutyCycle;
use indexer_core::traits::StatusIndicator;

/// PWM frame period
pub const FRAME_US: u16 = 20_000;

const CENTER_US: f32 = 1500.0;
const SPAN_US: f32 = 500.0;

/// Light controller on a 50 Hz PWM channel
pub struct PulseIndicator<P> {
    pwm: P,
    pattern: Option<f32>,
}

impl<P: SetDutyCycle> PulseIndicator<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, pattern: None }
    }

    /// Last pattern sent
    pub fn pattern(&self) -> Option<f32> {
        self.pattern
    }

    /// Pulse width in µs for `pattern`
    pub fn pulse_us(pattern: f32) -> u16 {
        let pattern = if pattern.is_finite() {
            pattern.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        (CENTER_US + SPAN_US * pattern) as u16
    }
}

impl<P: SetDutyCycle> StatusIndicator for PulseIndicator<P> {
    fn set_pattern(&mut self, pattern: f32) {
        if self.pattern == Some(pattern) {
            return;
        }
        let _ = self
            .pwm
            .set_duty_cycle_fraction(Self::pulse_us(pattern), FRAME_US);
        self.pattern = Some(pattern);
    }
}
