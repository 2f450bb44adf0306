//! Break-beam receiver on a GPIO input
//!
//! Reports the raw line level. The receivers pull the line low while the
//! beam is obstructed; the sensor gate does the inversion.

use embedded_hal::digital::InputPin;
use indexer_core::traits::{DigitalSensor, FaultKind};

/// Break-beam receiver
pub struct BreakBeam<P> {
    pin: P,
}

impl<P: InputPin> BreakBeam<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> DigitalSensor for BreakBeam<P> {
    fn read(&mut self) -> Result<bool, FaultKind> {
        self.pin.is_high().map_err(|_| FaultKind::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{Error, ErrorKind, ErrorType};

    #[derive(Debug)]
    struct PinError;

    impl Error for PinError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// GPIO input with a settable level
    struct MockInput {
        high: bool,
        broken: bool,
    }

    impl ErrorType for MockInput {
        type Error = PinError;
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.broken {
                Err(PinError)
            } else {
                Ok(self.high)
            }
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    #[test]
    fn test_reports_raw_level() {
        let mut beam = BreakBeam::new(MockInput {
            high: true,
            broken: false,
        });
        assert_eq!(beam.read(), Ok(true));

        let mut beam = BreakBeam::new(MockInput {
            high: false,
            broken: false,
        });
        assert_eq!(beam.read(), Ok(false));
    }

    #[test]
    fn test_pin_error_is_unavailable() {
        let mut beam = BreakBeam::new(MockInput {
            high: true,
            broken: true,
        });
        assert_eq!(beam.read(), Err(FaultKind::Unavailable));
    }
}
