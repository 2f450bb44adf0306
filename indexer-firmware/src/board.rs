//! Board wiring
//!
//! Concrete driver types for the co-processor board and the glue that
//! adapts embassy-rp peripherals to the driver traits.
//!
//! | Function            | Pin              |
//! |---------------------|------------------|
//! | Center beam         | GPIO2 (pull-up)  |
//! | Top beam            | GPIO3 (pull-up)  |
//! | Amp / speaker / source buttons | GPIO4-6 (pull-up, active low) |
//! | Top wheel PWM / dir | GPIO8 / GPIO9    |
//! | Bottom wheels       | GPIO10 / GPIO11  |
//! | Rotate              | GPIO12 / GPIO13  |
//! | Intake top          | GPIO14 / GPIO15  |
//! | Intake bottom       | GPIO16 / GPIO17  |
//! | Status light pulse  | GPIO18           |
//! | Rumble left / right | GPIO20 / GPIO21  |
//! | Encoder analog out  | GPIO26 (ADC0)    |

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;

use indexer_core::subsystem::Indexer;
use indexer_drivers::encoder::{AbsoluteEncoder, AdcReader, AnalogSource};
use indexer_drivers::indicator::PulseIndicator;
use indexer_drivers::motor::HBridgeDrive;
use indexer_drivers::sensor::BreakBeam;

/// Full-scale count of the 12-bit ADC
pub const ADC_MAX: u16 = 4095;

/// PWM counter top for motor channels (125 MHz / 6250 = 20 kHz)
pub const MOTOR_PWM_TOP: u16 = 6249;

/// Clock divider for the 50 Hz light channel (125 MHz / 125 = 1 MHz)
pub const LIGHT_PWM_DIVIDER: u8 = 125;

/// Counter top for the 50 Hz light channel, one count per µs
pub const LIGHT_PWM_TOP: u16 = 19_999;

pub type Beam = BreakBeam<Input<'static>>;
pub type Motor = HBridgeDrive<PwmOutput<'static>, Output<'static>>;
pub type Encoder = AbsoluteEncoder<AnalogSource<RpAdc>>;
pub type Light = PulseIndicator<PwmOutput<'static>>;

/// The indexer as wired on this board
pub type BoardIndexer = Indexer<Motor, Motor, Motor, Encoder, Beam, Beam>;

/// Blocking ADC channel
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAdc {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for RpAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}
