//! Operator feedback task
//!
//! Drives the two rumble motors and the status light. Rumble outputs are
//! on/off; any intensity above zero runs the motor.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;

use indexer_core::traits::{HapticChannel, StatusIndicator};

use crate::board::Light;
use crate::channels::{INDICATOR, RUMBLE_CMD};

/// Rumble motor outputs
pub struct RumblePins {
    pub primary: Output<'static>,
    pub secondary: Output<'static>,
}

impl RumblePins {
    fn set(&mut self, channel: HapticChannel, on: bool) {
        let pin = match channel {
            HapticChannel::Primary => &mut self.primary,
            HapticChannel::Secondary => &mut self.secondary,
        };
        if on {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }
}

#[embassy_executor::task]
pub async fn feedback_task(mut rumble: RumblePins, mut light: Light) {
    info!("Feedback task started");

    for channel in HapticChannel::ALL {
        rumble.set(channel, false);
    }

    loop {
        match select(RUMBLE_CMD.receive(), INDICATOR.wait()).await {
            Either::First(cmd) => {
                debug!("Rumble {:?}: {}", cmd.channel, cmd.intensity);
                rumble.set(cmd.channel, cmd.intensity > 0.0);
            }
            Either::Second(pattern) => light.set_pattern(pattern),
        }
    }
}
