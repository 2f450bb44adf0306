//! Operator button task
//!
//! Polls the mode buttons and publishes the held request. Releasing every
//! button publishes `None`, which ends the running indexer command.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use indexer_core::coordinator::{ModeRequest, Target};

use crate::channels::OPERATOR_INPUT;

/// Button poll interval
const POLL_INTERVAL_MS: u64 = 10;

/// Mode buttons, active low
pub struct OperatorButtons {
    pub amp: Input<'static>,
    pub speaker: Input<'static>,
    pub source: Input<'static>,
}

impl OperatorButtons {
    fn request(&self) -> Option<ModeRequest> {
        let target = if self.amp.is_low() {
            Some(Target::Amp)
        } else if self.speaker.is_low() {
            Some(Target::Speaker)
        } else {
            None
        };
        let source = self.source.is_low();

        if target.is_none() && !source {
            return None;
        }
        Some(ModeRequest { target, source })
    }
}

#[embassy_executor::task]
pub async fn operator_task(buttons: OperatorButtons) {
    info!("Operator task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut last: Option<ModeRequest> = None;

    loop {
        ticker.next().await;

        let request = buttons.request();
        if request != last {
            debug!("Operator request: {:?}", request);
            OPERATOR_INPUT.signal(request);
            last = request;
        }
    }
}
