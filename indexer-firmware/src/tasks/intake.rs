//! Intake roller task
//!
//! Applies intake commands from the indexer task to the two roller drives.

use defmt::*;

use indexer_core::traits::Drive;

use crate::board::Motor;
use crate::channels::INTAKE_CMD;

#[embassy_executor::task]
pub async fn intake_task(mut top: Motor, mut bottom: Motor) {
    info!("Intake task started");

    loop {
        let cmd = INTAKE_CMD.wait().await;
        top.set_percent(cmd.top);
        bottom.set_percent(cmd.bottom);
        trace!("Intake: top={} bottom={}", top.output(), bottom.output());
    }
}
