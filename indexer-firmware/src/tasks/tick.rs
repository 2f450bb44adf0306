//! Tick task
//!
//! Paces the indexer command and stamps each tick in milliseconds. The
//! settle window and the PID `dt` are measured between these stamps, and
//! the encoder velocity estimate assumes one sample per
//! [`TICK_INTERVAL_MS`]. Stamps wrap at `u32::MAX` and are only ever
//! compared with wrapping subtraction.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 20;

/// Signal to notify the indexer task of a tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with timestamp
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;

        // Wraps after ~49 days; the feed window uses wrapping arithmetic
        let now_ms = start.elapsed().as_millis() as u32;

        TICK_SIGNAL.signal(now_ms);
    }
}
