//! Indexer task
//!
//! Owns the indexer subsystem and runs the indexer command once per tick.
//! A held operator request starts and drives the command; releasing it
//! ends the command, which zeroes intake, feed wheels and rotate.

use defmt::*;

use indexer_core::config::IndexerConfig;
use indexer_core::coordinator::{IndexerCommand, Links, ModeRequest, TickReport};
use indexer_core::safety::SafetyStatus;

use crate::board::BoardIndexer;
use crate::channels::OPERATOR_INPUT;
use crate::links::{DefmtTelemetry, IndicatorForwarder, IntakeForwarder, RumbleForwarder};
use crate::tasks::tick::TICK_SIGNAL;

#[embassy_executor::task]
pub async fn indexer_task(mut indexer: BoardIndexer, config: &'static IndexerConfig) {
    info!("Indexer task started");

    let mut command = IndexerCommand::new(config);
    let mut intake = IntakeForwarder::new();
    let mut haptic = RumbleForwarder;
    let mut indicator = IndicatorForwarder;
    let mut telemetry = DefmtTelemetry;

    let mut request: Option<ModeRequest> = None;
    let mut running = false;
    let mut last_safety = SafetyStatus::Ok;

    loop {
        let now_ms = TICK_SIGNAL.wait().await;

        // One conversion per tick keeps the speed estimate on the tick period
        if let Err(kind) = indexer.position_mut().encoder_mut().source_mut().sample() {
            trace!("Encoder sample failed: {:?}", kind);
        }

        if let Some(input) = OPERATOR_INPUT.try_take() {
            request = input;
        }

        let mut links = Links::new(&mut intake, &mut haptic, &mut indicator);

        match request {
            Some(req) => {
                if !running {
                    info!("Indexer command started: {:?}", req.resolve());
                    command.initialize(&mut indexer);
                    running = true;
                }
                let report = command.execute(req, now_ms, &mut indexer, &mut links);
                log_report(&report, &mut last_safety);
            }
            None if running => {
                command.end(&mut indexer, &mut links);
                running = false;
                last_safety = SafetyStatus::Ok;
                info!("Indexer command ended");
            }
            None => {}
        }

        indexer.periodic(&mut telemetry);
    }
}

fn log_report(report: &TickReport, last_safety: &mut SafetyStatus) {
    if let Some(event) = report.event {
        debug!("Feed event: {:?}", event);
    }

    if report.safety == *last_safety {
        return;
    }
    match report.safety {
        SafetyStatus::Ok => info!("Indexer sensors recovered"),
        SafetyStatus::Degraded(fault) => warn!("Sensor fault, holding outputs: {:?}", fault),
        SafetyStatus::Fault(fault) => warn!("Sensor fault, outputs zeroed: {:?}", fault),
    }
    *last_safety = report.safety;
}
