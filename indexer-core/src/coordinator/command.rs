//! Indexer command
//!
//! The per-invocation driver the scheduler runs while an operator holds an
//! indexer binding: `initialize` once, `execute` every tick, `end` on
//! release or interruption.

use super::coordinator::ModeCoordinator;
use super::feed::FeedEvent;
use super::mode::{Mode, ModeRequest};
use super::plan::{OutputWrite, TickPlan};
use crate::config::IndexerConfig;
use crate::safety::{FaultMonitor, SafetyStatus};
use crate::sensor::{SensorFault, SensorState};
use crate::subsystem::IndexerControl;
use crate::traits::{HapticChannel, HapticFeedback, IntakeLink, StatusIndicator};

/// External collaborators the command writes to
pub struct Links<'a, I, H, S> {
    pub intake: &'a mut I,
    pub haptic: &'a mut H,
    pub indicator: &'a mut S,
}

impl<'a, I, H, S> Links<'a, I, H, S>
where
    I: IntakeLink,
    H: HapticFeedback,
    S: StatusIndicator,
{
    pub fn new(intake: &'a mut I, haptic: &'a mut H, indicator: &'a mut S) -> Self {
        Self {
            intake,
            haptic,
            indicator,
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub mode: Mode,
    /// Snapshot used for every decision this tick, if the beams answered
    pub sensors: Option<SensorState>,
    pub event: Option<FeedEvent>,
    pub safety: SafetyStatus,
    /// Volts sent to the rotate drive
    pub rotate_effort: Option<f32>,
}

/// Indexer command
pub struct IndexerCommand {
    coordinator: ModeCoordinator,
    monitor: FaultMonitor,
    /// A confirmation rumble is still on
    haptic_active: bool,
}

impl IndexerCommand {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            coordinator: ModeCoordinator::new(config.coordinator),
            monitor: FaultMonitor::new(config.safety),
            haptic_active: false,
        }
    }

    pub fn coordinator(&self) -> &ModeCoordinator {
        &self.coordinator
    }

    /// Start a new invocation
    pub fn initialize<X: IndexerControl>(&mut self, indexer: &mut X) {
        self.coordinator.reset();
        self.monitor.reset();
        self.haptic_active = false;
        indexer.reset_motion();
    }

    /// Run one tick
    pub fn execute<X, I, H, S>(
        &mut self,
        request: ModeRequest,
        now_ms: u32,
        indexer: &mut X,
        links: &mut Links<'_, I, H, S>,
    ) -> TickReport
    where
        X: IndexerControl,
        I: IntakeLink,
        H: HapticFeedback,
        S: StatusIndicator,
    {
        let mode = request.resolve();

        let sensors = match indexer.snapshot() {
            Ok(sensors) => sensors,
            Err(fault) => return self.degrade(mode, None, fault, indexer, links),
        };

        let decision = self.coordinator.decide(mode, sensors, now_ms);
        self.apply(&decision.plan, indexer, links);

        let mut rotate_effort = None;
        if let Some(target) = decision.plan.rotate_target {
            match indexer.move_to_angle(target, now_ms) {
                Ok(effort) => rotate_effort = Some(effort),
                Err(fault) => return self.degrade(mode, Some(sensors), fault, indexer, links),
            }
        }

        self.monitor.record_ok();
        TickReport {
            mode,
            sensors: Some(sensors),
            event: decision.event,
            safety: SafetyStatus::Ok,
            rotate_effort,
        }
    }

    /// Finish the invocation: intake, feed wheels and rotate go to zero
    pub fn end<X, I, H, S>(&mut self, indexer: &mut X, links: &mut Links<'_, I, H, S>)
    where
        X: IndexerControl,
        I: IntakeLink,
        H: HapticFeedback,
        S: StatusIndicator,
    {
        links.intake.set_speed(0.0);
        indexer.stop_all();

        if self.haptic_active {
            for channel in HapticChannel::ALL {
                links.haptic.signal(channel, 0.0);
            }
            self.haptic_active = false;
        }

        self.coordinator.reset();
    }

    fn apply<X, I, H, S>(&mut self, plan: &TickPlan, indexer: &mut X, links: &mut Links<'_, I, H, S>)
    where
        X: IndexerControl,
        I: IntakeLink,
        H: HapticFeedback,
        S: StatusIndicator,
    {
        if let Some(pattern) = plan.indicator {
            links.indicator.set_pattern(pattern);
        }

        for write in &plan.writes {
            match *write {
                OutputWrite::Wheel { drive, percent } => indexer.set_percent(drive, percent),
                OutputWrite::AllFeedWheels(percent) => indexer.set_all_feed_wheels_percent(percent),
                OutputWrite::IntakeTop(percent) => links.intake.set_top_speed(percent),
                OutputWrite::IntakeBottom(percent) => links.intake.set_bottom_speed(percent),
                OutputWrite::Intake(percent) => links.intake.set_speed(percent),
            }
        }

        if let Some(intensity) = plan.haptic {
            for channel in HapticChannel::ALL {
                links.haptic.signal(channel, intensity);
            }
            self.haptic_active = true;
        }
    }

    fn degrade<X, I, H, S>(
        &mut self,
        mode: Mode,
        sensors: Option<SensorState>,
        fault: SensorFault,
        indexer: &mut X,
        links: &mut Links<'_, I, H, S>,
    ) -> TickReport
    where
        X: IndexerControl,
        I: IntakeLink,
        H: HapticFeedback,
        S: StatusIndicator,
    {
        self.monitor.record_fault(fault);
        let safety = self.monitor.check();

        if let SafetyStatus::Fault(_) = safety {
            links.intake.set_speed(0.0);
            indexer.stop_all();
            // Feed state is kept across the fault
            indexer.reset_motion();
        }

        TickReport {
            mode,
            sensors,
            event: None,
            safety,
            rotate_effort: None,
        }
    }
}
