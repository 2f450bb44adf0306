//! Collaborator ports backed by inter-task channels
//!
//! The indexer task talks to the intake, the operator's rumble motors and
//! the status light through these. Each write is forwarded to the task that
//! owns the hardware.

use defmt::*;

use indexer_core::traits::{
    HapticChannel, HapticFeedback, IntakeLink, StatusIndicator, TelemetrySink,
};

use crate::channels::{IntakeCommand, RumbleCommand, INDICATOR, INTAKE_CMD, RUMBLE_CMD};

/// Intake port; remembers both rollers so single-roller writes keep the other
#[derive(Default)]
pub struct IntakeForwarder {
    cmd: IntakeCommand,
}

impl IntakeForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&mut self) {
        INTAKE_CMD.signal(self.cmd);
    }
}

impl IntakeLink for IntakeForwarder {
    fn set_top_speed(&mut self, percent: f32) {
        self.cmd.top = percent;
        self.send();
    }

    fn set_bottom_speed(&mut self, percent: f32) {
        self.cmd.bottom = percent;
        self.send();
    }

    fn set_speed(&mut self, percent: f32) {
        self.cmd = IntakeCommand {
            top: percent,
            bottom: percent,
        };
        self.send();
    }

    fn stop(&mut self) {
        self.set_speed(0.0);
    }
}

/// Rumble port
pub struct RumbleForwarder;

impl HapticFeedback for RumbleForwarder {
    fn signal(&mut self, channel: HapticChannel, intensity: f32) {
        if RUMBLE_CMD
            .try_send(RumbleCommand { channel, intensity })
            .is_err()
        {
            warn!("Rumble queue full, dropped {:?}", channel);
        }
    }
}

/// Status light port
pub struct IndicatorForwarder;

impl StatusIndicator for IndicatorForwarder {
    fn set_pattern(&mut self, pattern: f32) {
        INDICATOR.signal(pattern);
    }
}

/// Telemetry over the defmt log at trace level
pub struct DefmtTelemetry;

impl TelemetrySink for DefmtTelemetry {
    fn publish(&mut self, key: &'static str, value: f32) {
        trace!("{=str} = {}", key, value);
    }
}
