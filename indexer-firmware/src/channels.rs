//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use indexer_core::coordinator::ModeRequest;
use indexer_core::traits::HapticChannel;

/// Channel capacity for rumble commands
const RUMBLE_CHANNEL_SIZE: usize = 4;

/// Intake roller speeds, percent of full output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeCommand {
    pub top: f32,
    pub bottom: f32,
}

/// One rumble motor update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RumbleCommand {
    pub channel: HapticChannel,
    pub intensity: f32,
}

/// Operator request (updated by operator task)
/// `None` while no mode button is held
pub static OPERATOR_INPUT: Signal<CriticalSectionRawMutex, Option<ModeRequest>> = Signal::new();

/// Intake roller command (updated by indexer task)
pub static INTAKE_CMD: Signal<CriticalSectionRawMutex, IntakeCommand> = Signal::new();

/// Rumble updates for the operator controller
pub static RUMBLE_CMD: Channel<CriticalSectionRawMutex, RumbleCommand, RUMBLE_CHANNEL_SIZE> =
    Channel::new();

/// Status light pattern (updated by indexer task)
pub static INDICATOR: Signal<CriticalSectionRawMutex, f32> = Signal::new();
