//! Board-agnostic core logic for the game-piece indexer
//!
//! This crate contains all coordination logic that does not depend on
//! specific hardware implementations:
//!
//! - Port traits for drives, sensors and external collaborators
//! - Break-beam sensor gate and the three-drive actuator array
//! - Carriage angle control (wrap-aware PID, arm feedforward, trapezoid profile)
//! - Mode coordination and the feed-cycle state machine
//! - Sensor fault monitoring
//! - Configuration types, the `indexer.toml` reader and boot config selection
//!
//! Everything is driven by an external scheduler calling into the command
//! once per tick with a monotonic millisecond timestamp. Nothing in here
//! blocks, spawns or locks.

#![no_std]
#![deny(unsafe_code)]

pub mod actuators;
pub mod config;
pub mod control;
pub mod coordinator;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod safety;
pub mod sensor;
pub mod subsystem;
pub mod traits;
