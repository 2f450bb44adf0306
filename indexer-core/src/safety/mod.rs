//! Safety monitoring
//!
//! Turns sensor fault history into a degraded-mode decision.

pub mod monitor;

pub use monitor::{FaultMonitor, SafetyStatus};
