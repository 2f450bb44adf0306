//! Motor drive implementations

pub mod hbridge;

pub use hbridge::{HBridgeConfig, HBridgeDrive};
