//! Indexer subsystem
//!
//! Owns the drives, the beam gate and the carriage controller.

pub mod indexer;

pub use indexer::{Indexer, IndexerControl};
