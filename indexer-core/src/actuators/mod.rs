//! Indexer drives

pub mod array;

pub use array::{ActuatorArray, ActuatorCommand, DriveHandle, DriveId};
