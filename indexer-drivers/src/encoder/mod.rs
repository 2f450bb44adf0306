//! Carriage encoder drivers

pub mod absolute;

pub use absolute::{AbsoluteEncoder, AbsoluteSource, AdcReader, AnalogSource};
