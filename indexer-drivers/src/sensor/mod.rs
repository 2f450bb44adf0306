//! Digital sensor drivers

pub mod break_beam;

pub use break_beam::BreakBeam;
