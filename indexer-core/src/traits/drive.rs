//! Motor drive trait
//!
//! Abstracts a single motor controller channel. Inversion and current
//! limits are configured when the concrete driver is built; the core only
//! ever issues open-loop percent or voltage commands.

/// A single motor drive
///
/// Implementations apply commands immediately. Out-of-range values are
/// passed through; clipping is the implementation's business.
pub trait Drive {
    /// Command a fraction of full output, nominally -1.0 to 1.0
    fn set_percent(&mut self, percent: f32);

    /// Command an output voltage
    fn set_voltage(&mut self, volts: f32);

    /// Stop the drive
    fn stop(&mut self) {
        self.set_percent(0.0);
    }
}
