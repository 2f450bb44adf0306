//! Operator feedback traits (controller rumble, status light)

/// Operator controller channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticChannel {
    /// Driver controller
    Primary,
    /// Operator controller
    Secondary,
}

impl HapticChannel {
    /// Every channel, in signalling order
    pub const ALL: [HapticChannel; 2] = [HapticChannel::Primary, HapticChannel::Secondary];
}

/// Haptic feedback toward the operators
pub trait HapticFeedback {
    /// Set the rumble intensity (0.0 = off, 1.0 = full) on one channel
    fn signal(&mut self, channel: HapticChannel, intensity: f32);
}

/// Status light driven by the indexer
///
/// `pattern` is the light controller's pattern code.
pub trait StatusIndicator {
    /// Select a light pattern
    fn set_pattern(&mut self, pattern: f32);
}

/// Indicator that discards every pattern
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIndicator;

impl StatusIndicator for NullIndicator {
    fn set_pattern(&mut self, _pattern: f32) {}
}
