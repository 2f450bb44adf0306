//! Upstream intake link
//!
//! The intake is a separate subsystem. The indexer only asks it for roller
//! speeds while staging a piece; everything else about the intake lives
//! behind this trait.

/// Command interface toward the intake subsystem
pub trait IntakeLink {
    /// Set the top roller speed (fraction of full output)
    fn set_top_speed(&mut self, percent: f32);

    /// Set the bottom roller speed (fraction of full output)
    fn set_bottom_speed(&mut self, percent: f32);

    /// Set both rollers to the same speed
    fn set_speed(&mut self, percent: f32) {
        self.set_top_speed(percent);
        self.set_bottom_speed(percent);
    }

    /// Stop both rollers
    fn stop(&mut self) {
        self.set_speed(0.0);
    }
}
