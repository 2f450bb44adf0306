//! Arm feedforward
//!
//! `V = ks * sgn(v) + kg * cos(θ) + kv * v`

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::FeedforwardGains;

/// Feedforward for a rotating mass held against gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmFeedforward {
    gains: FeedforwardGains,
}

impl ArmFeedforward {
    pub const fn new(gains: FeedforwardGains) -> Self {
        Self { gains }
    }

    /// Volts to hold `angle` (rad) while moving at `velocity` (rad/s)
    pub fn calculate(&self, angle: f32, velocity: f32) -> f32 {
        let sgn = if velocity > 0.0 {
            1.0
        } else if velocity < 0.0 {
            -1.0
        } else {
            0.0
        };
        self.gains.ks * sgn + self.gains.kg * angle.cos() + self.gains.kv * velocity
    }
}
