//! Trapezoidal setpoint profile
//!
//! Moves a setpoint toward the goal under velocity and acceleration limits,
//! one tick at a time.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::MotionConstraints;

/// Profiled setpoint
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProfileState {
    /// rad
    pub position: f32,
    /// rad/s
    pub velocity: f32,
}

impl ProfileState {
    pub const fn at(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
        }
    }
}

/// Trapezoid profile stepping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidProfile {
    constraints: MotionConstraints,
}

impl TrapezoidProfile {
    pub const fn new(constraints: MotionConstraints) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> MotionConstraints {
        self.constraints
    }

    /// Advance `current` toward the rest state at `goal` by `dt` seconds
    pub fn step(&self, current: ProfileState, goal: f32, dt: f32) -> ProfileState {
        let max_v = self.constraints.max_velocity;
        let max_a = self.constraints.max_acceleration;

        if !(max_v > 0.0) || !(max_a > 0.0) {
            return ProfileState::at(goal);
        }
        if !(dt > 0.0) {
            return current;
        }

        let remaining = goal - current.position;
        if remaining == 0.0 && current.velocity == 0.0 {
            return current;
        }

        let dir = if remaining >= 0.0 { 1.0 } else { -1.0 };
        // Fastest speed from which we can still stop at the goal
        let braking = (2.0 * max_a * remaining.abs()).sqrt();
        let desired = dir * max_v.min(braking);

        let dv = (desired - current.velocity).clamp(-max_a * dt, max_a * dt);
        let velocity = current.velocity + dv;
        let position = current.position + (current.velocity + velocity) * 0.5 * dt;

        let crossed = (goal - position) * dir <= 0.0;
        if crossed {
            ProfileState::at(goal)
        } else {
            ProfileState { position, velocity }
        }
    }
}
