//! PID controller

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::PidGains;

/// PID controller over a caller-supplied error
///
/// The caller computes the error, which lets the position controller feed
/// in a wrap-aware difference.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    /// Clamp on the accumulated `ki * integral` term
    integral_limit: f32,
    /// Symmetric output clamp
    output_limit: f32,
    integral: f32,
    prev_error: Option<f32>,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral_limit: f32::INFINITY,
            output_limit: f32::INFINITY,
            integral: 0.0,
            prev_error: None,
        }
    }

    /// Sign is ignored; NaN leaves the integral unclamped
    pub fn with_integral_limit(mut self, limit: f32) -> Self {
        self.integral_limit = limit_magnitude(limit);
        self
    }

    /// Sign is ignored; NaN leaves the output unclamped
    pub fn with_output_limit(mut self, limit: f32) -> Self {
        self.output_limit = limit_magnitude(limit);
        self
    }

    pub fn output_limit(&self) -> f32 {
        self.output_limit
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Forget accumulated state
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = None;
    }

    /// Compute the output for `error` after `dt` seconds
    ///
    /// The derivative term is zero on the first update after a reset. With a
    /// non-positive `dt` only the proportional term contributes.
    pub fn update(&mut self, error: f32, dt: f32) -> f32 {
        let p = self.gains.kp * error;

        let mut d = 0.0;
        if dt > 0.0 {
            if self.gains.ki != 0.0 {
                self.integral += error * dt;
                let bound = self.integral_limit / self.gains.ki.abs();
                self.integral = symmetric_clamp(self.integral, bound);
            }
            if let Some(prev) = self.prev_error {
                d = self.gains.kd * (error - prev) / dt;
            }
        }
        self.prev_error = Some(error);

        let i = self.gains.ki * self.integral;
        symmetric_clamp(p + i + d, self.output_limit)
    }
}

fn limit_magnitude(limit: f32) -> f32 {
    if limit.is_nan() {
        f32::INFINITY
    } else {
        limit.abs()
    }
}

/// Clamp into `[-bound, bound]` without panicking on a NaN bound
pub(crate) fn symmetric_clamp(value: f32, bound: f32) -> f32 {
    value.max(-bound).min(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportional_only() {
        let mut pid = Pid::new(PidGains::new(2.0, 0.0, 0.0));
        assert_eq!(pid.update(0.5, 0.02), 1.0);
        assert_eq!(pid.update(-0.25, 0.02), -0.5);
    }

    #[test]
    fn test_no_derivative_kick_on_first_update() {
        let mut pid = Pid::new(PidGains::new(0.0, 0.0, 1.0));
        assert_eq!(pid.update(1.0, 0.02), 0.0);
        // Error fell by 0.5 over 0.02 s
        let out = pid.update(0.5, 0.02);
        assert!((out + 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_integral_clamped() {
        let mut pid = Pid::new(PidGains::new(0.0, 1.0, 0.0)).with_integral_limit(0.1);
        for _ in 0..100 {
            pid.update(1.0, 0.02);
        }
        assert!((pid.update(1.0, 0.02) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_output_clamped() {
        let mut pid = Pid::new(PidGains::new(100.0, 0.0, 0.0)).with_output_limit(12.0);
        assert_eq!(pid.update(1.0, 0.02), 12.0);
        assert_eq!(pid.update(-1.0, 0.02), -12.0);
    }

    #[test]
    fn test_signed_and_nan_limits() {
        let mut pid = Pid::new(PidGains::new(100.0, 1.0, 0.0))
            .with_output_limit(-12.0)
            .with_integral_limit(f32::NAN);
        assert_eq!(pid.output_limit(), 12.0);
        assert_eq!(pid.update(1.0, 0.02), 12.0);
        assert_eq!(pid.update(-1.0, 0.02), -12.0);

        let mut pid = Pid::new(PidGains::new(1.0, 0.0, 0.0)).with_output_limit(f32::NAN);
        assert_eq!(pid.update(50.0, 0.02), 50.0);
    }

    #[test]
    fn test_zero_dt_skips_integral_and_derivative() {
        let mut pid = Pid::new(PidGains::new(1.0, 1.0, 1.0));
        pid.update(1.0, 0.02);
        let out = pid.update(2.0, 0.0);
        // P = 2.0 plus the integral accumulated on the first step
        assert!((out - 2.02).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut pid = Pid::new(PidGains::new(0.0, 1.0, 1.0));
        pid.update(1.0, 0.1);
        pid.update(1.0, 0.1);
        pid.reset();
        assert!((pid.update(1.0, 0.1) - 0.1).abs() < 1e-6);
    }
}
