//! Continuous-domain angle arithmetic
//!
//! The carriage angle lives on a circle of circumference `period`. Errors
//! are always taken the short way round.

#[allow(unused_imports)]
use micromath::F32Ext;

/// Wrap `value` into `[min, max)`
pub fn input_modulus(value: f32, min: f32, max: f32) -> f32 {
    let modulus = max - min;
    let mut r = (value - min) % modulus;
    if r < 0.0 {
        r += modulus;
    }
    r + min
}

/// Shortest signed distance from `measurement` to `target`
///
/// The result lies in `[-period/2, period/2)`.
pub fn wrap_error(target: f32, measurement: f32, period: f32) -> f32 {
    let half = period / 2.0;
    input_modulus(target - measurement, -half, half)
}

/// Wrap an absolute angle into `[0, period)`
pub fn normalize(angle: f32, period: f32) -> f32 {
    input_modulus(angle, 0.0, period)
}

/// True if `measurement` is within `tolerance` of `target`, across the wrap
pub fn within_tolerance(target: f32, measurement: f32, period: f32, tolerance: f32) -> bool {
    wrap_error(target, measurement, period).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: f32 = 4.367;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_modulus_inside_range_unchanged() {
        assert!(close(input_modulus(1.5, 0.0, PERIOD), 1.5));
    }

    #[test]
    fn test_modulus_wraps_both_sides() {
        assert!(close(input_modulus(PERIOD + 0.5, 0.0, PERIOD), 0.5));
        assert!(close(input_modulus(-0.5, 0.0, PERIOD), PERIOD - 0.5));
    }

    #[test]
    fn test_error_takes_short_way() {
        // 0.01 and PERIOD - 0.01 are 0.02 apart across the wrap
        let e = wrap_error(0.01, PERIOD - 0.01, PERIOD);
        assert!(close(e, 0.02));

        let e = wrap_error(PERIOD - 0.01, 0.01, PERIOD);
        assert!(close(e, -0.02));
    }

    #[test]
    fn test_error_without_wrap() {
        assert!(close(wrap_error(2.0, 1.0, PERIOD), 1.0));
        assert!(close(wrap_error(1.0, 2.0, PERIOD), -1.0));
    }

    #[test]
    fn test_within_tolerance_across_wrap() {
        assert!(within_tolerance(0.005, PERIOD - 0.01, PERIOD, 0.02));
        assert!(!within_tolerance(0.05, PERIOD - 0.01, PERIOD, 0.02));
    }

    #[test]
    fn test_normalize() {
        assert!(close(normalize(-1.0, PERIOD), PERIOD - 1.0));
        assert!(close(normalize(2.0 * PERIOD + 1.0, PERIOD), 1.0));
    }
}
