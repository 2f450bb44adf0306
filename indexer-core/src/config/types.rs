//! Configuration type definitions
//!
//! These types carry every tunable of the indexer. `Default` holds the
//! constants of the competition mechanism.

use core::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Carriage gear reduction: 16 turns of the encoder per 23 of the carriage
pub const CARRIAGE_RATIO: f32 = 16.0 / 23.0;

/// Radians of carriage travel per encoder rotation
pub const POSITION_FACTOR: f32 = 2.0 * PI * CARRIAGE_RATIO;

/// Radians per second per encoder RPM
pub const VELOCITY_FACTOR: f32 = 2.0 * PI / 60.0;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Angle limits are not finite or min > max
    AngleLimits,
    /// Wrap period must be positive
    WrapPeriod,
    /// Goal tolerance must be positive
    Tolerance,
    /// Output voltage limit must be positive
    OutputLimit,
    /// Integral limit must be non-negative
    IntegralLimit,
    /// Motion constraints must be positive
    Constraints,
    /// Nominal tick period must be non-zero
    TickPeriod,
    /// Settle window must be non-zero
    SettleWindow,
    /// Serialized form did not fit the buffer
    Serialize,
    /// Serialized form could not be decoded
    Deserialize,
    /// Serialized form has a different layout version
    VersionMismatch,
}

/// Absolute encoder conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncoderConfig {
    /// Radians per encoder rotation
    pub position_factor: f32,
    /// Radians per second per RPM
    pub velocity_factor: f32,
    /// Encoder counts opposite to the carriage's positive direction
    pub inverted: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            position_factor: POSITION_FACTOR,
            velocity_factor: VELOCITY_FACTOR,
            inverted: true,
        }
    }
}

/// PID gains, volts per radian of error
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

/// Arm feedforward gains (volts)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeedforwardGains {
    /// Static friction
    pub ks: f32,
    /// Gravity at horizontal
    pub kg: f32,
    /// Volts per rad/s
    pub kv: f32,
}

/// Trapezoid motion constraints
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConstraints {
    /// rad/s
    pub max_velocity: f32,
    /// rad/s²
    pub max_acceleration: f32,
}

/// Carriage angle controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Lowest commandable angle (rad)
    pub min_angle: f32,
    /// Highest commandable angle (rad)
    pub max_angle: f32,
    /// Period of the continuous input domain (rad)
    pub wrap_period: f32,
    /// Goal tolerance (rad)
    pub tolerance: f32,
    pub gains: PidGains,
    /// Anti-windup clamp on the integral term (volts)
    pub integral_limit: f32,
    pub feedforward: FeedforwardGains,
    /// Profile the setpoint toward the goal; `None` steps straight to it
    pub constraints: Option<MotionConstraints>,
    /// Output clamp (volts, symmetric)
    pub max_output_volts: f32,
    /// Time step assumed for the first update after a reset (ms)
    pub nominal_period_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_angle: 0.0,
            max_angle: 2.75,
            wrap_period: 4.367,
            tolerance: 0.02,
            gains: PidGains::new(6.0, 0.0, 0.1),
            integral_limit: 2.0,
            feedforward: FeedforwardGains {
                ks: 0.0,
                kg: 0.35,
                kv: 0.0,
            },
            constraints: Some(MotionConstraints {
                max_velocity: 4.0,
                max_acceleration: 8.0,
            }),
            max_output_volts: 12.0,
            nominal_period_ms: 20,
        }
    }
}

/// Feed powers while staging for the speaker
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeakerPowers {
    /// Both feed wheels
    pub feed_wheels: f32,
    pub intake_top: f32,
    pub intake_bottom: f32,
}

impl Default for SpeakerPowers {
    fn default() -> Self {
        Self {
            feed_wheels: 0.3,
            intake_top: 0.4,
            intake_bottom: 0.4,
        }
    }
}

/// Feed powers while staging for the amp
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmpPowers {
    pub top_wheel: f32,
    pub bottom_wheels: f32,
    pub intake_top: f32,
    pub intake_bottom: f32,
}

impl Default for AmpPowers {
    fn default() -> Self {
        Self {
            top_wheel: -0.22,
            bottom_wheels: 0.22,
            intake_top: -0.4,
            intake_bottom: -0.7,
        }
    }
}

/// Mode coordinator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinatorConfig {
    pub speaker: SpeakerPowers,
    pub amp: AmpPowers,
    /// Carriage angle for loading from the source (rad)
    pub source_angle: f32,
    /// Time a center-beam break must persist before the piece is confirmed (ms)
    pub settle_ms: u32,
    /// Rumble intensity on confirmation
    pub haptic_intensity: f32,
    /// Indicator pattern while no piece is at the center beam
    pub searching_pattern: Option<f32>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            speaker: SpeakerPowers::default(),
            amp: AmpPowers::default(),
            source_angle: 140.0 * PI / 180.0,
            settle_ms: 105,
            haptic_intensity: 1.0,
            searching_pattern: Some(0.5),
        }
    }
}

/// What to do with the outputs while a sensor is faulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultPolicy {
    /// Zero every output on the first faulted tick
    #[default]
    FailSafe,
    /// Leave outputs at their last command for a bounded number of ticks
    HoldLast,
}

/// Sensor fault handling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SafetyConfig {
    pub policy: FaultPolicy,
    /// Consecutive faulted ticks tolerated under `HoldLast`
    pub max_stale_ticks: u8,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            policy: FaultPolicy::FailSafe,
            max_stale_ticks: 5,
        }
    }
}

/// Complete indexer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexerConfig {
    /// Layout version
    pub version: u8,
    pub encoder: EncoderConfig,
    pub controller: ControllerConfig,
    pub coordinator: CoordinatorConfig,
    pub safety: SafetyConfig,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            encoder: EncoderConfig::default(),
            controller: ControllerConfig::default(),
            coordinator: CoordinatorConfig::default(),
            safety: SafetyConfig::default(),
        }
    }
}

impl IndexerConfig {
    /// Check the configuration for values the controllers cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controller;

        if !c.min_angle.is_finite() || !c.max_angle.is_finite() || c.min_angle > c.max_angle {
            return Err(ConfigError::AngleLimits);
        }
        if !(c.wrap_period > 0.0) {
            return Err(ConfigError::WrapPeriod);
        }
        if !(c.tolerance > 0.0) {
            return Err(ConfigError::Tolerance);
        }
        if !(c.max_output_volts > 0.0) {
            return Err(ConfigError::OutputLimit);
        }
        if !(c.integral_limit >= 0.0) {
            return Err(ConfigError::IntegralLimit);
        }
        if let Some(m) = c.constraints {
            if !(m.max_velocity > 0.0) || !(m.max_acceleration > 0.0) {
                return Err(ConfigError::Constraints);
            }
        }
        if c.nominal_period_ms == 0 {
            return Err(ConfigError::TickPeriod);
        }
        if self.coordinator.settle_ms == 0 {
            return Err(ConfigError::SettleWindow);
        }

        Ok(())
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and version-check a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: IndexerConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        Ok(config)
    }
}
