//! Carriage position controller
//!
//! Closes the loop on the absolute encoder: the target is clamped into the
//! commandable range, a trapezoid profile walks the setpoint toward it, and
//! the rotate drive receives `PID(error) + feedforward(angle)` volts.

use super::angle::{within_tolerance, wrap_error};
use super::feedforward::ArmFeedforward;
use super::pid::{symmetric_clamp, Pid};
use super::profile::{ProfileState, TrapezoidProfile};
use crate::config::ControllerConfig;
use crate::sensor::SensorFault;
use crate::traits::{AngleSensor, Drive, FaultKind};

/// Wrap-aware profiled PID over the carriage angle
pub struct PositionController<E> {
    encoder: E,
    config: ControllerConfig,
    pid: Pid,
    feedforward: ArmFeedforward,
    profile: Option<TrapezoidProfile>,
    /// Last accepted (clamped) goal
    goal: Option<f32>,
    /// Profiled setpoint from the previous update
    setpoint: Option<ProfileState>,
    last_update_ms: Option<u32>,
}

impl<E: AngleSensor> PositionController<E> {
    /// Swapped angle limits are reordered and the output limit's sign is
    /// ignored
    pub fn new(encoder: E, mut config: ControllerConfig) -> Self {
        if config.min_angle > config.max_angle {
            core::mem::swap(&mut config.min_angle, &mut config.max_angle);
        }
        let pid = Pid::new(config.gains)
            .with_integral_limit(config.integral_limit)
            .with_output_limit(config.max_output_volts);

        Self {
            encoder,
            config,
            pid,
            feedforward: ArmFeedforward::new(config.feedforward),
            profile: config.constraints.map(TrapezoidProfile::new),
            goal: None,
            setpoint: None,
            last_update_ms: None,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Clamp a requested angle into `[min_angle, max_angle]`
    pub fn clamp_target(&self, target: f32) -> f32 {
        // NaN limits leave that side open
        target.max(self.config.min_angle).min(self.config.max_angle)
    }

    /// Carriage angle in radians
    pub fn current_angle(&mut self) -> Result<f32, SensorFault> {
        let angle = self.encoder.position().map_err(SensorFault::encoder)?;
        if !angle.is_finite() {
            return Err(SensorFault::encoder(FaultKind::InvalidReading));
        }
        Ok(angle)
    }

    /// Carriage velocity in rad/s
    pub fn velocity(&mut self) -> Result<f32, SensorFault> {
        let velocity = self.encoder.velocity().map_err(SensorFault::encoder)?;
        if !velocity.is_finite() {
            return Err(SensorFault::encoder(FaultKind::InvalidReading));
        }
        Ok(velocity)
    }

    /// Compute the rotate voltage for `target` at tick time `now_ms`
    ///
    /// A non-finite target leaves the goal unchanged. With no goal yet, the
    /// carriage holds where it is.
    pub fn calculate(&mut self, target: f32, now_ms: u32) -> Result<f32, SensorFault> {
        let angle = self.current_angle()?;
        let period = self.config.wrap_period;

        if target.is_finite() {
            self.goal = Some(self.clamp_target(target));
        }
        let goal = match self.goal {
            Some(goal) => goal,
            None => {
                let hold = self.clamp_target(angle);
                self.goal = Some(hold);
                hold
            }
        };

        let dt_ms = match self.last_update_ms {
            Some(last) => now_ms.wrapping_sub(last),
            None => self.config.nominal_period_ms,
        };
        self.last_update_ms = Some(now_ms);
        let dt = dt_ms as f32 / 1000.0;

        let setpoint = match &self.profile {
            Some(profile) => {
                // Unwrap goal and setpoint to within half a period of the
                // measurement so the profile runs the short way round
                let previous = self.setpoint.unwrap_or(ProfileState::at(angle));
                let current = ProfileState {
                    position: angle + wrap_error(previous.position, angle, period),
                    velocity: previous.velocity,
                };
                let near_goal = angle + wrap_error(goal, angle, period);
                profile.step(current, near_goal, dt)
            }
            None => ProfileState::at(goal),
        };
        self.setpoint = Some(setpoint);

        let error = wrap_error(setpoint.position, angle, period);
        let effort = self.pid.update(error, dt) + self.feedforward.calculate(angle, 0.0);

        Ok(symmetric_clamp(effort, self.pid.output_limit()))
    }

    /// Compute and apply the rotate voltage
    pub fn move_to_angle<D: Drive>(
        &mut self,
        target: f32,
        now_ms: u32,
        drive: &mut D,
    ) -> Result<f32, SensorFault> {
        let effort = self.calculate(target, now_ms)?;
        drive.set_voltage(effort);
        Ok(effort)
    }

    /// Wrap-aware error between the goal and the measured angle
    pub fn position_error(&mut self) -> Result<Option<f32>, SensorFault> {
        let angle = self.current_angle()?;
        Ok(self
            .goal
            .map(|goal| wrap_error(goal, angle, self.config.wrap_period)))
    }

    /// True iff the carriage is within tolerance of the goal
    ///
    /// Without a goal there is nothing to be at, so this is false.
    pub fn at_goal(&mut self) -> Result<bool, SensorFault> {
        let angle = self.current_angle()?;
        Ok(match self.goal {
            Some(goal) => within_tolerance(
                goal,
                angle,
                self.config.wrap_period,
                self.config.tolerance,
            ),
            None => false,
        })
    }

    pub fn goal(&self) -> Option<f32> {
        self.goal
    }

    pub fn setpoint(&self) -> Option<ProfileState> {
        self.setpoint
    }

    /// Drop controller history; the goal is kept
    pub fn reset(&mut self) {
        self.pid.reset();
        self.setpoint = None;
        self.last_update_ms = None;
    }

    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }
}
