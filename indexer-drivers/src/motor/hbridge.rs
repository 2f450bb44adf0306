//! H-bridge motor drive
//!
//! PWM magnitude plus a direction pin. Inversion is fixed at construction;
//! voltage commands are converted against the nominal bus voltage.
//!
//! ```ignore
//! let mut drive = HBridgeDrive::new(pwm, dir_pin, HBridgeConfig::default());
//! drive.set_percent(0.3);   // 30% forward
//! drive.set_voltage(-6.0);  // half of a 12 V bus, reverse
//! ```

#[allow(unused_imports)]
use micromath::F32Ext;

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use indexer_core::traits::Drive;

/// Duty fraction resolution
const DUTY_STEPS: u16 = 1000;

/// H-bridge drive configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeConfig {
    /// Motor spins opposite to the commanded sign
    pub inverted: bool,
    /// Nominal bus voltage for voltage commands
    pub bus_voltage: f32,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            inverted: false,
            bus_voltage: 12.0,
        }
    }
}

/// H-bridge drive
pub struct HBridgeDrive<P, D> {
    pwm: P,
    dir: D,
    config: HBridgeConfig,
    /// Last applied output after clamping and inversion
    output: f32,
}

impl<P: SetDutyCycle, D: OutputPin> HBridgeDrive<P, D> {
    pub fn new(pwm: P, dir: D, config: HBridgeConfig) -> Self {
        let mut drive = Self {
            pwm,
            dir,
            config,
            output: 0.0,
        };
        drive.apply(0.0);
        drive
    }

    pub fn config(&self) -> HBridgeConfig {
        self.config
    }

    /// Signed output fraction currently applied to the bridge
    pub fn output(&self) -> f32 {
        self.output
    }

    fn apply(&mut self, percent: f32) {
        let percent = if percent.is_finite() {
            percent.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let output = if self.config.inverted {
            -percent
        } else {
            percent
        };

        // Pin errors have nowhere to go; the next command retries
        let _ = if output < 0.0 {
            self.dir.set_low()
        } else {
            self.dir.set_high()
        };
        let steps = (output.abs() * DUTY_STEPS as f32) as u16;
        let _ = self.pwm.set_duty_cycle_fraction(steps, DUTY_STEPS);

        self.output = output;
    }
}

impl<P: SetDutyCycle, D: OutputPin> Drive for HBridgeDrive<P, D> {
    fn set_percent(&mut self, percent: f32) {
        self.apply(percent);
    }

    fn set_voltage(&mut self, volts: f32) {
        if self.config.bus_voltage > 0.0 {
            self.apply(volts / self.config.bus_voltage);
        } else {
            self.apply(0.0);
        }
    }
}
