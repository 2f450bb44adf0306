//! Sensor fault monitor
//!
//! Counts consecutive faulted ticks and applies the configured policy.

use crate::config::{FaultPolicy, SafetyConfig};
use crate::sensor::SensorFault;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All sensors reporting
    Ok,
    /// Sensor faulted; outputs held at their last command
    Degraded(SensorFault),
    /// Sensor faulted; outputs forced to zero
    Fault(SensorFault),
}

impl SafetyStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SafetyStatus::Ok)
    }
}

/// Fault monitor
#[derive(Debug, Clone)]
pub struct FaultMonitor {
    config: SafetyConfig,
    last_fault: Option<SensorFault>,
    /// Consecutive faulted ticks
    consecutive: u8,
}

impl FaultMonitor {
    pub fn new(config: SafetyConfig) -> Self {
        Self {
            config,
            last_fault: None,
            consecutive: 0,
        }
    }

    /// Record a tick where every sensor read succeeded
    pub fn record_ok(&mut self) {
        self.last_fault = None;
        self.consecutive = 0;
    }

    /// Record a faulted tick
    pub fn record_fault(&mut self, fault: SensorFault) {
        self.last_fault = Some(fault);
        self.consecutive = self.consecutive.saturating_add(1);
    }

    /// Status after the most recent record
    pub fn check(&self) -> SafetyStatus {
        let Some(fault) = self.last_fault else {
            return SafetyStatus::Ok;
        };

        match self.config.policy {
            FaultPolicy::FailSafe => SafetyStatus::Fault(fault),
            FaultPolicy::HoldLast if self.consecutive > self.config.max_stale_ticks => {
                SafetyStatus::Fault(fault)
            }
            FaultPolicy::HoldLast => SafetyStatus::Degraded(fault),
        }
    }

    pub fn consecutive_faults(&self) -> u8 {
        self.consecutive
    }

    pub fn reset(&mut self) {
        self.record_ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::FaultSource;
    use crate::traits::FaultKind;

    const BEAM_FAULT: SensorFault = SensorFault::new(FaultSource::CenterBeam, FaultKind::Unavailable);

    #[test]
    fn test_normal_operation() {
        let mut monitor = FaultMonitor::new(SafetyConfig::default());
        monitor.record_ok();
        assert_eq!(monitor.check(), SafetyStatus::Ok);
    }

    #[test]
    fn test_fail_safe_is_immediate() {
        let mut monitor = FaultMonitor::new(SafetyConfig::default());
        monitor.record_fault(BEAM_FAULT);
        assert_eq!(monitor.check(), SafetyStatus::Fault(BEAM_FAULT));
    }

    #[test]
    fn test_hold_last_budget() {
        let mut monitor = FaultMonitor::new(SafetyConfig {
            policy: FaultPolicy::HoldLast,
            max_stale_ticks: 3,
        });

        for _ in 0..3 {
            monitor.record_fault(BEAM_FAULT);
            assert_eq!(monitor.check(), SafetyStatus::Degraded(BEAM_FAULT));
        }

        monitor.record_fault(BEAM_FAULT);
        assert_eq!(monitor.check(), SafetyStatus::Fault(BEAM_FAULT));
        assert_eq!(monitor.consecutive_faults(), 4);
    }

    #[test]
    fn test_recovery_resets_budget() {
        let mut monitor = FaultMonitor::new(SafetyConfig {
            policy: FaultPolicy::HoldLast,
            max_stale_ticks: 1,
        });
        monitor.record_fault(BEAM_FAULT);
        monitor.record_ok();
        assert_eq!(monitor.check(), SafetyStatus::Ok);

        monitor.record_fault(BEAM_FAULT);
        assert_eq!(monitor.check(), SafetyStatus::Degraded(BEAM_FAULT));
    }
}
