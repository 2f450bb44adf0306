//! Mode coordinator
//!
//! Turns `(mode, sensors, now)` into a [`TickPlan`]. The only state kept
//! between ticks is the feed cycle.

use super::feed::{advance, FeedEvent, FeedState};
use super::mode::Mode;
use super::plan::{OutputWrite, TickPlan};
use crate::actuators::DriveId;
use crate::config::CoordinatorConfig;
use crate::sensor::SensorState;

/// Plan plus the feed transition that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub plan: TickPlan,
    pub event: Option<FeedEvent>,
}

/// Per-tick decision logic
#[derive(Debug, Clone)]
pub struct ModeCoordinator {
    config: CoordinatorConfig,
    feed: FeedState,
}

impl ModeCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            feed: FeedState::Feeding,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed
    }

    /// Forget any edge or confirmation in progress
    pub fn reset(&mut self) {
        self.feed = FeedState::Feeding;
    }

    /// Decide this tick's outputs
    pub fn decide(&mut self, mode: Mode, sensors: SensorState, now_ms: u32) -> Decision {
        let mut plan = TickPlan::new();
        let mut event = None;

        if !sensors.center_broken {
            plan.indicator = self.config.searching_pattern;
        }

        if mode != Mode::Speaker {
            self.feed = FeedState::Feeding;
        }

        match mode {
            Mode::SourceLoad => {
                plan.rotate_target = Some(self.config.source_angle);
            }
            Mode::Amp => {
                let amp = self.config.amp;
                plan.push(OutputWrite::Wheel {
                    drive: DriveId::TopWheel,
                    percent: amp.top_wheel,
                });
                plan.push(OutputWrite::Wheel {
                    drive: DriveId::BottomWheels,
                    percent: amp.bottom_wheels,
                });
                plan.push(OutputWrite::IntakeTop(amp.intake_top));
                plan.push(OutputWrite::IntakeBottom(amp.intake_bottom));
                // The writes above never outlive this tick
                plan.push(OutputWrite::AllFeedWheels(0.0));
                plan.push(OutputWrite::Intake(0.0));
            }
            Mode::Speaker => {
                let step = advance(
                    self.feed,
                    sensors.center_broken,
                    now_ms,
                    self.config.settle_ms,
                );
                self.feed = step.state;
                event = step.event;

                if step.state.is_feeding() {
                    let speaker = self.config.speaker;
                    plan.push(OutputWrite::IntakeTop(speaker.intake_top));
                    plan.push(OutputWrite::IntakeBottom(speaker.intake_bottom));
                    plan.push(OutputWrite::AllFeedWheels(speaker.feed_wheels));
                } else {
                    plan.push(OutputWrite::AllFeedWheels(0.0));
                    plan.push(OutputWrite::Intake(0.0));
                    if event == Some(FeedEvent::PieceConfirmed) {
                        plan.haptic = Some(self.config.haptic_intensity);
                    }
                }
            }
            Mode::Idle => {
                plan.push(OutputWrite::AllFeedWheels(0.0));
                plan.push(OutputWrite::Intake(0.0));
            }
        }

        Decision { plan, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: SensorState = SensorState::new(false, false);
    const CENTER: SensorState = SensorState::new(true, false);

    fn coordinator() -> ModeCoordinator {
        ModeCoordinator::new(CoordinatorConfig::default())
    }

    #[test]
    fn test_speaker_feeds_when_clear() {
        let mut c = coordinator();
        let d = c.decide(Mode::Speaker, CLEAR, 0);

        assert_eq!(d.plan.final_wheel(DriveId::TopWheel), Some(0.3));
        assert_eq!(d.plan.final_wheel(DriveId::BottomWheels), Some(0.3));
        assert_eq!(d.plan.final_intake(), (Some(0.4), Some(0.4)));
        assert_eq!(d.plan.haptic, None);
        assert_eq!(d.plan.rotate_target, None);
    }

    #[test]
    fn test_speaker_holds_feed_through_window() {
        let mut c = coordinator();
        let d = c.decide(Mode::Speaker, CENTER, 1000);
        assert_eq!(d.event, Some(FeedEvent::EdgeDetected));
        assert_eq!(d.plan.final_wheel(DriveId::TopWheel), Some(0.3));

        let d = c.decide(Mode::Speaker, CENTER, 1080);
        assert_eq!(d.event, None);
        assert_eq!(d.plan.final_intake(), (Some(0.4), Some(0.4)));
    }

    #[test]
    fn test_speaker_confirms_and_signals_once() {
        let mut c = coordinator();
        c.decide(Mode::Speaker, CENTER, 1000);

        let d = c.decide(Mode::Speaker, CENTER, 1110);
        assert_eq!(d.event, Some(FeedEvent::PieceConfirmed));
        assert_eq!(d.plan.final_wheel(DriveId::TopWheel), Some(0.0));
        assert_eq!(d.plan.final_wheel(DriveId::BottomWheels), Some(0.0));
        assert_eq!(d.plan.final_intake(), (Some(0.0), Some(0.0)));
        assert_eq!(d.plan.haptic, Some(1.0));

        let d = c.decide(Mode::Speaker, CENTER, 1130);
        assert_eq!(d.plan.final_wheel(DriveId::TopWheel), Some(0.0));
        assert_eq!(d.plan.haptic, None);
    }

    #[test]
    fn test_amp_overwritten_to_zero() {
        let mut c = coordinator();
        let d = c.decide(Mode::Amp, CLEAR, 0);

        assert_eq!(d.plan.writes.len(), 6);
        assert_eq!(
            d.plan.writes[0],
            OutputWrite::Wheel {
                drive: DriveId::TopWheel,
                percent: -0.22
            }
        );
        assert_eq!(d.plan.writes[3], OutputWrite::IntakeBottom(-0.7));
        assert_eq!(d.plan.final_wheel(DriveId::TopWheel), Some(0.0));
        assert_eq!(d.plan.final_intake(), (Some(0.0), Some(0.0)));
    }

    #[test]
    fn test_source_only_rotates() {
        let mut c = coordinator();
        for sensors in [CLEAR, CENTER] {
            let d = c.decide(Mode::SourceLoad, sensors, 0);
            let target = d.plan.rotate_target.unwrap();
            assert!((target - 140.0_f32.to_radians()).abs() < 1e-6);
            assert!(d.plan.leaves_feed_untouched());
        }
    }

    #[test]
    fn test_idle_zeroes() {
        let mut c = coordinator();
        let d = c.decide(Mode::Idle, CLEAR, 0);
        assert_eq!(d.plan.final_wheel(DriveId::TopWheel), Some(0.0));
        assert_eq!(d.plan.final_intake(), (Some(0.0), Some(0.0)));
    }

    #[test]
    fn test_indicator_only_without_piece() {
        let mut c = coordinator();
        assert_eq!(c.decide(Mode::Idle, CLEAR, 0).plan.indicator, Some(0.5));
        assert_eq!(c.decide(Mode::Idle, CENTER, 20).plan.indicator, None);
        assert_eq!(c.decide(Mode::SourceLoad, CLEAR, 40).plan.indicator, Some(0.5));
    }

    #[test]
    fn test_leaving_speaker_resets_feed() {
        let mut c = coordinator();
        c.decide(Mode::Speaker, CENTER, 1000);
        assert!(matches!(c.feed_state(), FeedState::PendingSettle { .. }));

        c.decide(Mode::Amp, CENTER, 1020);
        assert_eq!(c.feed_state(), FeedState::Feeding);

        // Back in speaker the window starts over
        let d = c.decide(Mode::Speaker, CENTER, 1200);
        assert_eq!(d.event, Some(FeedEvent::EdgeDetected));
    }
}
