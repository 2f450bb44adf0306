use indexer_core::config::ControllerConfig;
use indexer_core::control::{input_modulus, wrap_error, PositionController};
use indexer_core::coordinator::feed::{advance, FeedEvent, FeedState};
use indexer_core::mock::FakeEncoder;
use proptest::prelude::*;

const PERIOD: f32 = 4.367;

fn controller(angle: f32) -> PositionController<FakeEncoder> {
    PositionController::new(FakeEncoder::at(angle), ControllerConfig::default())
}

/// Shortest distance on the circle, computed in f64
fn circular_distance(a: f32, b: f32) -> f64 {
    let period = PERIOD as f64;
    let d = (a as f64 - b as f64).rem_euclid(period);
    d.min(period - d)
}

proptest! {
    #[test]
    fn targets_are_clamped(target in -100.0f32..100.0, angle in 0.0f32..PERIOD) {
        let mut pc = controller(angle);
        pc.calculate(target, 0).unwrap();
        let goal = pc.goal().unwrap();
        let config = ControllerConfig::default();
        prop_assert!(goal >= config.min_angle && goal <= config.max_angle);
    }

    #[test]
    fn modulus_stays_in_range(value in -1_000.0f32..1_000.0) {
        let r = input_modulus(value, 0.0, PERIOD);
        prop_assert!((0.0..=PERIOD).contains(&r));
    }

    #[test]
    fn wrap_error_is_short_way(target in 0.0f32..PERIOD, measured in 0.0f32..PERIOD) {
        let e = wrap_error(target, measured, PERIOD);
        prop_assert!(e.abs() <= PERIOD / 2.0 + 1e-4);
        prop_assert!((e.abs() as f64 - circular_distance(target, measured)).abs() < 1e-3);
    }

    #[test]
    fn at_goal_iff_within_tolerance(goal in 0.0f32..2.75, offset in -0.1f32..0.1) {
        let tolerance = ControllerConfig::default().tolerance;
        let measured = input_modulus(goal + offset, 0.0, PERIOD);
        let distance = circular_distance(goal, measured);
        prop_assume!((distance - tolerance as f64).abs() > 1e-4);

        let mut pc = controller(measured);
        pc.calculate(goal, 0).unwrap();
        prop_assert_eq!(pc.at_goal().unwrap(), distance <= tolerance as f64);
    }

    #[test]
    fn at_goal_across_wrap(goal in 0.0f32..0.02, below in 0.0f32..0.02) {
        let measured = PERIOD - below;
        let distance = circular_distance(goal, measured);
        prop_assume!((distance - 0.02).abs() > 1e-4);

        let mut pc = controller(measured);
        pc.calculate(goal, 0).unwrap();
        prop_assert_eq!(pc.at_goal().unwrap(), distance <= 0.02);
    }

    #[test]
    fn never_confirms_before_window(
        edge in any::<u32>(),
        elapsed in 0u32..105,
    ) {
        let pending = FeedState::PendingSettle { edge_ms: edge };
        let step = advance(pending, true, edge.wrapping_add(elapsed), 105);
        prop_assert_eq!(step.state, pending);
        prop_assert_eq!(step.event, None);
    }

    #[test]
    fn clear_beam_never_confirms(now in any::<u32>()) {
        for state in [FeedState::Feeding, FeedState::PendingSettle { edge_ms: 0 }] {
            let step = advance(state, false, now, 105);
            prop_assert_ne!(step.event, Some(FeedEvent::PieceConfirmed));
            prop_assert_eq!(step.state, FeedState::Feeding);
        }
    }
}
