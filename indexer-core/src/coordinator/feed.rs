//! Feed cycle state machine
//!
//! Tracks a piece arriving at the center beam while staging for the
//! speaker. The settle window is a deadline against the tick clock: the
//! edge timestamp is stored and compared on later ticks.

/// Feed cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedState {
    /// No piece at the center beam; feeding
    #[default]
    Feeding,
    /// Center beam broke at `edge_ms`; still feeding until the window closes
    PendingSettle { edge_ms: u32 },
    /// Piece held at the center beam; feed stopped
    Confirmed,
}

impl FeedState {
    /// Feeding commands apply in this state
    pub fn is_feeding(&self) -> bool {
        matches!(self, FeedState::Feeding | FeedState::PendingSettle { .. })
    }
}

/// Transition taken on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedEvent {
    /// Center beam broke; settle window opened
    EdgeDetected,
    /// Beam cleared before confirmation
    TransientRejected,
    /// Beam still broken once the window closed
    PieceConfirmed,
    /// Held piece left the center beam
    PieceReleased,
}

/// Result of advancing the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStep {
    pub state: FeedState,
    pub event: Option<FeedEvent>,
}

impl FeedStep {
    const fn stay(state: FeedState) -> Self {
        Self { state, event: None }
    }

    const fn to(state: FeedState, event: FeedEvent) -> Self {
        Self {
            state,
            event: Some(event),
        }
    }
}

/// Advance `state` by one tick
///
/// Confirmation needs both the stored edge and `settle_ms` elapsed since it
/// with the beam still broken. Time alone never confirms.
pub fn advance(state: FeedState, center_broken: bool, now_ms: u32, settle_ms: u32) -> FeedStep {
    use FeedState::*;

    match (state, center_broken) {
        (Feeding, false) => FeedStep::stay(Feeding),
        (Feeding, true) => FeedStep::to(
            PendingSettle { edge_ms: now_ms },
            FeedEvent::EdgeDetected,
        ),

        (PendingSettle { .. }, false) => FeedStep::to(Feeding, FeedEvent::TransientRejected),
        (PendingSettle { edge_ms }, true) => {
            if now_ms.wrapping_sub(edge_ms) >= settle_ms {
                FeedStep::to(Confirmed, FeedEvent::PieceConfirmed)
            } else {
                FeedStep::stay(state)
            }
        }

        (Confirmed, true) => FeedStep::stay(Confirmed),
        (Confirmed, false) => FeedStep::to(Feeding, FeedEvent::PieceReleased),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: u32 = 105;

    #[test]
    fn test_edge_opens_window() {
        let step = advance(FeedState::Feeding, true, 1000, SETTLE);
        assert_eq!(step.state, FeedState::PendingSettle { edge_ms: 1000 });
        assert_eq!(step.event, Some(FeedEvent::EdgeDetected));
        assert!(step.state.is_feeding());
    }

    #[test]
    fn test_holds_inside_window() {
        let pending = FeedState::PendingSettle { edge_ms: 1000 };
        let step = advance(pending, true, 1104, SETTLE);
        assert_eq!(step.state, pending);
        assert_eq!(step.event, None);
    }

    #[test]
    fn test_confirms_at_window_end() {
        let pending = FeedState::PendingSettle { edge_ms: 1000 };
        let step = advance(pending, true, 1105, SETTLE);
        assert_eq!(step.state, FeedState::Confirmed);
        assert_eq!(step.event, Some(FeedEvent::PieceConfirmed));
        assert!(!step.state.is_feeding());
    }

    #[test]
    fn test_clear_inside_window_is_transient() {
        let pending = FeedState::PendingSettle { edge_ms: 1000 };
        let step = advance(pending, false, 1040, SETTLE);
        assert_eq!(step.state, FeedState::Feeding);
        assert_eq!(step.event, Some(FeedEvent::TransientRejected));
    }

    #[test]
    fn test_clear_after_window_is_transient() {
        let pending = FeedState::PendingSettle { edge_ms: 1000 };
        let step = advance(pending, false, 1200, SETTLE);
        assert_eq!(step.state, FeedState::Feeding);
        assert_eq!(step.event, Some(FeedEvent::TransientRejected));
    }

    #[test]
    fn test_time_alone_never_confirms() {
        let step = advance(FeedState::Feeding, false, 50_000, SETTLE);
        assert_eq!(step.state, FeedState::Feeding);
        assert_eq!(step.event, None);
    }

    #[test]
    fn test_release_resumes_feeding() {
        let step = advance(FeedState::Confirmed, true, 2000, SETTLE);
        assert_eq!(step, FeedStep::stay(FeedState::Confirmed));

        let step = advance(FeedState::Confirmed, false, 2020, SETTLE);
        assert_eq!(step.state, FeedState::Feeding);
        assert_eq!(step.event, Some(FeedEvent::PieceReleased));
    }

    #[test]
    fn test_window_across_clock_wrap() {
        let pending = FeedState::PendingSettle {
            edge_ms: u32::MAX - 50,
        };
        assert_eq!(advance(pending, true, 20, SETTLE).state, pending);
        assert_eq!(
            advance(pending, true, 60, SETTLE).state,
            FeedState::Confirmed
        );
    }
}
