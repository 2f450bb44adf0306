//! Mode coordination
//!
//! Once per tick, the command resolves the requested mode, takes one sensor
//! snapshot and asks the coordinator for a [`TickPlan`]. The plan lists the
//! output writes in order; the command applies them verbatim.
//!
//! ```text
//!            center broken              window elapsed, still broken
//!  Feeding ─────────────────▶ PendingSettle ─────────────────▶ Confirmed
//!     ▲                            │                              │
//!     └────── beam cleared ────────┘◀──────── beam cleared ───────┘
//! ```

pub mod command;
#[allow(clippy::module_inception)]
pub mod coordinator;
pub mod feed;
pub mod mode;
pub mod plan;

pub use command::{IndexerCommand, Links, TickReport};
pub use coordinator::{Decision, ModeCoordinator};
pub use feed::{FeedEvent, FeedState, FeedStep};
pub use mode::{Mode, ModeRequest, Target};
pub use plan::{OutputWrite, TickPlan};
