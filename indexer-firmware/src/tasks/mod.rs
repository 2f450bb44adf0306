//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod feedback;
pub mod indexer;
pub mod intake;
pub mod operator;
pub mod tick;

pub use feedback::{feedback_task, RumblePins};
pub use indexer::indexer_task;
pub use intake::intake_task;
pub use operator::{operator_task, OperatorButtons};
pub use tick::tick_task;
