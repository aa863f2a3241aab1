//! Render queue: the per-frame collect → flush cycle.
//!
//! Flush order is fixed:
//! 1. cull against the inflated viewport
//! 2. stable sort by z-index (ties keep submission order)
//! 3. group into material-compatible batches
//! 4. execute batches in creation order, then any overflow commands
//! 5. finalize statistics

mod config;
mod render_queue;
mod sort_key;
mod stats;

pub use config::{QueueConfig, DEFAULT_CULL_MARGIN, DEFAULT_MAX_BATCHES};
pub use render_queue::{QueueState, RenderQueue};
pub use stats::{FrameStats, QueueStats};
