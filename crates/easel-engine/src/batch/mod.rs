//! Render batches: groups of commands that share one material key and one kind.

mod key;
mod render_batch;
mod stats;

pub use key::BatchKey;
pub use render_batch::{BatchId, RenderBatch, DEFAULT_BATCH_CAPACITY};
pub use stats::{BatchStats, BYTES_PER_COMMAND, COMMANDS_PER_DRAW_CALL};
