use crate::batch::BatchStats;

/// Counters of the current frame plus per-batch numbers.
///
/// Invariant after a flush: `visible_commands + culled_commands == total_commands`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub total_commands: usize,
    pub visible_commands: usize,
    pub culled_commands: usize,
    pub total_batches: usize,
    /// Visible commands executed individually: overflow past `max_batches`, or every
    /// visible command when batching is off.
    pub unbatched_commands: usize,
    /// Sum of the batches' draw-call estimates plus one per unbatched command.
    pub total_draw_calls: usize,
    pub total_memory_usage: usize,
    pub batches: Vec<BatchStats>,
}

impl QueueStats {
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Snapshot of one flush, as consumed by the performance optimizer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub total_commands: usize,
    pub visible_commands: usize,
    pub batches: usize,
    pub unbatched_commands: usize,
    /// Batches plus unbatched commands: one material application and draw each.
    pub draw_calls: usize,
    pub vertices: usize,
    /// Material applications that bound a texture.
    pub texture_binds: usize,
    pub largest_batch: usize,
}
