/// Commands a backend is assumed to pack into one draw call.
pub const COMMANDS_PER_DRAW_CALL: usize = 100;

/// Assumed CPU-side footprint of one batched command, in bytes.
pub const BYTES_PER_COMMAND: usize = 64;

/// Advisory per-batch numbers. Never used for correctness.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub command_count: usize,
    /// `max(1, ceil(command_count / 100))`.
    pub estimated_draw_calls: usize,
    /// `command_count * BYTES_PER_COMMAND`.
    pub memory_usage: usize,
}

impl BatchStats {
    pub fn for_count(command_count: usize) -> Self {
        Self {
            command_count,
            estimated_draw_calls: command_count.div_ceil(COMMANDS_PER_DRAW_CALL).max(1),
            memory_usage: command_count * BYTES_PER_COMMAND,
        }
    }
}
