use crate::batch::DEFAULT_BATCH_CAPACITY;

/// Default viewport inflation used for culling, in logical pixels.
pub const DEFAULT_CULL_MARGIN: f32 = 50.0;

/// Default ceiling on batches per frame.
pub const DEFAULT_MAX_BATCHES: usize = 1000;

/// Render queue configuration.
///
/// Every stage of a flush can be switched off independently, which is mostly
/// useful for debugging paint-order issues.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueConfig {
    pub enable_batching: bool,
    pub enable_culling: bool,
    pub enable_depth_sorting: bool,
    /// Batches a single flush may open. Commands that would need another batch
    /// are executed one by one after the batches instead.
    pub max_batches: usize,
    /// Inflation applied to the viewport on every side before culling.
    pub cull_margin: f32,
    /// Hard capacity of each batch.
    pub batch_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enable_batching: true,
            enable_culling: true,
            enable_depth_sorting: true,
            max_batches: DEFAULT_MAX_BATCHES,
            cull_margin: DEFAULT_CULL_MARGIN,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
        }
    }
}

impl QueueConfig {
    pub fn with_batching(mut self, enabled: bool) -> Self {
        self.enable_batching = enabled;
        self
    }

    pub fn with_culling(mut self, enabled: bool) -> Self {
        self.enable_culling = enabled;
        self
    }

    pub fn with_depth_sorting(mut self, enabled: bool) -> Self {
        self.enable_depth_sorting = enabled;
        self
    }

    pub fn with_max_batches(mut self, max_batches: usize) -> Self {
        self.max_batches = max_batches;
        self
    }

    pub fn with_cull_margin(mut self, margin: f32) -> Self {
        self.cull_margin = margin;
        self
    }

    pub fn with_batch_capacity(mut self, capacity: usize) -> Self {
        self.batch_capacity = capacity;
        self
    }
}
