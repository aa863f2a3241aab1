//! Advisory batching analysis over recent frames.
//!
//! The optimizer only observes [`FrameStats`]; it never changes how the queue
//! batches. Feed it one snapshot per rendered frame and call
//! [`PerformanceOptimizer::analyze`] when diagnostics are wanted.

use std::collections::VecDeque;
use std::fmt;

use crate::batch::DEFAULT_BATCH_CAPACITY;
use crate::queue::FrameStats;

/// Thresholds for [`PerformanceOptimizer::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Frames kept in the ring buffer.
    pub history_len: usize,
    /// Batch size that utilization is measured against.
    pub assumed_max_batch_size: usize,
    /// Below this many vertices per draw call, batches are considered too small.
    pub min_vertices_per_draw_call: f64,
    /// Above this texture-bind / draw-call ratio, an atlas is suggested.
    pub max_texture_bind_ratio: f64,
    /// Batches at least this large are instancing candidates.
    pub instancing_min_batch: usize,
    /// Coefficient of variation of per-frame vertex counts above which buffer
    /// pooling is suggested.
    pub max_vertex_variation: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            history_len: 60,
            assumed_max_batch_size: DEFAULT_BATCH_CAPACITY,
            min_vertices_per_draw_call: 64.0,
            max_texture_bind_ratio: 0.5,
            instancing_min_batch: 100,
            max_vertex_variation: 0.25,
        }
    }
}

/// Urgency of a suggestion. Orders `Low < Medium < High`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SuggestionKind {
    MergeBatches,
    TextureAtlas,
    EnableInstancing,
    PoolBuffers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub priority: Priority,
    pub message: String,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.priority, self.message)
    }
}

/// Derived ratios over the recorded window plus ranked suggestions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub frames: usize,
    pub avg_draw_calls: f64,
    pub avg_vertices_per_draw_call: f64,
    /// Average batch size divided by the assumed maximum, in `0..=1` for sane input.
    pub batch_utilization: f64,
    pub texture_bind_ratio: f64,
    /// Highest priority first.
    pub suggestions: Vec<Suggestion>,
}

/// Ring buffer of recent frame statistics.
#[derive(Debug)]
pub struct PerformanceOptimizer {
    config: OptimizerConfig,
    history: VecDeque<FrameStats>,
}

impl Default for PerformanceOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl PerformanceOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        let history = VecDeque::with_capacity(config.history_len);
        Self { config, history }
    }

    #[inline]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.history.len()
    }

    /// Records one frame, evicting the oldest once the window is full.
    pub fn record(&mut self, frame: FrameStats) {
        if self.config.history_len == 0 {
            return;
        }
        while self.history.len() >= self.config.history_len {
            self.history.pop_front();
        }
        self.history.push_back(frame);
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn analyze(&self) -> Analysis {
        let frames = self.history.len();
        if frames == 0 {
            return Analysis::default();
        }

        let draw_calls: usize = self.history.iter().map(|f| f.draw_calls).sum();
        let vertices: usize = self.history.iter().map(|f| f.vertices).sum();
        let batches: usize = self.history.iter().map(|f| f.batches).sum();
        let batched_commands: usize = self
            .history
            .iter()
            .map(|f| f.visible_commands.saturating_sub(f.unbatched_commands))
            .sum();
        let texture_binds: usize = self.history.iter().map(|f| f.texture_binds).sum();

        let avg_draw_calls = draw_calls as f64 / frames as f64;
        let avg_vertices_per_draw_call = ratio(vertices, draw_calls);
        let avg_batch_size = ratio(batched_commands, batches);
        let batch_utilization = avg_batch_size / self.config.assumed_max_batch_size.max(1) as f64;
        let texture_bind_ratio = ratio(texture_binds, draw_calls);

        let mut suggestions = Vec::new();
        let cfg = &self.config;

        if draw_calls > frames && avg_vertices_per_draw_call < cfg.min_vertices_per_draw_call {
            let priority = if avg_vertices_per_draw_call < cfg.min_vertices_per_draw_call * 0.5 {
                Priority::High
            } else {
                Priority::Medium
            };
            suggestions.push(Suggestion {
                kind: SuggestionKind::MergeBatches,
                priority,
                message: format!(
                    "draw calls average {avg_vertices_per_draw_call:.1} vertices; \
                     unify materials so more commands share a batch"
                ),
            });
        }

        if texture_binds > frames && texture_bind_ratio > cfg.max_texture_bind_ratio {
            let priority = if texture_bind_ratio > 0.8 { Priority::High } else { Priority::Medium };
            suggestions.push(Suggestion {
                kind: SuggestionKind::TextureAtlas,
                priority,
                message: format!(
                    "{:.0}% of draw calls bind a texture; pack textures into an atlas",
                    texture_bind_ratio * 100.0
                ),
            });
        }

        let largest = self.history.iter().map(|f| f.largest_batch).max().unwrap_or(0);
        if largest >= cfg.instancing_min_batch {
            suggestions.push(Suggestion {
                kind: SuggestionKind::EnableInstancing,
                priority: Priority::Medium,
                message: format!("batches reach {largest} commands; draw them instanced"),
            });
        }

        let variation = vertex_variation(&self.history);
        if frames > 1 && variation > cfg.max_vertex_variation {
            suggestions.push(Suggestion {
                kind: SuggestionKind::PoolBuffers,
                priority: Priority::Low,
                message: format!(
                    "per-frame vertex counts vary by {:.0}%; pool vertex buffers",
                    variation * 100.0
                ),
            });
        }

        // Stable: equal priorities keep the order above.
        suggestions.sort_by(|a, b| b.priority.cmp(&a.priority));

        Analysis {
            frames,
            avg_draw_calls,
            avg_vertices_per_draw_call,
            batch_utilization,
            texture_bind_ratio,
            suggestions,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Coefficient of variation (stddev / mean) of per-frame vertex counts.
fn vertex_variation(history: &VecDeque<FrameStats>) -> f64 {
    let n = history.len() as f64;
    let mean = history.iter().map(|f| f.vertices as f64).sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let var = history
        .iter()
        .map(|f| {
            let d = f.vertices as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    var.sqrt() / mean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(draw_calls: usize, vertices: usize) -> FrameStats {
        FrameStats {
            total_commands: draw_calls,
            visible_commands: draw_calls,
            batches: draw_calls,
            unbatched_commands: 0,
            draw_calls,
            vertices,
            texture_binds: 0,
            largest_batch: 1,
        }
    }

    fn kinds(analysis: &Analysis) -> Vec<SuggestionKind> {
        analysis.suggestions.iter().map(|s| s.kind).collect()
    }

    // ── ring buffer ───────────────────────────────────────────────────────

    #[test]
    fn ring_buffer_keeps_latest_frames() {
        let mut opt = PerformanceOptimizer::new(OptimizerConfig { history_len: 3, ..Default::default() });
        for i in 0..5 {
            opt.record(frame(1, i));
        }
        assert_eq!(opt.frame_count(), 3);
        let analysis = opt.analyze();
        assert_eq!(analysis.frames, 3);
        assert_eq!(analysis.avg_vertices_per_draw_call, 3.0);
    }

    #[test]
    fn empty_history_yields_default_analysis() {
        assert_eq!(PerformanceOptimizer::default().analyze(), Analysis::default());
    }

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn healthy_frames_get_no_suggestions() {
        let mut opt = PerformanceOptimizer::default();
        for _ in 0..10 {
            opt.record(frame(4, 4000));
        }
        assert!(opt.analyze().suggestions.is_empty());
    }

    #[test]
    fn tiny_draw_calls_suggest_merging() {
        let mut opt = PerformanceOptimizer::default();
        opt.record(frame(50, 200));
        let analysis = opt.analyze();
        assert_eq!(kinds(&analysis), vec![SuggestionKind::MergeBatches]);
        assert_eq!(analysis.suggestions[0].priority, Priority::High);
    }

    #[test]
    fn texture_heavy_frames_suggest_atlas_ranked_first() {
        let mut opt = PerformanceOptimizer::default();
        let mut f = frame(10, 1000);
        f.texture_binds = 9;
        f.largest_batch = 150;
        opt.record(f);

        let analysis = opt.analyze();
        assert_eq!(
            kinds(&analysis),
            vec![SuggestionKind::TextureAtlas, SuggestionKind::EnableInstancing]
        );
        assert!((analysis.texture_bind_ratio - 0.9).abs() < 1e-9);
    }

    #[test]
    fn unstable_vertex_counts_suggest_pooling() {
        let mut opt = PerformanceOptimizer::default();
        opt.record(frame(2, 200));
        opt.record(frame(2, 2000));
        assert_eq!(kinds(&opt.analyze()), vec![SuggestionKind::PoolBuffers]);
    }

    #[test]
    fn utilization_is_relative_to_assumed_max() {
        let mut opt = PerformanceOptimizer::new(OptimizerConfig {
            assumed_max_batch_size: 10,
            ..Default::default()
        });
        let mut f = frame(2, 1000);
        f.visible_commands = 10;
        opt.record(f);
        assert!((opt.analyze().batch_utilization - 0.5).abs() < 1e-9);
    }
}
