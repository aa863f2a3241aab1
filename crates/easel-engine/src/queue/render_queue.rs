use std::collections::HashMap;
use std::rc::Rc;

use crate::batch::{BatchKey, BatchStats, RenderBatch};
use crate::command::RenderCommand;
use crate::coords::Rect;
use crate::gfx::{GfxError, GraphicsContext};

use super::sort_key::SortKey;
use super::{FrameStats, QueueConfig, QueueStats};

/// Lifecycle of a render queue within a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum QueueState {
    /// No pending commands.
    #[default]
    Idle,
    /// Commands pending, flushed or not. Only `clear` drops them.
    Accumulating,
    /// Inside `flush`. Not re-entrant.
    Flushing,
}

#[derive(Debug, Default)]
struct Counters {
    total: usize,
    visible: usize,
    culled: usize,
}

/// Per-frame command queue: cull → sort → group → execute.
///
/// Owned by exactly one render loop. Commands are shared with batches through `Rc`,
/// so the queue is neither `Send` nor `Sync`; feed it from the render thread only.
///
/// Performance characteristics:
/// - `add_command()` is O(1)
/// - `flush()` is O(n log n) in visible commands; scratch buffers and the batch
///   index keep their capacity across frames
#[derive(Debug, Default)]
pub struct RenderQueue {
    config: QueueConfig,
    state: QueueState,

    pending: Vec<Rc<RenderCommand>>,

    /// Viewport as given, and inflated by the cull margin.
    raw_viewport: Option<Rect>,
    viewport: Option<Rect>,

    /// Batches in creation order (= execution order).
    batches: Vec<RenderBatch>,
    /// Most recently opened batch per key, as an index into `batches`.
    open: HashMap<BatchKey, usize>,
    /// Visible commands that did not get a batch, in paint order.
    unbatched: Vec<Rc<RenderCommand>>,

    /// Visible commands in paint order. Reused across frames.
    order: Vec<SortKey>,

    counters: Counters,
    last_frame: FrameStats,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self { config, ..Self::default() }
    }

    #[inline]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Replaces the configuration. An active viewport is re-inflated with the new margin.
    pub fn set_config(&mut self, config: QueueConfig) {
        self.config = config;
        if let Some(rect) = self.raw_viewport {
            self.set_viewport(rect);
        }
    }

    #[inline]
    pub fn state(&self) -> QueueState {
        self.state
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Batches built by the last flush, in execution order.
    #[inline]
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Visible commands the last flush executed outside any batch.
    #[inline]
    pub fn unbatched(&self) -> &[Rc<RenderCommand>] {
        &self.unbatched
    }

    /// Queues a command for the next flush.
    ///
    /// Commands with NaN bounds and disposed commands are ignored and not counted.
    /// Infinite extents are accepted. Returns whether the command was accepted.
    pub fn add_command(&mut self, command: impl Into<Rc<RenderCommand>>) -> bool {
        let command = command.into();
        if command.is_disposed() || command.bounds().is_nan() {
            log::trace!("ignoring invalid render command {}", command.id());
            return false;
        }

        self.pending.push(command);
        self.counters.total += 1;
        if self.state == QueueState::Idle {
            self.state = QueueState::Accumulating;
        }
        true
    }

    /// Sets the culling viewport. The stored rect is inflated by `cull_margin` so
    /// commands just outside the view survive one frame early.
    pub fn set_viewport(&mut self, rect: Rect) {
        self.raw_viewport = Some(rect);
        self.viewport = Some(rect.inflate(self.config.cull_margin));
    }

    /// Removes the viewport; every command is visible until a new one is set.
    pub fn clear_viewport(&mut self) {
        self.raw_viewport = None;
        self.viewport = None;
    }

    /// The inflated culling rectangle, if any.
    #[inline]
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Culls, sorts, groups and executes every pending command against `ctx`.
    ///
    /// Statistics are finalized before execution starts, so they are valid even
    /// when the backend fails mid-frame. The pending list is left in place until
    /// [`clear`](Self::clear); flushing twice redraws the same frame.
    ///
    /// # Panics
    /// Panics (debug only) if called while a flush is in progress.
    pub fn flush(&mut self, ctx: &mut dyn GraphicsContext) -> Result<FrameStats, GfxError> {
        debug_assert!(
            self.state != QueueState::Flushing,
            "RenderQueue::flush re-entered; flush is not re-entrant"
        );
        self.state = QueueState::Flushing;

        self.batches.clear();
        self.open.clear();
        self.unbatched.clear();

        self.cull();
        if self.config.enable_depth_sorting {
            // Stable: SortKey breaks z ties by submission order.
            self.order.sort_unstable();
        }
        if self.config.enable_batching {
            self.group();
        } else {
            let pending = &self.pending;
            self.unbatched
                .extend(self.order.iter().map(|k| Rc::clone(&pending[k.order])));
        }

        self.counters.visible = self.order.len();
        self.counters.culled = self.counters.total - self.counters.visible;
        self.last_frame = self.frame_stats();

        log::trace!(
            "flush: {} total, {} visible, {} batches, {} unbatched",
            self.counters.total,
            self.counters.visible,
            self.batches.len(),
            self.unbatched.len(),
        );

        let result = self.execute(ctx);
        // Pending commands stay queued until `clear`.
        self.state = if self.pending.is_empty() { QueueState::Idle } else { QueueState::Accumulating };
        result.map(|()| self.last_frame)
    }

    /// Current counters and per-batch statistics.
    pub fn stats(&self) -> QueueStats {
        let batches: Vec<BatchStats> = self.batches.iter().map(RenderBatch::stats).collect();
        let batched_draw_calls: usize = batches.iter().map(|b| b.estimated_draw_calls).sum();

        QueueStats {
            total_commands: self.counters.total,
            visible_commands: self.counters.visible,
            culled_commands: self.counters.culled,
            total_batches: self.batches.len(),
            unbatched_commands: self.unbatched.len(),
            total_draw_calls: batched_draw_calls + self.unbatched.len(),
            total_memory_usage: batches.iter().map(|b| b.memory_usage).sum(),
            batches,
        }
    }

    /// Snapshot of the last flush.
    #[inline]
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Disposes pending commands, drops batches and zeroes every counter.
    ///
    /// Commands still shared with a producer are released but not disposed; the
    /// producer keeps them for resubmission. Safe to call in any state.
    pub fn clear(&mut self) {
        // Batches hold clones; drop them first so pending handles become unique.
        self.batches.clear();
        self.open.clear();
        self.unbatched.clear();
        self.order.clear();

        for mut command in self.pending.drain(..) {
            if let Some(command) = Rc::get_mut(&mut command) {
                command.dispose();
            }
        }

        self.counters = Counters::default();
        self.last_frame = FrameStats::default();
        self.state = QueueState::Idle;
    }

    // ── flush stages ──────────────────────────────────────────────────────

    fn cull(&mut self) {
        self.order.clear();
        let viewport = if self.config.enable_culling { self.viewport } else { None };

        for (i, command) in self.pending.iter().enumerate() {
            let visible = match viewport {
                Some(vp) => command.is_visible(vp),
                None => true,
            };
            if visible {
                self.order.push(SortKey::new(command.z_index(), i));
            }
        }
    }

    fn group(&mut self) {
        let order = std::mem::take(&mut self.order);
        let mut overflowed = false;

        for key in &order {
            let command = Rc::clone(&self.pending[key.order]);
            if !self.assign(&command) {
                self.unbatched.push(command);
                overflowed = true;
            }
        }

        if overflowed {
            log::debug!(
                "batch limit {} reached; {} commands executed unbatched",
                self.config.max_batches,
                self.unbatched.len(),
            );
        }
        self.order = order;
    }

    /// Adds `command` to the open batch for its key, opening a new batch when there
    /// is none or it is full. Returns `false` when no batch may be opened.
    fn assign(&mut self, command: &Rc<RenderCommand>) -> bool {
        let key = BatchKey::of(command);
        if let Some(&index) = self.open.get(&key) {
            if self.batches[index].add_command(command) {
                return true;
            }
        }

        if self.batches.len() >= self.config.max_batches {
            return false;
        }

        // A fresh batch only refuses a command when its capacity is zero.
        let mut batch = RenderBatch::for_command(command, self.config.batch_capacity);
        if !batch.add_command(command) {
            return false;
        }
        self.open.insert(key, self.batches.len());
        self.batches.push(batch);
        true
    }

    fn execute(&self, ctx: &mut dyn GraphicsContext) -> Result<(), GfxError> {
        for batch in &self.batches {
            batch.execute(ctx)?;
        }
        for command in &self.unbatched {
            command.material().apply(ctx);
            command.execute(ctx)?;
        }
        Ok(())
    }

    fn frame_stats(&self) -> FrameStats {
        let batched_vertices: usize = self.batches.iter().map(RenderBatch::vertex_count).sum();
        let unbatched_vertices: usize =
            self.unbatched.iter().map(|c| c.batch_data().vertex_count()).sum();
        let texture_binds = self
            .batches
            .iter()
            .filter(|b| b.material().texture.is_some())
            .count()
            + self
                .unbatched
                .iter()
                .filter(|c| c.material().texture.is_some())
                .count();

        FrameStats {
            total_commands: self.counters.total,
            visible_commands: self.counters.visible,
            batches: self.batches.len(),
            unbatched_commands: self.unbatched.len(),
            draw_calls: self.batches.len() + self.unbatched.len(),
            vertices: batched_vertices + unbatched_vertices,
            texture_binds,
            largest_batch: self.batches.iter().map(RenderBatch::len).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandKind, MaterialKey, ZIndex};
    use crate::coords::Vec2;
    use crate::gfx::{GfxCall, RecordingContext, TextureId};
    use crate::paint::Color;

    fn tex(id: u64) -> MaterialKey {
        MaterialKey::solid(Color::white()).with_texture(TextureId(id))
    }

    fn quad(z: i32, x: f32, material: MaterialKey) -> RenderCommand {
        RenderCommand::quad(ZIndex(z), Rect::new(x, 0.0, 10.0, 10.0), material)
    }

    fn drawn_xs(ctx: &RecordingContext) -> Vec<f32> {
        ctx.draws().map(|(_, b)| b.origin.x).collect()
    }

    // ── add_command ───────────────────────────────────────────────────────

    #[test]
    fn add_counts_and_changes_state() {
        let mut queue = RenderQueue::new();
        assert_eq!(queue.state(), QueueState::Idle);
        assert!(queue.add_command(quad(0, 0.0, tex(1))));
        assert_eq!(queue.state(), QueueState::Accumulating);
        assert_eq!(queue.stats().total_commands, 1);
    }

    #[test]
    fn invalid_commands_are_ignored() {
        let mut queue = RenderQueue::new();
        let nan = RenderCommand::quad(ZIndex(0), Rect::new(f32::NAN, 0.0, 1.0, 1.0), tex(1));
        let mut disposed = quad(0, 0.0, tex(1));
        disposed.dispose();

        assert!(!queue.add_command(nan));
        assert!(!queue.add_command(disposed));
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(queue.state(), QueueState::Idle);
        assert!(queue.stats().is_zero());
    }

    #[test]
    fn infinite_clear_is_accepted_and_drawn() {
        let mut queue = RenderQueue::new();
        queue.set_viewport(Rect::new(0.0, 0.0, 100.0, 100.0));
        let band = Rect::new(f32::NEG_INFINITY, 0.0, f32::INFINITY, 1.0);
        let everything = Rect::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::INFINITY, f32::INFINITY);

        assert!(queue.add_command(RenderCommand::clear(ZIndex(0), band, Color::white())));
        assert!(queue.add_command(RenderCommand::clear(ZIndex(1), everything, Color::black())));

        let mut ctx = RecordingContext::new();
        queue.flush(&mut ctx).unwrap();

        let stats = queue.stats();
        assert_eq!(stats.total_commands, 2);
        assert_eq!(stats.visible_commands, 2);
        assert_eq!(stats.culled_commands, 0);
        let kinds: Vec<CommandKind> = ctx.draws().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![CommandKind::Clear, CommandKind::Clear]);
    }

    // ── viewport ──────────────────────────────────────────────────────────

    #[test]
    fn viewport_is_inflated_by_margin() {
        let mut queue = RenderQueue::new();
        queue.set_viewport(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(queue.viewport(), Some(Rect::new(-50.0, -50.0, 200.0, 200.0)));

        queue.set_config(QueueConfig::default().with_cull_margin(0.0));
        assert_eq!(queue.viewport(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

        queue.clear_viewport();
        assert_eq!(queue.viewport(), None);
    }

    // ── cull ──────────────────────────────────────────────────────────────

    #[test]
    fn culls_outside_margin_keeps_inside() {
        let mut queue = RenderQueue::new();
        queue.set_viewport(Rect::new(0.0, 0.0, 100.0, 100.0));
        queue.add_command(quad(0, 140.0, tex(1))); // within the 50px margin
        queue.add_command(quad(0, 151.0, tex(1))); // beyond it

        let mut ctx = RecordingContext::new();
        queue.flush(&mut ctx).unwrap();

        let stats = queue.stats();
        assert_eq!(stats.visible_commands, 1);
        assert_eq!(stats.culled_commands, 1);
        assert_eq!(drawn_xs(&ctx), vec![140.0]);
    }

    #[test]
    fn no_viewport_means_everything_visible() {
        let mut queue = RenderQueue::new();
        queue.add_command(quad(0, 1.0e6, tex(1)));
        queue.flush(&mut RecordingContext::new()).unwrap();
        assert_eq!(queue.stats().visible_commands, 1);
    }

    #[test]
    fn culling_disabled_ignores_viewport() {
        let mut queue = RenderQueue::with_config(QueueConfig::default().with_culling(false));
        queue.set_viewport(Rect::new(0.0, 0.0, 10.0, 10.0));
        queue.add_command(quad(0, 500.0, tex(1)));
        queue.flush(&mut RecordingContext::new()).unwrap();
        assert_eq!(queue.stats().culled_commands, 0);
    }

    // ── sort ──────────────────────────────────────────────────────────────

    #[test]
    fn equal_z_preserves_submission_order() {
        let mut queue = RenderQueue::with_config(QueueConfig::default().with_batching(false));
        queue.add_command(quad(1, 0.0, tex(1)));
        queue.add_command(quad(0, 10.0, tex(1)));
        queue.add_command(quad(1, 20.0, tex(1)));
        queue.add_command(quad(0, 30.0, tex(1)));

        let mut ctx = RecordingContext::new();
        queue.flush(&mut ctx).unwrap();
        assert_eq!(drawn_xs(&ctx), vec![10.0, 30.0, 0.0, 20.0]);
    }

    #[test]
    fn sorting_disabled_keeps_submission_order() {
        let config = QueueConfig::default().with_batching(false).with_depth_sorting(false);
        let mut queue = RenderQueue::with_config(config);
        queue.add_command(quad(5, 0.0, tex(1)));
        queue.add_command(quad(-5, 10.0, tex(1)));

        let mut ctx = RecordingContext::new();
        queue.flush(&mut ctx).unwrap();
        assert_eq!(drawn_xs(&ctx), vec![0.0, 10.0]);
    }

    // ── group ─────────────────────────────────────────────────────────────

    #[test]
    fn compatible_commands_share_one_batch() {
        let mut queue = RenderQueue::new();
        for i in 0..5 {
            queue.add_command(quad(i, i as f32, tex(1)));
        }
        queue.flush(&mut RecordingContext::new()).unwrap();
        assert_eq!(queue.batches().len(), 1);
        assert_eq!(queue.batches()[0].len(), 5);
    }

    #[test]
    fn different_kinds_never_share_a_batch() {
        let mut queue = RenderQueue::new();
        queue.add_command(quad(0, 0.0, tex(1)));
        queue.add_command(RenderCommand::circle(ZIndex(0), Vec2::new(5.0, 5.0), 5.0, tex(1)));
        queue.flush(&mut RecordingContext::new()).unwrap();

        let kinds: Vec<CommandKind> = queue.batches().iter().map(RenderBatch::kind).collect();
        assert_eq!(kinds, vec![CommandKind::Quad, CommandKind::Circle]);
    }

    #[test]
    fn full_batch_opens_a_new_one() {
        let mut queue = RenderQueue::with_config(QueueConfig::default().with_batch_capacity(2));
        for i in 0..5 {
            queue.add_command(quad(0, i as f32, tex(1)));
        }
        queue.flush(&mut RecordingContext::new()).unwrap();

        let sizes: Vec<usize> = queue.batches().iter().map(RenderBatch::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(queue.unbatched().is_empty());
    }

    #[test]
    fn batch_limit_falls_back_to_unbatched_execution() {
        let mut queue = RenderQueue::with_config(QueueConfig::default().with_max_batches(2));
        for i in 0..4 {
            queue.add_command(quad(i as i32, i as f32 * 10.0, tex(i)));
        }

        let mut ctx = RecordingContext::new();
        let frame = queue.flush(&mut ctx).unwrap();

        assert_eq!(queue.batches().len(), 2);
        assert_eq!(queue.unbatched().len(), 2);
        assert_eq!(frame.draw_calls, 4);
        assert_eq!(drawn_xs(&ctx), vec![0.0, 10.0, 20.0, 30.0]);
        // Each unbatched command still binds its own texture.
        let textures = ctx.calls().iter().filter(|c| matches!(c, GfxCall::Texture(_))).count();
        assert_eq!(textures, 4);
    }

    #[test]
    fn zero_capacity_degrades_to_unbatched() {
        let mut queue = RenderQueue::with_config(QueueConfig::default().with_batch_capacity(0));
        queue.add_command(quad(0, 0.0, tex(1)));
        let mut ctx = RecordingContext::new();
        queue.flush(&mut ctx).unwrap();
        assert!(queue.batches().is_empty());
        assert_eq!(ctx.draw_count(), 1);
    }

    // ── execute ───────────────────────────────────────────────────────────

    #[test]
    fn unbatched_mode_applies_material_per_command() {
        let mut queue = RenderQueue::with_config(QueueConfig::default().with_batching(false));
        queue.add_command(quad(0, 0.0, tex(1)));
        queue.add_command(quad(0, 10.0, tex(1)));

        let mut ctx = RecordingContext::new();
        let frame = queue.flush(&mut ctx).unwrap();

        assert_eq!(ctx.state_change_count(), 4);
        assert_eq!(frame.batches, 0);
        assert_eq!(frame.unbatched_commands, 2);
        assert_eq!(queue.stats().total_draw_calls, 2);
    }

    #[test]
    fn backend_failure_keeps_statistics() {
        let mut queue = RenderQueue::new();
        queue.add_command(quad(0, 0.0, tex(1)));
        queue.add_command(quad(0, 10.0, tex(2)));

        let mut ctx = RecordingContext::failing_on_draw(0);
        assert!(queue.flush(&mut ctx).is_err());

        assert_eq!(queue.state(), QueueState::Accumulating);
        let stats = queue.stats();
        assert_eq!(stats.visible_commands, 2);
        assert_eq!(stats.total_batches, 2);
    }

    #[test]
    fn flush_twice_redraws_same_frame() {
        let mut queue = RenderQueue::new();
        queue.add_command(quad(0, 0.0, tex(1)));
        queue.add_command(quad(0, 10.0, tex(1)));

        let mut ctx = RecordingContext::new();
        queue.flush(&mut ctx).unwrap();
        queue.flush(&mut ctx).unwrap();

        assert_eq!(ctx.draw_count(), 4);
        assert_eq!(queue.batches().len(), 1);
        assert_eq!(queue.stats().total_commands, 2);
    }

    #[test]
    fn state_follows_pending_commands() {
        let mut queue = RenderQueue::new();
        queue.flush(&mut RecordingContext::new()).unwrap();
        assert_eq!(queue.state(), QueueState::Idle);

        queue.add_command(quad(0, 0.0, tex(1)));
        queue.flush(&mut RecordingContext::new()).unwrap();
        assert_eq!(queue.state(), QueueState::Accumulating);
        assert_eq!(queue.pending_len(), 1);

        queue.clear();
        assert_eq!(queue.state(), QueueState::Idle);
    }

    // ── stats / clear ─────────────────────────────────────────────────────

    #[test]
    fn frame_stats_count_vertices_and_texture_binds() {
        let mut queue = RenderQueue::new();
        queue.add_command(quad(0, 0.0, tex(1)));
        queue.add_command(quad(0, 10.0, tex(1)));
        queue.add_command(quad(0, 20.0, MaterialKey::solid(Color::black())));

        let frame = queue.flush(&mut RecordingContext::new()).unwrap();
        assert_eq!(frame.vertices, 12);
        assert_eq!(frame.texture_binds, 1);
        assert_eq!(frame.largest_batch, 2);
        assert_eq!(queue.last_frame(), frame);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut queue = RenderQueue::new();
        queue.set_viewport(Rect::new(0.0, 0.0, 10.0, 10.0));
        queue.add_command(quad(0, 0.0, tex(1)));
        queue.add_command(quad(0, 999.0, tex(2)));
        queue.flush(&mut RecordingContext::new()).unwrap();

        queue.clear();

        assert!(queue.stats().is_zero());
        assert_eq!(queue.last_frame(), FrameStats::default());
        assert_eq!(queue.state(), QueueState::Idle);
        assert!(queue.is_empty());
        assert!(queue.viewport().is_some());

        queue.clear();
        assert!(queue.stats().is_zero());
    }

    #[test]
    fn clear_leaves_shared_commands_usable() {
        let shared = Rc::new(quad(0, 0.0, tex(1)));
        let mut queue = RenderQueue::new();
        queue.add_command(Rc::clone(&shared));
        queue.flush(&mut RecordingContext::new()).unwrap();
        queue.clear();

        assert!(!shared.is_disposed());
        assert!(queue.add_command(Rc::clone(&shared)));
    }
}
