//! Engine-facing façade over a [`RenderQueue`].
//!
//! The render loop owns one `CommandRenderer` and drives it once per frame:
//! `set_viewport` → `submit`* → `render`. Nothing here is global.

use std::rc::Rc;

use crate::command::RenderCommand;
use crate::coords::Viewport;
use crate::gfx::GraphicsContext;
use crate::optimizer::PerformanceOptimizer;
use crate::queue::{FrameStats, QueueConfig, QueueStats, RenderQueue};

/// Clears the queue when dropped, including during unwinding.
struct ClearOnDrop<'a>(&'a mut RenderQueue);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug)]
pub struct CommandRenderer {
    queue: RenderQueue,
    enabled: bool,
    optimizer: Option<PerformanceOptimizer>,
    last_stats: QueueStats,
    frame_index: u64,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl CommandRenderer {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            queue: RenderQueue::with_config(config),
            enabled: true,
            optimizer: None,
            last_stats: QueueStats::default(),
            frame_index: 0,
        }
    }

    /// Records every rendered frame into `optimizer`.
    pub fn with_optimizer(mut self, optimizer: PerformanceOptimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    #[inline]
    pub fn optimizer(&self) -> Option<&PerformanceOptimizer> {
        self.optimizer.as_ref()
    }

    #[inline]
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// While disabled, submissions are dropped and `render` draws nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn submit(&mut self, command: impl Into<Rc<RenderCommand>>) {
        if self.enabled {
            self.queue.add_command(command);
        }
    }

    pub fn submit_batch<C>(&mut self, commands: impl IntoIterator<Item = C>)
    where
        C: Into<Rc<RenderCommand>>,
    {
        if !self.enabled {
            return;
        }
        for command in commands {
            self.queue.add_command(command);
        }
    }

    /// Culls against the canvas area visible through `viewport`.
    ///
    /// Invalid viewports (zero size, non-finite values) are ignored and the previous
    /// culling rect stays active.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {viewport:?}");
            return;
        }
        self.queue.set_viewport(viewport.visible_rect());
    }

    /// Flushes the frame into `ctx`, then clears the queue no matter what.
    ///
    /// A backend error abandons the frame: it is logged, not returned, so the render
    /// loop keeps going. Returns the frame's statistics when it was fully drawn.
    pub fn render(&mut self, ctx: &mut dyn GraphicsContext) -> Option<FrameStats> {
        let frame_index = self.frame_index;
        self.frame_index = self.frame_index.wrapping_add(1);

        let mut guard = ClearOnDrop(&mut self.queue);
        if !self.enabled {
            return None;
        }

        let result = guard.0.flush(ctx);
        self.last_stats = guard.0.stats();
        drop(guard);

        match result {
            Ok(frame) => {
                if let Some(optimizer) = self.optimizer.as_mut() {
                    optimizer.record(frame);
                }
                Some(frame)
            }
            Err(err) => {
                log::error!("frame {frame_index} abandoned: {err}");
                None
            }
        }
    }

    /// Drops everything submitted since the last render.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Statistics of the pending frame (zero right after `render`).
    #[inline]
    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Statistics captured by the last `render` before the queue was cleared.
    #[inline]
    pub fn last_stats(&self) -> &QueueStats {
        &self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::command::shapes::QuadCmd;
    use crate::command::ZIndex;
    use crate::coords::{Rect, Vec2};
    use crate::gfx::{GfxError, RecordingContext};
    use crate::paint::Color;

    fn quad(x: f32) -> RenderCommand {
        RenderCommand::solid_quad(ZIndex(0), Rect::new(x, 0.0, 10.0, 10.0), Color::white())
    }

    #[test]
    fn render_flushes_then_clears() {
        let mut renderer = CommandRenderer::default();
        renderer.submit_batch([quad(0.0), quad(20.0)]);

        let mut ctx = RecordingContext::new();
        let frame = renderer.render(&mut ctx).unwrap();

        assert_eq!(frame.visible_commands, 2);
        assert_eq!(ctx.draw_count(), 2);
        assert!(renderer.stats().is_zero());
        assert_eq!(renderer.last_stats().total_batches, 1);
    }

    #[test]
    fn disabled_renderer_drops_submissions() {
        let mut renderer = CommandRenderer::default();
        renderer.set_enabled(false);
        renderer.submit(quad(0.0));
        assert_eq!(renderer.queue().pending_len(), 0);

        let mut ctx = RecordingContext::new();
        assert!(renderer.render(&mut ctx).is_none());
        assert_eq!(ctx.draw_count(), 0);
    }

    #[test]
    fn backend_error_is_swallowed_and_queue_cleared() {
        let mut renderer = CommandRenderer::default();
        renderer.submit(quad(0.0));

        let mut failing = RecordingContext::failing_on_draw(0);
        assert!(renderer.render(&mut failing).is_none());
        assert_eq!(renderer.queue().pending_len(), 0);

        // The next frame starts clean.
        renderer.submit(quad(5.0));
        let mut ctx = RecordingContext::new();
        assert_eq!(renderer.render(&mut ctx).map(|f| f.total_commands), Some(1));
    }

    #[test]
    fn lost_context_abandons_frame() {
        struct Lost;
        impl GraphicsContext for Lost {
            fn set_fill_style(&mut self, _: Color) {}
            fn set_stroke_style(&mut self, _: Color) {}
            fn set_line_width(&mut self, _: f32) {}
            fn draw_quad(&mut self, _: &QuadCmd) -> Result<(), GfxError> {
                Err(GfxError::ContextLost)
            }
        }

        let mut renderer = CommandRenderer::default().with_optimizer(PerformanceOptimizer::default());
        renderer.submit_batch([quad(0.0), quad(20.0)]);

        assert!(renderer.render(&mut Lost).is_none());
        assert_eq!(renderer.queue().pending_len(), 0);
        assert_eq!(renderer.last_stats().visible_commands, 2);
        assert_eq!(renderer.optimizer().map(PerformanceOptimizer::frame_count), Some(0));
    }

    #[test]
    fn panicking_backend_still_clears_queue() {
        struct Exploding;
        impl GraphicsContext for Exploding {
            fn set_fill_style(&mut self, _: Color) {}
            fn set_stroke_style(&mut self, _: Color) {}
            fn set_line_width(&mut self, _: f32) {}
            fn draw_quad(&mut self, _: &QuadCmd) -> Result<(), GfxError> {
                panic!("device exploded");
            }
        }

        let mut renderer = CommandRenderer::default();
        renderer.submit(quad(0.0));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(&mut Exploding)));
        assert!(outcome.is_err());
        assert_eq!(renderer.queue().pending_len(), 0);
        assert!(renderer.stats().is_zero());
    }

    #[test]
    fn viewport_is_adapted_to_canvas_rect() {
        let mut renderer = CommandRenderer::new(QueueConfig::default().with_cull_margin(0.0));
        renderer.set_viewport(Viewport::new(200.0, 100.0).with_origin(Vec2::new(50.0, 0.0)).with_zoom(2.0));
        assert_eq!(renderer.queue().viewport(), Some(Rect::new(50.0, 0.0, 100.0, 50.0)));

        renderer.set_viewport(Viewport::new(0.0, 0.0));
        assert_eq!(renderer.queue().viewport(), Some(Rect::new(50.0, 0.0, 100.0, 50.0)));
    }

    #[test]
    fn optimizer_sees_rendered_frames() {
        let mut renderer = CommandRenderer::default().with_optimizer(PerformanceOptimizer::default());
        for _ in 0..3 {
            renderer.submit(quad(0.0));
            renderer.render(&mut RecordingContext::new());
        }
        assert_eq!(renderer.optimizer().map(PerformanceOptimizer::frame_count), Some(3));
    }
}
