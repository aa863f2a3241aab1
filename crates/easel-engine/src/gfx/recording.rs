use crate::command::CommandKind;
use crate::command::shapes::{CircleCmd, ClearCmd, PathCmd, QuadCmd, TextCmd, TriangleCmd};
use crate::coords::Rect;
use crate::paint::Color;

use super::{BlendMode, GfxError, GraphicsContext, ShaderId, TextureId};

/// One call observed by a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum GfxCall {
    FillStyle(Color),
    StrokeStyle(Color),
    LineWidth(f32),
    Blend(BlendMode),
    Texture(TextureId),
    Shader(ShaderId),
    /// A draw entry point, with the payload's own bounds (stroke not included).
    Draw { kind: CommandKind, bounds: Rect },
}

/// Headless graphics context that records every call in order.
///
/// Supports every command kind. A failure can be injected on the n-th draw
/// to exercise backend error paths.
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<GfxCall>,
    draws: usize,
    fail_on_draw: Option<usize>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the draw with zero-based index `n` fail with [`GfxError::Backend`].
    pub fn failing_on_draw(n: usize) -> Self {
        Self { fail_on_draw: Some(n), ..Self::default() }
    }

    pub fn calls(&self) -> &[GfxCall] {
        &self.calls
    }

    /// Draw calls only, as `(kind, bounds)` pairs.
    pub fn draws(&self) -> impl Iterator<Item = (CommandKind, Rect)> + '_ {
        self.calls.iter().filter_map(|c| match c {
            GfxCall::Draw { kind, bounds } => Some((*kind, *bounds)),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Number of recorded calls that changed pipeline state rather than drawing.
    pub fn state_change_count(&self) -> usize {
        self.calls.len() - self.draws().count()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
        self.draws = 0;
    }

    fn draw(&mut self, kind: CommandKind, bounds: Rect) -> Result<(), GfxError> {
        let index = self.draws;
        self.draws += 1;
        if self.fail_on_draw == Some(index) {
            return Err(GfxError::backend(format!("injected failure on draw {index}")));
        }
        self.calls.push(GfxCall::Draw { kind, bounds });
        Ok(())
    }
}

impl GraphicsContext for RecordingContext {
    fn set_fill_style(&mut self, color: Color) {
        self.calls.push(GfxCall::FillStyle(color));
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.calls.push(GfxCall::StrokeStyle(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.calls.push(GfxCall::LineWidth(width));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.calls.push(GfxCall::Blend(mode));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.calls.push(GfxCall::Texture(texture));
    }

    fn use_shader(&mut self, shader: ShaderId) {
        self.calls.push(GfxCall::Shader(shader));
    }

    fn draw_quad(&mut self, quad: &QuadCmd) -> Result<(), GfxError> {
        self.draw(CommandKind::Quad, quad.bounds())
    }

    fn draw_triangle(&mut self, triangle: &TriangleCmd) -> Result<(), GfxError> {
        self.draw(CommandKind::Triangle, triangle.bounds())
    }

    fn draw_circle(&mut self, circle: &CircleCmd) -> Result<(), GfxError> {
        self.draw(CommandKind::Circle, circle.bounds())
    }

    fn draw_path(&mut self, path: &PathCmd) -> Result<(), GfxError> {
        self.draw(CommandKind::Path, path.bounds())
    }

    fn draw_text(&mut self, text: &TextCmd) -> Result<(), GfxError> {
        self.draw(CommandKind::Text, text.bounds())
    }

    fn clear_rect(&mut self, clear: &ClearCmd) -> Result<(), GfxError> {
        self.draw(CommandKind::Clear, clear.bounds())
    }
}
