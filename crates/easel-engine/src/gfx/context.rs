use crate::command::CommandKind;
use crate::command::shapes::{CircleCmd, ClearCmd, PathCmd, QuadCmd, TextCmd, TriangleCmd};
use crate::paint::Color;

use super::{BlendMode, GfxError, ShaderId, TextureId};

/// Abstract drawing target a render batch executes against.
///
/// Style setters mutate the context's state machine; draw entry points use
/// whatever state is current. Batches set state once and then draw many
/// commands, so implementations should not reset state between draws.
///
/// Only quads are mandatory. The remaining entry points default to
/// [`GfxError::Unsupported`], and the optional state setters default to no-ops
/// for backends that have no notion of them.
pub trait GraphicsContext {
    fn set_fill_style(&mut self, color: Color);

    fn set_stroke_style(&mut self, color: Color);

    fn set_line_width(&mut self, width: f32);

    fn set_blend_mode(&mut self, mode: BlendMode) {
        let _ = mode;
    }

    fn bind_texture(&mut self, texture: TextureId) {
        let _ = texture;
    }

    fn use_shader(&mut self, shader: ShaderId) {
        let _ = shader;
    }

    fn draw_quad(&mut self, quad: &QuadCmd) -> Result<(), GfxError>;

    fn draw_triangle(&mut self, triangle: &TriangleCmd) -> Result<(), GfxError> {
        let _ = triangle;
        Err(GfxError::Unsupported(CommandKind::Triangle))
    }

    fn draw_circle(&mut self, circle: &CircleCmd) -> Result<(), GfxError> {
        let _ = circle;
        Err(GfxError::Unsupported(CommandKind::Circle))
    }

    fn draw_path(&mut self, path: &PathCmd) -> Result<(), GfxError> {
        let _ = path;
        Err(GfxError::Unsupported(CommandKind::Path))
    }

    fn draw_text(&mut self, text: &TextCmd) -> Result<(), GfxError> {
        let _ = text;
        Err(GfxError::Unsupported(CommandKind::Text))
    }

    fn clear_rect(&mut self, clear: &ClearCmd) -> Result<(), GfxError> {
        let _ = clear;
        Err(GfxError::Unsupported(CommandKind::Clear))
    }
}
