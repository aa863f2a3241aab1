use std::cell::OnceCell;

use crate::coords::Rect;
use crate::gfx::{GfxError, GraphicsContext};

use super::shapes::{CircleCmd, ClearCmd, CompositeCmd, PathCmd, QuadCmd, TextCmd, TriangleCmd};
use super::{BatchData, CommandId, CommandKind, MaterialKey, ZIndex};

/// Kind-specific payload of a render command.
///
/// Extending the command set:
/// - add a payload module under `command::shapes::*`
/// - add a variant here and a `CommandKind` tag
/// - add an entry point to `gfx::GraphicsContext`
#[derive(Debug, Clone)]
pub enum Shape {
    Quad(QuadCmd),
    Triangle(TriangleCmd),
    Circle(CircleCmd),
    Path(PathCmd),
    Text(TextCmd),
    Composite(CompositeCmd),
    Clear(ClearCmd),
}

impl Shape {
    pub fn kind(&self) -> CommandKind {
        match self {
            Shape::Quad(_) => CommandKind::Quad,
            Shape::Triangle(_) => CommandKind::Triangle,
            Shape::Circle(_) => CommandKind::Circle,
            Shape::Path(_) => CommandKind::Path,
            Shape::Text(_) => CommandKind::Text,
            Shape::Composite(_) => CommandKind::Composite,
            Shape::Clear(_) => CommandKind::Clear,
        }
    }

    /// Geometry bounds, without any stroke overhang.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Quad(c) => c.bounds(),
            Shape::Triangle(c) => c.bounds(),
            Shape::Circle(c) => c.bounds(),
            Shape::Path(c) => c.bounds(),
            Shape::Text(c) => c.bounds(),
            Shape::Composite(c) => c.bounds(),
            Shape::Clear(c) => c.bounds(),
        }
    }

    fn tessellate(&self, out: &mut BatchData) {
        match self {
            Shape::Quad(c) => c.tessellate(out),
            Shape::Triangle(c) => c.tessellate(out),
            Shape::Circle(c) => c.tessellate(out),
            Shape::Path(c) => c.tessellate(out),
            Shape::Text(c) => c.tessellate(out),
            Shape::Composite(c) => c.tessellate(out),
            Shape::Clear(c) => c.tessellate(out),
        }
    }
}

/// One drawable for one frame.
///
/// Immutable once submitted: the queue and its batches share commands through
/// `Rc`. Geometry is generated on first request and cached until [`dispose`].
///
/// [`dispose`]: RenderCommand::dispose
#[derive(Debug, Clone)]
pub struct RenderCommand {
    id: CommandId,
    z: ZIndex,
    material: MaterialKey,
    shape: Shape,
    geometry: OnceCell<BatchData>,
    disposed: bool,
}

impl RenderCommand {
    /// Creates a command with a fresh id, z = 0 and an empty material key.
    pub fn new(shape: Shape) -> Self {
        Self {
            id: CommandId::next(),
            z: ZIndex::default(),
            material: MaterialKey::new(),
            shape,
            geometry: OnceCell::new(),
            disposed: false,
        }
    }

    #[inline]
    pub fn with_id(mut self, id: CommandId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn with_z(mut self, z: impl Into<ZIndex>) -> Self {
        self.z = z.into();
        self
    }

    #[inline]
    pub fn with_material(mut self, material: MaterialKey) -> Self {
        self.material = material;
        self
    }

    #[inline]
    pub fn id(&self) -> CommandId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> CommandKind {
        self.shape.kind()
    }

    #[inline]
    pub fn z_index(&self) -> ZIndex {
        self.z
    }

    #[inline]
    pub fn material(&self) -> &MaterialKey {
        &self.material
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Visual bounds: geometry bounds grown by the stroke overhang.
    pub fn bounds(&self) -> Rect {
        let bounds = self.shape.bounds();
        let overhang = self.material.stroke_overhang();
        if overhang > 0.0 { bounds.inflate(overhang) } else { bounds }
    }

    /// Inclusive overlap with `viewport`; touching edges count as visible.
    #[inline]
    pub fn is_visible(&self, viewport: Rect) -> bool {
        self.bounds().overlaps(viewport)
    }

    /// Same kind and structurally equal material key.
    #[inline]
    pub fn can_batch_with(&self, other: &RenderCommand) -> bool {
        self.kind() == other.kind() && self.material == other.material
    }

    /// Triangle-list geometry for buffer packing. Computed once per command.
    pub fn batch_data(&self) -> &BatchData {
        self.geometry.get_or_init(|| {
            let mut data = BatchData::new();
            self.shape.tessellate(&mut data);
            data
        })
    }

    /// Issues this command's draw against `ctx` using whatever state is current.
    ///
    /// Composite children apply their own material before drawing; the composite's
    /// material is restored afterwards so later batch members are unaffected.
    pub fn execute(&self, ctx: &mut dyn GraphicsContext) -> Result<(), GfxError> {
        match &self.shape {
            Shape::Quad(c) => ctx.draw_quad(c),
            Shape::Triangle(c) => ctx.draw_triangle(c),
            Shape::Circle(c) => ctx.draw_circle(c),
            Shape::Path(c) => ctx.draw_path(c),
            Shape::Text(c) => ctx.draw_text(c),
            Shape::Clear(c) => ctx.clear_rect(c),
            Shape::Composite(c) => {
                for child in &c.children {
                    child.material.apply(ctx);
                    child.execute(ctx)?;
                }
                self.material.apply(ctx);
                Ok(())
            }
        }
    }

    /// Drops cached geometry. Idempotent.
    pub fn dispose(&mut self) {
        self.geometry.take();
        if let Shape::Composite(c) = &mut self.shape {
            c.children.iter_mut().for_each(RenderCommand::dispose);
        }
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::gfx::{GfxCall, RecordingContext, TextureId};
    use crate::paint::Color;

    fn quad_at(x: f32, y: f32) -> RenderCommand {
        RenderCommand::solid_quad(ZIndex(0), Rect::new(x, y, 10.0, 10.0), Color::white())
    }

    // ── bounds / visibility ───────────────────────────────────────────────

    #[test]
    fn stroke_grows_bounds() {
        let cmd = RenderCommand::quad(
            ZIndex(0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            MaterialKey::new().with_stroke(Color::black(), 4.0),
        );
        assert_eq!(cmd.bounds(), Rect::new(-2.0, -2.0, 14.0, 14.0));
    }

    #[test]
    fn visible_when_touching_viewport_edge() {
        let viewport = Rect::new(10.0, 0.0, 100.0, 100.0);
        assert!(quad_at(0.0, 0.0).is_visible(viewport));
        assert!(!quad_at(-0.5, 0.0).is_visible(viewport));
    }

    #[test]
    fn zero_area_command_on_boundary_is_visible() {
        let cmd = RenderCommand::quad(ZIndex(0), Rect::new(100.0, 50.0, 0.0, 0.0), MaterialKey::new());
        assert!(cmd.is_visible(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    // ── can_batch_with ────────────────────────────────────────────────────

    #[test]
    fn batchable_requires_kind_and_material() {
        let a = quad_at(0.0, 0.0);
        let b = quad_at(50.0, 50.0);
        let circle = RenderCommand::solid_circle(ZIndex(0), Vec2::zero(), 5.0, Color::white());
        let textured = quad_at(0.0, 0.0).with_material(MaterialKey::solid(Color::white()).with_texture(TextureId(1)));

        assert!(a.can_batch_with(&b));
        assert!(!a.can_batch_with(&circle));
        assert!(!a.can_batch_with(&textured));
    }

    // ── batch_data / dispose ──────────────────────────────────────────────

    #[test]
    fn batch_data_is_stable() {
        let cmd = quad_at(1.0, 2.0);
        let first = cmd.batch_data().clone();
        assert_eq!(cmd.batch_data(), &first);
        assert_eq!(first.vertices[0], [1.0, 2.0]);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut cmd = quad_at(0.0, 0.0);
        let _ = cmd.batch_data();
        cmd.dispose();
        cmd.dispose();
        assert!(cmd.is_disposed());
        assert_eq!(cmd.batch_data().vertex_count(), 4);
    }

    // ── execute ───────────────────────────────────────────────────────────

    #[test]
    fn execute_dispatches_by_kind() {
        let mut ctx = RecordingContext::new();
        let circle = RenderCommand::solid_circle(ZIndex(0), Vec2::new(5.0, 5.0), 5.0, Color::white());
        circle.execute(&mut ctx).unwrap();
        assert_eq!(
            ctx.calls(),
            &[GfxCall::Draw { kind: CommandKind::Circle, bounds: Rect::new(0.0, 0.0, 10.0, 10.0) }]
        );
    }

    #[test]
    fn composite_restores_own_material() {
        let red = Color::from_hex(0xFF0000FF);
        let blue = Color::from_hex(0x0000FFFF);
        let composite = RenderCommand::composite(
            ZIndex(0),
            vec![RenderCommand::solid_quad(ZIndex(0), Rect::new(0.0, 0.0, 1.0, 1.0), red)],
            MaterialKey::solid(blue),
        );

        let mut ctx = RecordingContext::new();
        composite.execute(&mut ctx).unwrap();

        assert_eq!(ctx.calls().first(), Some(&GfxCall::FillStyle(red)));
        assert_eq!(ctx.calls().last(), Some(&GfxCall::FillStyle(blue)));
        assert_eq!(composite.bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(composite.batch_data().vertex_count(), 4);
    }

    #[test]
    fn unsupported_kind_surfaces_error() {
        struct QuadsOnly;
        impl GraphicsContext for QuadsOnly {
            fn set_fill_style(&mut self, _: Color) {}
            fn set_stroke_style(&mut self, _: Color) {}
            fn set_line_width(&mut self, _: f32) {}
            fn draw_quad(&mut self, _: &QuadCmd) -> Result<(), GfxError> {
                Ok(())
            }
        }

        let path = RenderCommand::path(ZIndex(0), vec![Vec2::zero()], false, MaterialKey::new());
        assert_eq!(path.execute(&mut QuadsOnly), Err(GfxError::Unsupported(CommandKind::Path)));
    }
}
