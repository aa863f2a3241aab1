use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::Rect;
use crate::paint::Color;

/// Axis-aligned rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCmd {
    pub rect: Rect,
}

impl QuadCmd {
    #[inline]
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.rect.normalized()
    }

    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        out.push_quad(self.rect);
    }
}

impl RenderCommand {
    /// Creates a quad command.
    #[inline]
    pub fn quad(z: ZIndex, rect: Rect, material: MaterialKey) -> Self {
        Self::new(Shape::Quad(QuadCmd::new(rect)))
            .with_z(z)
            .with_material(material)
    }

    /// Creates a solid-filled quad command.
    #[inline]
    pub fn solid_quad(z: ZIndex, rect: Rect, color: Color) -> Self {
        Self::quad(z, rect, MaterialKey::solid(color))
    }
}
