use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::Rect;
use crate::paint::Color;

/// Region clear payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearCmd {
    pub region: Rect,
    pub color: Color,
}

impl ClearCmd {
    #[inline]
    pub fn new(region: Rect, color: Color) -> Self {
        Self { region, color }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.region.normalized()
    }

    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        out.push_quad(self.region);
    }
}

impl RenderCommand {
    /// Creates a clear command for `region`, drawn at `z` like any other command.
    #[inline]
    pub fn clear(z: ZIndex, region: Rect, color: Color) -> Self {
        Self::new(Shape::Clear(ClearCmd::new(region, color)))
            .with_z(z)
            .with_material(MaterialKey::new())
    }
}
