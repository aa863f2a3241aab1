use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::{Rect, Vec2};

/// Single triangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleCmd {
    pub points: [Vec2; 3],
}

impl TriangleCmd {
    #[inline]
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { points: [a, b, c] }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points).unwrap_or_default()
    }

    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        out.push_fan(&self.points, self.bounds());
    }
}

impl RenderCommand {
    /// Creates a triangle command.
    #[inline]
    pub fn triangle(z: ZIndex, points: [Vec2; 3], material: MaterialKey) -> Self {
        let [a, b, c] = points;
        Self::new(Shape::Triangle(TriangleCmd::new(a, b, c)))
            .with_z(z)
            .with_material(material)
    }
}
