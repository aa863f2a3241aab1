use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::{Rect, Vec2};

/// Polyline/polygon payload.
///
/// Fill geometry is a fan around the first point, which is exact for convex
/// outlines. Concave outlines need a real tessellator on the backend side, which
/// receives the full point list through `draw_path`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCmd {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl PathCmd {
    #[inline]
    pub fn new(points: Vec<Vec2>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Bounds of the control points; an empty path is a zero rect at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points.iter().copied()).unwrap_or_default()
    }

    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        out.push_fan(&self.points, self.bounds());
    }
}

impl RenderCommand {
    /// Creates a path command.
    #[inline]
    pub fn path(z: ZIndex, points: Vec<Vec2>, closed: bool, material: MaterialKey) -> Self {
        Self::new(Shape::Path(PathCmd::new(points, closed)))
            .with_z(z)
            .with_material(material)
    }
}
