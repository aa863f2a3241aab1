use std::f32::consts::TAU;

use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::{Rect, Vec2};
use crate::paint::Color;

const MIN_SEGMENTS: u32 = 12;
const MAX_SEGMENTS: u32 = 64;

/// Circle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
}

impl CircleCmd {
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        let r = self.radius.abs();
        Rect::new(self.center.x - r, self.center.y - r, 2.0 * r, 2.0 * r)
    }

    /// Rim segment count: one per two logical pixels of radius, within `12..=64`.
    #[inline]
    pub fn segments(&self) -> u32 {
        // NaN saturates to 0 and lands on the minimum.
        ((self.radius.abs() * 0.5).ceil() as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
    }

    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        let r = self.radius.abs();
        let n = self.segments();

        // Center first, rim after; the fan closes back on the first rim vertex.
        let mut points = Vec::with_capacity(n as usize + 2);
        points.push(self.center);
        for i in 0..=n {
            let angle = TAU * i as f32 / n as f32;
            points.push(self.center + Vec2::from_polar(r, angle));
        }
        out.push_fan(&points, self.bounds());
    }
}

impl RenderCommand {
    /// Creates a circle command.
    #[inline]
    pub fn circle(z: ZIndex, center: Vec2, radius: f32, material: MaterialKey) -> Self {
        Self::new(Shape::Circle(CircleCmd::new(center, radius)))
            .with_z(z)
            .with_material(material)
    }

    /// Creates a solid-filled circle command.
    #[inline]
    pub fn solid_circle(z: ZIndex, center: Vec2, radius: f32, color: Color) -> Self {
        Self::circle(z, center, radius, MaterialKey::solid(color))
    }
}
