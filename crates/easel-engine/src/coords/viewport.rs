use super::{Rect, Vec2};

/// Engine-side camera over the canvas, in logical pixels.
///
/// `origin` is the canvas position shown at the top-left corner of the window,
/// `width`/`height` are the window size and `zoom` scales canvas units to window units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub origin: Vec2,
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin: Vec2::zero(), width: 0.0, height: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { origin: Vec2::zero(), width, height, zoom: 1.0 }
    }

    #[inline]
    pub const fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub const fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.zoom > 0.0
            && self.zoom.is_finite()
            && self.origin.is_finite()
    }

    /// Canvas-space rectangle visible through this viewport.
    ///
    /// A non-positive or non-finite zoom is treated as `1.0`.
    #[inline]
    pub fn visible_rect(self) -> Rect {
        let zoom = if self.zoom > 0.0 && self.zoom.is_finite() { self.zoom } else { 1.0 };
        Rect::from_origin_size(self.origin, Vec2::new(self.width, self.height) / zoom)
    }
}
