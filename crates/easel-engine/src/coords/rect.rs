use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Smallest rectangle containing every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self::from_origin_size(min, max - min))
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    /// Far corner. An infinite extent reaches `+inf` even from an infinite origin.
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(far_edge(self.origin.x, self.size.x), far_edge(self.origin.y, self.size.y))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// True when any component is NaN. Infinite components are valid extents.
    #[inline]
    pub fn is_nan(self) -> bool {
        self.origin.x.is_nan() || self.origin.y.is_nan() || self.size.x.is_nan() || self.size.y.is_nan()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Grows the rectangle by `margin` on every side. Negative margins shrink it,
    /// clamping width/height at zero.
    #[inline]
    pub fn inflate(self, margin: f32) -> Self {
        let r = self.normalized();
        Rect::new(
            r.origin.x - margin,
            r.origin.y - margin,
            (r.size.x + 2.0 * margin).max(0.0),
            (r.size.y + 2.0 * margin).max(0.0),
        )
    }

    /// Inclusive overlap test: rectangles sharing only an edge or a corner overlap.
    ///
    /// Returns `false` only when the two are strictly disjoint on some axis, so a
    /// zero-area rect lying on the boundary of `other` still overlaps it.
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        let (a_min, a_max) = (a.min(), a.max());
        let (b_min, b_max) = (b.min(), b.max());

        a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
    }

    /// Smallest rectangle containing both.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();

        let min = a.min().min(b.min());
        let max = a.max().max(b.max());

        Rect::from_origin_size(min, max - min)
    }
}

#[inline]
fn far_edge(origin: f32, extent: f32) -> f32 {
    if extent == f32::INFINITY { f32::INFINITY } else { origin + extent }
}
