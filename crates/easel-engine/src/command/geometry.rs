//! Renderer-agnostic geometry produced by commands for buffer packing.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};

/// Interleaved vertex layout for upload: position (logical px) + texture coords.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BatchVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Triangle-list geometry of one command.
///
/// `vertices` and `uvs` always have the same length; `indices` index into both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchData {
    pub vertices: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
}

impl BatchData {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends an axis-aligned quad with uvs spanning `0..1`.
    pub(crate) fn push_quad(&mut self, rect: Rect) {
        let r = rect.normalized();
        let (min, max) = (r.min(), r.max());
        let base = self.base();
        self.vertices.extend_from_slice(&[
            [min.x, min.y],
            [max.x, min.y],
            [max.x, max.y],
            [min.x, max.y],
        ]);
        self.uvs.extend_from_slice(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Appends a triangle fan around `points[0]`, with uvs mapped planar over `bounds`.
    ///
    /// Fewer than three points produce nothing.
    pub(crate) fn push_fan(&mut self, points: &[Vec2], bounds: Rect) {
        if points.len() < 3 {
            return;
        }
        let base = self.base();
        for &p in points {
            self.vertices.push(p.to_array());
            self.uvs.push(planar_uv(p, bounds));
        }
        for i in 1..(points.len() as u32 - 1) {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    /// Appends `other`, rebasing its indices.
    pub(crate) fn extend(&mut self, other: &BatchData) {
        let base = self.base();
        self.vertices.extend_from_slice(&other.vertices);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Positions and uvs zipped into the upload layout.
    pub fn interleaved(&self) -> Vec<BatchVertex> {
        self.vertices
            .iter()
            .zip(&self.uvs)
            .map(|(&pos, &uv)| BatchVertex { pos, uv })
            .collect()
    }

    #[inline]
    fn base(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Raw bytes of an interleaved vertex slice, ready for a buffer write.
#[inline]
pub fn as_bytes(vertices: &[BatchVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

fn planar_uv(p: Vec2, bounds: Rect) -> [f32; 2] {
    let r = bounds.normalized();
    let u = if r.size.x > 0.0 { (p.x - r.origin.x) / r.size.x } else { 0.0 };
    let v = if r.size.y > 0.0 { (p.y - r.origin.y) / r.size.y } else { 0.0 };
    [u, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles() {
        let mut data = BatchData::new();
        data.push_quad(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.uvs[2], [1.0, 1.0]);
    }

    #[test]
    fn fan_skips_degenerate_input() {
        let mut data = BatchData::new();
        data.push_fan(&[Vec2::zero(), Vec2::new(1.0, 0.0)], Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(data.is_empty());
        assert_eq!(data.vertex_count(), 0);
    }

    #[test]
    fn extend_rebases_indices() {
        let mut a = BatchData::new();
        a.push_quad(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = a.clone();
        a.extend(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn interleaved_bytes_match_layout() {
        let mut data = BatchData::new();
        data.push_quad(Rect::new(0.0, 0.0, 1.0, 1.0));
        let verts = data.interleaved();
        assert_eq!(as_bytes(&verts).len(), 4 * std::mem::size_of::<BatchVertex>());
        assert_eq!(verts[1], BatchVertex { pos: [1.0, 0.0], uv: [1.0, 0.0] });
    }
}
