use std::hash::{Hash, Hasher};

use crate::gfx::{BlendMode, GraphicsContext, ShaderId, TextureId};
use crate::paint::Color;

/// GPU state a command needs: the compatibility key for batching.
///
/// Two keys are compatible only when every field is equal, including both being
/// absent; `None` is not a wildcard. Float fields compare by their bits, which keeps
/// `Eq` reflexive and consistent with `Hash`.
#[derive(Debug, Copy, Clone, Default)]
pub struct MaterialKey {
    pub texture: Option<TextureId>,
    pub shader: Option<ShaderId>,
    pub blend: Option<BlendMode>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: Option<f32>,
}

type StructuralKey = (
    Option<TextureId>,
    Option<ShaderId>,
    Option<BlendMode>,
    Option<[u32; 4]>,
    Option<[u32; 4]>,
    Option<u32>,
);

impl MaterialKey {
    #[inline]
    pub const fn new() -> Self {
        Self {
            texture: None,
            shader: None,
            blend: None,
            fill: None,
            stroke: None,
            line_width: None,
        }
    }

    #[inline]
    pub fn solid(fill: Color) -> Self {
        Self::new().with_fill(fill)
    }

    #[inline]
    pub const fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    #[inline]
    pub const fn with_shader(mut self, shader: ShaderId) -> Self {
        self.shader = Some(shader);
        self
    }

    #[inline]
    pub const fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = Some(blend);
        self
    }

    #[inline]
    pub const fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    #[inline]
    pub const fn with_stroke(mut self, stroke: Color, line_width: f32) -> Self {
        self.stroke = Some(stroke);
        self.line_width = Some(line_width);
        self
    }

    /// Same as `==`; spelled out for call sites that read as a compatibility check.
    #[inline]
    pub fn is_compatible(&self, other: &MaterialKey) -> bool {
        self == other
    }

    /// Half the visual stroke width that extends past the geometry, or `0.0` when
    /// the material does not stroke.
    #[inline]
    pub fn stroke_overhang(&self) -> f32 {
        match self.stroke {
            Some(_) => self.line_width.unwrap_or(1.0).max(0.0) * 0.5,
            None => 0.0,
        }
    }

    /// Pushes every populated field into the context's state machine.
    pub fn apply(&self, ctx: &mut dyn GraphicsContext) {
        if let Some(shader) = self.shader {
            ctx.use_shader(shader);
        }
        if let Some(texture) = self.texture {
            ctx.bind_texture(texture);
        }
        if let Some(blend) = self.blend {
            ctx.set_blend_mode(blend);
        }
        if let Some(fill) = self.fill {
            ctx.set_fill_style(fill);
        }
        if let Some(stroke) = self.stroke {
            ctx.set_stroke_style(stroke);
        }
        if let Some(width) = self.line_width {
            ctx.set_line_width(width);
        }
    }

    fn structural(&self) -> StructuralKey {
        (
            self.texture,
            self.shader,
            self.blend,
            self.fill.map(Color::to_bits),
            self.stroke.map(Color::to_bits),
            self.line_width.map(f32::to_bits),
        )
    }
}

impl PartialEq for MaterialKey {
    fn eq(&self, other: &Self) -> bool {
        self.structural() == other.structural()
    }
}

impl Eq for MaterialKey {}

impl Hash for MaterialKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.structural().hash(state);
    }
}
