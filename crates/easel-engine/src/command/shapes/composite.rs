use crate::command::{BatchData, MaterialKey, RenderCommand, Shape, ZIndex};
use crate::coords::Rect;

/// Group of commands drawn as one unit.
///
/// Children keep their own materials and execute in order; the composite's own
/// material key is what batching sees.
#[derive(Debug, Clone)]
pub struct CompositeCmd {
    pub children: Vec<RenderCommand>,
}

impl CompositeCmd {
    #[inline]
    pub fn new(children: Vec<RenderCommand>) -> Self {
        Self { children }
    }

    /// Union of child bounds; an empty composite is a zero rect at the origin.
    pub fn bounds(&self) -> Rect {
        self.children
            .iter()
            .map(RenderCommand::bounds)
            .reduce(Rect::union)
            .unwrap_or_default()
    }

    pub(crate) fn tessellate(&self, out: &mut BatchData) {
        for child in &self.children {
            out.extend(child.batch_data());
        }
    }
}

impl RenderCommand {
    /// Creates a composite command from already-built children.
    #[inline]
    pub fn composite(z: ZIndex, children: Vec<RenderCommand>, material: MaterialKey) -> Self {
        Self::new(Shape::Composite(CompositeCmd::new(children)))
            .with_z(z)
            .with_material(material)
    }
}
