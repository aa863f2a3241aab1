//! Per-kind command payloads.
//!
//! Each module owns its payload type, its bounds and geometry, and the matching
//! `RenderCommand` constructors.

pub(crate) mod circle;
pub(crate) mod clear;
pub(crate) mod composite;
pub(crate) mod path;
pub(crate) mod quad;
pub(crate) mod text;
pub(crate) mod triangle;

pub use circle::CircleCmd;
pub use clear::ClearCmd;
pub use composite::CompositeCmd;
pub use path::PathCmd;
pub use quad::QuadCmd;
pub use text::TextCmd;
pub use triangle::TriangleCmd;
