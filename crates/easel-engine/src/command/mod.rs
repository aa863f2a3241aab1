//! Render command model.
//!
//! Responsibilities:
//! - renderer-agnostic draw commands, one payload type per kind (`command::shapes`)
//! - the material key that decides batch compatibility
//! - geometry generation for buffer packing

mod geometry;
mod id;
mod kind;
mod material;
mod render_command;
mod z_index;

pub mod shapes;

pub use geometry::{as_bytes, BatchData, BatchVertex};
pub use id::CommandId;
pub use kind::CommandKind;
pub use material::MaterialKey;
pub use render_command::{RenderCommand, Shape};
pub use z_index::ZIndex;
