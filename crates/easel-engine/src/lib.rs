//! easel engine crate.
//!
//! Render-command batching core of the easel canvas renderer: producers submit
//! commands, and once per frame the queue culls, sorts, batches and executes
//! them against an abstract graphics context.

pub mod coords;
pub mod paint;
pub mod logging;

pub mod gfx;
pub mod command;
pub mod batch;
pub mod queue;
pub mod renderer;
pub mod optimizer;

pub use batch::{BatchStats, RenderBatch};
pub use command::{CommandKind, MaterialKey, RenderCommand, ZIndex};
pub use gfx::{GfxError, GraphicsContext};
pub use queue::{FrameStats, QueueConfig, QueueStats, RenderQueue};
pub use renderer::CommandRenderer;
