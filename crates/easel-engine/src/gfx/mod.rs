//! Graphics-context abstraction consumed by the batching core.
//!
//! The concrete GPU backend lives outside this crate. Commands and batches only
//! talk to [`GraphicsContext`]; [`RecordingContext`] is a headless implementation
//! that records every call, used by tests and tooling.

mod context;
mod error;
mod recording;
mod state;

pub use context::GraphicsContext;
pub use error::GfxError;
pub use recording::{GfxCall, RecordingContext};
pub use state::{BlendMode, ShaderId, TextureId};
