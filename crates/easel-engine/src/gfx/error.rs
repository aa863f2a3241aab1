use crate::command::CommandKind;

/// Failure reported by a graphics context while executing commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GfxError {
    /// Backend-specific failure (buffer upload, pipeline creation, ...).
    #[error("graphics backend error: {0}")]
    Backend(String),

    /// The context has no entry point for this command kind.
    #[error("{0} commands are not supported by this graphics context")]
    Unsupported(CommandKind),

    /// The device or surface went away mid-frame.
    #[error("graphics context lost")]
    ContextLost,
}

impl GfxError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
