use crate::command::{CommandKind, MaterialKey, RenderCommand};

/// Grouping key of the queue's open-batch index.
///
/// Commands map to the same key exactly when they can share a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BatchKey {
    pub kind: CommandKind,
    pub material: MaterialKey,
}

impl BatchKey {
    #[inline]
    pub fn of(command: &RenderCommand) -> Self {
        Self { kind: command.kind(), material: *command.material() }
    }
}
