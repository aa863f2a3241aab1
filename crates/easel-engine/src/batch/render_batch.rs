use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::command::{CommandKind, MaterialKey, RenderCommand};
use crate::coords::Rect;
use crate::gfx::{GfxError, GraphicsContext};

use super::{BatchKey, BatchStats};

/// Default hard capacity of a batch, in commands.
pub const DEFAULT_BATCH_CAPACITY: usize = 1000;

/// Generated batch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub u64);

impl BatchId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Ordered commands sharing one kind and one material key.
///
/// Invariant: every member's kind and material key equal the batch's.
/// Insertion order is execution order.
#[derive(Debug)]
pub struct RenderBatch {
    id: BatchId,
    key: BatchKey,
    commands: Vec<Rc<RenderCommand>>,
    capacity: usize,

    /// Union of member bounds; `None` until computed after the last add.
    bounds: Option<Rect>,
}

impl RenderBatch {
    pub fn new(kind: CommandKind, material: MaterialKey) -> Self {
        Self::with_capacity(kind, material, DEFAULT_BATCH_CAPACITY)
    }

    pub fn with_capacity(kind: CommandKind, material: MaterialKey, capacity: usize) -> Self {
        Self {
            id: BatchId::next(),
            key: BatchKey { kind, material },
            commands: Vec::new(),
            capacity,
            bounds: None,
        }
    }

    /// Opens an empty batch keyed on `command`'s kind and material.
    pub(crate) fn for_command(command: &RenderCommand, capacity: usize) -> Self {
        Self::with_capacity(command.kind(), *command.material(), capacity)
    }

    #[inline]
    pub fn id(&self) -> BatchId {
        self.id
    }

    #[inline]
    pub fn key(&self) -> &BatchKey {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> CommandKind {
        self.key.kind
    }

    #[inline]
    pub fn material(&self) -> &MaterialKey {
        &self.key.material
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn commands(&self) -> &[Rc<RenderCommand>] {
        &self.commands
    }

    #[inline]
    pub fn can_add_more(&self) -> bool {
        self.commands.len() < self.capacity
    }

    /// Whether `command` could join this batch, capacity aside.
    #[inline]
    pub fn accepts(&self, command: &RenderCommand) -> bool {
        command.kind() == self.key.kind && *command.material() == self.key.material
    }

    /// Appends `command` if there is room and it matches the batch's kind and
    /// material. Returns `false` and leaves the batch untouched otherwise.
    pub fn add_command(&mut self, command: &Rc<RenderCommand>) -> bool {
        if !self.can_add_more() || !self.accepts(command) {
            return false;
        }
        self.commands.push(Rc::clone(command));
        self.bounds = None;
        true
    }

    /// Union of member bounds, recomputed on first access after a change.
    /// `None` for an empty batch.
    pub fn bounds(&mut self) -> Option<Rect> {
        if self.bounds.is_none() {
            self.bounds = self.commands.iter().map(|c| c.bounds()).reduce(Rect::union);
        }
        self.bounds
    }

    /// Applies the batch material once, then executes members in order.
    pub fn execute(&self, ctx: &mut dyn GraphicsContext) -> Result<(), GfxError> {
        self.key.material.apply(ctx);
        for command in &self.commands {
            command.execute(ctx)?;
        }
        Ok(())
    }

    #[inline]
    pub fn stats(&self) -> BatchStats {
        BatchStats::for_count(self.commands.len())
    }

    /// Total vertices of every member's geometry.
    pub fn vertex_count(&self) -> usize {
        self.commands.iter().map(|c| c.batch_data().vertex_count()).sum()
    }
}
