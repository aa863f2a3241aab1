use std::fmt;

/// Command type tag. Part of every batch key: commands of different kinds never
/// share a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CommandKind {
    Quad,
    Triangle,
    Circle,
    Path,
    Text,
    Composite,
    Clear,
}

impl CommandKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandKind::Quad => "quad",
            CommandKind::Triangle => "triangle",
            CommandKind::Circle => "circle",
            CommandKind::Path => "path",
            CommandKind::Text => "text",
            CommandKind::Composite => "composite",
            CommandKind::Clear => "clear",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
