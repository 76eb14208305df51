//! Recorded command history.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded command. Arguments are stored as given and never replayed
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub name: String,
    pub arguments: Value,
}

impl CommandRecord {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Command list with an undo position.
///
/// Commands before `current` are applied; the rest can be redone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandHistory {
    pub commands: Vec<CommandRecord>,
    pub current: usize,
}

impl CommandHistory {
    /// Record a new command, discarding any redo tail.
    pub fn push(&mut self, record: CommandRecord) {
        self.commands.truncate(self.current);
        self.commands.push(record);
        self.current = self.commands.len();
    }

    pub fn applied(&self) -> &[CommandRecord] {
        &self.commands[..self.current.min(self.commands.len())]
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
