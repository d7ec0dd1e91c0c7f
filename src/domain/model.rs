use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One input line, carried through untouched.
pub type Command = String;

/// Separator used by the reference sinks when rendering a block.
pub const BLOCK_SEPARATOR: &str = ", ";

/// A completed batch of commands.
///
/// `start_time` is the moment the accumulation cycle that produced this block
/// began, not the moment it was delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub commands: Vec<Command>,
    pub start_time: DateTime<Local>,
}

impl Block {
    pub fn new(commands: Vec<Command>, start_time: DateTime<Local>) -> Self {
        Self {
            commands,
            start_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn render(&self, separator: &str) -> String {
        self.commands.join(separator)
    }
}
