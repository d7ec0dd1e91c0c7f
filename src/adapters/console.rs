use crate::domain::model::{Block, BLOCK_SEPARATOR};
use crate::domain::ports::BlockSink;
use crate::utils::error::{BulkError, Result};
use std::io::{self, Stdout, Write};

pub const DEFAULT_LABEL: &str = "bulk: ";

/// Prints each block as one labelled line.
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    writer: W,
    label: String,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(label: impl Into<String>) -> Self {
        Self::new(io::stdout(), label)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label: label.into(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    fn write_line(&mut self, block: &Block) -> io::Result<()> {
        writeln!(self.writer, "{}{}", self.label, block.render(BLOCK_SEPARATOR))?;
        self.writer.flush()
    }
}

impl<W: Write> BlockSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn on_block(&mut self, block: &Block) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }

        self.write_line(block).map_err(|e| BulkError::SinkError {
            sink: self.name().to_string(),
            details: e.to_string(),
        })
    }
}
