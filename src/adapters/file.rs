use crate::domain::model::{Block, BLOCK_SEPARATOR};
use crate::domain::ports::BlockSink;
use crate::utils::error::{BulkError, Result};
use chrono::{DateTime, Local, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes every non-empty block to its own `.log` file.
///
/// Files are named after the block's start time (`HHMMSS` followed by three
/// millisecond digits). When two blocks share a start time the later one gets
/// a `-N` suffix, so existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct FileSink {
    output_dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl FileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            last_path: None,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    fn create_unique(&self, stem: &str) -> io::Result<(PathBuf, File)> {
        let mut attempt: u32 = 0;
        loop {
            let name = if attempt == 0 {
                format!("{}.log", stem)
            } else {
                format!("{}-{}.log", stem, attempt)
            };
            let path = self.output_dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_block(&mut self, block: &Block) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let (path, mut file) = self.create_unique(&file_stem(&block.start_time))?;
        writeln!(file, "{}", block.render(BLOCK_SEPARATOR))?;
        file.flush()?;

        Ok(path)
    }
}

/// `HHMMSS` plus zero-padded milliseconds.
pub fn file_stem(start_time: &DateTime<Local>) -> String {
    let millis = start_time.nanosecond() / 1_000_000 % 1000;
    format!("{}{:03}", start_time.format("%H%M%S"), millis)
}

impl BlockSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn on_block(&mut self, block: &Block) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }

        match self.write_block(block) {
            Ok(path) => {
                tracing::debug!("Block of {} commands written to {}", block.len(), path.display());
                self.last_path = Some(path);
                Ok(())
            }
            Err(e) => Err(BulkError::SinkError {
                sink: self.name().to_string(),
                details: format!("{}: {}", self.output_dir.display(), e),
            }),
        }
    }
}
