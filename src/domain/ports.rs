use crate::domain::model::Block;
use crate::utils::error::Result;
use chrono::{DateTime, Local};

/// Receiver of completed blocks.
///
/// Implementations must treat an empty block as a no-op. A returned error is
/// reported by the publisher and never stops delivery to other sinks.
pub trait BlockSink {
    fn name(&self) -> &str;
    fn on_block(&mut self, block: &Block) -> Result<()>;
}

/// Source of block start times.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub trait ConfigProvider {
    fn block_size(&self) -> usize;
    fn output_dir(&self) -> &str;
    fn console_label(&self) -> &str;
    fn console_enabled(&self) -> bool;
    fn file_enabled(&self) -> bool;
}
