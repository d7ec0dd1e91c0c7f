pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleSink, FileSink, SystemClock};
pub use crate::core::{
    accumulator::BatchAccumulator,
    engine::{BulkEngine, RunSummary},
    publisher::Publisher,
};
pub use domain::model::{Block, Command};
pub use domain::ports::{BlockSink, Clock, ConfigProvider};
pub use utils::error::{BulkError, Result};
