pub mod accumulator;
pub mod engine;
pub mod publisher;

pub use crate::domain::model::{Block, Command};
pub use crate::domain::ports::{BlockSink, Clock, ConfigProvider};
pub use crate::utils::error::Result;
