use crate::core::accumulator::BatchAccumulator;
use crate::core::publisher::Publisher;
use crate::domain::model::Block;
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Counters for one run over an input stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: usize,
    /// Every delivered block, empty ones included.
    pub blocks_delivered: usize,
    pub commands_delivered: usize,
    pub sink_failures: usize,
}

pub struct BulkEngine<'a, C: Clock> {
    accumulator: BatchAccumulator<C>,
    publisher: Publisher<'a>,
    summary: RunSummary,
}

impl<'a, C: Clock> BulkEngine<'a, C> {
    pub fn new(accumulator: BatchAccumulator<C>, publisher: Publisher<'a>) -> Self {
        Self {
            accumulator,
            publisher,
            summary: RunSummary::default(),
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Feeds one line; a block it completes is delivered before returning.
    pub fn process_line(&mut self, line: &str) {
        self.summary.lines_read += 1;
        if let Some(block) = self.accumulator.feed(line) {
            self.deliver(&block);
        }
    }

    /// Delivers the final block and returns the run's counters.
    pub fn finish(self) -> RunSummary {
        let BulkEngine {
            accumulator,
            mut publisher,
            mut summary,
        } = self;

        let block = accumulator.finish();
        Self::record(&mut summary, &mut publisher, &block);
        summary
    }

    /// Reads `reader` to its end, then performs the final flush.
    ///
    /// If reading fails, the commands gathered so far are still flushed
    /// before the error is returned.
    pub async fn run<R>(mut self, reader: R) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        tracing::debug!(
            "Reading commands (block size {}, {} sinks)",
            self.accumulator.block_size(),
            self.publisher.len()
        );

        let mut lines = reader.lines();
        let read_error = loop {
            match lines.next_line().await {
                Ok(Some(line)) => self.process_line(&line),
                Ok(None) => break None,
                Err(e) => break Some(e),
            }
        };

        let summary = self.finish();
        tracing::debug!(
            "Input exhausted: {} lines, {} blocks, {} commands",
            summary.lines_read,
            summary.blocks_delivered,
            summary.commands_delivered
        );

        match read_error {
            Some(e) => {
                tracing::error!("Input stopped after {} lines: {}", summary.lines_read, e);
                Err(e.into())
            }
            None => Ok(summary),
        }
    }

    fn deliver(&mut self, block: &Block) {
        Self::record(&mut self.summary, &mut self.publisher, block);
    }

    fn record(summary: &mut RunSummary, publisher: &mut Publisher<'a>, block: &Block) {
        tracing::debug!("Delivering block of {} commands", block.len());
        summary.blocks_delivered += 1;
        summary.commands_delivered += block.len();
        summary.sink_failures += publisher.deliver(block);
    }
}
