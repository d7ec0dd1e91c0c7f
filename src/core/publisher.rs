use crate::domain::model::Block;
use crate::domain::ports::BlockSink;

/// Fans completed blocks out to registered sinks.
///
/// Sinks are borrowed, not owned: whoever builds the pipeline keeps them, and
/// the `'a` lifetime keeps the publisher from outliving any of them.
#[derive(Default)]
pub struct Publisher<'a> {
    sinks: Vec<&'a mut dyn BlockSink>,
}

impl<'a> Publisher<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Sinks are notified in registration order. Registering the same sink
    /// twice is not possible while the first borrow is alive.
    pub fn register(&mut self, sink: &'a mut dyn BlockSink) {
        tracing::debug!("Registered sink: {}", sink.name());
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Hands `block` to every sink and returns how many of them failed.
    pub fn deliver(&mut self, block: &Block) -> usize {
        let mut failures = 0;

        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.on_block(block) {
                failures += 1;
                tracing::error!("❌ {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }

        failures
    }
}
