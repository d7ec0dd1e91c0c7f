use crate::adapters::clock::SystemClock;
use crate::domain::model::{Block, Command};
use crate::domain::ports::Clock;
use chrono::{DateTime, Local};

const OPEN_MARKER: char = '{';
const CLOSE_MARKER: char = '}';

/// Turns a stream of lines into blocks.
///
/// Each line is classified by the first matching rule:
///
/// 1. an empty line flushes; it never becomes a command and leaves `depth`
///    untouched, so a dynamic block is cut but stays open for brace counting
/// 2. a line containing `{` opens a dynamic block; the outermost one flushes
///    whatever was pending before it
/// 3. a line containing `}` while a dynamic block is open closes one level;
///    closing the outermost level flushes its content
/// 4. the `block_size`-th line of a static cycle, outside any dynamic block,
///    is appended and flushes
/// 5. anything else is appended
///
/// A `}` with no open block falls through to rules 4 and 5 as content.
pub struct BatchAccumulator<C: Clock = SystemClock> {
    clock: C,
    block_size: usize,
    pending: Vec<Command>,
    depth: usize,
    cursor: usize,
    cycle_start: DateTime<Local>,
}

impl BatchAccumulator<SystemClock> {
    pub fn new(block_size: usize) -> Self {
        Self::with_clock(block_size, SystemClock)
    }
}

impl<C: Clock> BatchAccumulator<C> {
    /// `block_size` is expected to be validated (at least 1) by the caller.
    pub fn with_clock(block_size: usize, clock: C) -> Self {
        let cycle_start = clock.now();
        Self {
            clock,
            block_size,
            pending: Vec::new(),
            depth: 0,
            cursor: 1,
            cycle_start,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Processes one line and returns the block it completed, if any.
    pub fn feed(&mut self, line: &str) -> Option<Block> {
        let flush = if line.is_empty() {
            true
        } else if line.contains(OPEN_MARKER) {
            self.depth += 1;
            self.depth == 1
        } else if line.contains(CLOSE_MARKER) && self.depth > 0 {
            self.depth -= 1;
            self.depth == 0
        } else if self.cursor == self.block_size && self.depth == 0 {
            self.pending.push(line.to_string());
            true
        } else {
            self.pending.push(line.to_string());
            false
        };

        let block = if flush {
            self.cursor = 0;
            Some(self.take_block())
        } else {
            None
        };
        self.cursor += 1;

        block
    }

    /// Ends the stream, returning whatever is still pending (possibly nothing).
    ///
    /// An unterminated dynamic block is closed here without complaint.
    pub fn finish(self) -> Block {
        if self.depth > 0 {
            tracing::debug!(
                "Input ended inside a dynamic block (depth {}), flushing {} commands",
                self.depth,
                self.pending.len()
            );
        }
        Block::new(self.pending, self.cycle_start)
    }

    fn take_block(&mut self) -> Block {
        let block = Block::new(std::mem::take(&mut self.pending), self.cycle_start);
        self.cycle_start = self.clock.now();
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    /// Advances one second on every reading.
    struct TickClock {
        base: DateTime<Local>,
        ticks: Cell<i64>,
    }

    impl TickClock {
        fn new() -> Self {
            Self {
                base: Local.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for TickClock {
        fn now(&self) -> DateTime<Local> {
            let tick = self.ticks.get();
            self.ticks.set(tick + 1);
            self.base + Duration::seconds(tick)
        }
    }

    fn tick(n: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap() + Duration::seconds(n)
    }

    fn run(block_size: usize, lines: &[&str]) -> Vec<Block> {
        let mut accumulator = BatchAccumulator::with_clock(block_size, TickClock::new());
        let mut blocks: Vec<Block> = lines
            .iter()
            .filter_map(|line| accumulator.feed(line))
            .collect();
        blocks.push(accumulator.finish());
        blocks
    }

    fn contents(blocks: &[Block]) -> Vec<Vec<&str>> {
        blocks
            .iter()
            .map(|b| b.commands.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_static_blocks_of_n() {
        let blocks = run(3, &["cmd1", "cmd2", "cmd3", "cmd4", "cmd5"]);

        assert_eq!(
            contents(&blocks),
            vec![vec!["cmd1", "cmd2", "cmd3"], vec!["cmd4", "cmd5"]]
        );
    }

    #[test]
    fn test_exact_multiple_ends_with_empty_final_block() {
        let blocks = run(2, &["a", "b", "c", "d"]);

        assert_eq!(
            contents(&blocks),
            vec![vec!["a", "b"], vec!["c", "d"], vec![]]
        );
    }

    #[test]
    fn test_default_size_one_flushes_every_line() {
        let blocks = run(1, &["a", "b"]);

        assert_eq!(contents(&blocks), vec![vec!["a"], vec!["b"], vec![]]);
    }

    #[test]
    fn test_dynamic_block() {
        let blocks = run(3, &["{", "a", "b", "}"]);

        // the opening marker flushes an empty block first
        assert_eq!(contents(&blocks), vec![vec![], vec!["a", "b"], vec![]]);
        assert_eq!(blocks[0].start_time, tick(0));
        assert_eq!(blocks[1].start_time, tick(1));
    }

    #[test]
    fn test_dynamic_block_ignores_static_size() {
        let blocks = run(1, &["{", "a", "b", "c", "}"]);

        assert_eq!(contents(&blocks), vec![vec![], vec!["a", "b", "c"], vec![]]);
    }

    #[test]
    fn test_opening_marker_flushes_pending_commands() {
        let blocks = run(3, &["cmd1", "cmd2", "{", "cmd3", "cmd4", "}", "cmd5"]);

        assert_eq!(
            contents(&blocks),
            vec![vec!["cmd1", "cmd2"], vec!["cmd3", "cmd4"], vec!["cmd5"]]
        );
    }

    #[test]
    fn test_nested_blocks_flush_on_outermost_close() {
        let blocks = run(2, &["{", "{", "x", "}", "}"]);

        assert_eq!(contents(&blocks), vec![vec![], vec!["x"], vec![]]);
    }

    #[test]
    fn test_nested_content_spans_inner_markers() {
        let blocks = run(1, &["{", "a", "{", "b", "}", "c", "}"]);

        assert_eq!(contents(&blocks), vec![vec![], vec!["a", "b", "c"], vec![]]);
    }

    #[test]
    fn test_marker_anywhere_in_line_is_structural() {
        let blocks = run(5, &["a", "if (x) {", "b", "};", "c"]);

        assert_eq!(contents(&blocks), vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_unmatched_close_is_content() {
        let blocks = run(3, &["a", "}", "b"]);

        assert_eq!(contents(&blocks), vec![vec!["a", "}", "b"], vec![]]);
    }

    #[test]
    fn test_unmatched_close_can_complete_static_block() {
        let blocks = run(2, &["a", "}", "b"]);

        assert_eq!(contents(&blocks), vec![vec!["a", "}"], vec!["b"]]);
    }

    #[test]
    fn test_unterminated_block_flushed_at_end() {
        let blocks = run(1, &["a", "{", "b", "c"]);

        assert_eq!(contents(&blocks), vec![vec!["a"], vec![], vec!["b", "c"]]);
    }

    #[test]
    fn test_single_blank_line_yields_two_empty_blocks() {
        let blocks = run(3, &[""]);

        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(Block::is_empty));
    }

    #[test]
    fn test_empty_input_yields_one_empty_block() {
        let blocks = run(3, &[]);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_empty());
        assert_eq!(blocks[0].start_time, tick(0));
    }

    #[test]
    fn test_blank_line_flushes_static_cycle() {
        let blocks = run(3, &["a", "", "b", "c", "d"]);

        assert_eq!(
            contents(&blocks),
            vec![vec!["a"], vec!["b", "c", "d"], vec![]]
        );
    }

    #[test]
    fn test_blank_line_inside_dynamic_block_keeps_depth() {
        let mut accumulator = BatchAccumulator::with_clock(1, TickClock::new());

        assert!(accumulator.feed("{").is_some());
        assert!(accumulator.feed("a").is_none());

        let cut = accumulator.feed("").unwrap();
        assert_eq!(cut.commands, vec!["a"]);
        assert_eq!(accumulator.depth(), 1);

        // still inside the block: the static size of 1 does not apply
        assert!(accumulator.feed("b").is_none());
        assert!(accumulator.feed("c").is_none());

        let closed = accumulator.feed("}").unwrap();
        assert_eq!(closed.commands, vec!["b", "c"]);
        assert_eq!(accumulator.depth(), 0);
    }

    #[test]
    fn test_close_after_blank_cut_is_not_treated_as_content() {
        let blocks = run(3, &["{", "a", "", "}", "b"]);

        assert_eq!(contents(&blocks), vec![vec![], vec!["a"], vec![], vec!["b"]]);
    }

    #[test]
    fn test_start_time_is_captured_after_each_flush() {
        let blocks = run(2, &["a", "b", "c", "d", "e"]);

        let starts: Vec<_> = blocks.iter().map(|b| b.start_time).collect();
        assert_eq!(starts, vec![tick(0), tick(1), tick(2)]);
    }

    #[test]
    fn test_non_structural_lines_are_preserved_in_order() {
        let input = [
            "a", "{", "b", "", "c", "}", "}", "d", "{", "{", "e", "}", "f", "}", "", "g", "h",
        ];
        for block_size in 1..=4 {
            let blocks = run(block_size, &input);
            let flattened: Vec<&str> = blocks
                .iter()
                .flat_map(|b| b.commands.iter().map(String::as_str))
                .collect();

            assert_eq!(flattened, vec!["a", "b", "c", "}", "d", "e", "f", "g", "h"]);
        }
    }

    #[test]
    fn test_rerun_is_identical() {
        let input = ["a", "{", "b", "}", "c", "d", "", "e"];

        assert_eq!(contents(&run(2, &input)), contents(&run(2, &input)));
        assert_eq!(run(2, &input), run(2, &input));
    }
}
