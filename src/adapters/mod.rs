// Adapters layer: concrete sinks and the system clock.

pub mod clock;
pub mod console;
pub mod file;

pub use clock::SystemClock;
pub use console::ConsoleSink;
pub use file::FileSink;
