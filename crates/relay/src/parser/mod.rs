/// Record parsing module
///
/// Turns the raw byte stream fetched from the remote log into discrete,
/// structured log records.
///
/// # Architecture
///
/// - `lines.rs`: Chunk-to-line splitter with per-line byte accounting
/// - `record.rs`: Line-driven state machine reconstructing multi-line records
/// - `frame.rs`: Stack-frame extraction from individual trace lines
/// - `model.rs`: The `LogRecord` type
///
/// # Safety Guarantees
///
/// - Bounded memory (line size and stack depth limits)
/// - Malformed input is skipped, never fatal to the parse
/// - Binary safety (non-UTF8 bytes handled lossily)
pub mod frame;
pub mod lines;
pub mod model;
pub mod record;

// Re-export commonly used types
pub use frame::StackFrame;
pub use lines::LineSplitter;
pub use model::LogRecord;
pub use record::RecordParser;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
pub const MAX_STACK_LINES: usize = 256; // Frames kept per record
