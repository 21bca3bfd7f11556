//! Record — line-driven state machine reconstructing multi-line records.
//!
//! The machine has two states, `Idle` and `Open(record)`, and a single
//! transition predicate: "does this line parse as a header". A header
//! line closes and emits the open record (if any) and opens a new one.
//! While a record is open, `#`-prefixed lines are collected as its stack
//! trace; everything else is discarded as noise.
//!
//! Closing policy: records are always emitted, including header-only
//! records with no trailing trace. A header line is still an
//! information-bearing error record on its own.

use chrono::NaiveDateTime;

use super::model::LogRecord;
use super::MAX_STACK_LINES;

/// Header timestamp layout, e.g. `2025-04-30 06:25:17`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_LEN: usize = 19;

/// Sentinel prefix marking a stack-trace continuation line (`#0 ...`).
const STACK_LINE_PREFIX: char = '#';

/// Number of bracketed fields in a header line.
const HEADER_FIELDS: usize = 5;

/// Streaming record parser. Feed physical lines in stream order; a record
/// is returned as soon as its boundary (the next header) is known. Call
/// `finish()` at end of stream to emit the last open record.
///
/// Holds no state other than the currently open record, so re-parsing the
/// same byte range after a crash yields identical records.
#[derive(Debug, Default)]
pub struct RecordParser {
    open: Option<LogRecord>,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one physical line. Returns the previously open record when
    /// this line starts a new one.
    pub fn feed(&mut self, line: &str) -> Option<LogRecord> {
        if let Some(record) = parse_header(line) {
            return std::mem::replace(&mut self.open, Some(record));
        }

        if let Some(record) = self.open.as_mut() {
            if line.starts_with(STACK_LINE_PREFIX) && record.stack.len() < MAX_STACK_LINES {
                record.stack.push(line.to_string());
            }
            // Non-header, non-trace lines while a record is open are noise.
        }
        None
    }

    /// End of stream: emit the open record, if any.
    pub fn finish(&mut self) -> Option<LogRecord> {
        self.open.take()
    }

    /// Returns true if a record is open and waiting for its boundary.
    pub fn has_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Try to parse a header line:
///
/// ```text
/// 2025-04-30 06:25:17 [172.19.0.2][-][1b9d93016fb9][error][yii\web\HttpException:404] message...
/// ```
///
/// Returns `None` for anything that does not match the fixed layout.
/// A header-shaped line whose timestamp fails to parse is treated the same
/// way: it neither opens a record nor closes the previous one.
fn parse_header(line: &str) -> Option<LogRecord> {
    let ts_raw = line.get(..TIMESTAMP_LEN)?;
    let timestamp = NaiveDateTime::parse_from_str(ts_raw, TIMESTAMP_FORMAT).ok()?;

    let mut rest = line.get(TIMESTAMP_LEN..)?.strip_prefix(' ')?;
    let mut fields: Vec<&str> = Vec::with_capacity(HEADER_FIELDS);
    for _ in 0..HEADER_FIELDS {
        rest = rest.strip_prefix('[')?;
        let end = rest.find(']')?;
        fields.push(&rest[..end]);
        rest = &rest[end + 1..];
    }
    let message = rest.strip_prefix(' ').unwrap_or(rest);

    Some(LogRecord {
        timestamp,
        level: fields[3].to_string(),
        message: message.to_string(),
        context: vec![
            ("client_ip".to_string(), fields[0].to_string()),
            ("user_id".to_string(), fields[1].to_string()),
            ("session_id".to_string(), fields[2].to_string()),
            ("category".to_string(), fields[4].to_string()),
        ],
        stack: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &str) -> Vec<LogRecord> {
        let mut parser = RecordParser::new();
        let mut records = Vec::new();
        for line in input.lines() {
            if let Some(r) = parser.feed(line) {
                records.push(r);
            }
        }
        if let Some(r) = parser.finish() {
            records.push(r);
        }
        records
    }

    // ── Record Boundaries ────────────────────────────────────────

    #[test]
    fn test_two_records_with_and_without_trace() {
        let input = "2024-01-01 00:00:00 [ip][u][s][error][T] boom\n\
                     #0 /a/b.php(10): f()\n\
                     2024-01-01 00:00:01 [ip][u][s][info][T] ok\n";
        let records = parse_all(input);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].message, "boom");
        assert_eq!(records[0].level, "error");
        assert_eq!(records[0].stack, vec!["#0 /a/b.php(10): f()"]);

        assert_eq!(records[1].message, "ok");
        assert_eq!(records[1].level, "info");
        assert!(records[1].stack.is_empty(), "Header-only record must still be emitted");
    }

    #[test]
    fn test_header_only_record_is_emitted() {
        let records = parse_all("2024-01-01 00:00:00 [ip][u][s][warning][T] lonely\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "lonely");
        assert!(records[0].stack.is_empty());
    }

    #[test]
    fn test_record_open_at_stream_end_is_emitted_by_finish() {
        let mut parser = RecordParser::new();
        assert!(parser
            .feed("2024-01-01 00:00:00 [ip][u][s][error][T] tail")
            .is_none());
        assert!(parser.has_open());
        assert!(parser.feed("#0 /x.php(1): g()").is_none());
        let record = parser.finish().expect("finish should emit the open record");
        assert_eq!(record.message, "tail");
        assert_eq!(record.stack.len(), 1);
        assert!(!parser.has_open());
    }

    #[test]
    fn test_multi_line_stack_kept_in_order() {
        let input = "2024-01-01 00:00:00 [ip][u][s][error][T] boom\n\
                     #0 /a.php(1): a()\n\
                     #1 /b.php(2): b()\n\
                     #2 /c.php(3): c()\n";
        let records = parse_all(input);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].stack,
            vec!["#0 /a.php(1): a()", "#1 /b.php(2): b()", "#2 /c.php(3): c()"]
        );
    }

    // ── Noise Handling ───────────────────────────────────────────

    #[test]
    fn test_unparseable_timestamp_line_is_skipped() {
        // The bad header must neither close the open record nor open a new one.
        let input = "2024-01-01 00:00:00 [ip][u][s][error][T] boom\n\
                     not-a-date [x][y][z][info][T] msg\n\
                     #0 /a/b.php(10): f()\n";
        let records = parse_all(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "boom");
        assert_eq!(records[0].stack, vec!["#0 /a/b.php(10): f()"]);
    }

    #[test]
    fn test_non_trace_noise_between_stack_lines_is_discarded() {
        let input = "2024-01-01 00:00:00 [ip][u][s][error][T] boom\n\
                     #0 /a.php(1): a()\n\
                     some stray output\n\
                     #1 /b.php(2): b()\n";
        let records = parse_all(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stack.len(), 2);
    }

    #[test]
    fn test_trace_line_before_any_header_is_discarded() {
        let records = parse_all("#0 /orphan.php(5): f()\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_stack_lines_capped() {
        let mut input = String::from("2024-01-01 00:00:00 [ip][u][s][error][T] deep\n");
        for i in 0..(MAX_STACK_LINES + 20) {
            input.push_str(&format!("#{} /f.php({}): f()\n", i, i + 1));
        }
        let records = parse_all(&input);
        assert_eq!(records[0].stack.len(), MAX_STACK_LINES);
    }

    // ── Idempotent Resume ────────────────────────────────────────

    #[test]
    fn test_reparsing_same_range_yields_identical_records() {
        let input = "2024-01-01 00:00:00 [ip][u][s][error][T] boom\n\
                     #0 /a/b.php(10): f()\n\
                     2024-01-01 00:00:01 [ip][u][s][info][T] ok\n";
        let first = parse_all(input);
        let second = parse_all(input);
        assert_eq!(first, second, "No hidden parser state may survive across invocations");
    }

    // ── Header Fields ────────────────────────────────────────────

    #[test]
    fn test_header_context_fields_captured_in_order() {
        let records = parse_all(
            "2025-04-30 06:25:17 [172.19.0.2][-][1b9d93016fb9][error][yii\\web\\HttpException:404] Page not found.\n",
        );
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.context_value("client_ip"), Some("172.19.0.2"));
        assert_eq!(r.context_value("user_id"), Some("-"));
        assert_eq!(r.context_value("session_id"), Some("1b9d93016fb9"));
        assert_eq!(r.context_value("category"), Some("yii\\web\\HttpException:404"));
        assert_eq!(r.level, "error");
        assert_eq!(r.message, "Page not found.");
    }

    #[test]
    fn test_header_with_missing_brackets_is_not_a_header() {
        let records = parse_all("2024-01-01 00:00:00 [ip][u][s] short\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_header_with_empty_message_is_valid() {
        let records = parse_all("2024-01-01 00:00:00 [ip][u][s][error][T] \n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "");
    }
}
