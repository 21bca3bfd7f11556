//! Lines — splits arriving byte chunks into physical lines.
//!
//! Every emitted line carries the exact number of raw bytes it covered in
//! the stream (terminator included), which is what drives the confirmed
//! byte offset. Lines may arrive split across chunk boundaries; the
//! splitter buffers the partial tail until its terminator shows up.

use super::MAX_LINE_SIZE;

/// One physical line plus its on-the-wire byte length.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    /// Line content without the terminator (`\n` stripped, `\r\n` tolerated).
    pub text: String,
    /// Bytes this line occupied in the stream, terminator included.
    pub raw_len: u64,
}

/// Stateful chunk-to-line splitter.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buf: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning all lines completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<RawLine> {
        let mut lines = Vec::new();
        self.buf.extend_from_slice(chunk);

        let mut start = 0usize;
        while let Some(pos) = find_newline(&self.buf[start..]) {
            let end = start + pos;
            lines.push(make_line(&self.buf[start..end], (end - start + 1) as u64));
            start = end + 1;
        }
        self.buf.drain(..start);

        // A line that never terminates must not buffer forever. Force-split
        // it so byte accounting still moves forward.
        if self.buf.len() > MAX_LINE_SIZE {
            let oversized: Vec<u8> = self.buf.drain(..).collect();
            lines.push(make_line(&oversized, oversized.len() as u64));
        }

        lines
    }

    /// Drain the trailing unterminated line, if any.
    ///
    /// Callers tailing an append-only source usually leave this buffered
    /// instead: an unterminated tail is a write in progress and will be
    /// re-fetched complete on the next cycle.
    pub fn finish(&mut self) -> Option<RawLine> {
        if self.buf.is_empty() {
            return None;
        }
        let tail: Vec<u8> = self.buf.drain(..).collect();
        Some(make_line(&tail, tail.len() as u64))
    }

    /// Bytes currently buffered as an unterminated partial line.
    pub fn pending_bytes(&self) -> u64 {
        self.buf.len() as u64
    }
}

fn find_newline(haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&b| b == b'\n')
}

fn make_line(raw: &[u8], raw_len: u64) -> RawLine {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    RawLine {
        text: String::from_utf8_lossy(raw).into_owned(),
        raw_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chunk_two_lines() {
        let mut splitter = LineSplitter::new();
        let lines = splitter.push(b"first\nsecond\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[0].raw_len, 6);
        assert_eq!(lines[1].text, "second");
        assert_eq!(lines[1].raw_len, 7);
        assert_eq!(splitter.pending_bytes(), 0);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut splitter = LineSplitter::new();
        assert!(splitter.push(b"hel").is_empty());
        assert!(splitter.push(b"lo wo").is_empty());
        let lines = splitter.push(b"rld\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hello world");
        assert_eq!(lines[0].raw_len, 12);
    }

    #[test]
    fn test_crlf_terminator_stripped_but_counted() {
        let mut splitter = LineSplitter::new();
        let lines = splitter.push(b"windows line\r\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "windows line");
        assert_eq!(lines[0].raw_len, 14); // \r\n both counted
    }

    #[test]
    fn test_unterminated_tail_stays_pending() {
        let mut splitter = LineSplitter::new();
        let lines = splitter.push(b"done\npartial");
        assert_eq!(lines.len(), 1);
        assert_eq!(splitter.pending_bytes(), 7);

        let tail = splitter.finish().expect("tail should drain");
        assert_eq!(tail.text, "partial");
        assert_eq!(tail.raw_len, 7);
        assert!(splitter.finish().is_none());
    }

    #[test]
    fn test_byte_accounting_sums_to_input() {
        let input: &[u8] = b"a\nbb\r\nccc\nunterminated";
        let mut splitter = LineSplitter::new();
        let mut total: u64 = splitter.push(input).iter().map(|l| l.raw_len).sum();
        total += splitter.finish().map(|l| l.raw_len).unwrap_or(0);
        assert_eq!(total, input.len() as u64);
    }

    #[test]
    fn test_oversized_line_is_force_split() {
        let mut splitter = LineSplitter::new();
        let big = vec![b'x'; MAX_LINE_SIZE + 10];
        let lines = splitter.push(&big);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].raw_len, (MAX_LINE_SIZE + 10) as u64);
        assert_eq!(splitter.pending_bytes(), 0);
    }

    #[test]
    fn test_non_utf8_bytes_are_lossy_not_fatal() {
        let mut splitter = LineSplitter::new();
        let lines = splitter.push(b"bad \xFF\xFE byte\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].raw_len, 12);
        assert!(lines[0].text.starts_with("bad "));
    }
}
