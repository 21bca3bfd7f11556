//! Frame — stack-frame extraction from a single trace line.
//!
//! Trace lines look like:
//!
//! ```text
//! #0 /app/vendor/yiisoft/yii2/base/Module.php(561): yii\base\Module->runAction('assets/61112d37', Array)
//! ```
//!
//! A line that cannot be split into file and line number yields no frame;
//! sibling frames in the same record are unaffected.

use serde::Serialize;

/// One entry of a reconstructed call trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

/// Parse one trace line into a frame.
///
/// Extraction steps: drop the `#n` index marker before the first space,
/// split on the first `(` for the file path, take the digits before the
/// following `)` as the line number (must be a positive integer), and the
/// function name is whatever follows the first `:` after the `)`.
pub fn parse_frame(line: &str) -> Option<StackFrame> {
    let (_marker, rest) = line.split_once(' ')?;
    let (file, rest) = rest.split_once('(')?;
    let (line_no, rest) = rest.split_once(')')?;

    let line_no: u32 = line_no.parse().ok().filter(|&n| n > 0)?;
    if file.is_empty() {
        return None;
    }

    let function = rest
        .split_once(':')
        .map(|(_, f)| f.trim())
        .unwrap_or("")
        .to_string();

    Some(StackFrame {
        file: file.to_string(),
        line: line_no,
        function,
    })
}
