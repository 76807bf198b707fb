//! Line-oriented destinations for printed values and diagnostics.
//!
//! Streaming sinks write each line as soon as it is produced, so a loop
//! that never ends still shows its output. The buffer sink is used by
//! tests and by callers that want the output as data.

use std::io::Write;

#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    Stderr,
    Buffer(Vec<String>),
}

impl OutputSink {
    pub fn buffer() -> Self {
        OutputSink::Buffer(Vec::new())
    }

    pub fn write_line(&mut self, line: &str) {
        match self {
            // Write failures such as a closed pipe are ignored.
            OutputSink::Stdout => {
                let _ = writeln!(std::io::stdout().lock(), "{line}");
            }
            OutputSink::Stderr => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
            OutputSink::Buffer(lines) => lines.push(line.to_string()),
        }
    }

    /// Captured lines; streaming sinks keep nothing.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            OutputSink::Buffer(lines) => lines,
            OutputSink::Stdout | OutputSink::Stderr => Vec::new(),
        }
    }
}
