//! Line-oriented standard input for executing code.

use std::sync::Arc;
use thiserror::Error;

/// Raised when code asks for more input than was supplied.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("No more input available.")]
pub struct InputExhausted;

/// The finite, ordered lines supplied with a request.
///
/// Immutable once built. Consumption goes through an [`InputReader`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFeed {
    lines: Arc<Vec<String>>,
}

impl InputFeed {
    /// Split raw input on `\n` or `\r\n`.
    ///
    /// Empty input yields no lines, and a single trailing line break does not
    /// produce an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let body = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);

        if text.is_empty() {
            return Self::default();
        }

        let lines: Vec<String> = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            lines: Arc::new(lines),
        }
    }

    /// Number of lines in the feed.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the feed has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The whole feed as stdin text, one terminated line per entry.
    pub fn to_stdin(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in self.lines.iter() {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// A fresh cursor at the first line.
    pub fn reader(&self) -> InputReader {
        InputReader {
            lines: Arc::clone(&self.lines),
            next: 0,
        }
    }
}

/// Front-to-back cursor over an [`InputFeed`].
#[derive(Debug, Clone)]
pub struct InputReader {
    lines: Arc<Vec<String>>,
    next: usize,
}

impl InputReader {
    /// Take the next line, or report that the feed is exhausted.
    pub fn next_line(&mut self) -> Result<String, InputExhausted> {
        let line = self.lines.get(self.next).cloned().ok_or(InputExhausted)?;
        self.next += 1;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(feed: &InputFeed) -> Vec<String> {
        let mut reader = feed.reader();
        std::iter::from_fn(|| reader.next_line().ok()).collect()
    }

    #[test]
    fn test_split_mixed_line_endings() {
        let feed = InputFeed::from_text("alice\r\nbob\ncarol");
        assert_eq!(read_all(&feed), ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_empty_input_has_no_lines() {
        let feed = InputFeed::from_text("");
        assert!(feed.is_empty());
        assert_eq!(feed.reader().next_line(), Err(InputExhausted));
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        let feed = InputFeed::from_text("one\ntwo\n");
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_blank_lines_inside_are_kept() {
        let feed = InputFeed::from_text("a\n\nb");
        assert_eq!(read_all(&feed), ["a", "", "b"]);

        let feed = InputFeed::from_text("\n");
        assert_eq!(read_all(&feed), [""]);
    }

    #[test]
    fn test_reader_consumes_in_order_then_exhausts() {
        let feed = InputFeed::from_text("1\n2");
        let mut reader = feed.reader();
        assert_eq!(reader.next_line().unwrap(), "1");
        assert_eq!(reader.next_line().unwrap(), "2");
        assert_eq!(reader.next_line(), Err(InputExhausted));
        assert_eq!(InputExhausted.to_string(), "No more input available.");

        // The feed itself is untouched.
        assert_eq!(feed.reader().next_line().unwrap(), "1");
    }

    #[test]
    fn test_to_stdin() {
        assert_eq!(InputFeed::from_text("x\r\ny").to_stdin(), "x\ny\n");
        assert_eq!(InputFeed::from_text("").to_stdin(), "");
    }
}
