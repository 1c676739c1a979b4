// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Forward-only line cursor with single-line pushback.
//!
//! The geometry format has no end markers: a multi-line field only learns it is
//! finished by reading the first line that belongs to something else. That line
//! is handed back with [`Cursor::pushback`] so the enclosing parser sees it next.
//! Lines are borrowed from the input (zero-copy).

use crate::error::{Error, Result};

/// Line terminator convention of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the convention from the first terminator in `content`
    pub fn detect(content: &str) -> Self {
        let bytes = content.as_bytes();
        match memchr::memchr(b'\n', bytes) {
            Some(pos) if pos > 0 && bytes[pos - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    /// Terminator text
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// One input line without its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source
    pub number: usize,
    /// Line text, terminator removed
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// True for empty or whitespace-only lines
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Forward-only, pushback-capable line source
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    content: &'a str,
    /// Byte offset of the next unread line
    position: usize,
    /// Number of lines taken from `content` so far
    lines_read: usize,
    /// At most one line handed back by a consumer
    pushed: Option<Line<'a>>,
    ending: LineEnding,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
            lines_read: 0,
            pushed: None,
            ending: LineEnding::detect(content),
        }
    }

    /// Line terminator convention detected for the input
    #[inline]
    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// Whether the final line of the input carries a terminator
    #[inline]
    pub fn ends_with_newline(&self) -> bool {
        self.content.ends_with('\n')
    }

    /// Locate the next raw line without moving.
    /// Returns the line and the offset just past its terminator.
    fn scan_line(&self) -> Option<(Line<'a>, usize)> {
        let len = self.content.len();
        if self.position >= len {
            return None;
        }

        let remaining = &self.content.as_bytes()[self.position..];
        let (end, next, terminated) = match memchr::memchr(b'\n', remaining) {
            Some(offset) => (self.position + offset, self.position + offset + 1, true),
            None => (len, len, false),
        };

        // A `\r` only belongs to the terminator when a `\n` follows it
        let mut text = &self.content[self.position..end];
        if terminated && self.ending == LineEnding::CrLf {
            text = text.strip_suffix('\r').unwrap_or(text);
        }

        Some((Line::new(self.lines_read + 1, text), next))
    }

    /// Look at the next line without consuming it
    pub fn peek(&self) -> Option<Line<'a>> {
        match self.pushed {
            Some(line) => Some(line),
            None => self.scan_line().map(|(line, _)| line),
        }
    }

    /// Consume the next line, failing with [`Error::EndOfInput`] when exhausted
    pub fn next_line(&mut self) -> Result<Line<'a>> {
        if let Some(line) = self.pushed.take() {
            return Ok(line);
        }

        let (line, next) = self.scan_line().ok_or(Error::EndOfInput)?;
        self.position = next;
        self.lines_read += 1;
        Ok(line)
    }

    /// Return one line to the front of the cursor
    pub fn pushback(&mut self, line: Line<'a>) -> Result<()> {
        if self.pushed.is_some() {
            return Err(Error::PushbackOverflow { line: line.number });
        }
        self.pushed = Some(line);
        Ok(())
    }

    /// True when no line remains, including a pushed-back one
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pushed.is_none() && self.position >= self.content.len()
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_lines_in_order() {
        let mut cursor = Cursor::new("a\nb\nc");
        assert_eq!(cursor.next_line().unwrap(), Line::new(1, "a"));
        assert_eq!(cursor.next_line().unwrap(), Line::new(2, "b"));
        assert_eq!(cursor.next_line().unwrap(), Line::new(3, "c"));
        assert!(cursor.next_line().unwrap_err().is_end_of_input());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut cursor = Cursor::new("first\nsecond\n");
        assert_eq!(cursor.peek().unwrap().text, "first");
        assert_eq!(cursor.peek().unwrap().text, "first");
        assert_eq!(cursor.next_line().unwrap().text, "first");
        assert_eq!(cursor.peek().unwrap().text, "second");
    }

    #[test]
    fn test_pushback_returns_line_first() {
        let mut cursor = Cursor::new("one\ntwo\n");
        let one = cursor.next_line().unwrap();
        let two = cursor.next_line().unwrap();
        assert!(cursor.is_exhausted());

        cursor.pushback(two).unwrap();
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.peek(), Some(two));
        assert_eq!(cursor.next_line().unwrap(), two);
        assert!(cursor.is_exhausted());

        cursor.pushback(one).unwrap();
        let err = cursor.pushback(two).unwrap_err();
        assert!(matches!(err, Error::PushbackOverflow { line: 2 }));
    }

    #[test]
    fn test_crlf_convention() {
        let mut cursor = Cursor::new("a\r\nb\r\n");
        assert_eq!(cursor.line_ending(), LineEnding::CrLf);
        assert_eq!(cursor.next_line().unwrap().text, "a");
        assert_eq!(cursor.next_line().unwrap().text, "b");
        assert!(cursor.ends_with_newline());
    }

    #[test]
    fn test_lf_convention_keeps_stray_carriage_return() {
        let mut cursor = Cursor::new("a\nb\r\n");
        assert_eq!(cursor.line_ending(), LineEnding::Lf);
        assert_eq!(cursor.next_line().unwrap().text, "a");
        assert_eq!(cursor.next_line().unwrap().text, "b\r");
    }

    #[test]
    fn test_crlf_unterminated_last_line_keeps_carriage_return() {
        let mut cursor = Cursor::new("a\r\nb\r");
        assert_eq!(cursor.line_ending(), LineEnding::CrLf);
        assert!(!cursor.ends_with_newline());
        assert_eq!(cursor.next_line().unwrap().text, "a");
        assert_eq!(cursor.next_line().unwrap().text, "b\r");
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_iterator_and_next_line_agree() {
        let lines: Vec<_> = Cursor::new("x\ny\n").map(|line| line.text).collect();
        assert_eq!(lines, vec!["x", "y"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        let cursor = Cursor::new("");
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.count(), 0);

        let lines: Vec<_> = Cursor::new("\n  \nx").collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].is_blank());
        assert!(lines[1].is_blank());
        assert!(!lines[2].is_blank());
    }
}
