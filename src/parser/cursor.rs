//! Character cursor used by the rule parser.
//!
//! Tracks the line and column of the current character so failures can
//! point at the offending spot:
//!
//! ```text
//! '>' expected to close a matcher name declaration at line 3:
//! <broken: [x]
//! ---------^
//! ```

use thiserror::Error;

const NEWLINES: &str = "\n\r";

/// Malformed rule text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}:\n{text}\n{}", caret(.column))]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    /// Index of the offending character within `text`
    pub column: usize,
    /// Full text of the line the failure happened on
    pub text: String,
}

impl ParseError {
    /// Same failure, attributed to another line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

fn caret(column: &usize) -> String {
    format!("{}^", "-".repeat(*column))
}

pub struct Cursor {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: isize,
    current_line: String,
}

impl Cursor {
    pub fn new(text: &str) -> Self {
        let mut cursor = Cursor {
            chars: text.chars().collect(),
            index: 0,
            line: 0,
            column: -1,
            current_line: String::new(),
        };
        if let Some(c) = cursor.current() {
            cursor.append(c);
        }
        cursor
    }

    /// Character under the cursor, None at end of input
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    pub fn column(&self) -> usize {
        self.column.max(0) as usize
    }

    /// Move to the next character
    pub fn advance(&mut self) {
        if self.at_end() {
            return;
        }
        if self.current() == Some('\n') {
            self.line += 1;
            self.column = -1;
            self.current_line.clear();
        }
        self.index += 1;
        if let Some(c) = self.current() {
            self.append(c);
        }
    }

    fn append(&mut self, c: char) {
        if !NEWLINES.contains(c) {
            self.current_line.push(c);
            self.column += 1;
        }
    }

    /// Skip characters from `skip`, then consume `expected` if it is next
    pub fn consume(&mut self, expected: char, skip: &str) -> bool {
        self.skip(skip);
        if self.current() != Some(expected) {
            return false;
        }
        self.advance();
        true
    }

    /// Skip every character belonging to `chars`
    pub fn skip(&mut self, chars: &str) {
        while matches!(self.current(), Some(c) if chars.contains(c)) {
            self.advance();
        }
    }

    /// Read until end of input or a character from `stop`
    pub fn read_until(&mut self, stop: &str) -> String {
        let mut buffer = String::new();
        while let Some(c) = self.current() {
            if stop.contains(c) {
                break;
            }
            buffer.push(c);
            self.advance();
        }
        buffer
    }

    /// Read while characters belong to `accept`
    pub fn read_while(&mut self, accept: &str) -> String {
        let mut buffer = String::new();
        while let Some(c) = self.current() {
            if !accept.contains(c) {
                break;
            }
            buffer.push(c);
            self.advance();
        }
        buffer
    }

    /// Build a failure at the current position. The rest of the physical
    /// line is consumed so the error carries its full text.
    pub fn fail(&mut self, message: impl Into<String>) -> ParseError {
        let line = self.line;
        let column = self.column();
        self.read_until(NEWLINES);
        ParseError {
            message: message.into(),
            line,
            column,
            text: self.current_line.clone(),
        }
    }
}
