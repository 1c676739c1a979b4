// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry file parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing geometry files
#[derive(Error, Debug)]
pub enum Error {
    /// The cursor has no more lines. Expected termination, not a failure.
    #[error("end of input")]
    EndOfInput,

    /// The source file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A point-list header declared a negative or non-numeric count.
    #[error("line {line}: malformed point count {text:?}")]
    MalformedCount { line: usize, text: String },

    /// A single-line field matched its label but the payload did not decode.
    #[error("line {line}: invalid value for '{label}': {text:?}")]
    InvalidValue {
        line: usize,
        label: &'static str,
        text: String,
    },

    /// A second line was pushed back before the first one was re-read.
    #[error("pushback slot already occupied when returning line {line}")]
    PushbackOverflow { line: usize },

    /// A header line did not follow its grammar.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error is the cursor's end-of-input signal
    #[inline]
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Error::EndOfInput)
    }
}
