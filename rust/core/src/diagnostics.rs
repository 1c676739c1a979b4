// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Problems recovered from during a parse
//!
//! None of these stop the parse. The affected lines are kept verbatim or the
//! affected value is kept partially, and a diagnostic records what happened.

use std::fmt;

use crate::fields::FieldId;

/// A recovered problem and the line it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// 1-based line number of the field or feature header
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticKind {
    /// Fewer points than declared before a terminating line or end of input
    TruncatedPointList {
        field: FieldId,
        declared: usize,
        found: usize,
    },
    /// Negative or non-numeric point count; the feature was kept as raw lines
    MalformedCount { field: FieldId, text: String },
    /// Single-line payload that did not decode; the line was kept raw
    InvalidValue { field: FieldId, text: String },
    /// Begin marker without its end marker
    UnterminatedBlock { field: FieldId },
    /// Feature abandoned for any other reason; its lines were kept raw
    AbandonedFeature { message: String },
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            DiagnosticKind::TruncatedPointList {
                field,
                declared,
                found,
            } => write!(f, "{:?} declares {} points, found {}", field, declared, found),
            DiagnosticKind::MalformedCount { field, text } => {
                write!(f, "{:?} has malformed point count {:?}", field, text)
            }
            DiagnosticKind::InvalidValue { field, text } => {
                write!(f, "{:?} has invalid value {:?}", field, text)
            }
            DiagnosticKind::UnterminatedBlock { field } => {
                write!(f, "{:?} is missing its end marker", field)
            }
            DiagnosticKind::AbandonedFeature { message } => {
                write!(f, "feature kept as raw lines: {}", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            12,
            DiagnosticKind::TruncatedPointList {
                field: FieldId::StationElevation,
                declared: 3,
                found: 2,
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "line 12: StationElevation declares 3 points, found 2"
        );
    }
}
