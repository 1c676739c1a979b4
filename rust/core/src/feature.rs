// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Features and the per-feature field loop
//!
//! A feature is a header line followed by fields in any order, interleaved with
//! lines no field claims. [`FeatureParser`] consumes fields until a boundary
//! line or end of input, each field at most once.

use std::fmt;

use tracing::{debug, info, warn};

use crate::block::{DESCRIPTION_BEGIN, DESCRIPTION_END};
use crate::boundary::BoundaryOracle;
use crate::config::{ParseConfig, TruncationPolicy};
use crate::cursor::{Cursor, Line};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::Error;
use crate::fields::{
    FieldId, FieldSpec, LateralWeir, StopRule, StorageArea, LATERAL_WEIR_FIELDS,
    STORAGE_AREA_FIELDS,
};
use crate::value::{FieldData, FieldValue, TextBlock};

/// Recognized feature kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FeatureKind {
    StorageArea,
    LateralWeir,
}

impl FeatureKind {
    /// Every kind, in header-test order
    pub const ALL: [FeatureKind; 2] = [FeatureKind::StorageArea, FeatureKind::LateralWeir];

    /// Field catalog, header first
    pub fn fields(self) -> &'static [&'static dyn FieldSpec] {
        match self {
            FeatureKind::StorageArea => &STORAGE_AREA_FIELDS,
            FeatureKind::LateralWeir => &LATERAL_WEIR_FIELDS,
        }
    }

    /// Whether `line` is this kind's header
    #[inline]
    pub fn matches_header(self, line: &str) -> bool {
        self.fields()[0].matches(line)
    }

    /// First kind whose header `line` is
    pub fn detect(line: &str) -> Option<FeatureKind> {
        Self::ALL.into_iter().find(|kind| kind.matches_header(line))
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::StorageArea => "storage area",
            FeatureKind::LateralWeir => "lateral weir",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// River and reach a feature belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reach {
    pub river: String,
    pub reach: String,
}

impl Reach {
    pub fn new(river: impl Into<String>, reach: impl Into<String>) -> Self {
        Self {
            river: river.into(),
            reach: reach.into(),
        }
    }
}

/// One position inside a feature
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldSlot {
    Value(FieldValue),
    /// Line no field claimed, kept verbatim
    Raw(String),
}

impl FieldSlot {
    pub fn render_into(&self, out: &mut Vec<String>) {
        match self {
            FieldSlot::Value(value) => value.render_into(out),
            FieldSlot::Raw(line) => out.push(line.clone()),
        }
    }
}

/// A parsed feature: header value first, then fields and raw lines in file order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Feature {
    kind: FeatureKind,
    slots: Vec<FieldSlot>,
    reach: Option<Reach>,
}

impl Feature {
    pub fn new(kind: FeatureKind, header: FieldValue) -> Self {
        Self {
            kind,
            slots: vec![FieldSlot::Value(header)],
            reach: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    #[inline]
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    #[inline]
    pub fn reach(&self) -> Option<&Reach> {
        self.reach.as_ref()
    }

    pub fn set_reach(&mut self, reach: Option<Reach>) {
        self.reach = reach;
    }

    /// Decoded fields in file order
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.slots.iter().filter_map(|slot| match slot {
            FieldSlot::Value(value) => Some(value),
            FieldSlot::Raw(_) => None,
        })
    }

    /// Lines kept verbatim in file order
    pub fn raw_lines(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| match slot {
            FieldSlot::Raw(line) => Some(line.as_str()),
            FieldSlot::Value(_) => None,
        })
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldValue> {
        self.values().find(|value| value.id() == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldValue> {
        self.slots.iter_mut().find_map(|slot| match slot {
            FieldSlot::Value(value) if value.id() == id => Some(value),
            _ => None,
        })
    }

    pub fn push(&mut self, value: FieldValue) {
        self.slots.push(FieldSlot::Value(value));
    }

    pub fn push_raw(&mut self, line: impl Into<String>) {
        self.slots.push(FieldSlot::Raw(line.into()));
    }

    /// Whether any point list holds fewer points than declared
    pub fn is_truncated(&self) -> bool {
        self.values()
            .filter_map(FieldValue::as_points)
            .any(|list| list.is_truncated())
    }

    /// Replace the description block, or insert one after the header.
    /// Returns false for kinds without a description field.
    pub fn set_description(&mut self, content: &str) -> bool {
        if let Some(block) = self
            .field_mut(FieldId::Description)
            .and_then(FieldValue::block_mut)
        {
            block.set_text(content);
            return true;
        }

        if !self
            .kind
            .fields()
            .iter()
            .any(|spec| spec.id() == FieldId::Description)
        {
            return false;
        }

        let mut block = TextBlock {
            end: DESCRIPTION_END,
            lines: Vec::new(),
            terminated: true,
        };
        block.set_text(content);
        let value = FieldValue::new(
            FieldId::Description,
            DESCRIPTION_BEGIN,
            FieldData::Block(block),
        );
        let at = self.slots.len().min(1);
        self.slots.insert(at, FieldSlot::Value(value));
        true
    }

    pub fn as_storage_area(&self) -> Option<StorageArea<'_>> {
        (self.kind == FeatureKind::StorageArea).then(|| StorageArea::new(self))
    }

    pub fn as_lateral_weir(&self) -> Option<LateralWeir<'_>> {
        (self.kind == FeatureKind::LateralWeir).then(|| LateralWeir::new(self))
    }

    pub fn render_into(&self, out: &mut Vec<String>) {
        for slot in &self.slots {
            slot.render_into(out);
        }
    }

    /// Every line of the feature in file order
    pub fn to_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.render_into(&mut out);
        out
    }
}

/// Result of parsing one feature
#[derive(Debug)]
pub enum FeatureOutcome {
    Parsed {
        feature: Feature,
        diagnostics: Vec<Diagnostic>,
    },
    /// The feature could not be kept; its lines go back to the document verbatim
    Abandoned {
        lines: Vec<String>,
        diagnostics: Vec<Diagnostic>,
    },
}

/// Consumes one feature's fields from a cursor
pub struct FeatureParser<'c> {
    kind: FeatureKind,
    config: &'c ParseConfig,
    oracle: BoundaryOracle,
}

impl<'c> FeatureParser<'c> {
    pub fn new(kind: FeatureKind, config: &'c ParseConfig) -> Self {
        Self {
            kind,
            config,
            oracle: BoundaryOracle::new(),
        }
    }

    /// Parse the feature whose header line is `header`.
    ///
    /// Stops before the first boundary line no remaining field claims, leaving
    /// it for the caller.
    pub fn parse<'a>(&self, header: Line<'a>, cursor: &mut Cursor<'a>) -> FeatureOutcome {
        let specs = self.kind.fields();
        let stop = match self.config.truncation {
            TruncationPolicy::BoundaryOnly => StopRule::boundaries(),
            TruncationPolicy::KnownLabels => StopRule::with_labels(specs),
        };

        let header_value = match specs[0].consume(header, cursor, &stop) {
            Ok(value) => value,
            Err(e) => {
                return abandon(vec![header.text.to_string()], Vec::new(), header.number, &e);
            }
        };

        let mut feature = Feature::new(self.kind, header_value);
        let mut remaining: Vec<&'static dyn FieldSpec> = specs[1..].to_vec();
        let mut diagnostics = Vec::new();

        loop {
            let line = match cursor.next_line() {
                Ok(line) => line,
                Err(Error::EndOfInput) => break,
                Err(e) => return abandon(feature.to_lines(), diagnostics, header.number, &e),
            };

            // A boundary line can still be a field of this feature (`Lateral Weir Pos=`)
            let claimed = remaining.iter().position(|spec| spec.matches(line.text));
            let Some(index) = claimed else {
                if self.oracle.is_boundary(line.text) {
                    if let Err(e) = cursor.pushback(line) {
                        return abandon(feature.to_lines(), diagnostics, line.number, &e);
                    }
                    break;
                }
                feature.push_raw(line.text);
                continue;
            };

            let spec = remaining[index];
            match spec.consume(line, cursor, &stop) {
                Ok(value) => {
                    remaining.remove(index);
                    if let Some(diagnostic) = value_diagnostic(&value, line.number) {
                        diagnostics.push(diagnostic);
                    }
                    feature.push(value);
                }
                Err(Error::InvalidValue { text, .. }) => {
                    warn!(
                        field = spec.label(),
                        line = line.number,
                        "invalid value kept as raw line"
                    );
                    diagnostics.push(Diagnostic::new(
                        line.number,
                        DiagnosticKind::InvalidValue {
                            field: spec.id(),
                            text,
                        },
                    ));
                    feature.push_raw(line.text);
                }
                Err(Error::MalformedCount { text, .. }) => {
                    warn!(
                        kind = self.kind.name(),
                        field = spec.label(),
                        line = line.number,
                        "malformed point count, feature kept as raw lines"
                    );
                    let mut lines = feature.to_lines();
                    lines.push(line.text.to_string());
                    diagnostics.push(Diagnostic::new(
                        line.number,
                        DiagnosticKind::MalformedCount {
                            field: spec.id(),
                            text,
                        },
                    ));
                    return FeatureOutcome::Abandoned { lines, diagnostics };
                }
                Err(e) => {
                    let mut lines = feature.to_lines();
                    lines.push(line.text.to_string());
                    return abandon(lines, diagnostics, line.number, &e);
                }
            }
        }

        let fields = feature.values().count();
        let raw = feature.raw_lines().count();
        if self.config.verbose {
            info!(kind = self.kind.name(), line = header.number, fields, raw, "imported feature");
        } else {
            debug!(kind = self.kind.name(), line = header.number, fields, raw, "imported feature");
        }

        FeatureOutcome::Parsed {
            feature,
            diagnostics,
        }
    }
}

fn abandon(
    lines: Vec<String>,
    mut diagnostics: Vec<Diagnostic>,
    line: usize,
    error: &Error,
) -> FeatureOutcome {
    warn!(line, %error, "feature kept as raw lines");
    diagnostics.push(Diagnostic::new(
        line,
        DiagnosticKind::AbandonedFeature {
            message: error.to_string(),
        },
    ));
    FeatureOutcome::Abandoned { lines, diagnostics }
}

/// Diagnostic for a value that was consumed only partially
fn value_diagnostic(value: &FieldValue, line: usize) -> Option<Diagnostic> {
    match value.data() {
        FieldData::Points { list, .. } if list.is_truncated() => Some(Diagnostic::new(
            line,
            DiagnosticKind::TruncatedPointList {
                field: value.id(),
                declared: list.declared(),
                found: list.len(),
            },
        )),
        FieldData::Block(block) if !block.terminated => Some(Diagnostic::new(
            line,
            DiagnosticKind::UnterminatedBlock { field: value.id() },
        )),
        _ => None,
    }
}
