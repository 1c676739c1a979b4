// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field descriptors
//!
//! Each feature kind is described by a static table of [`FieldSpec`]s. A spec
//! knows its label, decides whether a line starts its field, and consumes the
//! field from the cursor into a [`FieldValue`]. Near-identical fields share one
//! parameterized descriptor; only the tables differ.

mod lateral_weir;
mod storage_area;

pub use lateral_weir::{LateralWeir, FLAP_GATE_CODES, LATERAL_WEIR_FIELDS, LATERAL_WEIR_NODE_TYPE};
pub use storage_area::{StorageArea, IS_2D_CODES, STORAGE_AREA_FIELDS};

use crate::boundary::BoundaryOracle;
use crate::cursor::{Cursor, Line};
use crate::error::{Error, Result};
use crate::parser::{self, STORAGE_AREA_LABEL, STRUCTURE_LABEL};
use crate::points::{self, PointLayout};
use crate::value::{
    CodedValue, Decoration, FieldData, FieldValue, NameHeader, StationHeader, TextBlock,
};

/// Identity of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldId {
    // Storage area
    StorageAreaHeader,
    SurfaceLine,
    StorageType,
    Area,
    MinElevation,
    Is2D,
    PointGenerationData,
    Points2D,
    PerimeterTime,
    Mannings,
    CellVolumeFilterTolerance,
    CellMinAreaFraction,
    FaceProfileFilterTolerance,
    FaceAreaElevationProfileFilterTolerance,
    FaceAreaElevationConveyanceRatio,
    FaceMinLengthRatio,
    // Lateral weir
    WeirHeader,
    Description,
    NodeName,
    NodeLastEditedTime,
    Position,
    End,
    Distance,
    TailwaterMultipleXs,
    Width,
    Coefficient,
    OverflowMethod2D,
    OverflowUseVelocity2D,
    WsCriteria,
    FlapGates,
    HagersEquation,
    SideSlopes,
    StationElevation,
    WeirType,
    ConnectionPosDist,
    DivisionRatingCurve,
    Centerline,
}

/// Which lines end multi-line field data early
#[derive(Clone, Copy)]
pub struct StopRule<'s> {
    oracle: BoundaryOracle,
    labels: Option<&'s [&'static dyn FieldSpec]>,
}

impl<'s> StopRule<'s> {
    /// Stop on boundary tokens only. Blank lines are read through.
    pub fn boundaries() -> Self {
        Self {
            oracle: BoundaryOracle::new(),
            labels: None,
        }
    }

    /// Stop on boundary tokens, blank lines, and any line one of `specs` would claim
    pub fn with_labels(specs: &'s [&'static dyn FieldSpec]) -> Self {
        Self {
            oracle: BoundaryOracle::new(),
            labels: Some(specs),
        }
    }

    pub fn stops(&self, line: &str) -> bool {
        if self.oracle.is_boundary(line) {
            return true;
        }
        self.labels.is_some_and(|specs| {
            line.trim().is_empty() || specs.iter().any(|spec| spec.matches(line))
        })
    }
}

/// One entry of a feature kind's field catalog
pub trait FieldSpec: Sync {
    fn id(&self) -> FieldId;

    fn label(&self) -> &'static str;

    /// Whether `line` starts this field. Case-sensitive, anchored at line start.
    fn matches(&self, line: &str) -> bool {
        line.starts_with(self.label())
    }

    /// Consume the field starting at `line`, reading further lines from
    /// `cursor` if the field spans several. All-or-nothing: on error nothing
    /// beyond `line` has been taken from the cursor.
    fn consume<'a>(
        &self,
        line: Line<'a>,
        cursor: &mut Cursor<'a>,
        stop: &StopRule<'_>,
    ) -> Result<FieldValue>;
}

/// Decoded payload type of a single-line field
#[derive(Debug, Clone, Copy)]
pub enum ScalarKind {
    Text,
    Integer,
    Code(&'static [(i64, &'static str)]),
}

/// `Label=<value>` on a single line
pub struct ScalarField {
    pub id: FieldId,
    pub label: &'static str,
    pub decoration: Decoration,
    pub kind: ScalarKind,
}

impl ScalarField {
    pub const fn text(id: FieldId, label: &'static str, decoration: Decoration) -> Self {
        Self {
            id,
            label,
            decoration,
            kind: ScalarKind::Text,
        }
    }

    pub const fn integer(id: FieldId, label: &'static str, decoration: Decoration) -> Self {
        Self {
            id,
            label,
            decoration,
            kind: ScalarKind::Integer,
        }
    }

    pub const fn code(
        id: FieldId,
        label: &'static str,
        decoration: Decoration,
        table: &'static [(i64, &'static str)],
    ) -> Self {
        Self {
            id,
            label,
            decoration,
            kind: ScalarKind::Code(table),
        }
    }
}

impl FieldSpec for ScalarField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn label(&self) -> &'static str {
        self.label
    }

    fn consume<'a>(
        &self,
        line: Line<'a>,
        _cursor: &mut Cursor<'a>,
        _stop: &StopRule<'_>,
    ) -> Result<FieldValue> {
        let raw = payload(line.text, self.label);
        let text = self.decoration.strip(raw).trim();
        let decoration = self.decoration;

        let data = match self.kind {
            ScalarKind::Text => FieldData::Text {
                value: text.to_string(),
                decoration,
            },
            ScalarKind::Integer => FieldData::Integer {
                value: parser::parse_integer(text).ok_or_else(|| self.invalid(line, raw))?,
                decoration,
            },
            ScalarKind::Code(table) => FieldData::Code {
                value: CodedValue {
                    code: parser::parse_integer(text).ok_or_else(|| self.invalid(line, raw))?,
                    table,
                },
                decoration,
            },
        };

        Ok(FieldValue::from_source(self.id, self.label, data, vec![line.text.to_string()]))
    }
}

impl ScalarField {
    fn invalid(&self, line: Line<'_>, raw: &str) -> Error {
        Error::InvalidValue {
            line: line.number,
            label: self.label,
            text: raw.to_string(),
        }
    }
}

/// `Label=<count>` followed by fixed-width coordinate lines
pub struct PointListField {
    pub id: FieldId,
    pub label: &'static str,
    pub decoration: Decoration,
    pub layout: PointLayout,
}

impl FieldSpec for PointListField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn label(&self) -> &'static str {
        self.label
    }

    fn consume<'a>(
        &self,
        line: Line<'a>,
        cursor: &mut Cursor<'a>,
        stop: &StopRule<'_>,
    ) -> Result<FieldValue> {
        let raw = payload(line.text, self.label);
        let declared = parser::parse_count(self.decoration.strip(raw)).ok_or_else(|| {
            Error::MalformedCount {
                line: line.number,
                text: raw.to_string(),
            }
        })?;

        let mut source = vec![line.text.to_string()];
        let list = points::read_points(
            declared,
            self.layout,
            cursor,
            |l| stop.stops(l),
            &mut source,
        )?;
        if list.is_truncated() {
            tracing::warn!(
                field = self.label,
                line = line.number,
                declared,
                found = list.len(),
                "point list cut short"
            );
        }

        let data = FieldData::Points {
            list,
            decoration: self.decoration,
        };
        Ok(FieldValue::from_source(self.id, self.label, data, source))
    }
}

/// Free text between a begin marker line and an end marker line
pub struct BlockField {
    pub id: FieldId,
    pub begin: &'static str,
    pub end: &'static str,
}

impl FieldSpec for BlockField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn label(&self) -> &'static str {
        self.begin
    }

    fn matches(&self, line: &str) -> bool {
        line.trim() == self.begin
    }

    fn consume<'a>(
        &self,
        line: Line<'a>,
        cursor: &mut Cursor<'a>,
        _stop: &StopRule<'_>,
    ) -> Result<FieldValue> {
        let mut source = vec![line.text.to_string()];
        let mut block = TextBlock {
            end: self.end,
            lines: Vec::new(),
            terminated: false,
        };
        let oracle = BoundaryOracle::new();

        loop {
            let next = match cursor.next_line() {
                Ok(next) => next,
                Err(Error::EndOfInput) => break,
                Err(e) => return Err(e),
            };
            if next.text.trim() == self.end {
                source.push(next.text.to_string());
                block.terminated = true;
                break;
            }
            // Free text may hold field labels but never a new feature
            if oracle.is_boundary(next.text) {
                cursor.pushback(next)?;
                break;
            }
            source.push(next.text.to_string());
            block.lines.push(next.text.to_string());
        }

        Ok(FieldValue::from_source(self.id, self.begin, FieldData::Block(block), source))
    }
}

/// `Storage Area=<name>,<rest>`
pub struct NameHeaderField {
    pub id: FieldId,
}

impl FieldSpec for NameHeaderField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn label(&self) -> &'static str {
        STORAGE_AREA_LABEL
    }

    fn consume<'a>(
        &self,
        line: Line<'a>,
        _cursor: &mut Cursor<'a>,
        _stop: &StopRule<'_>,
    ) -> Result<FieldValue> {
        let (column, rest) = parser::parse_storage_area_header(line.text, line.number)?;
        let header = NameHeader {
            name: column.trim().to_string(),
            width: column.chars().count(),
            rest: rest.map(str::to_string),
        };
        Ok(FieldValue::from_source(
            self.id,
            STORAGE_AREA_LABEL,
            FieldData::Name(header),
            vec![line.text.to_string()],
        ))
    }
}

/// `Type RM Length L Ch R = <node type> ,<station>,<columns...>` for one node type
pub struct StationHeaderField {
    pub id: FieldId,
    pub node_type: i64,
}

impl FieldSpec for StationHeaderField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn label(&self) -> &'static str {
        STRUCTURE_LABEL
    }

    fn matches(&self, line: &str) -> bool {
        line.starts_with(STRUCTURE_LABEL)
            && parser::structure_node_type(line) == Some(self.node_type)
    }

    fn consume<'a>(
        &self,
        line: Line<'a>,
        _cursor: &mut Cursor<'a>,
        _stop: &StopRule<'_>,
    ) -> Result<FieldValue> {
        let (node_type, remainder) = parser::parse_structure_header(line.text, line.number)?;
        let mut columns = remainder.split(',');
        let station_column = columns.next().unwrap_or("");
        let header = StationHeader {
            node_type,
            station: station_column.trim().to_string(),
            station_width: station_column.chars().count(),
            columns: columns.map(str::to_string).collect(),
        };
        Ok(FieldValue::from_source(
            self.id,
            STRUCTURE_LABEL,
            FieldData::Station(header),
            vec![line.text.to_string()],
        ))
    }
}

/// Text after `label`; empty if the line is shorter
#[inline]
fn payload<'a>(text: &'a str, label: &str) -> &'a str {
    text.strip_prefix(label).unwrap_or("")
}
