// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded field values
//!
//! A [`FieldValue`] holds the decoded payload of one field together with the
//! formatting needed to write it back. Rendering normally goes through the
//! codec; when the source lines were not in canonical form they are kept and
//! re-emitted until the payload is edited.

use crate::fields::FieldId;
use crate::fixed_width::{self, Justify};
use crate::points::PointList;

/// Literal text around a scalar value, e.g. the space in `Storage Area Type= 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decoration {
    pub lead: &'static str,
    pub trail: &'static str,
}

impl Decoration {
    pub const NONE: Decoration = Decoration { lead: "", trail: "" };

    pub const fn lead(lead: &'static str) -> Self {
        Self { lead, trail: "" }
    }

    pub const fn trail(trail: &'static str) -> Self {
        Self { lead: "", trail }
    }

    /// Remove the decoration where present
    pub fn strip<'a>(&self, raw: &'a str) -> &'a str {
        let raw = raw.strip_prefix(self.lead).unwrap_or(raw);
        raw.strip_suffix(self.trail).unwrap_or(raw)
    }

    /// Surround `value` with the decoration
    pub fn wrap(&self, value: &str) -> String {
        let mut out = String::with_capacity(self.lead.len() + value.len() + self.trail.len());
        out.push_str(self.lead);
        out.push_str(value);
        out.push_str(self.trail);
        out
    }
}

/// Integer code with its meaning table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CodedValue {
    pub code: i64,
    pub table: &'static [(i64, &'static str)],
}

impl CodedValue {
    /// Meaning of the code, `None` for codes outside the table
    pub fn meaning(&self) -> Option<&'static str> {
        self.table
            .iter()
            .find(|(code, _)| *code == self.code)
            .map(|(_, meaning)| *meaning)
    }

    /// Code whose meaning is `meaning`
    pub fn code_for(table: &[(i64, &'static str)], meaning: &str) -> Option<i64> {
        table.iter().find(|(_, m)| *m == meaning).map(|(c, _)| *c)
    }
}

/// `Storage Area=name,rest`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NameHeader {
    pub name: String,
    /// Width the name column is left-justified to
    pub width: usize,
    /// Everything after the first comma, verbatim
    pub rest: Option<String>,
}

impl NameHeader {
    /// Comma-separated columns after the name
    pub fn columns(&self) -> Vec<&str> {
        match &self.rest {
            Some(rest) => rest.split(',').collect(),
            None => Vec::new(),
        }
    }
}

/// `Type RM Length L Ch R = 6 ,5000    ,...`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StationHeader {
    pub node_type: i64,
    pub station: String,
    /// Width the station column is left-justified to
    pub station_width: usize,
    /// Remaining comma-separated columns, verbatim
    pub columns: Vec<String>,
}

impl StationHeader {
    /// Minimum width of the station column
    pub const STATION_WIDTH: usize = 8;

    pub fn station_f64(&self) -> Option<f64> {
        fast_float::parse::<f64, _>(self.station.trim()).ok()
    }
}

/// Lines between a begin and an end marker
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextBlock {
    pub end: &'static str,
    pub lines: Vec<String>,
    /// Whether the end marker was present
    pub terminated: bool,
}

impl TextBlock {
    /// Block contents joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the contents. Empty content leaves a single blank line.
    pub fn set_text(&mut self, content: &str) {
        self.lines = crate::block::content_lines(content);
        self.terminated = true;
    }
}

/// Kind tag of a [`FieldData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    Text,
    Integer,
    Code,
    Points,
    Name,
    Station,
    Block,
}

/// Decoded payload of a field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldData {
    Text { value: String, decoration: Decoration },
    Integer { value: i64, decoration: Decoration },
    Code { value: CodedValue, decoration: Decoration },
    Points { list: PointList, decoration: Decoration },
    Name(NameHeader),
    Station(StationHeader),
    Block(TextBlock),
}

impl FieldData {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldData::Text { .. } => FieldKind::Text,
            FieldData::Integer { .. } => FieldKind::Integer,
            FieldData::Code { .. } => FieldKind::Code,
            FieldData::Points { .. } => FieldKind::Points,
            FieldData::Name(_) => FieldKind::Name,
            FieldData::Station(_) => FieldKind::Station,
            FieldData::Block(_) => FieldKind::Block,
        }
    }
}

/// One decoded field of a feature
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldValue {
    id: FieldId,
    label: &'static str,
    data: FieldData,
    /// Source lines, kept only when they differ from the canonical rendering
    verbatim: Option<Vec<String>>,
}

impl FieldValue {
    /// Build a value for programmatic insertion
    pub fn new(id: FieldId, label: &'static str, data: FieldData) -> Self {
        Self {
            id,
            label,
            data,
            verbatim: None,
        }
    }

    /// Build a value from the lines it was decoded from
    pub fn from_source(
        id: FieldId,
        label: &'static str,
        data: FieldData,
        source: Vec<String>,
    ) -> Self {
        let mut value = Self::new(id, label, data);
        if value.canonical_lines() != source {
            tracing::debug!(field = label, "keeping non-canonical source lines");
            value.verbatim = Some(source);
        }
        value
    }

    #[inline]
    pub fn id(&self) -> FieldId {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.data.kind()
    }

    #[inline]
    pub fn data(&self) -> &FieldData {
        &self.data
    }

    /// Mutable payload. Source lines are dropped; the value renders canonically from now on.
    pub fn data_mut(&mut self) -> &mut FieldData {
        self.verbatim = None;
        &mut self.data
    }

    /// True when rendering goes through the codec rather than kept source lines
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.verbatim.is_none()
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            FieldData::Text { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match &self.data {
            FieldData::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodedValue> {
        match &self.data {
            FieldData::Code { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&PointList> {
        match &self.data {
            FieldData::Points { list, .. } => Some(list),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&NameHeader> {
        match &self.data {
            FieldData::Name(header) => Some(header),
            _ => None,
        }
    }

    pub fn as_station(&self) -> Option<&StationHeader> {
        match &self.data {
            FieldData::Station(header) => Some(header),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&TextBlock> {
        match &self.data {
            FieldData::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Set a text payload. Returns false if this is not a text field.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.data {
            FieldData::Text { value, .. } => {
                *value = text.into();
                self.verbatim = None;
                true
            }
            _ => false,
        }
    }

    /// Set an integer payload. Returns false if this is not an integer field.
    pub fn set_integer(&mut self, integer: i64) -> bool {
        match &mut self.data {
            FieldData::Integer { value, .. } => {
                *value = integer;
                self.verbatim = None;
                true
            }
            _ => false,
        }
    }

    /// Set a coded payload. Returns false if this is not a coded field.
    pub fn set_code(&mut self, code: i64) -> bool {
        match &mut self.data {
            FieldData::Code { value, .. } => {
                value.code = code;
                self.verbatim = None;
                true
            }
            _ => false,
        }
    }

    /// Mutable point list, if this is a point-list field
    pub fn points_mut(&mut self) -> Option<&mut PointList> {
        match &mut self.data {
            FieldData::Points { list, .. } => {
                self.verbatim = None;
                Some(list)
            }
            _ => None,
        }
    }

    /// Mutable text block, if this is a block field
    pub fn block_mut(&mut self) -> Option<&mut TextBlock> {
        match &mut self.data {
            FieldData::Block(block) => {
                self.verbatim = None;
                Some(block)
            }
            _ => None,
        }
    }

    /// Lines produced by the codec for the current payload
    pub fn canonical_lines(&self) -> Vec<String> {
        let label = self.label;
        match &self.data {
            FieldData::Text { value, decoration } => {
                vec![format!("{}{}", label, decoration.wrap(value))]
            }
            FieldData::Integer { value, decoration } => {
                vec![format!("{}{}", label, decoration.wrap(&value.to_string()))]
            }
            FieldData::Code { value, decoration } => {
                vec![format!("{}{}", label, decoration.wrap(&value.code.to_string()))]
            }
            FieldData::Points { list, decoration } => {
                let mut lines = Vec::with_capacity(1 + list.len());
                lines.push(format!("{}{}", label, decoration.wrap(&list.declared().to_string())));
                lines.extend(list.render_data());
                lines
            }
            FieldData::Name(header) => {
                let mut line = String::from(label);
                // The name column only pads; a longer name simply widens it
                if fixed_width::fits(&header.name, header.width) {
                    fixed_width::pad_into(&mut line, &header.name, header.width, Justify::Left);
                } else {
                    line.push_str(&header.name);
                }
                if let Some(rest) = &header.rest {
                    line.push(',');
                    line.push_str(rest);
                }
                vec![line]
            }
            FieldData::Station(header) => {
                let mut line = format!("{} {} ,", label, header.node_type);
                fixed_width::pad_into(
                    &mut line,
                    &header.station,
                    header.station_width,
                    Justify::Left,
                );
                for column in &header.columns {
                    line.push(',');
                    line.push_str(column);
                }
                vec![line]
            }
            FieldData::Block(block) => {
                let mut lines = Vec::with_capacity(block.lines.len() + 2);
                lines.push(label.to_string());
                lines.extend(block.lines.iter().cloned());
                if block.terminated {
                    lines.push(block.end.to_string());
                }
                lines
            }
        }
    }

    /// Append this value's lines to `out`
    pub fn render_into(&self, out: &mut Vec<String>) {
        match &self.verbatim {
            Some(lines) => out.extend(lines.iter().cloned()),
            None => out.extend(self.canonical_lines()),
        }
    }

    /// This value's lines
    pub fn render(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.render_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::{Point, PointLayout};

    #[test]
    fn test_decoration() {
        let deco = Decoration { lead: " ", trail: "" };
        assert_eq!(deco.strip(" 12"), "12");
        assert_eq!(deco.strip("12"), "12");
        assert_eq!(deco.wrap("12"), " 12");
        assert_eq!(Decoration::trail(" ").strip("1 "), "1");
    }

    #[test]
    fn test_canonical_source_is_not_kept() {
        let data = FieldData::Integer {
            value: 0,
            decoration: Decoration::lead(" "),
        };
        let value = FieldValue::from_source(
            FieldId::StorageType,
            "Storage Area Type=",
            data,
            vec!["Storage Area Type= 0".to_string()],
        );
        assert!(value.is_canonical());
        assert_eq!(value.render(), vec!["Storage Area Type= 0"]);
    }

    #[test]
    fn test_non_canonical_source_is_kept_until_edit() {
        let data = FieldData::Integer {
            value: 7,
            decoration: Decoration::lead(" "),
        };
        let mut value = FieldValue::from_source(
            FieldId::StorageType,
            "Storage Area Type=",
            data,
            vec!["Storage Area Type=  007".to_string()],
        );
        assert!(!value.is_canonical());
        assert_eq!(value.render(), vec!["Storage Area Type=  007"]);

        assert!(value.set_integer(8));
        assert!(value.is_canonical());
        assert_eq!(value.render(), vec!["Storage Area Type= 8"]);
    }

    #[test]
    fn test_setter_kind_mismatch() {
        let mut value = FieldValue::new(
            FieldId::Area,
            "Storage Area Area=",
            FieldData::Text {
                value: "12".into(),
                decoration: Decoration::NONE,
            },
        );
        assert!(!value.set_integer(3));
        assert!(value.points_mut().is_none());
        assert_eq!(value.as_text(), Some("12"));
    }

    #[test]
    fn test_points_render_with_header() {
        let list = PointList::with_points(
            PointLayout::stream(8, 10),
            vec![Point::new("0", "100"), Point::new("10", "99")],
        );
        let value = FieldValue::new(
            FieldId::StationElevation,
            "Lateral Weir SE=",
            FieldData::Points {
                list,
                decoration: Decoration::trail(" "),
            },
        );
        assert_eq!(
            value.render(),
            vec!["Lateral Weir SE=2 ", "       0     100      10      99"]
        );
    }

    #[test]
    fn test_station_header_render() {
        let value = FieldValue::new(
            FieldId::WeirHeader,
            "Type RM Length L Ch R =",
            FieldData::Station(StationHeader {
                node_type: 6,
                station: "5000".into(),
                station_width: StationHeader::STATION_WIDTH,
                columns: vec![String::new(), String::new(), String::new()],
            }),
        );
        assert_eq!(value.render(), vec!["Type RM Length L Ch R = 6 ,5000    ,,,"]);
    }

    #[test]
    fn test_coded_meaning() {
        const TABLE: &[(i64, &str)] = &[(0, "closed"), (-1, "open")];
        let coded = CodedValue { code: -1, table: TABLE };
        assert_eq!(coded.meaning(), Some("open"));
        assert_eq!(CodedValue::code_for(TABLE, "closed"), Some(0));
        assert_eq!(CodedValue { code: 5, table: TABLE }.meaning(), None);
    }

    #[test]
    fn test_block_set_text() {
        let mut block = TextBlock {
            end: "END DESCRIPTION:",
            lines: vec!["old".into()],
            terminated: false,
        };
        block.set_text("");
        assert_eq!(block.lines, vec![String::new()]);
        assert!(block.terminated);
        block.set_text("a\nb");
        assert_eq!(block.text(), "a\nb");
    }
}
