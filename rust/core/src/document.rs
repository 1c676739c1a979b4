// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry documents
//!
//! [`DocumentParser`] makes one forward pass over a geometry file, handing every
//! recognized feature header to a [`FeatureParser`] and keeping every other
//! line verbatim. [`Document::to_text`] walks the entries back to text; an
//! unedited document reproduces its input byte for byte.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::block;
use crate::config::ParseConfig;
use crate::cursor::{Cursor, LineEnding};
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::feature::{Feature, FeatureKind, FeatureOutcome, FeatureParser, Reach};
use crate::fields::{LateralWeir, StorageArea};
use crate::parser::parse_river_reach;

/// One top-level item of a document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Entry {
    Feature(Feature),
    /// Line outside any recognized feature, kept verbatim
    Raw(String),
}

impl Entry {
    /// Text of a raw entry
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Entry::Raw(line) => Some(line),
            Entry::Feature(_) => None,
        }
    }

    pub fn as_feature(&self) -> Option<&Feature> {
        match self {
            Entry::Feature(feature) => Some(feature),
            Entry::Raw(_) => None,
        }
    }
}

/// Parsed geometry file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    entries: Vec<Entry>,
    line_ending: LineEnding,
    final_newline: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with LF line endings
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            line_ending: LineEnding::Lf,
            final_newline: true,
            diagnostics: Vec::new(),
        }
    }

    /// Parse geometry text. Malformed content never fails; see [`Document::diagnostics`].
    pub fn parse(content: &str, config: &ParseConfig) -> Self {
        DocumentParser::new(config).parse(content)
    }

    /// Read and parse a geometry file
    pub fn load(path: impl AsRef<Path>, config: &ParseConfig) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "loaded geometry file");
        Ok(Self::parse(&content, config))
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    #[inline]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Problems recovered from while parsing
    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.entries.iter().filter_map(Entry::as_feature)
    }

    pub fn features_mut(&mut self) -> impl Iterator<Item = &mut Feature> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            Entry::Feature(feature) => Some(feature),
            Entry::Raw(_) => None,
        })
    }

    /// Features of one kind in file order
    pub fn find_features(&self, kind: FeatureKind) -> Vec<&Feature> {
        self.features().filter(|f| f.kind() == kind).collect()
    }

    pub fn storage_areas(&self) -> Vec<StorageArea<'_>> {
        self.features().filter_map(Feature::as_storage_area).collect()
    }

    pub fn lateral_weirs(&self) -> Vec<LateralWeir<'_>> {
        self.features().filter_map(Feature::as_lateral_weir).collect()
    }

    /// Number of features per kind
    pub fn count_by_kind(&self) -> FxHashMap<FeatureKind, usize> {
        let mut counts = FxHashMap::default();
        for feature in self.features() {
            *counts.entry(feature.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Append a feature at the end of the document
    pub fn push_feature(&mut self, feature: Feature) {
        self.entries.push(Entry::Feature(feature));
    }

    /// Replace the raw lines strictly between the `begin` and `end` marker
    /// lines, or append a new block when there is none. Empty content leaves
    /// one blank line.
    pub fn replace_block(&mut self, begin: &str, end: &str, content: &str) {
        if self.entries.is_empty() {
            self.final_newline = true;
        }
        block::splice_block(
            &mut self.entries,
            Entry::as_raw,
            Entry::Raw,
            begin,
            end,
            content,
        );
    }

    /// Every output line, terminators excluded
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match entry {
                Entry::Feature(feature) => feature.render_into(&mut lines),
                Entry::Raw(line) => lines.push(line.clone()),
            }
        }
        lines
    }

    /// Serialize to text with the document's line ending
    pub fn to_text(&self) -> String {
        let lines = self.to_lines();
        let ending = self.line_ending.as_str();
        let mut text = lines.join(ending);
        if self.final_newline && !lines.is_empty() {
            text.push_str(ending);
        }
        text
    }

    /// Serialize into `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.to_text().as_bytes())?;
        Ok(())
    }

    /// Write to `path`, replacing any existing file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Splits a geometry file into features and raw lines
pub struct DocumentParser<'c> {
    config: &'c ParseConfig,
}

impl<'c> DocumentParser<'c> {
    pub fn new(config: &'c ParseConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, content: &str) -> Document {
        let mut cursor = Cursor::new(content);
        let mut document = Document {
            entries: Vec::new(),
            line_ending: cursor.line_ending(),
            final_newline: cursor.ends_with_newline(),
            diagnostics: Vec::new(),
        };
        let mut reach: Option<Reach> = None;

        while let Some(line) = cursor.next() {
            if let Some((river, reach_name)) = parse_river_reach(line.text) {
                reach = Some(Reach::new(river, reach_name));
            }

            let Some(kind) = FeatureKind::detect(line.text) else {
                document.entries.push(Entry::Raw(line.text.to_string()));
                continue;
            };

            match FeatureParser::new(kind, self.config).parse(line, &mut cursor) {
                FeatureOutcome::Parsed {
                    mut feature,
                    diagnostics,
                } => {
                    if kind == FeatureKind::LateralWeir {
                        feature.set_reach(reach.clone());
                    }
                    document.diagnostics.extend(diagnostics);
                    document.entries.push(Entry::Feature(feature));
                }
                FeatureOutcome::Abandoned { lines, diagnostics } => {
                    document.diagnostics.extend(diagnostics);
                    document.entries.extend(lines.into_iter().map(Entry::Raw));
                }
            }
        }

        let features = document.features().count();
        info!(
            features,
            raw = document.entries.len() - features,
            diagnostics = document.diagnostics.len(),
            "parsed geometry document"
        );
        if !document.diagnostics.is_empty() {
            warn!(
                count = document.diagnostics.len(),
                "geometry document parsed with recovered problems"
            );
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Document {
        Document::parse(text, &ParseConfig::default())
    }

    #[test]
    fn test_empty_input() {
        let document = parse("");
        assert!(document.entries().is_empty());
        assert_eq!(document.to_text(), "");
    }

    #[test]
    fn test_only_unrecognized_lines() {
        let text = "Geom Title=Test\nProgram Version=6.30\n\n";
        let document = parse(text);
        assert_eq!(document.entries().len(), 3);
        assert!(document.features().next().is_none());
        assert_eq!(document.to_text(), text);
    }

    #[test]
    fn test_missing_final_newline_is_preserved() {
        let text = "Storage Area=A,,\nStorage Area Type= 0";
        assert_eq!(parse(text).to_text(), text);
    }

    #[test]
    fn test_crlf_round_trip() {
        let text = "Geom Title=x\r\nStorage Area=A,,\r\nStorage Area Area=12\r\n";
        let document = parse(text);
        assert_eq!(document.line_ending(), LineEnding::CrLf);
        assert_eq!(document.storage_areas()[0].area(), Some("12"));
        assert_eq!(document.to_text(), text);
    }

    #[test]
    fn test_reach_is_attached_to_lateral_weirs() {
        let text = "River Reach=Butte Cr        ,Upper           \nType RM Length L Ch R = 6 ,5000    ,,,\nNode Name=LW1\n";
        let document = parse(text);
        let weirs = document.lateral_weirs();
        assert_eq!(weirs.len(), 1);
        assert_eq!(weirs[0].river_name(), Some("Butte Cr"));
        assert_eq!(weirs[0].reach_name(), Some("Upper"));
        assert_eq!(weirs[0].node_name(), Some("LW1"));
    }

    #[test]
    fn test_count_by_kind() {
        let text = "Storage Area=A,,\nStorage Area=B,,\nType RM Length L Ch R = 6 ,1       ,,,\n";
        let counts = parse(text).count_by_kind();
        assert_eq!(counts.get(&FeatureKind::StorageArea), Some(&2));
        assert_eq!(counts.get(&FeatureKind::LateralWeir), Some(&1));
    }

    #[test]
    fn test_replace_block() {
        let mut document = parse("Geom Title=x\n");
        document.replace_block("BEGIN GEOM DESCRIPTION:", "END GEOM DESCRIPTION:", "first");
        assert_eq!(
            document.to_text(),
            "Geom Title=x\n\nBEGIN GEOM DESCRIPTION:\nfirst\nEND GEOM DESCRIPTION:\n"
        );
        document.replace_block("BEGIN GEOM DESCRIPTION:", "END GEOM DESCRIPTION:", "");
        assert_eq!(
            document.to_text(),
            "Geom Title=x\n\nBEGIN GEOM DESCRIPTION:\n\nEND GEOM DESCRIPTION:\n"
        );
    }

    #[test]
    fn test_abandoned_feature_lines_become_raw() {
        let text = "Storage Area=A,,\nStorage Area Surface Line= x\n 1 2\n";
        let document = parse(text);
        assert_eq!(document.features().count(), 0);
        assert_eq!(document.entries().len(), 3);
        assert_eq!(document.diagnostics().len(), 1);
        assert_eq!(document.to_text(), text);
    }
}
