// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan files (`.p??`)
//!
//! A plan is a flat list of `Key=value` lines naming the geometry and flow
//! files a run uses, plus a free-text description block. Every line is kept in
//! order so an unedited plan writes back unchanged.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::block::{self, DESCRIPTION_BEGIN, DESCRIPTION_END};
use crate::cursor::{Cursor, LineEnding};
use crate::error::{Error, Result};

pub const PLAN_TITLE: &str = "Plan Title";
pub const SHORT_IDENTIFIER: &str = "Short Identifier";
pub const GEOM_FILE: &str = "Geom File";
pub const FLOW_FILE: &str = "Flow File";

/// Keys with dedicated accessors, in the order a plan lists them
pub const PLAN_KEYS: [&str; 4] = [PLAN_TITLE, SHORT_IDENTIFIER, GEOM_FILE, FLOW_FILE];

/// Parsed plan file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlanFile {
    lines: Vec<String>,
    line_ending: LineEnding,
    final_newline: bool,
}

impl PlanFile {
    pub fn parse(content: &str) -> Self {
        let cursor = Cursor::new(content);
        let line_ending = cursor.line_ending();
        let final_newline = cursor.ends_with_newline();
        Self {
            lines: cursor.map(|line| line.text.to_string()).collect(),
            line_ending,
            final_newline,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.split_once('=').is_some_and(|(k, _)| k == key))
    }

    /// Value of `key`: everything after the first `=` of its line
    pub fn get(&self, key: &str) -> Option<&str> {
        let index = self.position(key)?;
        self.lines[index].split_once('=').map(|(_, value)| value)
    }

    /// Set `key`, replacing its line or adding one after the existing plan keys
    pub fn set(&mut self, key: &str, value: &str) {
        let line = format!("{}={}", key, value);
        match self.position(key) {
            Some(index) => self.lines[index] = line,
            None => {
                let at = PLAN_KEYS
                    .iter()
                    .filter_map(|k| self.position(k))
                    .max()
                    .map_or(0, |index| index + 1);
                self.lines.insert(at, line);
            }
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.get(PLAN_TITLE)
    }

    pub fn short_id(&self) -> Option<&str> {
        self.get(SHORT_IDENTIFIER)
    }

    /// Geometry file extension, e.g. `g01`
    pub fn geom_file(&self) -> Option<&str> {
        self.get(GEOM_FILE)
    }

    /// Flow file extension, e.g. `f01`
    pub fn flow_file(&self) -> Option<&str> {
        self.get(FLOW_FILE)
    }

    pub fn set_title(&mut self, title: &str) {
        self.set(PLAN_TITLE, title);
    }

    pub fn set_short_id(&mut self, id: &str) {
        self.set(SHORT_IDENTIFIER, id);
    }

    pub fn set_geom_file(&mut self, extension: &str) {
        self.set(GEOM_FILE, extension);
    }

    pub fn set_flow_file(&mut self, extension: &str) {
        self.set(FLOW_FILE, extension);
    }

    /// Current description block contents
    pub fn description(&self) -> Option<String> {
        let (start, stop) = block::find_block(
            &self.lines,
            |line| Some(line.as_str()),
            DESCRIPTION_BEGIN,
            DESCRIPTION_END,
        )?;
        Some(self.lines[start + 1..stop].join("\n"))
    }

    /// Replace the description block, appending one if the plan has none
    pub fn update_description(&mut self, content: &str) {
        if self.lines.is_empty() {
            self.final_newline = true;
        }
        block::splice_block(
            &mut self.lines,
            |line| Some(line.as_str()),
            |line| line,
            DESCRIPTION_BEGIN,
            DESCRIPTION_END,
            content,
        );
    }

    pub fn to_text(&self) -> String {
        let ending = self.line_ending.as_str();
        let mut text = self.lines.join(ending);
        if self.final_newline && !self.lines.is_empty() {
            text.push_str(ending);
        }
        text
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
