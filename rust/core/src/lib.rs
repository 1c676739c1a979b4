// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RasGeo Core Parser
//!
//! Lossless reader and writer for HEC-RAS geometry files (`.g01`, `.g02`, ...)
//! and the plan files (`.p01`, ...) that reference them.
//!
//! ## Overview
//!
//! Geometry files are line oriented and position dependent. There are no end
//! markers: a feature ends where the next one begins, and a point list ends
//! once its declared count has been read. This crate provides:
//!
//! - **Line cursor**: zero-copy line source with single-line pushback
//! - **Fixed-width codec**: delimiter-free numeric columns
//! - **Field catalogs**: declarative tables describing storage areas and lateral weirs
//! - **Tolerant parsing**: anything unrecognized or malformed is kept verbatim
//! - **Round trip**: an unedited document writes back byte for byte
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rasgeo_core::{Document, ParseConfig};
//!
//! let document = Document::load("model.g01", &ParseConfig::default())?;
//! for area in document.storage_areas() {
//!     println!("{}: {} outline points", area.name(), area.surface_line().map_or(0, |l| l.len()));
//! }
//! for problem in document.diagnostics() {
//!     eprintln!("{}", problem);
//! }
//! document.write("model.g02")?;
//! ```
//!
//! ## Editing
//!
//! ```rust,ignore
//! use rasgeo_core::{FeatureKind, FieldId, Point};
//!
//! for feature in document.features_mut() {
//!     if let Some(value) = feature.field_mut(FieldId::SurfaceLine) {
//!         if let Some(points) = value.points_mut() {
//!             points.push(Point::new("1000.5", "2000.25"));
//!         }
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the document model

pub mod block;
pub mod boundary;
pub mod config;
pub mod cursor;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod feature;
pub mod fields;
pub mod fixed_width;
pub mod parser;
pub mod plan;
pub mod points;
pub mod value;

pub use boundary::{BoundaryOracle, BOUNDARY_TOKENS};
pub use config::{ParseConfig, TruncationPolicy};
pub use cursor::{Cursor, Line, LineEnding};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use document::{Document, DocumentParser, Entry};
pub use error::{Error, Result};
pub use feature::{Feature, FeatureKind, FeatureOutcome, FeatureParser, FieldSlot, Reach};
pub use fields::{FieldId, FieldSpec, LateralWeir, StopRule, StorageArea};
pub use fixed_width::Justify;
pub use plan::PlanFile;
pub use points::{Packing, Point, PointLayout, PointList};
pub use value::{
    CodedValue, Decoration, FieldData, FieldKind, FieldValue, NameHeader, StationHeader, TextBlock,
};
