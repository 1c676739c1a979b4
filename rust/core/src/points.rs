// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Variable-length point lists
//!
//! A count header is followed by coordinate pairs in fixed-width columns.
//! Two packings exist:
//!
//! - **Stream**: values run across lines, a pair may straddle a line break
//!   (lateral weir station/elevation, 10 values of 8 characters per line).
//! - **Grouped**: each line holds a whole number of points (storage area
//!   outlines, 16-character columns, one or two points per line).
//!
//! Coordinates stay as text so unchanged values re-emit exactly.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::fixed_width::{self, Justify};

/// How values are distributed over data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Packing {
    Stream,
    Grouped,
}

/// Column layout of a point list's data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointLayout {
    /// Characters per value
    pub width: usize,
    /// Values (not points) per full line
    pub values_per_line: usize,
    pub packing: Packing,
    pub justify: Justify,
}

impl PointLayout {
    /// Values packed across lines
    pub const fn stream(width: usize, values_per_line: usize) -> Self {
        Self {
            width,
            values_per_line,
            packing: Packing::Stream,
            justify: Justify::Right,
        }
    }

    /// Whole points per line
    pub const fn grouped(width: usize, points_per_line: usize) -> Self {
        Self {
            width,
            values_per_line: points_per_line * 2,
            packing: Packing::Grouped,
            justify: Justify::Right,
        }
    }
}

/// One coordinate pair, kept as decoded text
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    pub x: String,
    pub y: String,
}

impl Point {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// X as a number, if it parses
    #[inline]
    pub fn x_f64(&self) -> Option<f64> {
        parse_f64(&self.x)
    }

    /// Y as a number, if it parses
    #[inline]
    pub fn y_f64(&self) -> Option<f64> {
        parse_f64(&self.y)
    }
}

#[inline]
fn parse_f64(text: &str) -> Option<f64> {
    fast_float::parse::<f64, _>(text.trim()).ok()
}

/// Ordered coordinate pairs with the count declared by their header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointList {
    points: Vec<Point>,
    declared: usize,
    layout: PointLayout,
}

impl PointList {
    /// Empty list with the given layout
    pub fn new(layout: PointLayout) -> Self {
        Self {
            points: Vec::new(),
            declared: 0,
            layout,
        }
    }

    /// List holding `points`, declared count equal to their number
    pub fn with_points(layout: PointLayout, points: Vec<Point>) -> Self {
        let declared = points.len();
        Self {
            points,
            declared,
            layout,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Count written in the header line
    #[inline]
    pub fn declared(&self) -> usize {
        self.declared
    }

    #[inline]
    pub fn layout(&self) -> PointLayout {
        self.layout
    }

    /// Fewer points were read than the header declared
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.points.len() < self.declared
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Append a point; the declared count follows
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
        self.declared = self.points.len();
    }

    /// Replace all points; the declared count follows
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.declared = points.len();
        self.points = points;
    }

    /// Numeric coordinates. Pairs with an unparseable value are skipped.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| Some((p.x_f64()?, p.y_f64()?)))
            .collect()
    }

    /// Data lines in this list's layout, header not included
    pub fn render_data(&self) -> Vec<String> {
        let values: Vec<&str> = self
            .points
            .iter()
            .flat_map(|p| [p.x.as_str(), p.y.as_str()])
            .collect();
        fixed_width::encode_lines(
            &values,
            self.layout.values_per_line,
            self.layout.width,
            self.layout.justify,
        )
    }
}

impl<'a> IntoIterator for &'a PointList {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Upper bound on points reserved up front; a declared count is untrusted
const PREALLOCATED_POINTS: usize = 1024;

/// Accumulates decoded values into points
struct PointAccumulator {
    list: PointList,
    /// X value waiting for its Y on the next line (stream packing)
    pending: Option<String>,
}

impl PointAccumulator {
    fn new(layout: PointLayout, declared: usize) -> Self {
        Self {
            list: PointList {
                points: Vec::with_capacity(declared.min(PREALLOCATED_POINTS)),
                declared,
                layout,
            },
            pending: None,
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.list.points.len() >= self.list.declared
    }

    fn feed(&mut self, line: &str) {
        let tokens = fixed_width::decode(line, self.list.layout.width);
        match self.list.layout.packing {
            Packing::Stream => {
                for token in tokens {
                    if self.is_full() {
                        break;
                    }
                    match self.pending.take() {
                        Some(x) => self.list.points.push(Point::new(x, token)),
                        None => self.pending = Some(token.to_string()),
                    }
                }
            }
            Packing::Grouped => {
                // An odd trailing value has no partner on this line
                for pair in tokens.chunks_exact(2) {
                    if self.is_full() {
                        break;
                    }
                    self.list.points.push(Point::new(pair[0], pair[1]));
                }
            }
        }
    }
}

/// Read data lines for a point list whose header declared `declared` points.
///
/// Stops when the count is met, at end of input, or at the first line for
/// which `stops` holds; that line is pushed back. Lines that carry no values,
/// blank ones included, are consumed without adding points. Every consumed
/// data line is appended to `source`.
pub fn read_points<'a>(
    declared: usize,
    layout: PointLayout,
    cursor: &mut Cursor<'a>,
    stops: impl Fn(&str) -> bool,
    source: &mut Vec<String>,
) -> Result<PointList> {
    let mut acc = PointAccumulator::new(layout, declared);

    while !acc.is_full() {
        let line = match cursor.next_line() {
            Ok(line) => line,
            Err(Error::EndOfInput) => break,
            Err(e) => return Err(e),
        };

        if stops(line.text) {
            cursor.pushback(line)?;
            break;
        }

        source.push(line.text.to_string());
        acc.feed(line.text);
    }

    Ok(acc.list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SE: PointLayout = PointLayout::stream(8, 10);
    const OUTLINE: PointLayout = PointLayout::grouped(16, 1);
    const CELLS: PointLayout = PointLayout::grouped(16, 2);

    type Read = (PointList, Vec<String>, Option<String>);

    fn read_until(
        text: &str,
        declared: usize,
        layout: PointLayout,
        stops: impl Fn(&str) -> bool,
    ) -> Read {
        let mut cursor = Cursor::new(text);
        let mut source = Vec::new();
        let list = read_points(declared, layout, &mut cursor, stops, &mut source).unwrap();
        let next = cursor.next_line().ok().map(|l| l.text.to_string());
        (list, source, next)
    }

    fn read(text: &str, declared: usize, layout: PointLayout) -> Read {
        read_until(text, declared, layout, |l| l.starts_with("Storage Area="))
    }

    #[test]
    fn test_stream_reads_exact_count() {
        let text = "       0     100      10      99      20      98\nNext=1\n";
        let (list, source, next) = read(text, 3, SE);
        assert_eq!(list.len(), 3);
        assert!(!list.is_truncated());
        assert_eq!(list.points()[2], Point::new("20", "98"));
        assert_eq!(source.len(), 1);
        assert_eq!(next.as_deref(), Some("Next=1"));
    }

    #[test]
    fn test_stream_pair_straddles_lines() {
        let layout = PointLayout::stream(8, 3);
        let text = "       1       2       3\n       4       5       6\n";
        let (list, _, _) = read(text, 3, layout);
        assert_eq!(list.points()[1], Point::new("3", "4"));
        assert_eq!(
            list.render_data(),
            vec!["       1       2       3", "       4       5       6"]
        );
    }

    #[test]
    fn test_grouped_one_point_per_line() {
        let text = "        1000.125        2000.250\n        1010.125        2010.250\n";
        let (list, source, _) = read(text, 2, OUTLINE);
        assert_eq!(list.len(), 2);
        assert_eq!(list.render_data(), source);
    }

    #[test]
    fn test_grouped_two_points_per_line() {
        let text = "               1               2               3               4\n               5               6\n";
        let (list, source, _) = read(text, 3, CELLS);
        assert_eq!(list.len(), 3);
        assert_eq!(list.points()[2], Point::new("5", "6"));
        assert_eq!(list.render_data(), source);
    }

    #[test]
    fn test_boundary_truncates_and_is_pushed_back() {
        let text = "       0     100      10      99\nStorage Area=SA2,,\n";
        let (list, source, next) = read(text, 3, SE);
        assert_eq!(list.len(), 2);
        assert_eq!(list.declared(), 3);
        assert!(list.is_truncated());
        assert_eq!(source.len(), 1);
        assert_eq!(next.as_deref(), Some("Storage Area=SA2,,"));
    }

    #[test]
    fn test_blank_line_truncates_when_it_stops() {
        let text = "       0     100\n\n       1       2\n";
        let (list, _, next) = read_until(text, 2, SE, |l| l.trim().is_empty());
        assert_eq!(list.len(), 1);
        assert_eq!(next.as_deref(), Some(""));
    }

    #[test]
    fn test_blank_line_is_skipped_otherwise() {
        let text = "       0     100\n\n       1       2      10      20\nNext=1\n";
        let (list, source, next) = read(text, 3, SE);
        assert_eq!(list.len(), 3);
        assert!(!list.is_truncated());
        assert_eq!(list.points()[2], Point::new("10", "20"));
        assert_eq!(source.len(), 3);
        assert_eq!(source[1], "");
        assert_eq!(next.as_deref(), Some("Next=1"));
    }

    #[test]
    fn test_huge_declared_count_is_not_preallocated() {
        let (list, _, next) = read("       0     100\n", usize::MAX, SE);
        assert_eq!(list.len(), 1);
        assert_eq!(list.declared(), usize::MAX);
        assert!(list.is_truncated());
        assert!(next.is_none());
    }

    #[test]
    fn test_end_of_input_truncates() {
        let (list, _, next) = read("       0     100", 4, SE);
        assert_eq!(list.len(), 1);
        assert!(list.is_truncated());
        assert!(next.is_none());
    }

    #[test]
    fn test_zero_count_reads_nothing() {
        let (list, source, next) = read("       0     100\n", 0, SE);
        assert!(list.is_empty());
        assert!(source.is_empty());
        assert_eq!(next.as_deref(), Some("       0     100"));
    }

    #[test]
    fn test_edit_keeps_declared_in_step() {
        let mut list = PointList::new(SE);
        list.push(Point::new("0", "10.5"));
        list.push(Point::new("5", "11"));
        assert_eq!(list.declared(), 2);
        list.set_points(vec![Point::new("1", "2")]);
        assert_eq!(list.declared(), 1);
        assert!(!list.is_truncated());
    }

    #[test]
    fn test_numeric_accessors() {
        let list = PointList::with_points(
            SE,
            vec![Point::new("12.5", "-3.25"), Point::new("x", "1")],
        );
        let coords = list.coordinates();
        assert_eq!(coords.len(), 1);
        assert_relative_eq!(coords[0].0, 12.5);
        assert_relative_eq!(coords[0].1, -3.25);
        assert!(list.points()[1].x_f64().is_none());
    }
}
