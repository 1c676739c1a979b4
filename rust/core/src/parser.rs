// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Header-line grammars using nom
//!
//! Most fields are `Label=value` and need no grammar. The few header lines
//! that pack several columns behind one label are parsed here.

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, digit1, space0},
    combinator::{map_res, opt, recognize, rest},
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// Label of the node header shared by cross sections and structures
pub const STRUCTURE_LABEL: &str = "Type RM Length L Ch R =";

/// Label of a river/reach declaration
pub const RIVER_REACH_LABEL: &str = "River Reach=";

/// Label of a storage area header
pub const STORAGE_AREA_LABEL: &str = "Storage Area=";

/// Parse integer: 42, -42
fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// `Type RM Length L Ch R = 6 ,5000    ,,,` -> (6, "5000    ,,,")
fn structure_header(input: &str) -> IResult<&str, (i64, &str)> {
    let (input, (_, _, node_type, _, _, remainder)) = tuple((
        tag(STRUCTURE_LABEL),
        space0,
        integer,
        space0,
        char(','),
        rest,
    ))(input)?;
    Ok((input, (node_type, remainder)))
}

/// `Label=first,rest` -> ("first", Some("rest"))
fn comma_pair<'a>(
    label: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, (&'a str, Option<&'a str>)> {
    preceded(
        tag(label),
        pair(take_till(|c: char| c == ','), opt(preceded(char(','), rest))),
    )
}

/// Parse a structure node header into its node type and the text after the
/// node type's comma
pub fn parse_structure_header(text: &str, line: usize) -> Result<(i64, &str)> {
    structure_header(text)
        .map(|(_, parsed)| parsed)
        .map_err(|e| Error::parse(line, format!("Failed to parse node header: {}", e)))
}

/// Node type of a structure header, if `text` is one
pub fn structure_node_type(text: &str) -> Option<i64> {
    structure_header(text).ok().map(|(_, (node_type, _))| node_type)
}

/// Parse a storage area header into its raw name column and the raw text
/// after the first comma
pub fn parse_storage_area_header(text: &str, line: usize) -> Result<(&str, Option<&str>)> {
    comma_pair(STORAGE_AREA_LABEL)(text)
        .map(|(_, parsed)| parsed)
        .map_err(|e| Error::parse(line, format!("Failed to parse storage area header: {}", e)))
}

/// Parse `River Reach=river,reach` into trimmed names
pub fn parse_river_reach(text: &str) -> Option<(&str, &str)> {
    let (_, (river, reach)) = comma_pair(RIVER_REACH_LABEL)(text).ok()?;
    Some((river.trim(), reach.unwrap_or("").trim()))
}

/// Parse a declared point count. Negative or non-numeric counts yield `None`.
pub fn parse_count(text: &str) -> Option<usize> {
    let value = parse_integer(text)?;
    usize::try_from(value).ok()
}

/// Parse a trimmed integer using lexical-core
pub fn parse_integer(text: &str) -> Option<i64> {
    lexical_core::parse::<i64>(text.trim().as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(integer("42"), Ok(("", 42)));
        assert_eq!(integer("-1 ,"), Ok((" ,", -1)));
        assert!(integer("x").is_err());
    }

    #[test]
    fn test_structure_header() {
        let (node_type, remainder) =
            parse_structure_header("Type RM Length L Ch R = 6 ,5000    ,,,", 1).unwrap();
        assert_eq!(node_type, 6);
        assert_eq!(remainder, "5000    ,,,");
    }

    #[test]
    fn test_structure_node_type() {
        assert_eq!(structure_node_type("Type RM Length L Ch R = 1 ,1234.5  ,100,100,100"), Some(1));
        assert_eq!(structure_node_type("Type RM Length L Ch R = 6 ,200"), Some(6));
        assert_eq!(structure_node_type("Storage Area=SA1,,"), None);
    }

    #[test]
    fn test_structure_header_error_carries_line() {
        let err = parse_structure_header("Type RM Length L Ch R = x", 7).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 7, .. }));
    }

    #[test]
    fn test_storage_area_header() {
        let (name, rest) =
            parse_storage_area_header("Storage Area=Pond 1   ,1000.5,2000.5", 1).unwrap();
        assert_eq!(name, "Pond 1   ");
        assert_eq!(rest, Some("1000.5,2000.5"));

        let (name, rest) = parse_storage_area_header("Storage Area=Lonely", 1).unwrap();
        assert_eq!(name, "Lonely");
        assert_eq!(rest, None);
    }

    #[test]
    fn test_river_reach() {
        assert_eq!(
            parse_river_reach("River Reach=Butte Cr        ,Upper           "),
            Some(("Butte Cr", "Upper"))
        );
        assert_eq!(parse_river_reach("River Reach=Solo"), Some(("Solo", "")));
        assert_eq!(parse_river_reach("Junction=J1"), None);
    }

    #[test]
    fn test_count() {
        assert_eq!(parse_count(" 12"), Some(12));
        assert_eq!(parse_count("3 "), Some(3));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("-2"), None);
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count(""), None);
    }
}
