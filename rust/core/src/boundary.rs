// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feature boundary detection
//!
//! A fixed set of line prefixes always opens a new top-level feature. Every
//! multi-line reader consults this before treating a line as its own data.

/// Prefixes that start a top-level feature, in match order
pub const BOUNDARY_TOKENS: [&str; 10] = [
    "River Reach=",
    "Type RM Length L Ch R =",
    "Storage Area=",
    "SA/2D Flow Area=",
    "Lateral Weir Pos=",
    "Culvert=",
    "Bridge=",
    "Inline Structure=",
    "Junction=",
    "Boundary=",
];

/// Stateless boundary test over [`BOUNDARY_TOKENS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryOracle;

impl BoundaryOracle {
    pub fn new() -> Self {
        Self
    }

    /// True if `line` (leading whitespace ignored) opens a new feature
    #[inline]
    pub fn is_boundary(&self, line: &str) -> bool {
        self.token_of(line).is_some()
    }

    /// The boundary token `line` starts with, if any
    pub fn token_of(&self, line: &str) -> Option<&'static str> {
        let stripped = line.trim_start();
        BOUNDARY_TOKENS
            .iter()
            .copied()
            .find(|token| stripped.starts_with(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_is_a_boundary() {
        let oracle = BoundaryOracle::new();
        for token in BOUNDARY_TOKENS {
            let line = format!("{}something", token);
            assert!(oracle.is_boundary(&line), "{} should be a boundary", token);
            assert_eq!(oracle.token_of(&line), Some(token));
        }
    }

    #[test]
    fn test_leading_whitespace_is_ignored() {
        let oracle = BoundaryOracle::new();
        assert!(oracle.is_boundary("  Storage Area=SA1,,"));
    }

    #[test]
    fn test_fields_and_data_are_not_boundaries() {
        let oracle = BoundaryOracle::new();
        assert!(!oracle.is_boundary("Storage Area Type= 0"));
        assert!(!oracle.is_boundary("Lateral Weir Type=1 "));
        assert!(!oracle.is_boundary("       0  1040.5"));
        assert!(!oracle.is_boundary(""));
        assert!(!oracle.is_boundary("storage area=lowercase"));
    }
}
