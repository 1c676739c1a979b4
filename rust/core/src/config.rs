// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser configuration passed explicitly at construction.

/// Which lines may cut a point list short before its declared count is met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TruncationPolicy {
    /// Only boundary tokens (and blank lines) end a point list early.
    BoundaryOnly,
    /// Any label of the current feature's field catalog also ends it.
    #[default]
    KnownLabels,
}

/// Parser configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseConfig {
    /// Emit one `info` event per imported feature instead of `debug`.
    pub verbose: bool,
    /// Terminators honoured inside point-list data.
    pub truncation: TruncationPolicy,
}

impl ParseConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the truncation policy for point lists
    pub fn with_truncation(mut self, policy: TruncationPolicy) -> Self {
        self.truncation = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParseConfig::default();
        assert!(!config.verbose);
        assert_eq!(config.truncation, TruncationPolicy::KnownLabels);
    }

    #[test]
    fn test_builder() {
        let config = ParseConfig::new()
            .with_verbose(true)
            .with_truncation(TruncationPolicy::BoundaryOnly);
        assert!(config.verbose);
        assert_eq!(config.truncation, TruncationPolicy::BoundaryOnly);
    }
}
