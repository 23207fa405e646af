// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Preference tiers.
//!
//! A person states one tier per slot. Tiers are totally ordered by
//! desirability (`Preferred < Acceptable < Impossible` in cost order), which
//! the objective turns into zero, moderate and very large costs.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Poll marker for a preferred slot.
pub const PREFERRED_MARKER: &str = "OK";
/// Poll marker for a slot that works but is not preferred.
pub const ACCEPTABLE_MARKER: &str = "(OK)";
/// Poll marker (empty cell) for a slot that does not work.
pub const IMPOSSIBLE_MARKER: &str = "";

/// How desirable a slot is for a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PreferenceTier {
    Preferred,
    Acceptable,
    Impossible,
}

impl PreferenceTier {
    /// Parses a poll cell. Surrounding whitespace is ignored.
    ///
    /// ```rust
    /// use slotwise_model::PreferenceTier;
    ///
    /// assert_eq!(PreferenceTier::from_poll_marker("OK").unwrap(), PreferenceTier::Preferred);
    /// assert_eq!(PreferenceTier::from_poll_marker("(OK)").unwrap(), PreferenceTier::Acceptable);
    /// assert_eq!(PreferenceTier::from_poll_marker("").unwrap(), PreferenceTier::Impossible);
    /// ```
    pub fn from_poll_marker(marker: &str) -> Result<Self, ModelError> {
        match marker.trim() {
            PREFERRED_MARKER => Ok(PreferenceTier::Preferred),
            ACCEPTABLE_MARKER => Ok(PreferenceTier::Acceptable),
            IMPOSSIBLE_MARKER => Ok(PreferenceTier::Impossible),
            other => Err(ModelError::UnknownPreferenceMarker(other.to_string())),
        }
    }

    /// Returns the poll marker that encodes this tier.
    #[inline]
    pub const fn poll_marker(&self) -> &'static str {
        match self {
            PreferenceTier::Preferred => PREFERRED_MARKER,
            PreferenceTier::Acceptable => ACCEPTABLE_MARKER,
            PreferenceTier::Impossible => IMPOSSIBLE_MARKER,
        }
    }

    #[inline]
    pub const fn is_preferred(&self) -> bool {
        matches!(self, PreferenceTier::Preferred)
    }

    #[inline]
    pub const fn is_impossible(&self) -> bool {
        matches!(self, PreferenceTier::Impossible)
    }

    /// Returns `true` for every tier a person can be placed into without
    /// relaxation.
    #[inline]
    pub const fn is_possible(&self) -> bool {
        !self.is_impossible()
    }
}

impl std::fmt::Display for PreferenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceTier::Preferred => write!(f, "Preferred"),
            PreferenceTier::Acceptable => write!(f, "Acceptable"),
            PreferenceTier::Impossible => write!(f, "Impossible"),
        }
    }
}

impl std::str::FromStr for PreferenceTier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_poll_marker(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_round_trip_through_parse() {
        for tier in [
            PreferenceTier::Preferred,
            PreferenceTier::Acceptable,
            PreferenceTier::Impossible,
        ] {
            assert_eq!(PreferenceTier::from_poll_marker(tier.poll_marker()), Ok(tier));
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            " OK ".parse::<PreferenceTier>(),
            Ok(PreferenceTier::Preferred)
        );
        assert_eq!("  ".parse::<PreferenceTier>(), Ok(PreferenceTier::Impossible));
    }

    #[test]
    fn test_unknown_marker_is_rejected() {
        assert_eq!(
            PreferenceTier::from_poll_marker("maybe"),
            Err(ModelError::UnknownPreferenceMarker("maybe".into()))
        );
    }

    #[test]
    fn test_desirability_order() {
        assert!(PreferenceTier::Preferred < PreferenceTier::Acceptable);
        assert!(PreferenceTier::Acceptable < PreferenceTier::Impossible);
        assert!(PreferenceTier::Acceptable.is_possible());
        assert!(!PreferenceTier::Impossible.is_possible());
    }
}
