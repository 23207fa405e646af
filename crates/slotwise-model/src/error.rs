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

use crate::person::Role;
use thiserror::Error;

/// Input inconsistencies detected while building a `PreferenceModel`.
///
/// All of these are raised before any solving begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("the problem has no time slots")]
    NoSlots,

    #[error("`{person}` states {found} slot preferences, expected {expected}")]
    SlotCountMismatch {
        person: String,
        expected: usize,
        found: usize,
    },

    #[error("room information covers {found} slots, expected {expected}")]
    RoomSlotMismatch { expected: usize, found: usize },

    #[error("`{0}` appears more than once in the same preference table")]
    DuplicatePerson(String),

    #[error("no capacity entry for: {}", .0.join(", "))]
    MissingCapacities(Vec<String>),

    #[error("{capacities} capacity entries for {moderators} moderators")]
    SurplusCapacities { moderators: usize, capacities: usize },

    #[error(
        "{role} table has {ids} ids but {rows} preference rows; unmatched: {}",
        .unmatched.join(", ")
    )]
    TableRowMismatch {
        role: Role,
        ids: usize,
        rows: usize,
        /// Ids without a row, or `row N` for rows without an id.
        unmatched: Vec<String>,
    },

    #[error("unknown preference marker `{0}`")]
    UnknownPreferenceMarker(String),

    #[error("invalid section size bounds: min {min} exceeds max {max}")]
    InvalidSectionBounds { min: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capacities_lists_every_id() {
        let err = ModelError::MissingCapacities(vec!["amy".into(), "bo".into()]);
        assert_eq!(err.to_string(), "no capacity entry for: amy, bo");
    }

    #[test]
    fn test_table_row_mismatch_message() {
        let err = ModelError::TableRowMismatch {
            role: Role::Student,
            ids: 3,
            rows: 1,
            unmatched: vec!["s2".into(), "s3".into()],
        };
        assert_eq!(
            err.to_string(),
            "student table has 3 ids but 1 preference rows; unmatched: s2, s3"
        );
    }

    #[test]
    fn test_surplus_capacities_message() {
        let err = ModelError::SurplusCapacities {
            moderators: 2,
            capacities: 3,
        };
        assert_eq!(err.to_string(), "3 capacity entries for 2 moderators");
    }

    #[test]
    fn test_slot_count_mismatch_message() {
        let err = ModelError::SlotCountMismatch {
            person: "s1".into(),
            expected: 4,
            found: 3,
        };
        assert_eq!(err.to_string(), "`s1` states 3 slot preferences, expected 4");
    }
}
