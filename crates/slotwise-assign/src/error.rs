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

use slotwise_model::ModelError;
use thiserror::Error;

/// Failures of the assignment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("no assignment satisfies every constraint")]
    Infeasible,

    #[error(
        "the solver stopped before proving optimality (objective {objective}, {reason}); \
         allow non-optimal solutions to accept it"
    )]
    NotProvenOptimal { objective: i64, reason: String },

    #[error("the solver stopped without finding an assignment: {0}")]
    Aborted(String),

    #[error("slot {slot} holds {students} students but no moderator")]
    UnstaffedSlot { slot: usize, students: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_are_transparent() {
        let err: AssignError = ModelError::NoSlots.into();
        assert_eq!(err.to_string(), ModelError::NoSlots.to_string());
    }

    #[test]
    fn test_not_proven_optimal_mentions_override() {
        let err = AssignError::NotProvenOptimal {
            objective: 12,
            reason: "time limit exceeded".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("objective 12"));
        assert!(msg.contains("allow non-optimal"));
    }
}
