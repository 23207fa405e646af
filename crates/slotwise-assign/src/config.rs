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

//! # Solver Configuration
//!
//! `SolverConfiguration` is the single value object read by every stage of
//! the pipeline. It is plain data: external loaders can deserialize it from
//! any serde format (missing fields take their defaults), and code can build
//! it fluently:
//!
//! ```rust
//! use slotwise_assign::config::{ContiguousMode, PriorityFunction, SolverConfiguration};
//!
//! let config = SolverConfiguration::default()
//!     .with_priority(PriorityFunction::FirstComeFirstServe)
//!     .with_contiguous(ContiguousMode::PreferredOnly, 0.5)
//!     .with_greedy_sections(4);
//! assert_eq!(config.greedy_sections, 4);
//! ```
//!
//! Call `SolverConfiguration::normalized` before use; it resolves option
//! conflicts and rejects inconsistent section sizes.

use serde::{Deserialize, Serialize};
use slotwise_model::{ModelError, Role};
use std::time::Duration;
use tracing::warn;

/// Which back-to-back slot pairs of a moderator earn the contiguous bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContiguousMode {
    /// No bonus.
    #[default]
    None,
    /// Both slots must be `Preferred`.
    PreferredOnly,
    /// Both slots must carry a decision variable.
    AllPossible,
}

impl std::fmt::Display for ContiguousMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContiguousMode::None => write!(f, "None"),
            ContiguousMode::PreferredOnly => write!(f, "PreferredOnly"),
            ContiguousMode::AllPossible => write!(f, "AllPossible"),
        }
    }
}

/// Scales the cost of an `Acceptable` assignment per person.
///
/// Row indices act as sign-up order: under the first-come-first-serve
/// variants earlier rows are more expensive to disappoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriorityFunction {
    /// Everyone weighs 1.
    #[default]
    Uniform,
    /// Every moderator outweighs all students together.
    ModeratorsFirst,
    /// Earlier rows weigh more; moderators slightly more than students.
    FirstComeFirstServe,
    /// Earlier rows weigh more; every moderator outweighs all students.
    FirstComeFirstServeModeratorsFirst,
}

impl PriorityFunction {
    /// Returns the weight of the person in row `index` of the `role`
    /// population.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index` is not a row of that population.
    pub fn weight(&self, role: Role, index: usize, num_moderators: usize, num_students: usize) -> i64 {
        debug_assert!(
            index
                < match role {
                    Role::Moderator => num_moderators,
                    Role::Student => num_students,
                },
            "called `PriorityFunction::weight` with index out of bounds: the index is {}",
            index
        );

        let mods = num_moderators as i64;
        let students = num_students as i64;
        let i = index as i64;
        match (self, role) {
            (PriorityFunction::Uniform, _) => 1,
            (PriorityFunction::ModeratorsFirst, Role::Moderator) => students + 1,
            (PriorityFunction::ModeratorsFirst, Role::Student) => 1,
            (PriorityFunction::FirstComeFirstServe, Role::Moderator) => (mods - i) + students,
            (PriorityFunction::FirstComeFirstServeModeratorsFirst, Role::Moderator) => {
                students * students / 2 + (mods - i)
            }
            (
                PriorityFunction::FirstComeFirstServe
                | PriorityFunction::FirstComeFirstServeModeratorsFirst,
                Role::Student,
            ) => students - i,
        }
    }
}

impl std::fmt::Display for PriorityFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityFunction::Uniform => write!(f, "Uniform"),
            PriorityFunction::ModeratorsFirst => write!(f, "ModeratorsFirst"),
            PriorityFunction::FirstComeFirstServe => write!(f, "FirstComeFirstServe"),
            PriorityFunction::FirstComeFirstServeModeratorsFirst => {
                write!(f, "FirstComeFirstServeModeratorsFirst")
            }
        }
    }
}

/// Objective weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Cost of an `Acceptable` assignment, multiplied by the priority weight.
    pub acceptable: i64,
    /// Cost of an `Impossible` assignment (only reachable under relaxation).
    pub impossible: i64,
    /// Reward for each back-to-back slot pair of a moderator.
    pub contiguous_bonus: i64,
    /// Reward for each assigned moderator slot when maximising sections.
    pub section_reward: i64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            acceptable: 1,
            impossible: 1_000_000,
            contiguous_bonus: 1,
            section_reward: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfiguration {
    /// Moderators receive exactly their capacity instead of `1..=capacity`.
    pub exact_capacity: bool,
    /// Reward every assigned moderator slot. Ignored under exact capacity.
    pub maximize_sections: bool,
    /// Grant a random subset of `Impossible` pairs a costly variable.
    pub allow_impossible: bool,
    /// Fraction of `Impossible` pairs granted a variable, in `[0, 1]`.
    pub impossible_percentage: f64,
    pub contiguous: ContiguousMode,
    /// Fraction of candidate contiguous pairs that receive the bonus.
    pub contiguous_percentage: f64,
    /// Upper bound on the number of greedily locked sections.
    pub greedy_sections: usize,
    pub min_students_per_section: usize,
    pub max_students_per_section: usize,
    /// Accept a feasible but unproven solution (with a warning).
    pub allow_non_optimal: bool,
    pub priority: PriorityFunction,
    /// Wall-clock budget for the solver. Only the `highs` backend can be
    /// interrupted; `microlp` logs a warning and runs to completion.
    pub time_limit: Option<Duration>,
    pub weights: CostWeights,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            exact_capacity: false,
            maximize_sections: false,
            allow_impossible: false,
            impossible_percentage: 0.0,
            contiguous: ContiguousMode::None,
            contiguous_percentage: 1.0,
            greedy_sections: 0,
            min_students_per_section: 5,
            max_students_per_section: 6,
            allow_non_optimal: false,
            priority: PriorityFunction::Uniform,
            time_limit: None,
            weights: CostWeights::default(),
        }
    }
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl SolverConfiguration {
    pub fn with_exact_capacity(mut self, exact: bool) -> Self {
        self.exact_capacity = exact;
        self
    }

    pub fn with_maximize_sections(mut self, maximize: bool) -> Self {
        self.maximize_sections = maximize;
        self
    }

    /// Enables impossible-pair relaxation with the given fraction.
    pub fn with_impossible_relaxation(mut self, percentage: f64) -> Self {
        self.allow_impossible = true;
        self.impossible_percentage = percentage;
        self
    }

    pub fn with_contiguous(mut self, mode: ContiguousMode, percentage: f64) -> Self {
        self.contiguous = mode;
        self.contiguous_percentage = percentage;
        self
    }

    pub fn with_greedy_sections(mut self, count: usize) -> Self {
        self.greedy_sections = count;
        self
    }

    pub fn with_section_size(mut self, min: usize, max: usize) -> Self {
        self.min_students_per_section = min;
        self.max_students_per_section = max;
        self
    }

    pub fn with_allow_non_optimal(mut self, allow: bool) -> Self {
        self.allow_non_optimal = allow;
        self
    }

    pub fn with_priority(mut self, priority: PriorityFunction) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Returns a copy with all option conflicts resolved.
    ///
    /// Exact capacity takes precedence over section maximisation, and both
    /// percentages are clamped into `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidSectionBounds` if the minimum section size
    /// exceeds the maximum.
    pub fn normalized(&self) -> Result<Self, ModelError> {
        if self.min_students_per_section > self.max_students_per_section {
            return Err(ModelError::InvalidSectionBounds {
                min: self.min_students_per_section,
                max: self.max_students_per_section,
            });
        }

        let mut config = self.clone();
        if config.exact_capacity && config.maximize_sections {
            warn!("exact capacity and section maximisation are mutually exclusive, ignoring section maximisation");
            config.maximize_sections = false;
        }
        config.impossible_percentage = clamp_fraction(config.impossible_percentage);
        config.contiguous_percentage = clamp_fraction(config.contiguous_percentage);
        Ok(config)
    }
}

impl std::fmt::Display for SolverConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverConfiguration(sections: {}..={} students, exact capacity: {}, maximize sections: {}, \
             impossible: {} ({:.2}), contiguous: {} ({:.2}), greedy: {}, priority: {}, allow non-optimal: {})",
            self.min_students_per_section,
            self.max_students_per_section,
            self.exact_capacity,
            self.maximize_sections,
            self.allow_impossible,
            self.impossible_percentage,
            self.contiguous,
            self.contiguous_percentage,
            self.greedy_sections,
            self.priority,
            self.allow_non_optimal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfiguration::default();
        assert_eq!(config.min_students_per_section, 5);
        assert_eq!(config.max_students_per_section, 6);
        assert_eq!(config.contiguous, ContiguousMode::None);
        assert_eq!(config.weights.impossible, 1_000_000);
        assert!(!config.allow_non_optimal);
    }

    #[test]
    fn test_exact_capacity_wins_over_maximize_sections() {
        let config = SolverConfiguration::default()
            .with_exact_capacity(true)
            .with_maximize_sections(true)
            .normalized()
            .unwrap();
        assert!(config.exact_capacity);
        assert!(!config.maximize_sections);
    }

    #[test]
    fn test_percentages_are_clamped() {
        let config = SolverConfiguration::default()
            .with_impossible_relaxation(1.7)
            .with_contiguous(ContiguousMode::AllPossible, f64::NAN)
            .normalized()
            .unwrap();
        assert_eq!(config.impossible_percentage, 1.0);
        assert_eq!(config.contiguous_percentage, 0.0);
    }

    #[test]
    fn test_inverted_section_bounds_are_rejected() {
        let err = SolverConfiguration::default()
            .with_section_size(7, 6)
            .normalized()
            .unwrap_err();
        assert_eq!(err, ModelError::InvalidSectionBounds { min: 7, max: 6 });
    }

    #[test]
    fn test_priority_weights() {
        use PriorityFunction::*;
        // 4 moderators, 10 students.
        assert_eq!(Uniform.weight(Role::Moderator, 0, 4, 10), 1);
        assert_eq!(ModeratorsFirst.weight(Role::Moderator, 2, 4, 10), 11);
        assert_eq!(ModeratorsFirst.weight(Role::Student, 2, 4, 10), 1);
        assert_eq!(FirstComeFirstServe.weight(Role::Moderator, 1, 4, 10), 13);
        assert_eq!(FirstComeFirstServe.weight(Role::Student, 9, 4, 10), 1);
        assert_eq!(FirstComeFirstServeModeratorsFirst.weight(Role::Moderator, 3, 4, 10), 51);
        assert_eq!(FirstComeFirstServeModeratorsFirst.weight(Role::Student, 0, 4, 10), 10);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: SolverConfiguration =
            serde_json::from_str(r#"{ "greedy_sections": 3, "weights": { "acceptable": 2 } }"#).unwrap();
        assert_eq!(config.greedy_sections, 3);
        assert_eq!(config.weights.acceptable, 2);
        assert_eq!(config.weights.impossible, 1_000_000);
        assert_eq!(config.max_students_per_section, 6);
    }
}
