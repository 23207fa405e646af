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

//! # Objective / Cost Model
//!
//! Builds the minimised objective:
//!
//! - `Acceptable` assignment: `weights.acceptable × priority(person)`;
//! - `Impossible` assignment (relaxation only): `weights.impossible`;
//! - contiguous bonus: `-weights.contiguous_bonus` on `z = ⌊(x + y) / 2⌋`
//!   for sampled back-to-back slot pairs `(x, y)` of the same moderator;
//! - section maximisation: `-weights.section_reward` per moderator variable.
//!
//! The constant offset is the sum of the magnitudes of all negative
//! coefficients, so every objective value is non-negative.

use crate::{
    config::{ContiguousMode, SolverConfiguration},
    variables::{DecisionVariables, VariableGrid},
};
use rand::Rng;
use slotwise_core::seed::NamedSeed;
use slotwise_mip::{model::MipModel, var::BoolVar};
use slotwise_model::{PersonIndex, PreferenceModel, PreferenceTier, SlotIndex};
use tracing::info;

/// Seed of the contiguous-pair sampling.
pub const CONTIGUOUS_SEED: NamedSeed = NamedSeed::new("slotwise contiguous section selection");

/// Sizes of what the cost model added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectiveSummary {
    pub weighted_terms: usize,
    pub contiguous_pairs: usize,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct CostModel<'a> {
    preferences: &'a PreferenceModel,
    variables: &'a DecisionVariables,
    config: &'a SolverConfiguration,
}

impl<'a> CostModel<'a> {
    pub fn new(
        preferences: &'a PreferenceModel,
        variables: &'a DecisionVariables,
        config: &'a SolverConfiguration,
    ) -> Self {
        Self {
            preferences,
            variables,
            config,
        }
    }

    pub fn apply(&self, model: &mut MipModel<i64>) -> ObjectiveSummary {
        let mut terms = self.tier_terms(&self.variables.moderators);
        terms.extend(self.tier_terms(&self.variables.students));

        if self.config.maximize_sections {
            let reward = self.config.weights.section_reward;
            terms.extend(self.variables.moderators.iter().map(|cell| (cell.var, -reward)));
        }

        let contiguous_pairs = self.add_contiguous_bonus(model, &mut terms);
        let weighted_terms = terms.len();
        model.minimize(terms, 0);

        let offset: i64 = model
            .objective_coefficients()
            .iter()
            .filter(|&&c| c < 0)
            .map(|&c| -c)
            .sum();
        model.minimize(std::iter::empty(), offset);

        let summary = ObjectiveSummary {
            weighted_terms,
            contiguous_pairs,
            offset,
        };
        info!(
            terms = summary.weighted_terms,
            contiguous_pairs = summary.contiguous_pairs,
            offset = summary.offset,
            priority = %self.config.priority,
            "objective built"
        );
        summary
    }

    /// The cost of one person/slot variable given its tier.
    pub fn tier_cost(&self, grid: &VariableGrid, person: PersonIndex, tier: PreferenceTier) -> i64 {
        let weights = &self.config.weights;
        match tier {
            PreferenceTier::Preferred => 0,
            PreferenceTier::Acceptable => {
                weights.acceptable
                    * self.config.priority.weight(
                        grid.role(),
                        person.get(),
                        self.preferences.num_moderators(),
                        self.preferences.num_students(),
                    )
            }
            PreferenceTier::Impossible => weights.impossible,
        }
    }

    fn tier_terms(&self, grid: &VariableGrid) -> Vec<(BoolVar, i64)> {
        grid.iter()
            .map(|cell| (cell.var, self.tier_cost(grid, cell.person, cell.tier)))
            .filter(|&(_, cost)| cost != 0)
            .collect()
    }

    fn is_contiguous_candidate(&self, moderator: PersonIndex, first: SlotIndex, second: SlotIndex) -> bool {
        let grid = &self.variables.moderators;
        let (Some(x), Some(y)) = (grid.get(moderator, first), grid.get(moderator, second)) else {
            return false;
        };
        match self.config.contiguous {
            ContiguousMode::None => false,
            ContiguousMode::PreferredOnly => x.tier.is_preferred() && y.tier.is_preferred(),
            ContiguousMode::AllPossible => true,
        }
    }

    /// Adds the floor-half indicators of sampled pairs. Returns the number
    /// of rewarded pairs.
    fn add_contiguous_bonus(&self, model: &mut MipModel<i64>, terms: &mut Vec<(BoolVar, i64)>) -> usize {
        if self.config.contiguous == ContiguousMode::None {
            return 0;
        }

        let grid = &self.variables.moderators;
        let bonus = self.config.weights.contiguous_bonus;
        let mut rng = CONTIGUOUS_SEED.rng();
        let mut pairs = 0;

        for m in 0..grid.num_people() {
            let moderator = PersonIndex::new(m);
            for t in 1..grid.num_slots() {
                let (first, second) = (SlotIndex::new(t - 1), SlotIndex::new(t));
                if !self.is_contiguous_candidate(moderator, first, second) {
                    continue;
                }
                let draw: f64 = rng.r#gen();
                if draw >= self.config.contiguous_percentage {
                    continue;
                }
                let (Some(x), Some(y)) = (grid.get(moderator, first), grid.get(moderator, second)) else {
                    continue;
                };
                let both = model.add_floor_half(x.var, y.var);
                terms.push((both, -bonus));
                pairs += 1;
            }
        }
        pairs
    }
}
