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

//! # Constraint Assembler
//!
//! Adds the hard constraints of the assignment problem to a `MipModel`:
//!
//! - moderator capacity: `Σ = capacity` (exact) or `1 ≤ Σ ≤ capacity`;
//! - room capacity: at most `rooms(t)` moderators in slot `t`;
//! - single assignment: every student lands in exactly one slot;
//! - count coupling: with `M` moderators and `S` students in a slot,
//!   `M = 0 ⇒ S = 0` and `M = k ⇒ min·k ≤ S ≤ max·k`.
//!
//! The coupling is a case split on `M`. `MipModel::add_sum_in_set` creates
//! one indicator `y_k` per admissible value `k` of `M`; under each of them
//! `MipModel::add_selector` creates one indicator `z_{k,s}` per admissible
//! student count `s ∈ [min·k, max·k]`, with `Σ_s z_{k,s} = y_k`. A single
//! row `S = Σ s·z_{k,s}` ties the chosen pair to the students. A `k` with no
//! reachable count gets `y_k = 0`. The linear hull `min·M ≤ S ≤ max·M` is
//! added on top; it is implied by the case split and tightens the LP
//! relaxation.
//!
//! Slots without rooms, without eligible moderators or without eligible
//! students get `M = 0` and `S = 0` directly.

use crate::{config::SolverConfiguration, variables::DecisionVariables};
use slotwise_mip::{model::MipModel, var::BoolVar};
use slotwise_model::{PersonIndex, PreferenceModel, SlotIndex};
use tracing::{debug, info};

/// Sizes of what the assembler added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblySummary {
    pub constraints: usize,
    pub indicator_variables: usize,
    pub closed_slots: usize,
}

impl std::fmt::Display for AssemblySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssemblySummary(constraints: {}, indicators: {}, closed slots: {})",
            self.constraints, self.indicator_variables, self.closed_slots
        )
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintAssembler<'a> {
    preferences: &'a PreferenceModel,
    variables: &'a DecisionVariables,
    config: &'a SolverConfiguration,
}

impl<'a> ConstraintAssembler<'a> {
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

    /// Adds every constraint family.
    pub fn assemble(&self, model: &mut MipModel<i64>) -> AssemblySummary {
        let before = model.num_constraints();
        self.add_moderator_capacity(model);
        self.add_room_capacity(model);
        self.add_single_assignment(model);
        let (indicator_variables, closed_slots) = self.add_count_coupling(model);

        let summary = AssemblySummary {
            constraints: model.num_constraints() - before,
            indicator_variables,
            closed_slots,
        };
        info!(
            constraints = summary.constraints,
            indicators = summary.indicator_variables,
            closed_slots = summary.closed_slots,
            "constraints assembled"
        );
        summary
    }

    pub fn add_moderator_capacity(&self, model: &mut MipModel<i64>) {
        for (m, moderator) in self.preferences.moderators().iter().enumerate() {
            let vars = self.variables.moderators.row_vars(PersonIndex::new(m));
            let capacity = moderator.capacity() as i64;
            if self.config.exact_capacity {
                model.add_equality(&vars, capacity);
            } else {
                model.add_linear(vars.iter().map(|&v| (v, 1)), 1, capacity);
            }
        }
    }

    pub fn add_room_capacity(&self, model: &mut MipModel<i64>) {
        for slot in self.preferences.slots() {
            let vars = self.variables.moderators.column_vars(slot);
            if !vars.is_empty() {
                model.add_at_most(&vars, self.preferences.room_capacity(slot) as i64);
            }
        }
    }

    pub fn add_single_assignment(&self, model: &mut MipModel<i64>) {
        for s in 0..self.preferences.num_students() {
            let vars = self.variables.students.row_vars(PersonIndex::new(s));
            model.add_exactly_one(&vars);
        }
    }

    /// Adds the coupling of every slot. Returns the number of indicator
    /// variables created and the number of slots forced empty.
    pub fn add_count_coupling(&self, model: &mut MipModel<i64>) -> (usize, usize) {
        let mut indicators = 0;
        let mut closed = 0;
        for slot in self.preferences.slots() {
            match self.add_slot_coupling(model, slot) {
                Some(n) => indicators += n,
                None => closed += 1,
            }
        }
        (indicators, closed)
    }

    /// Returns `None` if the slot was closed instead of coupled.
    fn add_slot_coupling(&self, model: &mut MipModel<i64>, slot: SlotIndex) -> Option<usize> {
        let moderators = self.variables.moderators.column_vars(slot);
        let students = self.variables.students.column_vars(slot);
        let rooms = self.preferences.room_capacity(slot);

        if rooms == 0 || moderators.is_empty() || students.is_empty() {
            debug!(
                slot = slot.get(),
                rooms,
                moderators = moderators.len(),
                students = students.len(),
                "slot closed"
            );
            force_zero(model, &moderators);
            force_zero(model, &students);
            return None;
        }

        let min = self.config.min_students_per_section;
        let max = self.config.max_students_per_section;
        let mut count = 0;
        let mut link: Vec<(BoolVar, i64)> = students.iter().map(|&s| (s, 1)).collect();

        for (k, selector) in model.add_sum_in_set(&moderators, 0..=rooms) {
            let reachable = (min * k..=max * k).filter(|&s| s <= students.len());
            let branch = model.add_selector(reachable, Some(selector));
            count += 1 + branch.len();
            link.extend(branch.into_iter().map(|(s, z)| (z, -(s as i64))));
        }
        model.add_linear(link, 0, 0);

        // Redundant hull: min·M ≤ S ≤ max·M.
        let num_students = students.len() as i64;
        let hull = |factor: usize| {
            students
                .iter()
                .map(|&s| (s, 1i64))
                .chain(moderators.iter().map(move |&m| (m, -(factor as i64))))
                .collect::<Vec<_>>()
        };
        model.add_linear(hull(min), 0, num_students);
        model.add_linear(hull(max), -((max * moderators.len()) as i64), 0);

        Some(count)
    }
}

fn force_zero(model: &mut MipModel<i64>, vars: &[BoolVar]) {
    if !vars.is_empty() {
        model.add_equality(vars, 0);
    }
}
