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

//! # Decision-Variable Builder
//!
//! Maps every (person, slot) pair of both populations either to a boolean
//! solver variable or to "no variable". Pairs without a variable can never be
//! assigned; this is how `Impossible` pairs are forbidden structurally rather
//! than by a constraint.
//!
//! Under impossible-pair relaxation a pseudo-random subset of `Impossible`
//! pairs is granted a variable as well. One draw is taken per cell in
//! row-major order, whatever the cell's tier, so the subset only depends on
//! the table shape and `RELAXATION_SEED`.

use crate::config::SolverConfiguration;
use rand::Rng;
use slotwise_core::seed::NamedSeed;
use slotwise_mip::{model::MipModel, var::BoolVar};
use slotwise_model::{PersonIndex, PreferenceModel, PreferenceTier, Role, SlotIndex};

/// Seed of the impossible-pair relaxation. Both populations restart it.
pub const RELAXATION_SEED: NamedSeed = NamedSeed::new("slotwise impossible slot selection");

/// A solver variable bound to one (person, slot) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAssignmentVariable {
    pub var: BoolVar,
    pub role: Role,
    pub person: PersonIndex,
    pub slot: SlotIndex,
    pub tier: PreferenceTier,
}

impl std::fmt::Display for SlotAssignmentVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} @ slot {} ({}) -> {}",
            self.role,
            self.person.get(),
            self.slot.get(),
            self.tier,
            self.var
        )
    }
}

/// The variables of one population, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableGrid {
    role: Role,
    num_people: usize,
    num_slots: usize,
    cells: Vec<Option<SlotAssignmentVariable>>,
}

impl VariableGrid {
    /// Creates the variables of the `role` population inside `model`.
    pub fn build(
        model: &mut MipModel<i64>,
        preferences: &PreferenceModel,
        role: Role,
        config: &SolverConfiguration,
    ) -> Self {
        let people = preferences.population(role);
        let num_slots = preferences.num_slots();
        let mut rng = RELAXATION_SEED.rng();
        let mut cells = Vec::with_capacity(people.len() * num_slots);

        for (p, person) in people.iter().enumerate() {
            for slot in preferences.slots() {
                let tier = person.tier(slot);
                let draw: f64 = rng.r#gen();
                let relaxed = config.allow_impossible && draw < config.impossible_percentage;

                if tier.is_possible() || relaxed {
                    let var = model.new_named_bool_var(format!("{}:{}@{}", role, person.id(), slot.get()));
                    cells.push(Some(SlotAssignmentVariable {
                        var,
                        role,
                        person: PersonIndex::new(p),
                        slot,
                        tier,
                    }));
                } else {
                    cells.push(None);
                }
            }
        }

        Self {
            role,
            num_people: people.len(),
            num_slots,
            cells,
        }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn num_people(&self) -> usize {
        self.num_people
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Returns the variable of `person` in `slot`, if the pair has one.
    ///
    /// # Panics
    ///
    /// Panics if `person` or `slot` is out of bounds.
    #[inline]
    pub fn get(&self, person: PersonIndex, slot: SlotIndex) -> Option<&SlotAssignmentVariable> {
        assert!(
            person.get() < self.num_people,
            "called `VariableGrid::get` with person index out of bounds: the len is {} but the index is {}",
            self.num_people,
            person.get()
        );
        assert!(
            slot.get() < self.num_slots,
            "called `VariableGrid::get` with slot index out of bounds: the len is {} but the index is {}",
            self.num_slots,
            slot.get()
        );
        self.cells[person.get() * self.num_slots + slot.get()].as_ref()
    }

    /// Iterates the variables of one person, in slot order.
    pub fn row(&self, person: PersonIndex) -> impl Iterator<Item = &SlotAssignmentVariable> + '_ {
        let start = person.get() * self.num_slots;
        self.cells[start..start + self.num_slots].iter().flatten()
    }

    /// Iterates the variables of one slot, in person order.
    pub fn column(&self, slot: SlotIndex) -> impl Iterator<Item = &SlotAssignmentVariable> + '_ {
        self.cells
            .iter()
            .skip(slot.get())
            .step_by(self.num_slots.max(1))
            .flatten()
    }

    /// Collects the solver variables of one slot.
    pub fn column_vars(&self, slot: SlotIndex) -> Vec<BoolVar> {
        self.column(slot).map(|v| v.var).collect()
    }

    /// Collects the solver variables of one person.
    pub fn row_vars(&self, person: PersonIndex) -> Vec<BoolVar> {
        self.row(person).map(|v| v.var).collect()
    }

    /// Iterates every variable, row-major.
    pub fn iter(&self) -> impl Iterator<Item = &SlotAssignmentVariable> + '_ {
        self.cells.iter().flatten()
    }

    /// Number of slots in which `person` has a variable.
    #[inline]
    pub fn num_valid_slots(&self, person: PersonIndex) -> usize {
        self.row(person).count()
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.iter().count()
    }
}

/// The variables of both populations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionVariables {
    pub moderators: VariableGrid,
    pub students: VariableGrid,
}

impl DecisionVariables {
    pub fn build(
        model: &mut MipModel<i64>,
        preferences: &PreferenceModel,
        config: &SolverConfiguration,
    ) -> Self {
        let moderators = VariableGrid::build(model, preferences, Role::Moderator, config);
        let students = VariableGrid::build(model, preferences, Role::Student, config);
        Self {
            moderators,
            students,
        }
    }

    #[inline]
    pub fn grid(&self, role: Role) -> &VariableGrid {
        match role {
            Role::Moderator => &self.moderators,
            Role::Student => &self.students,
        }
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.moderators.num_variables() + self.students.num_variables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::build_model;

    fn sample() -> PreferenceModel {
        build_model(
            &[("m1", "PA-", 1), ("m2", "--P", 1)],
            &[("s1", "P--"), ("s2", "APA"), ("s3", "-A-")],
        )
    }

    #[test]
    fn test_impossible_pairs_have_no_variable() {
        let preferences = sample();
        let mut model = MipModel::new();
        let vars = DecisionVariables::build(&mut model, &preferences, &SolverConfiguration::default());

        assert_eq!(vars.moderators.num_variables(), 3);
        assert_eq!(vars.students.num_variables(), 5);
        assert_eq!(model.num_vars(), 8);

        assert!(vars.moderators.get(PersonIndex::new(0), SlotIndex::new(2)).is_none());
        let cell = vars.students.get(PersonIndex::new(1), SlotIndex::new(1)).unwrap();
        assert_eq!(cell.tier, PreferenceTier::Preferred);
        assert_eq!(cell.role, Role::Student);
        assert_eq!(model.name(cell.var), Some("student:s2@1"));
    }

    #[test]
    fn test_rows_and_columns() {
        let preferences = sample();
        let mut model = MipModel::new();
        let vars = DecisionVariables::build(&mut model, &preferences, &SolverConfiguration::default());

        let column: Vec<usize> = vars
            .students
            .column(SlotIndex::new(1))
            .map(|v| v.person.get())
            .collect();
        assert_eq!(column, vec![1, 2]);
        assert_eq!(vars.students.num_valid_slots(PersonIndex::new(1)), 3);
        assert_eq!(vars.moderators.row_vars(PersonIndex::new(0)).len(), 2);
        assert_eq!(vars.num_variables(), 8);
    }

    #[test]
    fn test_full_relaxation_covers_every_pair() {
        let preferences = sample();
        let mut model = MipModel::new();
        let config = SolverConfiguration::default().with_impossible_relaxation(1.0);
        let vars = DecisionVariables::build(&mut model, &preferences, &config);

        assert_eq!(vars.moderators.num_variables(), 6);
        assert_eq!(vars.students.num_variables(), 9);
        let cell = vars.moderators.get(PersonIndex::new(1), SlotIndex::new(0)).unwrap();
        assert_eq!(cell.tier, PreferenceTier::Impossible);
    }

    #[test]
    fn test_relaxation_without_permission_adds_nothing() {
        let preferences = sample();
        let mut model = MipModel::new();
        let mut config = SolverConfiguration::default();
        config.impossible_percentage = 1.0;
        let vars = DecisionVariables::build(&mut model, &preferences, &config);
        assert_eq!(vars.num_variables(), 8);
    }

    #[test]
    fn test_partial_relaxation_is_reproducible() {
        let never = "-".repeat(12);
        let always = "P".repeat(12);
        let preferences = build_model(
            &[("m", never.as_str(), 1)],
            &[("a", never.as_str()), ("b", always.as_str())],
        );
        let config = SolverConfiguration::default().with_impossible_relaxation(0.5);

        let mut m1 = MipModel::new();
        let mut m2 = MipModel::new();
        let v1 = DecisionVariables::build(&mut m1, &preferences, &config);
        let v2 = DecisionVariables::build(&mut m2, &preferences, &config);
        assert_eq!(v1, v2);

        assert_eq!(v1.students.num_valid_slots(PersonIndex::new(1)), 12);
        // Both populations restart the same stream, so the first rows agree.
        let mod_slots: Vec<SlotIndex> = v1.moderators.row(PersonIndex::new(0)).map(|v| v.slot).collect();
        let student_slots: Vec<SlotIndex> = v1.students.row(PersonIndex::new(0)).map(|v| v.slot).collect();
        assert_eq!(mod_slots, student_slots);
    }
}
