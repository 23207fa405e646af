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

//! # Greedy Preselector
//!
//! Locks up to `greedy_sections` complete sections (one moderator and the
//! minimum number of students) into the model before the full constraint set
//! is added. Every lock only uses people who marked the slot `Preferred`,
//! and stays within room and moderator capacity.
//!
//! The heuristic is most-constrained-first:
//!
//! 1. Keep, per slot, the number of still unlocked students who prefer it.
//! 2. Take the slot with the smallest count (ties go to the lowest index).
//!    A slot is retired for good when its count drops below the section
//!    minimum, when it has no room left, or when no moderator can take it.
//! 3. Lock the `min` students and the one moderator with the fewest
//!    variable-bearing slots (ties go to the lowest row).
//! 4. Decrement the count of every slot the locked students preferred.
//!
//! Running out of usable slots is not an error: the locks made so far are
//! returned and the solver handles the rest.
//!
//! Locks are hard fixes, and the heuristic never looks at the students it
//! leaves behind. A lock can therefore make an otherwise feasible model
//! infeasible: taking a moderator's last capacity in one slot may strand
//! students who can only attend another one. Callers that need a schedule
//! whenever one exists should retry without preselection.

use crate::{config::SolverConfiguration, variables::DecisionVariables};
use slotwise_mip::model::MipModel;
use slotwise_model::{GreedyLock, PersonIndex, PreferenceModel, Role, SlotIndex};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct GreedyPreselector<'a> {
    preferences: &'a PreferenceModel,
    variables: &'a DecisionVariables,
    config: &'a SolverConfiguration,
}

/// Mutable bookkeeping of one preselection run.
#[derive(Debug, Clone)]
struct GreedyState {
    /// Unlocked students preferring each slot; `None` once retired.
    counters: Vec<Option<usize>>,
    rooms: Vec<usize>,
    moderator_capacity: Vec<usize>,
    /// Row-major (moderator, slot) flags.
    moderator_locked: Vec<bool>,
    student_locked: Vec<bool>,
}

impl<'a> GreedyPreselector<'a> {
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

    /// Computes the locks without touching any model.
    pub fn select(&self) -> Vec<GreedyLock> {
        let limit = self.config.greedy_sections;
        let mut locks = Vec::with_capacity(limit);
        if limit == 0 {
            return locks;
        }

        let mut state = self.initial_state();
        while locks.len() < limit {
            let Some(lock) = self.next_lock(&mut state) else {
                break;
            };
            debug!(
                slot = lock.slot.get(),
                moderator = self.preferences.moderators()[lock.moderator.get()].id(),
                students = lock.students.len(),
                "greedy section locked"
            );
            self.commit(&mut state, &lock);
            locks.push(lock);
        }

        info!(locks = locks.len(), requested = limit, "greedy preselection finished");
        locks
    }

    /// Fixes every locked person/slot variable to `true`.
    pub fn apply(&self, model: &mut MipModel<i64>, locks: &[GreedyLock]) {
        for lock in locks {
            if let Some(cell) = self.variables.moderators.get(lock.moderator, lock.slot) {
                model.fix(cell.var, true);
            }
            for &student in &lock.students {
                if let Some(cell) = self.variables.students.get(student, lock.slot) {
                    model.fix(cell.var, true);
                }
            }
        }
    }

    fn initial_state(&self) -> GreedyState {
        let num_slots = self.preferences.num_slots();
        let counters = self
            .preferences
            .slots()
            .map(|slot| Some(self.preferred_students(slot).count()))
            .collect();

        GreedyState {
            counters,
            rooms: self
                .preferences
                .slots()
                .map(|slot| self.preferences.room_capacity(slot))
                .collect(),
            moderator_capacity: self
                .preferences
                .moderators()
                .iter()
                .map(|m| m.capacity())
                .collect(),
            moderator_locked: vec![false; self.preferences.num_moderators() * num_slots],
            student_locked: vec![false; self.preferences.num_students()],
        }
    }

    /// Students holding a `Preferred` variable in `slot`.
    fn preferred_students(&self, slot: SlotIndex) -> impl Iterator<Item = PersonIndex> + '_ {
        self.variables
            .students
            .column(slot)
            .filter(|cell| cell.tier.is_preferred())
            .map(|cell| cell.person)
    }

    fn eligible_moderators<'s>(
        &'s self,
        state: &'s GreedyState,
        slot: SlotIndex,
    ) -> impl Iterator<Item = PersonIndex> + 's {
        let num_slots = self.preferences.num_slots();
        self.variables
            .moderators
            .column(slot)
            .filter(|cell| cell.tier.is_preferred())
            .map(|cell| cell.person)
            .filter(move |m| {
                state.moderator_capacity[m.get()] > 0
                    && !state.moderator_locked[m.get() * num_slots + slot.get()]
            })
    }

    /// Orders candidates by their number of valid slots, then by row.
    fn most_constrained<I>(&self, role: Role, candidates: I, count: usize) -> Vec<PersonIndex>
    where
        I: Iterator<Item = PersonIndex>,
    {
        let grid = self.variables.grid(role);
        let mut candidates: Vec<(usize, PersonIndex)> =
            candidates.map(|p| (grid.num_valid_slots(p), p)).collect();
        candidates.sort_unstable();
        candidates.into_iter().take(count).map(|(_, p)| p).collect()
    }

    fn next_lock(&self, state: &mut GreedyState) -> Option<GreedyLock> {
        let min = self.config.min_students_per_section;
        loop {
            let (t, count) = state
                .counters
                .iter()
                .enumerate()
                .filter_map(|(t, c)| c.map(|c| (t, c)))
                .min_by_key(|&(t, c)| (c, t))?;
            let slot = SlotIndex::new(t);

            if count < min
                || state.rooms[t] == 0
                || self.eligible_moderators(state, slot).next().is_none()
            {
                state.counters[t] = None;
                continue;
            }

            let students = self.most_constrained(
                Role::Student,
                self.preferred_students(slot)
                    .filter(|s| !state.student_locked[s.get()]),
                min,
            );
            let moderator = self
                .most_constrained(Role::Moderator, self.eligible_moderators(state, slot), 1)
                .first()
                .copied();

            match moderator {
                Some(moderator) if students.len() == min => {
                    return Some(GreedyLock {
                        slot,
                        moderator,
                        students,
                    });
                }
                _ => state.counters[t] = None,
            }
        }
    }

    fn commit(&self, state: &mut GreedyState, lock: &GreedyLock) {
        let num_slots = self.preferences.num_slots();
        let t = lock.slot.get();
        state.rooms[t] -= 1;
        state.moderator_capacity[lock.moderator.get()] -= 1;
        state.moderator_locked[lock.moderator.get() * num_slots + t] = true;

        for &student in &lock.students {
            state.student_locked[student.get()] = true;
            for cell in self.variables.students.row(student) {
                if cell.tier.is_preferred()
                    && let Some(counter) = state.counters[cell.slot.get()].as_mut()
                {
                    *counter = counter.saturating_sub(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{basic_scenario, build_model, build_model_with_rooms};

    fn locks_for(preferences: &PreferenceModel, config: &SolverConfiguration) -> Vec<GreedyLock> {
        let mut model = MipModel::new();
        let variables = DecisionVariables::build(&mut model, preferences, config);
        GreedyPreselector::new(preferences, &variables, config).select()
    }

    #[test]
    fn test_zero_limit_locks_nothing() {
        let preferences = basic_scenario();
        assert!(locks_for(&preferences, &SolverConfiguration::default()).is_empty());
    }

    #[test]
    fn test_locks_follow_fewest_preferred_first() {
        // Slot 1 has fewer preferring students than slot 0.
        let preferences = build_model(
            &[("m1", "PP", 2)],
            &[
                ("a", "PA"),
                ("b", "PA"),
                ("c", "PA"),
                ("d", "PA"),
                ("e", "PA"),
                ("f", "PA"),
                ("g", "PP"),
                ("h", "-P"),
                ("i", "-P"),
                ("j", "-P"),
                ("k", "-P"),
            ],
        );
        let config = SolverConfiguration::default().with_greedy_sections(1);
        let locks = locks_for(&preferences, &config);

        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].slot, SlotIndex::new(1));
        assert_eq!(locks[0].moderator, PersonIndex::new(0));
        let students: Vec<usize> = locks[0].students.iter().map(|s| s.get()).collect();
        // `g` prefers both slots, so it is the least constrained and left out.
        assert_eq!(students, vec![7, 8, 9, 10, 6]);
    }

    #[test]
    fn test_most_constrained_students_are_taken() {
        let preferences = build_model(
            &[("m1", "P-", 1)],
            &[
                ("a", "PA"),
                ("b", "P-"),
                ("c", "PA"),
                ("d", "P-"),
                ("e", "P-"),
                ("f", "PA"),
                ("g", "P-"),
            ],
        );
        let config = SolverConfiguration::default().with_greedy_sections(1);
        let locks = locks_for(&preferences, &config);
        let students: Vec<usize> = locks[0].students.iter().map(|s| s.get()).collect();
        assert_eq!(students, vec![1, 3, 4, 6, 0]);
    }

    #[test]
    fn test_under_delivery_returns_what_is_possible() {
        let preferences = basic_scenario();
        let config = SolverConfiguration::default().with_greedy_sections(10);
        let locks = locks_for(&preferences, &config);

        assert_eq!(locks.len(), 3);
        let slots: Vec<usize> = locks.iter().map(|l| l.slot.get()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        for lock in &locks {
            assert_eq!(lock.moderator.get(), lock.slot.get());
            assert_eq!(lock.students.len(), 5);
        }
    }

    #[test]
    fn test_rooms_and_capacity_bound_the_locks() {
        let ids: Vec<String> = (0..12).map(|i| format!("s{}", i)).collect();
        let students: Vec<(&str, &str)> = ids.iter().map(|id| (id.as_str(), "P")).collect();
        let moderators = [("m1", "P", 1), ("m2", "P", 1)];
        let config = SolverConfiguration::default().with_greedy_sections(5);

        let one_room = build_model_with_rooms(&moderators, &students, vec![1]);
        assert_eq!(locks_for(&one_room, &config).len(), 1);

        let two_rooms = build_model_with_rooms(&moderators, &students, vec![2]);
        let locks = locks_for(&two_rooms, &config);
        assert_eq!(locks.len(), 2);
        assert_ne!(locks[0].moderator, locks[1].moderator);
        assert!(locks[0].students.iter().all(|s| !locks[1].students.contains(s)));
    }

    #[test]
    fn test_apply_fixes_locked_variables() {
        let preferences = basic_scenario();
        let config = SolverConfiguration::default().with_greedy_sections(1);
        let mut model = MipModel::new();
        let variables = DecisionVariables::build(&mut model, &preferences, &config);
        let preselector = GreedyPreselector::new(&preferences, &variables, &config);
        let locks = preselector.select();
        preselector.apply(&mut model, &locks);

        let lock = &locks[0];
        let m = variables.moderators.get(lock.moderator, lock.slot).unwrap();
        assert_eq!(model.fixed_value(m.var), Some(true));
        for &s in &lock.students {
            let cell = variables.students.get(s, lock.slot).unwrap();
            assert_eq!(model.fixed_value(cell.var), Some(true));
        }
        assert!(!model.is_trivially_infeasible());
    }
}
