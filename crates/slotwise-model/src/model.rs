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

use crate::{
    error::ModelError,
    index::{PersonIndex, SlotIndex},
    person::{Person, Role},
    rooms::RoomCapacity,
    tier::PreferenceTier,
};
use rustc_hash::FxHashSet;

/// One preference table as produced by a poll loader: one row of tiers per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTable {
    pub ids: Vec<String>,
    pub tiers: Vec<Vec<PreferenceTier>>,
}

impl PreferenceTable {
    pub fn new(ids: Vec<String>, tiers: Vec<Vec<PreferenceTier>>) -> Self {
        Self { ids, tiers }
    }

    /// Checks that every id has exactly one tier row.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TableRowMismatch` naming the ids without a row,
    /// or the positions (1-based) of the rows without an id.
    pub fn check_rows(&self, role: Role) -> Result<(), ModelError> {
        if self.ids.len() == self.tiers.len() {
            return Ok(());
        }
        let unmatched = if self.ids.len() > self.tiers.len() {
            self.ids[self.tiers.len()..].to_vec()
        } else {
            (self.ids.len()..self.tiers.len())
                .map(|i| format!("row {}", i + 1))
                .collect()
        };
        Err(ModelError::TableRowMismatch {
            role,
            ids: self.ids.len(),
            rows: self.tiers.len(),
            unmatched,
        })
    }

    /// Returns the number of slots stated by the first row, if any.
    #[inline]
    pub fn num_slots(&self) -> Option<usize> {
        self.tiers.first().map(Vec::len)
    }
}

/// Slot labels and the rooms available in each slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomInfo {
    pub slot_labels: Vec<String>,
    pub rooms: Vec<RoomCapacity>,
}

/// The validated, immutable input of one assignment run.
///
/// Moderators and students are kept in two separate populations, each
/// addressed by `PersonIndex` in input row order. Every person states exactly
/// `num_slots()` tiers and every slot has a `RoomCapacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceModel {
    num_slots: usize,
    moderators: Vec<Person>,
    students: Vec<Person>,
    rooms: Vec<RoomCapacity>,
    slot_labels: Vec<String>,
}

impl PreferenceModel {
    /// Assembles a model from loader output.
    ///
    /// The slot count is taken from the first moderator row (or the first
    /// student row when there are no moderators); every other row, and the
    /// room information if present, must agree with it.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` when the tables are inconsistent, or when the
    /// number of capacities does not match the number of moderators.
    pub fn from_tables(
        moderators: PreferenceTable,
        moderator_capacities: Vec<usize>,
        students: PreferenceTable,
        room_info: Option<RoomInfo>,
    ) -> Result<Self, ModelError> {
        moderators.check_rows(Role::Moderator)?;
        students.check_rows(Role::Student)?;

        let num_slots = moderators
            .num_slots()
            .or_else(|| students.num_slots())
            .ok_or(ModelError::NoSlots)?;

        if moderator_capacities.len() < moderators.ids.len() {
            let missing = moderators
                .ids
                .iter()
                .skip(moderator_capacities.len())
                .cloned()
                .collect();
            return Err(ModelError::MissingCapacities(missing));
        }
        if moderator_capacities.len() > moderators.ids.len() {
            return Err(ModelError::SurplusCapacities {
                moderators: moderators.ids.len(),
                capacities: moderator_capacities.len(),
            });
        }

        let mut builder = PreferenceModelBuilder::new(num_slots);
        for ((id, tiers), capacity) in moderators
            .ids
            .into_iter()
            .zip(moderators.tiers)
            .zip(moderator_capacities)
        {
            builder.add_moderator(Person::new(id, tiers, capacity));
        }
        for (id, tiers) in students.ids.into_iter().zip(students.tiers) {
            builder.add_student(Person::student(id, tiers));
        }
        if let Some(info) = room_info {
            builder.set_slot_labels(info.slot_labels);
            builder.set_rooms(info.rooms);
        }
        builder.build()
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Iterates all slot indices in order.
    #[inline]
    pub fn slots(&self) -> impl DoubleEndedIterator<Item = SlotIndex> + ExactSizeIterator {
        SlotIndex::range(self.num_slots)
    }

    #[inline]
    pub fn moderators(&self) -> &[Person] {
        &self.moderators
    }

    #[inline]
    pub fn students(&self) -> &[Person] {
        &self.students
    }

    #[inline]
    pub fn num_moderators(&self) -> usize {
        self.moderators.len()
    }

    #[inline]
    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    /// Returns the population playing `role`.
    #[inline]
    pub fn population(&self, role: Role) -> &[Person] {
        match role {
            Role::Moderator => &self.moderators,
            Role::Student => &self.students,
        }
    }

    /// Returns a person of the given population.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..population(role).len()`.
    #[inline]
    pub fn person(&self, role: Role, index: PersonIndex) -> &Person {
        let population = self.population(role);
        let i = index.get();
        assert!(
            i < population.len(),
            "called `PreferenceModel::person` with {} index out of bounds: the len is {} but the index is {}",
            role,
            population.len(),
            i
        );
        &population[i]
    }

    /// Returns the room capacity of `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not in `0..num_slots()`.
    #[inline]
    pub fn rooms(&self, slot: SlotIndex) -> &RoomCapacity {
        let i = slot.get();
        assert!(
            i < self.num_slots,
            "called `PreferenceModel::rooms` with slot index out of bounds: the len is {} but the index is {}",
            self.num_slots,
            i
        );
        &self.rooms[i]
    }

    /// Returns how many sections `slot` can host at once.
    #[inline]
    pub fn room_capacity(&self, slot: SlotIndex) -> usize {
        self.rooms(slot).capacity()
    }

    #[inline]
    pub fn slot_label(&self, slot: SlotIndex) -> &str {
        &self.slot_labels[slot.get()]
    }

    #[inline]
    pub fn slot_labels(&self) -> &[String] {
        &self.slot_labels
    }

    /// Sum of the moderator capacities, an upper bound on the number of
    /// sections any schedule can contain.
    pub fn total_moderator_capacity(&self) -> usize {
        self.moderators.iter().map(Person::capacity).sum()
    }
}

impl std::fmt::Display for PreferenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PreferenceModel(num_moderators: {}, num_students: {}, num_slots: {})",
            self.num_moderators(),
            self.num_students(),
            self.num_slots
        )
    }
}

/// Incrementally collects people and room information for a `PreferenceModel`.
///
/// Rooms default to `RoomCapacity::default()` for every slot and slot labels
/// default to `Slot 1` … `Slot n`.
///
/// ```rust
/// use slotwise_model::{Person, PreferenceModelBuilder, PreferenceTier::*};
///
/// let mut builder = PreferenceModelBuilder::new(2);
/// builder
///     .add_moderator(Person::new("m", vec![Preferred, Acceptable], 1))
///     .add_student(Person::student("s", vec![Impossible, Preferred]));
/// let model = builder.build().unwrap();
/// assert_eq!(model.num_moderators(), 1);
/// assert_eq!(model.slot_labels(), &["Slot 1", "Slot 2"]);
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceModelBuilder {
    num_slots: usize,
    moderators: Vec<Person>,
    students: Vec<Person>,
    rooms: Option<Vec<RoomCapacity>>,
    slot_labels: Option<Vec<String>>,
}

impl PreferenceModelBuilder {
    pub fn new(num_slots: usize) -> Self {
        Self {
            num_slots,
            moderators: Vec::new(),
            students: Vec::new(),
            rooms: None,
            slot_labels: None,
        }
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn add_moderator(&mut self, person: Person) -> &mut Self {
        self.moderators.push(person);
        self
    }

    pub fn add_student(&mut self, person: Person) -> &mut Self {
        self.students.push(person);
        self
    }

    /// Sets the room capacity of every slot at once.
    pub fn set_rooms(&mut self, rooms: Vec<RoomCapacity>) -> &mut Self {
        self.rooms = Some(rooms);
        self
    }

    /// Sets the room capacity of a single slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not in `0..num_slots()`.
    pub fn set_room_capacity(&mut self, slot: SlotIndex, rooms: RoomCapacity) -> &mut Self {
        let i = slot.get();
        assert!(
            i < self.num_slots,
            "called `PreferenceModelBuilder::set_room_capacity` with slot index out of bounds: the len is {} but the index is {}",
            self.num_slots,
            i
        );
        let num_slots = self.num_slots;
        self.rooms
            .get_or_insert_with(|| vec![RoomCapacity::default(); num_slots])[i] = rooms;
        self
    }

    pub fn set_slot_labels(&mut self, labels: Vec<String>) -> &mut Self {
        self.slot_labels = Some(labels);
        self
    }

    /// Validates the collected data and freezes it.
    ///
    /// # Errors
    ///
    /// - `NoSlots` if the model has zero slots.
    /// - `SlotCountMismatch` if a person's row length differs from the slot count.
    /// - `DuplicatePerson` if an id occurs twice within one population.
    /// - `RoomSlotMismatch` if rooms or labels do not cover every slot.
    pub fn build(self) -> Result<PreferenceModel, ModelError> {
        if self.num_slots == 0 {
            return Err(ModelError::NoSlots);
        }

        for population in [&self.moderators, &self.students] {
            let mut seen = FxHashSet::default();
            for person in population {
                if person.num_slots() != self.num_slots {
                    return Err(ModelError::SlotCountMismatch {
                        person: person.id().to_string(),
                        expected: self.num_slots,
                        found: person.num_slots(),
                    });
                }
                if !seen.insert(person.id()) {
                    return Err(ModelError::DuplicatePerson(person.id().to_string()));
                }
            }
        }

        let rooms = match self.rooms {
            Some(rooms) if rooms.len() != self.num_slots => {
                return Err(ModelError::RoomSlotMismatch {
                    expected: self.num_slots,
                    found: rooms.len(),
                });
            }
            Some(rooms) => rooms,
            None => vec![RoomCapacity::default(); self.num_slots],
        };

        let slot_labels = match self.slot_labels {
            Some(labels) if labels.len() != self.num_slots => {
                return Err(ModelError::RoomSlotMismatch {
                    expected: self.num_slots,
                    found: labels.len(),
                });
            }
            Some(labels) => labels,
            None => (1..=self.num_slots).map(|i| format!("Slot {}", i)).collect(),
        };

        Ok(PreferenceModel {
            num_slots: self.num_slots,
            moderators: self.moderators,
            students: self.students,
            rooms,
            slot_labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::{DEFAULT_ROOMS_PER_SLOT, Room};
    use PreferenceTier::*;

    fn table(rows: &[(&str, Vec<PreferenceTier>)]) -> PreferenceTable {
        PreferenceTable::new(
            rows.iter().map(|(id, _)| id.to_string()).collect(),
            rows.iter().map(|(_, t)| t.clone()).collect(),
        )
    }

    #[test]
    fn test_from_tables_builds_both_populations() {
        let mods = table(&[("m1", vec![Preferred, Acceptable]), ("m2", vec![Impossible, Preferred])]);
        let studs = table(&[("s1", vec![Preferred, Preferred])]);
        let model = PreferenceModel::from_tables(mods, vec![2, 1], studs, None).unwrap();

        assert_eq!(model.num_slots(), 2);
        assert_eq!(model.num_moderators(), 2);
        assert_eq!(model.num_students(), 1);
        assert_eq!(model.person(Role::Moderator, PersonIndex::new(0)).capacity(), 2);
        assert_eq!(model.person(Role::Student, PersonIndex::new(0)).capacity(), 1);
        assert_eq!(model.total_moderator_capacity(), 3);
        assert_eq!(model.room_capacity(SlotIndex::new(1)), DEFAULT_ROOMS_PER_SLOT);
    }

    #[test]
    fn test_mismatched_slot_counts_are_rejected() {
        let mods = table(&[("m1", vec![Preferred, Acceptable])]);
        let studs = table(&[("s1", vec![Preferred, Preferred, Preferred])]);
        let err = PreferenceModel::from_tables(mods, vec![1], studs, None).unwrap_err();
        assert_eq!(
            err,
            ModelError::SlotCountMismatch {
                person: "s1".to_string(),
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_empty_tables_have_no_slots() {
        let err = PreferenceModel::from_tables(
            PreferenceTable::default(),
            vec![],
            PreferenceTable::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, ModelError::NoSlots);
    }

    #[test]
    fn test_short_capacity_list_names_the_uncovered_moderators() {
        let mods = table(&[("m1", vec![Preferred]), ("m2", vec![Preferred])]);
        let err = PreferenceModel::from_tables(mods, vec![1], PreferenceTable::default(), None)
            .unwrap_err();
        assert_eq!(err, ModelError::MissingCapacities(vec!["m2".to_string()]));
    }

    #[test]
    fn test_extra_capacity_entries_are_rejected() {
        let mods = table(&[("m1", vec![Preferred])]);
        let err = PreferenceModel::from_tables(mods, vec![1, 2], PreferenceTable::default(), None)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::SurplusCapacities {
                moderators: 1,
                capacities: 2
            }
        );
    }

    #[test]
    fn test_ids_without_rows_are_named() {
        let mods = table(&[("m1", vec![Preferred])]);
        let studs = PreferenceTable::new(
            vec!["s1".into(), "s2".into(), "s3".into()],
            vec![vec![Preferred]],
        );
        let err = PreferenceModel::from_tables(mods, vec![1], studs, None).unwrap_err();
        assert_eq!(
            err,
            ModelError::TableRowMismatch {
                role: Role::Student,
                ids: 3,
                rows: 1,
                unmatched: vec!["s2".to_string(), "s3".to_string()],
            }
        );
    }

    #[test]
    fn test_rows_without_ids_are_rejected() {
        let mods = PreferenceTable::new(
            vec!["m1".into()],
            vec![vec![Preferred], vec![Acceptable], vec![Preferred]],
        );
        let err = PreferenceModel::from_tables(mods, vec![1], PreferenceTable::default(), None)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::TableRowMismatch {
                role: Role::Moderator,
                ids: 1,
                rows: 3,
                unmatched: vec!["row 2".to_string(), "row 3".to_string()],
            }
        );
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut builder = PreferenceModelBuilder::new(1);
        builder
            .add_student(Person::student("s", vec![Preferred]))
            .add_student(Person::student("s", vec![Acceptable]));
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::DuplicatePerson("s".to_string())
        );
    }

    #[test]
    fn test_same_id_in_both_populations_is_allowed() {
        let mut builder = PreferenceModelBuilder::new(1);
        builder
            .add_moderator(Person::new("x", vec![Preferred], 1))
            .add_student(Person::student("x", vec![Preferred]));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_room_info_must_cover_every_slot() {
        let mods = table(&[("m1", vec![Preferred, Preferred])]);
        let info = RoomInfo {
            slot_labels: vec!["Mon".into(), "Tue".into()],
            rooms: vec![RoomCapacity::Count(1)],
        };
        let err = PreferenceModel::from_tables(mods, vec![1], PreferenceTable::default(), Some(info))
            .unwrap_err();
        assert_eq!(err, ModelError::RoomSlotMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn test_room_info_is_applied() {
        let mods = table(&[("m1", vec![Preferred, Preferred])]);
        let info = RoomInfo {
            slot_labels: vec!["Mon".into(), "Tue".into()],
            rooms: vec![
                RoomCapacity::Count(0),
                RoomCapacity::Roster(vec![Room::new("A", 2), Room::new("B", 1)]),
            ],
        };
        let model =
            PreferenceModel::from_tables(mods, vec![1], PreferenceTable::default(), Some(info)).unwrap();
        assert_eq!(model.room_capacity(SlotIndex::new(0)), 0);
        assert_eq!(model.room_capacity(SlotIndex::new(1)), 3);
        assert_eq!(model.slot_label(SlotIndex::new(1)), "Tue");
    }

    #[test]
    fn test_set_single_room_capacity() {
        let mut builder = PreferenceModelBuilder::new(3);
        builder.set_room_capacity(SlotIndex::new(2), RoomCapacity::Count(1));
        let model = builder.build().unwrap();
        assert_eq!(model.room_capacity(SlotIndex::new(0)), DEFAULT_ROOMS_PER_SLOT);
        assert_eq!(model.room_capacity(SlotIndex::new(2)), 1);
        assert_eq!(model.slots().len(), 3);
    }
}
