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

//! Output artifacts of an assignment run.

use crate::index::{PersonIndex, SlotIndex};
use serde::{Deserialize, Serialize};

/// A section fixed into the solver before full optimisation.
///
/// Locks only ever pair a moderator with students who all marked `slot` as
/// `Preferred`, and the final assignment always contains them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GreedyLock {
    pub slot: SlotIndex,
    pub moderator: PersonIndex,
    pub students: Vec<PersonIndex>,
}

impl std::fmt::Display for GreedyLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GreedyLock(slot: {}, moderator: {}, students: {})",
            self.slot.get(),
            self.moderator.get(),
            self.students.len()
        )
    }
}

/// A concrete (moderator, room, students) group inside one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    pub moderator: String,
    pub room: String,
    pub students: Vec<String>,
}

impl Section {
    #[inline]
    pub fn num_students(&self) -> usize {
        self.students.len()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {} with {}",
            self.moderator,
            self.room,
            self.students.join(", ")
        )
    }
}

/// Ids of people placed into a slot of a given non-preferred tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierDeviations {
    pub moderators: Vec<String>,
    pub students: Vec<String>,
}

impl TierDeviations {
    #[inline]
    pub fn total(&self) -> usize {
        self.moderators.len() + self.students.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The solved assignment of people to slots.
///
/// Moderators appear once per slot they were assigned to; every student
/// appears in exactly one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub moderators_per_slot: Vec<Vec<String>>,
    pub students_per_slot: Vec<Vec<String>>,
    pub objective: i64,
    pub optimal: bool,
    pub solutions_found: u64,
    pub locks: Vec<GreedyLock>,
    pub acceptable: TierDeviations,
    pub impossible: TierDeviations,
}

impl SlotAssignment {
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.moderators_per_slot.len()
    }

    #[inline]
    pub fn moderators(&self, slot: SlotIndex) -> &[String] {
        &self.moderators_per_slot[slot.get()]
    }

    #[inline]
    pub fn students(&self, slot: SlotIndex) -> &[String] {
        &self.students_per_slot[slot.get()]
    }

    /// Total number of sections, one per assigned moderator and slot.
    pub fn num_sections(&self) -> usize {
        self.moderators_per_slot.iter().map(Vec::len).sum()
    }

    /// Returns every slot a moderator was assigned to.
    pub fn slots_of_moderator<'a>(&'a self, id: &'a str) -> impl Iterator<Item = SlotIndex> + 'a {
        self.moderators_per_slot
            .iter()
            .enumerate()
            .filter(move |(_, ids)| ids.iter().any(|m| m == id))
            .map(|(t, _)| SlotIndex::new(t))
    }

    /// Returns the slot a student was assigned to.
    pub fn slot_of_student(&self, id: &str) -> Option<SlotIndex> {
        self.students_per_slot
            .iter()
            .position(|ids| ids.iter().any(|s| s == id))
            .map(SlotIndex::new)
    }
}

impl std::fmt::Display for SlotAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "SlotAssignment(objective: {}, optimal: {}, sections: {})",
            self.objective,
            self.optimal,
            self.num_sections()
        )?;
        for (t, (mods, studs)) in self
            .moderators_per_slot
            .iter()
            .zip(&self.students_per_slot)
            .enumerate()
        {
            writeln!(
                f,
                "  slot {:>2}: {} moderators [{}], {} students",
                t,
                mods.len(),
                mods.join(", "),
                studs.len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SlotAssignment {
        SlotAssignment {
            moderators_per_slot: vec![vec!["m1".into()], vec![], vec!["m1".into(), "m2".into()]],
            students_per_slot: vec![vec!["a".into()], vec![], vec!["b".into(), "c".into()]],
            objective: 3,
            optimal: true,
            solutions_found: 2,
            locks: vec![GreedyLock {
                slot: SlotIndex::new(2),
                moderator: PersonIndex::new(1),
                students: vec![PersonIndex::new(1), PersonIndex::new(2)],
            }],
            acceptable: TierDeviations {
                moderators: vec![],
                students: vec!["c".into()],
            },
            impossible: TierDeviations::default(),
        }
    }

    #[test]
    fn test_lookup_helpers() {
        let a = sample();
        assert_eq!(a.num_slots(), 3);
        assert_eq!(a.num_sections(), 3);
        assert_eq!(a.slot_of_student("b"), Some(SlotIndex::new(2)));
        assert_eq!(a.slot_of_student("zed"), None);
        let slots: Vec<usize> = a.slots_of_moderator("m1").map(|s| s.get()).collect();
        assert_eq!(slots, vec![0, 2]);
        assert_eq!(a.acceptable.total(), 1);
        assert!(a.impossible.is_empty());
    }

    #[test]
    fn test_report_serializes_with_plain_indices() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["locks"][0]["slot"], 2);
        assert_eq!(json["locks"][0]["students"][1], 2);
        assert_eq!(json["objective"], 3);
    }

    #[test]
    fn test_section_display() {
        let s = Section {
            moderator: "m".into(),
            room: "Room 1".into(),
            students: vec!["a".into(), "b".into()],
        };
        assert_eq!(s.to_string(), "m in Room 1 with a, b");
        assert_eq!(s.num_students(), 2);
    }
}
