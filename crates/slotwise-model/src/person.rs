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

use crate::{index::SlotIndex, tier::PreferenceTier};
use serde::{Deserialize, Serialize};

/// The two populations of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Moderator,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Moderator => write!(f, "moderator"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// A moderator or student with one preference tier per slot and the maximum
/// number of slots they may be assigned (always 1 for students).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    id: String,
    tiers: Vec<PreferenceTier>,
    capacity: usize,
}

impl Person {
    /// Creates a new person.
    pub fn new<S>(id: S, tiers: Vec<PreferenceTier>, capacity: usize) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tiers,
            capacity,
        }
    }

    /// Creates a student, whose capacity is always exactly one slot.
    pub fn student<S>(id: S, tiers: Vec<PreferenceTier>) -> Self
    where
        S: Into<String>,
    {
        Self::new(id, tiers, 1)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn tiers(&self) -> &[PreferenceTier] {
        &self.tiers
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.tiers.len()
    }

    /// Returns the tier this person stated for `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is outside the person's preference row.
    #[inline]
    pub fn tier(&self, slot: SlotIndex) -> PreferenceTier {
        let index = slot.get();
        assert!(
            index < self.tiers.len(),
            "called `Person::tier` with slot index out of bounds: the len is {} but the index is {}",
            self.tiers.len(),
            index
        );
        self.tiers[index]
    }

    /// Returns the number of slots that are not `Impossible`.
    #[inline]
    pub fn num_possible_slots(&self) -> usize {
        self.tiers.iter().filter(|t| t.is_possible()).count()
    }

    /// Iterates over the slots this person marked as `Preferred`.
    pub fn preferred_slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.tiers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_preferred())
            .map(|(i, _)| SlotIndex::new(i))
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [", self.id)?;
        for (i, tier) in self.tiers.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", tier.poll_marker())?;
        }
        write!(f, "] (capacity {})", self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PreferenceTier::*;

    #[test]
    fn test_student_capacity_is_one() {
        let s = Person::student("s1", vec![Preferred, Impossible]);
        assert_eq!(s.capacity(), 1);
        assert_eq!(s.id(), "s1");
    }

    #[test]
    fn test_possible_and_preferred_slots() {
        let p = Person::new("m", vec![Preferred, Acceptable, Impossible, Preferred], 2);
        assert_eq!(p.num_possible_slots(), 3);
        let preferred: Vec<usize> = p.preferred_slots().map(|s| s.get()).collect();
        assert_eq!(preferred, vec![0, 3]);
        assert_eq!(p.tier(SlotIndex::new(1)), Acceptable);
    }

    #[test]
    #[should_panic(expected = "called `Person::tier` with slot index out of bounds")]
    fn test_tier_out_of_range_panics() {
        let p = Person::student("s", vec![Preferred]);
        let _ = p.tier(SlotIndex::new(3));
    }

    #[test]
    fn test_display_uses_poll_markers() {
        let p = Person::new("m", vec![Preferred, Acceptable, Impossible], 2);
        assert_eq!(p.to_string(), "m [OK,(OK),] (capacity 2)");
    }
}
