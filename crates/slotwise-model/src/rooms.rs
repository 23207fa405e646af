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

//! Room capacity per slot.
//!
//! A slot either has a plain number of interchangeable rooms or an explicit
//! roster of named rooms, each able to host a limited number of concurrent
//! sections. Either way the slot's capacity is the number of sections it can
//! host at once.

use serde::{Deserialize, Serialize};

/// Number of rooms assumed for every slot when no room information is given.
pub const DEFAULT_ROOMS_PER_SLOT: usize = 3;

/// A named room and how many sections it can host within one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub max_sections: usize,
}

impl Room {
    pub fn new<S>(name: S, max_sections: usize) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            max_sections,
        }
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.name, self.max_sections)
    }
}

/// The rooms available in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomCapacity {
    /// A number of unnamed rooms, each hosting one section.
    Count(usize),
    /// Named rooms with individual section quotas.
    Roster(Vec<Room>),
}

impl Default for RoomCapacity {
    fn default() -> Self {
        RoomCapacity::Count(DEFAULT_ROOMS_PER_SLOT)
    }
}

impl RoomCapacity {
    /// Returns the number of sections the slot can host concurrently.
    pub fn capacity(&self) -> usize {
        match self {
            RoomCapacity::Count(n) => *n,
            RoomCapacity::Roster(rooms) => rooms.iter().map(|r| r.max_sections).sum(),
        }
    }

    /// Expands the rooms into the order in which sections are placed.
    ///
    /// Rooms are visited cyclically; each visit consumes one unit of the
    /// room's quota and a room leaves the cycle once its quota is used up.
    /// The result has exactly `capacity()` entries.
    ///
    /// ```rust
    /// use slotwise_model::{Room, RoomCapacity};
    ///
    /// let roster = RoomCapacity::Roster(vec![
    ///     Room::new("Siebel 1112", 2),
    ///     Room::new("Siebel 1314", 1),
    ///     Room::new("Siebel 4102", 1),
    /// ]);
    /// assert_eq!(
    ///     roster.room_order(),
    ///     vec!["Siebel 1112", "Siebel 1314", "Siebel 4102", "Siebel 1112"]
    /// );
    /// ```
    pub fn room_order(&self) -> Vec<String> {
        match self {
            RoomCapacity::Count(n) => (1..=*n).map(|i| format!("Room {}", i)).collect(),
            RoomCapacity::Roster(rooms) => {
                let mut remaining: Vec<(&str, usize)> = rooms
                    .iter()
                    .filter(|r| r.max_sections > 0)
                    .map(|r| (r.name.as_str(), r.max_sections))
                    .collect();
                let mut order = Vec::with_capacity(self.capacity());
                let mut cursor = 0usize;

                while !remaining.is_empty() {
                    cursor %= remaining.len();
                    let (name, quota) = &mut remaining[cursor];
                    order.push(name.to_string());
                    *quota -= 1;
                    if *quota == 0 {
                        remaining.remove(cursor);
                    } else {
                        cursor += 1;
                    }
                }
                order
            }
        }
    }
}

impl std::fmt::Display for RoomCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomCapacity::Count(n) => write!(f, "{} rooms", n),
            RoomCapacity::Roster(rooms) => {
                for (i, room) in rooms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", room)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_three_rooms() {
        assert_eq!(RoomCapacity::default().capacity(), DEFAULT_ROOMS_PER_SLOT);
        assert_eq!(
            RoomCapacity::default().room_order(),
            vec!["Room 1", "Room 2", "Room 3"]
        );
    }

    #[test]
    fn test_roster_capacity_sums_quotas() {
        let roster = RoomCapacity::Roster(vec![Room::new("A", 2), Room::new("B", 2), Room::new("C", 1)]);
        assert_eq!(roster.capacity(), 5);
        assert_eq!(roster.room_order(), vec!["A", "B", "C", "A", "B"]);
    }

    #[test]
    fn test_single_room_with_quota_repeats() {
        let roster = RoomCapacity::Roster(vec![Room::new("Room 1", 2)]);
        assert_eq!(roster.room_order(), vec!["Room 1", "Room 1"]);
    }

    #[test]
    fn test_zero_quota_rooms_are_ignored() {
        let roster = RoomCapacity::Roster(vec![Room::new("A", 0), Room::new("B", 1)]);
        assert_eq!(roster.capacity(), 1);
        assert_eq!(roster.room_order(), vec!["B"]);
        assert!(RoomCapacity::Count(0).room_order().is_empty());
    }
}
