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

//! # Slotwise Model
//!
//! In-memory representation of a section assignment problem: two populations
//! (moderators and students) stating a `PreferenceTier` for each of a fixed
//! number of weekly slots, per-moderator capacity limits and per-slot room
//! capacity. The model is validated once on construction and immutable
//! afterwards.
//!
//! ## Modules
//!
//! - `index`: typed `PersonIndex` / `SlotIndex`.
//! - `tier`: the three preference tiers and poll-marker parsing.
//! - `person`: people, their roles and tiers.
//! - `rooms`: room counts, room rosters and the cyclic room order.
//! - `capacity`: order-independent matching of capacity rows to people.
//! - `model`: `PreferenceModel` and its builder.
//! - `assignment`: greedy locks, solved slot assignments and sections.
//! - `error`: `ModelError`.

pub mod assignment;
pub mod capacity;
pub mod error;
pub mod index;
pub mod model;
pub mod person;
pub mod rooms;
pub mod tier;

pub use assignment::{GreedyLock, Section, SlotAssignment, TierDeviations};
pub use error::ModelError;
pub use index::{PersonIndex, SlotIndex};
pub use model::{PreferenceModel, PreferenceModelBuilder, PreferenceTable, RoomInfo};
pub use person::{Person, Role};
pub use rooms::{DEFAULT_ROOMS_PER_SLOT, Room, RoomCapacity};
pub use tier::PreferenceTier;
