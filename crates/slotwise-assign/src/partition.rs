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

//! # Section Partitioner
//!
//! Splits each slot of a solved assignment into concrete sections. Per slot,
//! moderators are drawn at random into the slot's room order, then students
//! are drawn at random and dealt round-robin over the sections. One generator
//! seeded with `PARTITION_SEED` serves the whole run, so the result depends
//! on every slot before it.
//!
//! Dealing round-robin keeps the section sizes of a slot within one of each
//! other.

use crate::{config::SolverConfiguration, error::AssignError};
use rand::Rng;
use slotwise_core::seed::NamedSeed;
use slotwise_model::{PreferenceModel, Section, SlotAssignment};
use tracing::{debug, info};

/// Seed of the section and room draw.
pub const PARTITION_SEED: NamedSeed = NamedSeed::new("slotwise section assignment");

/// Removes and returns a uniformly drawn element.
fn pop_random<R, T>(rng: &mut R, items: &mut Vec<T>) -> Option<T>
where
    R: Rng,
{
    if items.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..items.len());
    Some(items.remove(index))
}

#[derive(Debug, Clone)]
pub struct SectionPartitioner<'a> {
    preferences: &'a PreferenceModel,
    config: &'a SolverConfiguration,
}

impl<'a> SectionPartitioner<'a> {
    pub fn new(preferences: &'a PreferenceModel, config: &'a SolverConfiguration) -> Self {
        Self {
            preferences,
            config,
        }
    }

    /// Returns the sections of every slot.
    ///
    /// # Errors
    ///
    /// Returns `AssignError::UnstaffedSlot` if a slot holds students but no
    /// moderator.
    pub fn partition(&self, assignment: &SlotAssignment) -> Result<Vec<Vec<Section>>, AssignError> {
        let mut rng = PARTITION_SEED.rng();
        let mut sections = Vec::with_capacity(assignment.num_slots());
        let mut with_minimum = 0;

        for slot in self.preferences.slots() {
            let mut moderators = assignment.moderators(slot).to_vec();
            let mut students = assignment.students(slot).to_vec();

            if moderators.is_empty() {
                if !students.is_empty() {
                    return Err(AssignError::UnstaffedSlot {
                        slot: slot.get(),
                        students: students.len(),
                    });
                }
                sections.push(Vec::new());
                continue;
            }

            let room_order = self.preferences.rooms(slot).room_order();
            let mut in_slot = Vec::with_capacity(moderators.len());
            let mut i = 0;
            while let Some(moderator) = pop_random(&mut rng, &mut moderators) {
                let room = if room_order.is_empty() {
                    format!("Room {}", i + 1)
                } else {
                    room_order[i % room_order.len()].clone()
                };
                in_slot.push(Section {
                    moderator,
                    room,
                    students: Vec::new(),
                });
                i += 1;
            }

            let mut next = 0;
            while let Some(student) = pop_random(&mut rng, &mut students) {
                in_slot[next].students.push(student);
                next = (next + 1) % in_slot.len();
            }

            for section in &in_slot {
                debug!(slot = slot.get(), %section, "section");
            }
            with_minimum += in_slot
                .iter()
                .filter(|s| s.num_students() == self.config.min_students_per_section)
                .count();
            info!(
                slot = slot.get(),
                label = self.preferences.slot_label(slot),
                sections = in_slot.len(),
                students = in_slot.iter().map(Section::num_students).sum::<usize>(),
                "slot partitioned"
            );
            sections.push(in_slot);
        }

        info!(
            min_students = self.config.min_students_per_section,
            sections = with_minimum,
            "sections holding exactly the minimum number of students"
        );
        Ok(sections)
    }
}
