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

//! # Slotwise Assign
//!
//! Assigns moderators and students to weekly time slots and splits every
//! slot into sections of one moderator and a bounded number of students.
//!
//! ```rust
//! use slotwise_assign::{Scheduler, config::SolverConfiguration};
//! use slotwise_model::{Person, PreferenceModelBuilder, PreferenceTier::*};
//!
//! let mut builder = PreferenceModelBuilder::new(2);
//! builder.add_moderator(Person::new("mod", vec![Acceptable, Preferred], 1));
//! for i in 0..5 {
//!     builder.add_student(Person::student(format!("s{}", i), vec![Preferred, Preferred]));
//! }
//! let preferences = builder.build().unwrap();
//!
//! let scheduler = Scheduler::new(SolverConfiguration::default()).unwrap();
//! let schedule = scheduler.run(&preferences).unwrap();
//! assert_eq!(schedule.assignment.moderators_per_slot[1], vec!["mod"]);
//! assert_eq!(schedule.sections[1][0].students.len(), 5);
//! ```
//!
//! ## Modules
//!
//! - `config`: `SolverConfiguration` and its enums.
//! - `variables`: the person/slot decision variables.
//! - `greedy`: the greedy section preselector.
//! - `constraints`: capacity, room and count-coupling constraints.
//! - `objective`: the cost model.
//! - `driver`: solver invocation, status policy and extraction.
//! - `partition`: sections and rooms.
//! - `scheduler`: the end-to-end pipeline.
//! - `logging`: `tracing-subscriber` bootstrap.

pub mod config;
pub mod constraints;
pub mod driver;
pub mod error;
pub mod greedy;
pub mod logging;
pub mod objective;
pub mod partition;
pub mod scheduler;
pub mod variables;


pub use error::AssignError;
pub use scheduler::{Schedule, Scheduler};
