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

//! # Scheduler
//!
//! The end-to-end pipeline:
//!
//! ```text
//! PreferenceModel
//!   -> DecisionVariables   (person/slot variables, optional relaxation)
//!   -> GreedyPreselector   (locks a few sections)
//!   -> ConstraintAssembler (capacity, rooms, single assignment, coupling)
//!   -> CostModel           (tier costs, priorities, bonuses)
//!   -> SolverDriver        (MIP solve + status policy)
//!   -> SlotAssignment
//!   -> SectionPartitioner  (rooms and student groups)
//! ```
//!
//! Every run builds a fresh solver model; nothing is carried over between
//! runs.

use crate::{
    config::SolverConfiguration,
    constraints::ConstraintAssembler,
    driver::{SolverDriver, assigned_ids, deviations, log_deviations},
    error::AssignError,
    greedy::GreedyPreselector,
    objective::CostModel,
    partition::SectionPartitioner,
    variables::DecisionVariables,
};
use serde::{Deserialize, Serialize};
use slotwise_mip::{
    model::MipModel,
    monitor::{no_op::NoOperationMonitor, solve_monitor::SolveMonitor},
};
use slotwise_model::{PreferenceModel, PreferenceTier, Section, SlotAssignment, TierDeviations};
use tracing::{info, instrument};

/// The slot assignment of a run together with its sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub assignment: SlotAssignment,
    pub sections: Vec<Vec<Section>>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SolverConfiguration,
}

impl Scheduler {
    /// Creates a scheduler with a normalized copy of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent.
    pub fn new(config: SolverConfiguration) -> Result<Self, AssignError> {
        Ok(Self {
            config: config.normalized()?,
        })
    }

    #[inline]
    pub fn config(&self) -> &SolverConfiguration {
        &self.config
    }

    /// Assigns every person to slots.
    ///
    /// # Errors
    ///
    /// Fails if no valid assignment exists or, unless non-optimal results
    /// are allowed, if optimality could not be proven.
    #[instrument(
        skip_all,
        fields(
            moderators = preferences.num_moderators(),
            students = preferences.num_students(),
            slots = preferences.num_slots()
        )
    )]
    pub fn assign(&self, preferences: &PreferenceModel) -> Result<SlotAssignment, AssignError> {
        self.assign_with(preferences, NoOperationMonitor::new())
    }

    /// Like `assign`, with an additional solve monitor.
    pub fn assign_with<M>(
        &self,
        preferences: &PreferenceModel,
        monitor: M,
    ) -> Result<SlotAssignment, AssignError>
    where
        M: SolveMonitor<i64>,
    {
        let config = &self.config;
        let mut model = MipModel::new();
        let variables = DecisionVariables::build(&mut model, preferences, config);
        info!(
            moderators = preferences.num_moderators(),
            students = preferences.num_students(),
            slots = preferences.num_slots(),
            variables = variables.num_variables(),
            "problem summary"
        );

        let preselector = GreedyPreselector::new(preferences, &variables, config);
        let locks = preselector.select();
        preselector.apply(&mut model, &locks);

        ConstraintAssembler::new(preferences, &variables, config).assemble(&mut model);
        CostModel::new(preferences, &variables, config).apply(&mut model);

        let report = SolverDriver::new(config).solve_with(&model, monitor)?;
        let solution = &report.solution;

        let collect = |tier: PreferenceTier| TierDeviations {
            moderators: deviations(preferences, &variables.moderators, solution, tier),
            students: deviations(preferences, &variables.students, solution, tier),
        };
        let acceptable = collect(PreferenceTier::Acceptable);
        let impossible = collect(PreferenceTier::Impossible);
        log_deviations(PreferenceTier::Impossible, &impossible);
        log_deviations(PreferenceTier::Acceptable, &acceptable);

        Ok(SlotAssignment {
            moderators_per_slot: assigned_ids(preferences, &variables.moderators, solution),
            students_per_slot: assigned_ids(preferences, &variables.students, solution),
            objective: solution.objective_value(),
            optimal: report.optimal,
            solutions_found: report.solutions_found,
            locks,
            acceptable,
            impossible,
        })
    }

    /// Splits a slot assignment into sections.
    ///
    /// # Errors
    ///
    /// Returns `AssignError::UnstaffedSlot` if a slot has students but no
    /// moderator.
    #[instrument(skip_all, fields(sections = assignment.num_sections()))]
    pub fn partition(
        &self,
        preferences: &PreferenceModel,
        assignment: &SlotAssignment,
    ) -> Result<Vec<Vec<Section>>, AssignError> {
        SectionPartitioner::new(preferences, &self.config).partition(assignment)
    }

    /// Runs `assign` followed by `partition`.
    pub fn run(&self, preferences: &PreferenceModel) -> Result<Schedule, AssignError> {
        let assignment = self.assign(preferences)?;
        let sections = self.partition(preferences, &assignment)?;
        Ok(Schedule {
            assignment,
            sections,
        })
    }
}
