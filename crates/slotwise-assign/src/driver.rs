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

//! # Solver Driver
//!
//! Runs the MIP solver on the assembled model and applies the status
//! policy:
//!
//! | solver result | outcome                                                      |
//! |---------------|--------------------------------------------------------------|
//! | `Optimal`     | accepted                                                     |
//! | `Feasible`    | accepted with a warning if `allow_non_optimal`, else an error |
//! | `Infeasible`  | `AssignError::Infeasible`                                    |
//! | `Unknown`     | `AssignError::Aborted`                                       |
//!
//! `Feasible` and `Unknown` only occur when the backend honours
//! `time_limit` (the `highs` feature) and the limit is reached.
//! Every solution is logged with the time since the previous one.

use crate::{config::SolverConfiguration, error::AssignError, variables::VariableGrid};
use slotwise_mip::{
    model::MipModel,
    monitor::{
        composite::CompositeMonitor, no_op::NoOperationMonitor,
        progress::SolutionProgressMonitor, solve_monitor::SolveMonitor,
    },
    result::{MipSolverOutcome, SolverResult, TerminationReason},
    solution::Solution,
    solver::MipSolver,
    stats::MipSolverStatistics,
};
use slotwise_model::{PreferenceModel, PreferenceTier, SlotIndex, TierDeviations};
use tracing::{info, warn};

/// Deviations are listed by id only up to this many people.
pub const MAX_LISTED_DEVIATIONS: usize = 10;

/// An accepted solver result.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub solution: Solution<i64>,
    pub optimal: bool,
    pub solutions_found: u64,
    pub statistics: MipSolverStatistics,
}

#[derive(Debug, Clone)]
pub struct SolverDriver<'a> {
    config: &'a SolverConfiguration,
}

impl<'a> SolverDriver<'a> {
    pub fn new(config: &'a SolverConfiguration) -> Self {
        Self { config }
    }

    /// Solves `model` and applies the status policy.
    ///
    /// # Errors
    ///
    /// See the module documentation.
    #[inline]
    pub fn solve(&self, model: &MipModel<i64>) -> Result<SolveReport, AssignError> {
        self.solve_with(model, NoOperationMonitor::new())
    }

    /// Like `solve`, with an additional caller-provided monitor.
    pub fn solve_with<M>(&self, model: &MipModel<i64>, extra: M) -> Result<SolveReport, AssignError>
    where
        M: SolveMonitor<i64>,
    {
        let mut progress = SolutionProgressMonitor::new();
        let mut monitor = CompositeMonitor::with_capacity(2);
        monitor.add_monitor(&mut progress);
        monitor.add_monitor(extra);

        let mut solver = MipSolver::new();
        if let Some(limit) = self.config.time_limit {
            solver = solver.with_time_limit(limit);
        }
        let outcome = solver.solve(model, monitor);

        info!(
            backend = MipSolver::backend_name(),
            result = %outcome.result(),
            reason = %outcome.termination_reason(),
            solutions = outcome.statistics().solutions_found,
            vars = outcome.statistics().num_vars,
            constraints = outcome.statistics().num_constraints,
            elapsed_ms = outcome.statistics().time_total.as_millis() as u64,
            "solve finished"
        );

        self.accept(outcome)
    }

    /// Applies the status policy to a finished solve.
    ///
    /// # Errors
    ///
    /// See the module documentation.
    pub fn accept(&self, outcome: MipSolverOutcome<i64>) -> Result<SolveReport, AssignError> {
        let statistics = outcome.statistics().clone();
        let solutions_found = statistics.solutions_found;
        let reason = outcome.termination_reason().clone();

        match outcome.result().clone() {
            SolverResult::Optimal(solution) => {
                info!(objective = solution.objective_value(), "optimal assignment found");
                Ok(SolveReport {
                    solution,
                    optimal: true,
                    solutions_found,
                    statistics,
                })
            }
            SolverResult::Feasible(solution) => {
                let reason = match reason {
                    TerminationReason::Aborted(msg) => msg,
                    other => other.to_string(),
                };
                if !self.config.allow_non_optimal {
                    return Err(AssignError::NotProvenOptimal {
                        objective: solution.objective_value(),
                        reason,
                    });
                }
                warn!(
                    objective = solution.objective_value(),
                    %reason,
                    "solver stopped early, the assignment is not proven optimal"
                );
                Ok(SolveReport {
                    solution,
                    optimal: false,
                    solutions_found,
                    statistics,
                })
            }
            SolverResult::Infeasible => Err(AssignError::Infeasible),
            SolverResult::Unknown => Err(AssignError::Aborted(reason.to_string())),
        }
    }
}

/// Reads the per-slot id lists of one population from a solution. People
/// are listed in row order.
pub fn assigned_ids(
    preferences: &PreferenceModel,
    grid: &VariableGrid,
    solution: &Solution<i64>,
) -> Vec<Vec<String>> {
    let people = preferences.population(grid.role());
    preferences
        .slots()
        .map(|slot| {
            grid.column(slot)
                .filter(|cell| solution.value(cell.var))
                .map(|cell| people[cell.person.get()].id().to_string())
                .collect()
        })
        .collect()
}

/// Collects the ids of people placed into a slot of the given tier,
/// slot-major like `assigned_ids`.
pub fn deviations(
    preferences: &PreferenceModel,
    grid: &VariableGrid,
    solution: &Solution<i64>,
    tier: PreferenceTier,
) -> Vec<String> {
    let people = preferences.population(grid.role());
    preferences
        .slots()
        .flat_map(|slot: SlotIndex| grid.column(slot))
        .filter(|cell| cell.tier == tier && solution.value(cell.var))
        .map(|cell| people[cell.person.get()].id().to_string())
        .collect()
}

/// Logs how many people of each role were placed into `tier`, listing the
/// ids when there are few.
pub fn log_deviations(tier: PreferenceTier, found: &TierDeviations) {
    for (role, ids) in [("moderators", &found.moderators), ("students", &found.students)] {
        if ids.is_empty() && tier == PreferenceTier::Impossible {
            continue;
        }
        if ids.len() <= MAX_LISTED_DEVIATIONS {
            info!(%tier, role, count = ids.len(), ids = ?ids, "people outside their preferred slots");
        } else {
            info!(%tier, role, count = ids.len(), "people outside their preferred slots");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixedbitset::FixedBitSet;

    fn chain_model(n: usize) -> MipModel<i64> {
        // Every variable earns one unless its neighbour is taken.
        let mut model = MipModel::new();
        let xs: Vec<_> = (0..n).map(|_| model.new_bool_var()).collect();
        for w in xs.windows(2) {
            model.add_at_most(w, 1);
        }
        model.minimize(xs.iter().map(|&x| (x, -1)), n as i64);
        model
    }

    fn stats(solutions_found: u64) -> MipSolverStatistics {
        MipSolverStatistics {
            solutions_found,
            ..Default::default()
        }
    }

    fn feasible(objective: i64) -> MipSolverOutcome<i64> {
        let solution = Solution::new(objective, FixedBitSet::with_capacity(3));
        MipSolverOutcome::aborted(Some(solution), "time limit reached", stats(1))
    }

    #[test]
    fn test_optimal_is_accepted() {
        let model = chain_model(6);
        let config = SolverConfiguration::default();
        let report = SolverDriver::new(&config).solve(&model).unwrap();
        assert!(report.optimal);
        assert_eq!(report.solution.objective_value(), 3);
        assert_eq!(report.solutions_found, 1);
        assert_eq!(report.statistics.num_vars, 6);
    }

    #[test]
    fn test_infeasible_is_an_error() {
        let mut model = MipModel::<i64>::new();
        let x = model.new_bool_var();
        model.add_linear([(x, 1)], 2, 2);
        let config = SolverConfiguration::default();
        assert_eq!(SolverDriver::new(&config).solve(&model).unwrap_err(), AssignError::Infeasible);
    }

    #[test]
    fn test_feasible_is_rejected_by_default() {
        let config = SolverConfiguration::default();
        let err = SolverDriver::new(&config).accept(feasible(3)).unwrap_err();
        assert_eq!(
            err,
            AssignError::NotProvenOptimal {
                objective: 3,
                reason: "time limit reached".to_string()
            }
        );
    }

    #[test]
    fn test_feasible_is_accepted_when_allowed() {
        let config = SolverConfiguration::default().with_allow_non_optimal(true);
        let report = SolverDriver::new(&config).accept(feasible(3)).unwrap();
        assert!(!report.optimal);
        assert_eq!(report.solution.objective_value(), 3);
        assert_eq!(report.solutions_found, 1);
    }

    #[test]
    fn test_unknown_is_aborted() {
        let config = SolverConfiguration::default().with_allow_non_optimal(true);
        let outcome = MipSolverOutcome::<i64>::aborted(
            None,
            "time limit reached without a feasible assignment",
            stats(0),
        );
        let err = SolverDriver::new(&config).accept(outcome).unwrap_err();
        assert_eq!(
            err,
            AssignError::Aborted("Aborted: time limit reached without a feasible assignment".to_string())
        );
    }

    #[test]
    fn test_proven_infeasible_outcome_is_an_error() {
        let config = SolverConfiguration::default();
        let outcome = MipSolverOutcome::<i64>::infeasible(stats(0));
        assert_eq!(SolverDriver::new(&config).accept(outcome).unwrap_err(), AssignError::Infeasible);
    }
}
