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

//! Reports every solution as it is found.

use crate::{
    model::MipModel, monitor::solve_monitor::SolveMonitor, num::SolverNumeric,
    solution::Solution, stats::MipSolverStatistics,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One solution as seen by `SolutionProgressMonitor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEntry<T> {
    pub objective: T,
    /// Time since the previous solution (or the solve start).
    pub since_previous: Duration,
}

#[derive(Debug, Clone)]
pub struct SolutionProgressMonitor<T> {
    last_event: Instant,
    entries: Vec<ProgressEntry<T>>,
}

impl<T> Default for SolutionProgressMonitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SolutionProgressMonitor<T> {
    pub fn new() -> Self {
        Self {
            last_event: Instant::now(),
            entries: Vec::new(),
        }
    }

    /// Returns the number of solutions of the last solve.
    #[inline]
    pub fn num_solutions(&self) -> u64 {
        self.entries.len() as u64
    }

    #[inline]
    pub fn entries(&self) -> &[ProgressEntry<T>] {
        &self.entries
    }
}

impl<T> SolveMonitor<T> for SolutionProgressMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SolutionProgressMonitor"
    }

    fn on_enter_solve(&mut self, model: &MipModel<T>, _statistics: &MipSolverStatistics) {
        self.last_event = Instant::now();
        self.entries.clear();
        debug!(
            vars = model.num_vars(),
            constraints = model.num_constraints(),
            "solve started"
        );
    }

    fn on_exit_solve(&mut self, statistics: &MipSolverStatistics) {
        debug!(
            solutions = self.entries.len(),
            total = ?statistics.time_total,
            "solve finished"
        );
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, _statistics: &MipSolverStatistics) {
        let now = Instant::now();
        let entry = ProgressEntry {
            objective: solution.objective_value(),
            since_previous: now.duration_since(self.last_event),
        };
        self.last_event = now;
        self.entries.push(entry);
        info!(
            solution = self.entries.len(),
            objective = %entry.objective,
            since_previous = ?entry.since_previous,
            "solution found"
        );
    }
}
