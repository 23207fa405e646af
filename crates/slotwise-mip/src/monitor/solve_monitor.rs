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

//! Solve monitoring interface
//!
//! Declares the `SolveMonitor` trait for observing a solver run.
//!
//! Lifecycle
//! - enter → solution* → exit
//! - `MipSolverStatistics` is provided to every callback.
//!
//! The backend runs to completion on the caller's thread, so monitors only
//! observe; limits are configured on the solver itself.

use crate::{
    model::MipModel, num::SolverNumeric, solution::Solution, stats::MipSolverStatistics,
};

/// Trait for observing the solver.
pub trait SolveMonitor<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once the model was lowered, before the backend starts.
    fn on_enter_solve(&mut self, model: &MipModel<T>, statistics: &MipSolverStatistics);
    /// Called when the solve ends, successful or not.
    fn on_exit_solve(&mut self, statistics: &MipSolverStatistics);
    /// Called for every verified solution.
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &MipSolverStatistics);
}

impl<T, M> SolveMonitor<T> for &mut M
where
    T: SolverNumeric,
    M: SolveMonitor<T> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_solve(&mut self, model: &MipModel<T>, statistics: &MipSolverStatistics) {
        (**self).on_enter_solve(model, statistics);
    }

    fn on_exit_solve(&mut self, statistics: &MipSolverStatistics) {
        (**self).on_exit_solve(statistics);
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &MipSolverStatistics) {
        (**self).on_solution_found(solution, statistics);
    }
}

impl<T> std::fmt::Debug for dyn SolveMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolveMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn SolveMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolveMonitor({})", self.name())
    }
}
