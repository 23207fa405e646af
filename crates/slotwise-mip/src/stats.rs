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

use std::time::Duration;

/// Counters collected during one solver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MipSolverStatistics {
    /// Binary variables handed to the backend.
    pub num_vars: u64,
    /// Rows handed to the backend.
    pub num_constraints: u64,
    /// Variables fixed before solving.
    pub num_fixed: u64,
    /// Solutions reported to the monitors.
    pub solutions_found: u64,
    pub time_build: Duration,
    pub time_solve: Duration,
    pub time_total: Duration,
}

impl MipSolverStatistics {
    #[inline]
    pub fn set_problem_size(&mut self, num_vars: usize, num_constraints: usize, num_fixed: usize) {
        self.num_vars = num_vars as u64;
        self.num_constraints = num_constraints as u64;
        self.num_fixed = num_fixed as u64;
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_build_time(&mut self, duration: Duration) {
        self.time_build = duration;
    }

    #[inline]
    pub fn set_solve_time(&mut self, duration: Duration) {
        self.time_solve = duration;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for MipSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Slotwise MIP Solver Statistics:")?;
        writeln!(f, "  Variables:            {}", self.num_vars)?;
        writeln!(f, "  Constraints:          {}", self.num_constraints)?;
        writeln!(f, "  Fixed variables:      {}", self.num_fixed)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Build time:           {:.2?}", self.time_build)?;
        writeln!(f, "  Solve time:           {:.2?}", self.time_solve)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
