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

//! Monitoring combinators
//!
//! `CompositeMonitor` forwards every event to its children in insertion
//! order.

use crate::{
    model::MipModel, monitor::solve_monitor::SolveMonitor, num::SolverNumeric,
    solution::Solution, stats::MipSolverStatistics,
};

/// A monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn SolveMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SolveMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SolveMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn SolveMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SolveMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SolveMonitor<T> for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_solve(&mut self, model: &MipModel<T>, statistics: &MipSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_solve(model, statistics);
        }
    }

    fn on_exit_solve(&mut self, statistics: &MipSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_solve(statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &MipSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{no_op::NoOperationMonitor, progress::SolutionProgressMonitor};
    use fixedbitset::FixedBitSet;

    #[derive(Default)]
    struct Counter {
        entered: u32,
        exited: u32,
    }

    impl SolveMonitor<i64> for Counter {
        fn name(&self) -> &str {
            "Counter"
        }
        fn on_enter_solve(&mut self, _model: &MipModel<i64>, _statistics: &MipSolverStatistics) {
            self.entered += 1;
        }
        fn on_exit_solve(&mut self, _statistics: &MipSolverStatistics) {
            self.exited += 1;
        }
        fn on_solution_found(&mut self, _solution: &Solution<i64>, _statistics: &MipSolverStatistics) {}
    }

    #[test]
    fn test_events_reach_every_child() {
        let mut progress = SolutionProgressMonitor::<i64>::new();
        let mut counter = Counter::default();
        {
            let mut composite = CompositeMonitor::<i64>::new();
            composite.add_monitor(NoOperationMonitor::new());
            composite.add_monitor(&mut progress);
            composite.add_monitor(&mut counter);
            assert_eq!(composite.len(), 3);

            let stats = MipSolverStatistics::default();
            composite.on_enter_solve(&MipModel::new(), &stats);
            let solution = Solution::new(1, FixedBitSet::new());
            composite.on_solution_found(&solution, &stats);
            composite.on_solution_found(&solution, &stats);
            composite.on_exit_solve(&stats);
        }
        assert_eq!(progress.num_solutions(), 2);
        assert_eq!((counter.entered, counter.exited), (1, 1));
    }

    #[test]
    fn test_empty_composite() {
        let mut composite = CompositeMonitor::<i64>::default();
        assert!(composite.is_empty());
        composite.on_exit_solve(&MipSolverStatistics::default());
        assert_eq!(composite.name(), "CompositeMonitor");
    }
}
