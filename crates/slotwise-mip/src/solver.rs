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

//! Lowers a `MipModel` into good_lp and runs the selected backend.
//!
//! Backends
//! - `microlp` (default): pure Rust branch-and-bound. It always runs to
//!   completion, so a configured time limit is ignored with a warning.
//! - `highs`: HiGHS through its C API. Honours the time limit and reports
//!   an interrupted run as `Feasible` or `Unknown`.
//!
//! When both features are enabled, HiGHS wins.
//!
//! The backend works in floating point. Every assignment it returns is
//! rounded, checked against the integer model and re-scored exactly; an
//! assignment that fails the check is never reported as a solution.

use crate::{
    model::MipModel, monitor::solve_monitor::SolveMonitor, num::SolverNumeric,
    result::MipSolverOutcome, solution::Solution, stats::MipSolverStatistics, var::BoolVar,
};
use fixedbitset::FixedBitSet;
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution as _, SolverModel,
    Variable, variable,
};
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(not(any(feature = "microlp", feature = "highs")))]
compile_error!("slotwise-mip needs a backend: enable the `microlp` or `highs` feature");

/// The model after lowering, ready to be handed to a backend.
struct Lowered {
    vars: ProblemVariables,
    xs: Vec<Variable>,
    objective: Expression,
    rows: Vec<Constraint>,
}

/// What the backend returned, before verification.
enum BackendOutcome {
    Solved { values: Vec<f64>, proven: bool },
    Infeasible,
    Failed(String),
}

/// Integer to `f64` conversion is total for the primitive integers.
#[inline]
fn to_f64<T>(value: T) -> f64
where
    T: SolverNumeric,
{
    value.to_f64().unwrap_or(0.0)
}

/// Builds the good_lp problem. Returns `None` if a constraint without terms
/// already rules out every assignment.
fn lower<T>(model: &MipModel<T>) -> Option<Lowered>
where
    T: SolverNumeric,
{
    let mut vars = ProblemVariables::new();
    let xs: Vec<Variable> = model
        .fixed_values()
        .iter()
        .enumerate()
        .map(|(i, fixed)| {
            let mut definition = variable().binary();
            match fixed {
                Some(true) => definition = definition.min(1.0),
                Some(false) => definition = definition.max(0.0),
                None => {}
            }
            if let Some(name) = model.name(BoolVar::new(i)) {
                definition = definition.name(name);
            }
            vars.add(definition)
        })
        .collect();

    let objective = model
        .objective_coefficients()
        .iter()
        .zip(&xs)
        .filter(|(c, _)| !c.is_zero())
        .fold(Expression::from(0.0), |acc, (c, &x)| acc + to_f64(*c) * x);

    let mut rows = Vec::with_capacity(model.num_constraints());
    for constraint in model.constraints() {
        if constraint.terms().is_empty() {
            if !constraint.is_satisfied_by(|_| false) {
                return None;
            }
            continue;
        }

        let expression = constraint
            .terms()
            .iter()
            .fold(Expression::from(0.0), |acc, (v, c)| {
                acc + to_f64(*c) * xs[v.get()]
            });

        let lower = to_f64(constraint.lower());
        let upper = to_f64(constraint.upper());
        match (constraint.has_lower(), constraint.has_upper()) {
            (true, true) if constraint.lower() == constraint.upper() => {
                rows.push(expression.eq(lower));
            }
            (true, true) => {
                rows.push(expression.clone().geq(lower));
                rows.push(expression.leq(upper));
            }
            (true, false) => rows.push(expression.geq(lower)),
            (false, true) => rows.push(expression.leq(upper)),
            (false, false) => {}
        }
    }

    Some(Lowered {
        vars,
        xs,
        objective,
        rows,
    })
}

#[cfg(feature = "highs")]
fn run_backend(lowered: Lowered, time_limit: Option<Duration>) -> BackendOutcome {
    use good_lp::solvers::{SolutionStatus, WithTimeLimit, highs::highs};

    let Lowered {
        vars,
        xs,
        objective,
        rows,
    } = lowered;

    let mut problem = vars.minimise(objective).using(highs);
    if let Some(limit) = time_limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }
    for row in rows {
        problem.add_constraint(row);
    }

    match problem.solve() {
        Ok(solution) => BackendOutcome::Solved {
            values: xs.iter().map(|&x| solution.value(x)).collect(),
            proven: matches!(solution.status(), SolutionStatus::Optimal),
        },
        Err(ResolutionError::Infeasible) => BackendOutcome::Infeasible,
        Err(error) => BackendOutcome::Failed(error.to_string()),
    }
}

#[cfg(all(feature = "microlp", not(feature = "highs")))]
fn run_backend(lowered: Lowered, time_limit: Option<Duration>) -> BackendOutcome {
    use good_lp::default_solver;

    if let Some(limit) = time_limit {
        tracing::warn!(
            limit = ?limit,
            "the microlp backend cannot be interrupted; ignoring the time limit"
        );
    }

    let Lowered {
        vars,
        xs,
        objective,
        rows,
    } = lowered;

    let mut problem = vars.minimise(objective).using(default_solver);
    for row in rows {
        problem.add_constraint(row);
    }

    match problem.solve() {
        Ok(solution) => BackendOutcome::Solved {
            values: xs.iter().map(|&x| solution.value(x)).collect(),
            proven: true,
        },
        Err(ResolutionError::Infeasible) => BackendOutcome::Infeasible,
        Err(error) => BackendOutcome::Failed(error.to_string()),
    }
}

/// Solves `MipModel`s to optimality, or until the time limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MipSolver {
    time_limit: Option<Duration>,
}

impl MipSolver {
    #[inline]
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    /// Sets a wall-clock limit for the backend.
    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// The backend compiled into this build.
    #[inline]
    pub fn backend_name() -> &'static str {
        if cfg!(feature = "highs") {
            "highs"
        } else {
            "microlp"
        }
    }

    /// Solves `model`, reporting to `monitor`.
    pub fn solve<T, M>(&self, model: &MipModel<T>, mut monitor: M) -> MipSolverOutcome<T>
    where
        T: SolverNumeric,
        M: SolveMonitor<T>,
    {
        let start = Instant::now();
        let mut statistics = MipSolverStatistics::default();
        let num_fixed = model.fixed_values().iter().filter(|f| f.is_some()).count();
        statistics.set_problem_size(model.num_vars(), model.num_constraints(), num_fixed);
        monitor.on_enter_solve(model, &statistics);

        let outcome = self.solve_inner(model, &mut monitor, &mut statistics, start);

        statistics.set_total_time(start.elapsed());
        monitor.on_exit_solve(&statistics);
        debug!(
            backend = Self::backend_name(),
            vars = model.num_vars(),
            constraints = model.num_constraints(),
            elapsed = ?statistics.time_total,
            "mip solve finished: {}",
            outcome
        );
        outcome.with_statistics(statistics)
    }

    fn solve_inner<T, M>(
        &self,
        model: &MipModel<T>,
        monitor: &mut M,
        statistics: &mut MipSolverStatistics,
        start: Instant,
    ) -> MipSolverOutcome<T>
    where
        T: SolverNumeric,
        M: SolveMonitor<T>,
    {
        if model.is_trivially_infeasible() {
            return MipSolverOutcome::infeasible(statistics.clone());
        }

        let (values, proven) = if model.num_vars() == 0 {
            if model.first_violation(|_| false).is_some() {
                return MipSolverOutcome::infeasible(statistics.clone());
            }
            (Vec::new(), true)
        } else {
            let Some(lowered) = lower(model) else {
                return MipSolverOutcome::infeasible(statistics.clone());
            };
            statistics.set_build_time(start.elapsed());

            let solve_start = Instant::now();
            let backend = run_backend(lowered, self.time_limit);
            statistics.set_solve_time(solve_start.elapsed());

            match backend {
                BackendOutcome::Solved { values, proven } => (values, proven),
                BackendOutcome::Infeasible => {
                    return MipSolverOutcome::infeasible(statistics.clone());
                }
                BackendOutcome::Failed(reason) => {
                    return MipSolverOutcome::aborted(None, reason, statistics.clone());
                }
            }
        };

        let mut bits = FixedBitSet::with_capacity(model.num_vars());
        for (i, value) in values.iter().enumerate() {
            if *value > 0.5 {
                bits.insert(i);
            }
        }

        if let Some(violation) = model.first_violation(|v| bits.contains(v.get())) {
            let reason = if proven {
                format!("backend assignment violates {}", violation)
            } else {
                "time limit reached without a feasible assignment".to_string()
            };
            return MipSolverOutcome::aborted(None, reason, statistics.clone());
        }

        let objective = model.objective_value(|v| bits.contains(v.get()));
        let solution = Solution::new(objective, bits);
        statistics.on_solution_found();
        monitor.on_solution_found(&solution, statistics);

        if proven {
            MipSolverOutcome::optimal(solution, statistics.clone())
        } else {
            MipSolverOutcome::aborted(Some(solution), "time limit reached", statistics.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monitor::{no_op::NoOperationMonitor, progress::SolutionProgressMonitor},
        result::{SolverResult, TerminationReason},
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn solve(model: &MipModel<i64>) -> MipSolverOutcome<i64> {
        MipSolver::new().solve(model, NoOperationMonitor::new())
    }

    #[test]
    fn test_empty_model_is_optimal_at_offset() {
        let mut model = MipModel::<i64>::new();
        model.minimize(std::iter::empty(), 7);
        let outcome = solve(&model);
        assert!(outcome.is_optimal());
        assert_eq!(outcome.solution().map(|s| s.objective_value()), Some(7));
    }

    #[test]
    fn test_conflicting_fix_is_infeasible() {
        let mut model = MipModel::<i64>::new();
        let a = model.new_bool_var();
        model.fix(a, true);
        model.fix(a, false);
        assert!(solve(&model).is_infeasible());
    }

    #[test]
    fn test_violated_empty_constraint_is_infeasible() {
        let mut model = MipModel::<i64>::new();
        let a = model.new_bool_var();
        model.add_linear([(a, 1), (a, -1)], 1, 2);
        let outcome = solve(&model);
        assert!(outcome.is_infeasible());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
    }

    #[test]
    fn test_picks_cheapest_of_exactly_one() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<BoolVar> = (0..4).map(|_| model.new_bool_var()).collect();
        model.add_exactly_one(&xs);
        model.minimize(xs.iter().copied().zip([5, 3, 8, 4]), 1);
        let outcome = solve(&model);
        assert!(outcome.is_optimal());
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.objective_value(), 4);
        assert_eq!(solution.true_vars().collect::<Vec<_>>(), vec![xs[1]]);
        assert_eq!(outcome.statistics().num_vars, 4);
        assert_eq!(outcome.statistics().solutions_found, 1);
    }

    #[test]
    fn test_fixes_are_respected() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<BoolVar> = (0..3).map(|_| model.new_bool_var()).collect();
        model.add_exactly_one(&xs);
        model.minimize(xs.iter().copied().zip([1, 2, 3]), 0);
        model.fix(xs[0], false);
        model.fix(xs[2], true);
        let outcome = solve(&model);
        let solution = outcome.solution().unwrap();
        assert!(solution.value(xs[2]));
        assert_eq!(solution.objective_value(), 3);
    }

    #[test]
    fn test_contradictory_rows_are_infeasible() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<BoolVar> = (0..2).map(|_| model.new_bool_var()).collect();
        model.add_at_least(&xs, 2);
        model.add_at_most(&xs, 1);
        let outcome = solve(&model);
        assert!(matches!(outcome.result(), SolverResult::Infeasible));
    }

    #[test]
    fn test_sum_in_set_skips_forbidden_counts() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<BoolVar> = (0..4).map(|_| model.new_bool_var()).collect();
        model.add_sum_in_set(&xs, [0, 2]);
        // Every x is rewarded, but three or four of them are not admissible.
        model.minimize(xs.iter().map(|&x| (x, -1)), 0);
        let outcome = solve(&model);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.objective_value(), -2);
        assert_eq!(xs.iter().filter(|&&x| solution.value(x)).count(), 2);
    }

    #[test]
    fn test_conditioned_selector_forces_a_range() {
        // Either the pool stays closed, or between three and four of the
        // five members join it.
        let mut model = MipModel::<i64>::new();
        let open = model.new_bool_var();
        let members: Vec<BoolVar> = (0..5).map(|_| model.new_bool_var()).collect();
        let indicators = model.add_selector([3, 4], Some(open));
        model.add_linear(
            members
                .iter()
                .map(|&m| (m, 1))
                .chain(indicators.iter().map(|&(k, d)| (d, -(k as i64)))),
            0,
            0,
        );
        model.minimize(members.iter().map(|&m| (m, -1)), 0);
        let outcome = solve(&model);
        let solution = outcome.solution().unwrap();
        assert!(solution.value(open));
        assert_eq!(solution.objective_value(), -4);
    }

    #[test]
    fn test_floor_half_rewards_pairs() {
        let mut model = MipModel::<i64>::new();
        let x = model.new_bool_var();
        let y = model.new_bool_var();
        let z = model.add_floor_half(x, y);
        model.minimize([(x, 1), (y, 1), (z, -3)], 0);
        let outcome = solve(&model);
        let solution = outcome.solution().unwrap();
        assert!(solution.value(x) && solution.value(y) && solution.value(z));
        assert_eq!(solution.objective_value(), -1);
    }

    #[test]
    fn test_monitor_sees_the_solution() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<BoolVar> = (0..3).map(|_| model.new_bool_var()).collect();
        model.add_exactly_one(&xs);
        model.minimize(xs.iter().copied().zip([2, 1, 3]), 0);

        let mut progress = SolutionProgressMonitor::new();
        let outcome = MipSolver::new().solve(&model, &mut progress);
        assert!(outcome.is_optimal());
        assert_eq!(progress.num_solutions(), 1);
        assert_eq!(progress.entries()[0].objective, 1);
    }

    #[test]
    fn test_time_limit_is_carried() {
        let solver = MipSolver::new().with_time_limit(Duration::from_secs(5));
        assert_eq!(solver.time_limit(), Some(Duration::from_secs(5)));
        assert_eq!(MipSolver::default().time_limit(), None);
    }

    fn brute_force(model: &MipModel<i64>) -> Option<i64> {
        let n = model.num_vars();
        (0u32..(1 << n))
            .filter_map(|mask| {
                let value = |v: BoolVar| mask & (1 << v.get()) != 0;
                model
                    .first_violation(value)
                    .is_none()
                    .then(|| model.objective_value(value))
            })
            .min()
    }

    fn random_model(rng: &mut ChaCha8Rng) -> MipModel<i64> {
        let mut model = MipModel::<i64>::new();
        let n = rng.gen_range(1..=7);
        let xs: Vec<BoolVar> = (0..n).map(|_| model.new_bool_var()).collect();

        for _ in 0..rng.gen_range(0..=4) {
            let mut terms: Vec<(BoolVar, i64)> = Vec::new();
            for &x in &xs {
                if rng.r#gen::<bool>() {
                    terms.push((x, rng.gen_range(-3..=3)));
                }
            }
            let lower = rng.gen_range(-4..=2);
            let upper = lower + rng.gen_range(0..=4);
            match rng.gen_range(0..3) {
                0 => model.add_linear(terms, lower, upper),
                1 => model.add_linear(terms, i64::MIN, upper),
                _ => model.add_linear(terms, lower, i64::MAX),
            };
        }
        if n >= 2 && rng.gen_range(0..4) == 0 {
            model.add_sum_in_set(&xs, [0, 1, n]);
        }
        if rng.gen_range(0..5) == 0 {
            let fixed = xs[rng.gen_range(0..n)];
            model.fix(fixed, rng.r#gen::<bool>());
        }
        let costs: Vec<(BoolVar, i64)> = xs.iter().map(|&x| (x, rng.gen_range(-5..=5))).collect();
        let offset = rng.gen_range(0..3);
        model.minimize(costs, offset);
        model
    }

    #[test]
    fn test_matches_brute_force_on_random_models() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5107);
        for _ in 0..120 {
            let model = random_model(&mut rng);
            let expected = brute_force(&model);
            let outcome = solve(&model);
            match expected {
                None => assert!(outcome.is_infeasible(), "{}", outcome),
                Some(best) => {
                    assert!(outcome.is_optimal(), "{}", outcome);
                    assert_eq!(outcome.solution().map(|s| s.objective_value()), Some(best));
                }
            }
        }
    }
}
