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

//! Linear model over binary variables.
//!
//! Every constraint has the form
//!
//! ```text
//! lower ≤ Σ cᵢ·xᵢ ≤ upper
//! ```
//!
//! with `xᵢ ∈ {0, 1}`. The higher-level helpers (`add_exactly_one`,
//! `add_sum_in_set`, `add_selector`, `add_floor_half`, ...) all reduce to
//! this one form, so the backend only ever sees plain linear rows.
//! `T::min_value()` and `T::max_value()` stand for a missing lower and upper
//! side respectively.

use crate::{
    num::SolverNumeric,
    var::{BoolVar, ConstraintIndex},
};

/// A linear constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint<T> {
    terms: Vec<(BoolVar, T)>,
    lower: T,
    upper: T,
}

impl<T> LinearConstraint<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn terms(&self) -> &[(BoolVar, T)] {
        &self.terms
    }

    #[inline]
    pub fn lower(&self) -> T {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> T {
        self.upper
    }

    #[inline]
    pub fn has_lower(&self) -> bool {
        self.lower != T::min_value()
    }

    #[inline]
    pub fn has_upper(&self) -> bool {
        self.upper != T::max_value()
    }

    /// Returns `true` if this is `Σ xᵢ = 1` over unit coefficients.
    pub fn is_exactly_one(&self) -> bool {
        self.lower == T::one()
            && self.upper == T::one()
            && !self.terms.is_empty()
            && self.terms.iter().all(|(_, c)| *c == T::one())
    }

    /// Returns the activity `Σ cᵢ·xᵢ` under a complete assignment.
    pub fn activity<F>(&self, value: F) -> T
    where
        F: Fn(BoolVar) -> bool,
    {
        self.terms
            .iter()
            .filter(|(v, _)| value(*v))
            .fold(T::zero(), |acc, (_, c)| acc + *c)
    }

    /// Evaluates the constraint under a complete assignment.
    pub fn is_satisfied_by<F>(&self, value: F) -> bool
    where
        F: Fn(BoolVar) -> bool,
    {
        let activity = self.activity(value);
        self.lower <= activity && activity <= self.upper
    }
}

impl<T> std::fmt::Display for LinearConstraint<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_lower() {
            write!(f, "{} <= ", self.lower)?;
        }
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (i, (v, c)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*x{}", c, v.get())?;
        }
        if self.has_upper() {
            write!(f, " <= {}", self.upper)?;
        }
        Ok(())
    }
}

/// Sorts terms by variable, merges duplicates and drops zero coefficients.
fn normalize_terms<T, I>(terms: I) -> Vec<(BoolVar, T)>
where
    T: SolverNumeric,
    I: IntoIterator<Item = (BoolVar, T)>,
{
    let mut terms: Vec<(BoolVar, T)> = terms.into_iter().collect();
    terms.sort_unstable_by_key(|(v, _)| *v);

    let mut merged: Vec<(BoolVar, T)> = Vec::with_capacity(terms.len());
    for (var, coefficient) in terms {
        if let Some((last, acc)) = merged.last_mut()
            && *last == var
        {
            *acc = *acc + coefficient;
            continue;
        }
        merged.push((var, coefficient));
    }
    merged.retain(|(_, c)| !c.is_zero());
    merged
}

/// A linear model over binary variables with a linear objective.
#[derive(Debug, Clone)]
pub struct MipModel<T> {
    names: Vec<Option<String>>,
    fixed: Vec<Option<bool>>,
    objective: Vec<T>,
    objective_offset: T,
    constraints: Vec<LinearConstraint<T>>,
    trivially_infeasible: bool,
}

impl<T> Default for MipModel<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MipModel<T>
where
    T: SolverNumeric,
{
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            fixed: Vec::new(),
            objective: Vec::new(),
            objective_offset: T::zero(),
            constraints: Vec::new(),
            trivially_infeasible: false,
        }
    }

    #[inline(always)]
    fn check_var(&self, var: BoolVar, caller: &str) {
        assert!(
            var.get() < self.fixed.len(),
            "called `MipModel::{}` with variable index out of bounds: the len is {} but the index is {}",
            caller,
            self.fixed.len(),
            var.get()
        );
    }

    /// Creates a new unconstrained binary variable.
    pub fn new_bool_var(&mut self) -> BoolVar {
        let var = BoolVar::new(self.fixed.len());
        self.names.push(None);
        self.fixed.push(None);
        self.objective.push(T::zero());
        var
    }

    /// Creates a new binary variable carrying a name for diagnostics.
    pub fn new_named_bool_var<S>(&mut self, name: S) -> BoolVar
    where
        S: Into<String>,
    {
        let var = self.new_bool_var();
        self.names[var.get()] = Some(name.into());
        var
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.fixed.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn name(&self, var: BoolVar) -> Option<&str> {
        self.check_var(var, "name");
        self.names[var.get()].as_deref()
    }

    /// Fixes `var` to `value`.
    ///
    /// Fixing the same variable to both values makes the model infeasible.
    pub fn fix(&mut self, var: BoolVar, value: bool) {
        self.check_var(var, "fix");
        match self.fixed[var.get()] {
            Some(previous) if previous != value => self.trivially_infeasible = true,
            _ => self.fixed[var.get()] = Some(value),
        }
    }

    #[inline]
    pub fn fixed_value(&self, var: BoolVar) -> Option<bool> {
        self.check_var(var, "fixed_value");
        self.fixed[var.get()]
    }

    #[inline]
    pub fn fixed_values(&self) -> &[Option<bool>] {
        &self.fixed
    }

    /// Returns `true` if conflicting fixes were requested.
    #[inline]
    pub fn is_trivially_infeasible(&self) -> bool {
        self.trivially_infeasible
    }

    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint<T>] {
        &self.constraints
    }

    #[inline]
    pub fn constraint(&self, index: ConstraintIndex) -> &LinearConstraint<T> {
        &self.constraints[index.get()]
    }

    /// Adds `lower ≤ Σ terms ≤ upper`.
    pub fn add_linear<I>(&mut self, terms: I, lower: T, upper: T) -> ConstraintIndex
    where
        I: IntoIterator<Item = (BoolVar, T)>,
    {
        let terms = normalize_terms(terms);
        for &(var, _) in &terms {
            self.check_var(var, "add_linear");
        }

        let index = ConstraintIndex::new(self.constraints.len());
        self.constraints.push(LinearConstraint {
            terms,
            lower,
            upper,
        });
        index
    }

    /// Adds `Σ vars = value`.
    pub fn add_equality(&mut self, vars: &[BoolVar], value: T) -> ConstraintIndex {
        self.add_linear(vars.iter().map(|&v| (v, T::one())), value, value)
    }

    /// Adds `Σ vars ≤ value`.
    pub fn add_at_most(&mut self, vars: &[BoolVar], value: T) -> ConstraintIndex {
        self.add_linear(vars.iter().map(|&v| (v, T::one())), T::min_value(), value)
    }

    /// Adds `Σ vars ≥ value`.
    pub fn add_at_least(&mut self, vars: &[BoolVar], value: T) -> ConstraintIndex {
        self.add_linear(vars.iter().map(|&v| (v, T::one())), value, T::max_value())
    }

    /// Adds `Σ vars = 1`.
    #[inline]
    pub fn add_exactly_one(&mut self, vars: &[BoolVar]) -> ConstraintIndex {
        self.add_equality(vars, T::one())
    }

    /// Creates one indicator `d_v` per value `v` such that exactly one of
    /// them holds when `condition` holds and none otherwise
    /// (`Σ d_v = condition`, or `Σ d_v = 1` when unconditioned).
    ///
    /// The indicators say nothing by themselves; callers tie them to the
    /// quantity they select. Returns `(value, indicator)` pairs in ascending
    /// value order. With no values and a condition, the condition is forced
    /// false; with no values and no condition, the model becomes infeasible.
    pub fn add_selector<I>(&mut self, values: I, condition: Option<BoolVar>) -> Vec<(usize, BoolVar)>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut values: Vec<usize> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        let indicators: Vec<(usize, BoolVar)> = values
            .into_iter()
            .map(|value| (value, self.new_bool_var()))
            .collect();

        let selector = indicators.iter().map(|&(_, d)| (d, T::one()));
        match condition {
            Some(c) => {
                self.add_linear(
                    selector.chain(std::iter::once((c, -T::one()))),
                    T::zero(),
                    T::zero(),
                );
            }
            None => {
                self.add_linear(selector, T::one(), T::one());
            }
        }
        indicators
    }

    /// Constrains `Σ vars` to take one of `values`.
    ///
    /// One indicator `d_v` is created per admissible value `v`; values larger
    /// than `vars.len()` can never be reached and are dropped. The encoding is
    ///
    /// ```text
    /// Σ d_v = 1
    /// Σ vars = Σ v·d_v
    /// ```
    ///
    /// Returns `(value, indicator)` pairs in ascending value order.
    ///
    /// ```rust
    /// use slotwise_mip::model::MipModel;
    ///
    /// let mut model = MipModel::<i64>::new();
    /// let xs: Vec<_> = (0..3).map(|_| model.new_bool_var()).collect();
    /// let indicators = model.add_sum_in_set(&xs, [0, 2, 7]);
    /// let values: Vec<usize> = indicators.iter().map(|(v, _)| *v).collect();
    /// assert_eq!(values, vec![0, 2]);
    /// ```
    pub fn add_sum_in_set<I>(&mut self, vars: &[BoolVar], values: I) -> Vec<(usize, BoolVar)>
    where
        I: IntoIterator<Item = usize>,
    {
        let reachable: Vec<usize> = values
            .into_iter()
            .filter(|&v| v <= vars.len() && T::from_usize(v).is_some())
            .collect();
        let indicators = self.add_selector(reachable, None);
        self.add_linear(
            vars.iter()
                .map(|&v| (v, T::one()))
                .chain(indicators.iter().map(|&(value, d)| (d, -Self::weight(value)))),
            T::zero(),
            T::zero(),
        );
        indicators
    }

    /// Returns a new variable `z = ⌊(x + y) / 2⌋`, i.e. `x ∧ y`.
    pub fn add_floor_half(&mut self, x: BoolVar, y: BoolVar) -> BoolVar {
        let z = self.new_bool_var();
        let two = T::one() + T::one();
        self.add_linear(
            [(x, T::one()), (y, T::one()), (z, -two)],
            T::zero(),
            T::one(),
        );
        z
    }

    /// Converts a count into a coefficient. Counts come from variable
    /// lists, so they always fit.
    #[inline]
    fn weight(value: usize) -> T {
        T::from_usize(value).unwrap_or_else(T::max_value)
    }

    /// Adds `terms` to the objective and `offset` to its constant part.
    pub fn minimize<I>(&mut self, terms: I, offset: T)
    where
        I: IntoIterator<Item = (BoolVar, T)>,
    {
        for (var, coefficient) in terms {
            self.check_var(var, "minimize");
            self.objective[var.get()] = self.objective[var.get()] + coefficient;
        }
        self.objective_offset = self.objective_offset + offset;
    }

    #[inline]
    pub fn objective_coefficient(&self, var: BoolVar) -> T {
        self.check_var(var, "objective_coefficient");
        self.objective[var.get()]
    }

    #[inline]
    pub fn objective_coefficients(&self) -> &[T] {
        &self.objective
    }

    #[inline]
    pub fn objective_offset(&self) -> T {
        self.objective_offset
    }

    /// Evaluates the objective under a complete assignment.
    pub fn objective_value<F>(&self, value: F) -> T
    where
        F: Fn(BoolVar) -> bool,
    {
        BoolVar::range(self.num_vars())
            .filter(|&v| value(v))
            .fold(self.objective_offset, |acc, v| acc + self.objective[v.get()])
    }

    /// Returns the first constraint or fix violated by a complete
    /// assignment, if any.
    pub fn first_violation<F>(&self, value: F) -> Option<Violation>
    where
        F: Fn(BoolVar) -> bool,
    {
        if let Some(i) = self
            .fixed
            .iter()
            .enumerate()
            .position(|(i, fixed)| fixed.is_some_and(|f| f != value(BoolVar::new(i))))
        {
            return Some(Violation::Fix(BoolVar::new(i)));
        }
        self.constraints
            .iter()
            .position(|c| !c.is_satisfied_by(&value))
            .map(|i| Violation::Constraint(ConstraintIndex::new(i)))
    }
}

/// What a complete assignment failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Fix(BoolVar),
    Constraint(ConstraintIndex),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Fix(v) => write!(f, "fixed value of {}", v),
            Violation::Constraint(c) => write!(f, "{}", c),
        }
    }
}

impl<T> std::fmt::Display for MipModel<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MipModel(num_vars: {}, num_constraints: {})",
            self.num_vars(),
            self.num_constraints()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_are_merged_and_zeroes_dropped() {
        let mut model = MipModel::<i64>::new();
        let a = model.new_bool_var();
        let b = model.new_bool_var();
        let c = model.add_linear([(b, 2), (a, 1), (b, -2), (a, 3)], 0, 4);
        assert_eq!(model.constraint(c).terms(), &[(a, 4)]);
    }

    #[test]
    fn test_conflicting_fix_marks_model_infeasible() {
        let mut model = MipModel::<i32>::new();
        let a = model.new_bool_var();
        model.fix(a, true);
        model.fix(a, true);
        assert!(!model.is_trivially_infeasible());
        model.fix(a, false);
        assert!(model.is_trivially_infeasible());
        assert_eq!(model.fixed_value(a), Some(true));
    }

    #[test]
    fn test_exactly_one_is_recognised() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<_> = (0..3).map(|_| model.new_bool_var()).collect();
        let c = model.add_exactly_one(&xs);
        assert!(model.constraint(c).is_exactly_one());
        let d = model.add_at_most(&xs, 1);
        assert!(!model.constraint(d).is_exactly_one());
        assert!(!model.constraint(d).has_lower());
        assert!(model.constraint(d).has_upper());
    }

    #[test]
    fn test_sum_in_set_links_indicators_to_the_sum() {
        let mut model = MipModel::<i64>::new();
        let xs: Vec<_> = (0..3).map(|_| model.new_bool_var()).collect();
        let indicators = model.add_sum_in_set(&xs, [2, 0]);
        assert_eq!(indicators.iter().map(|(v, _)| *v).collect::<Vec<_>>(), vec![0, 2]);
        let (d0, d2) = (indicators[0].1, indicators[1].1);

        // x0 + x1 = 2 with d2 selected satisfies every row.
        let ok = |v: BoolVar| v == xs[0] || v == xs[1] || v == d2;
        assert_eq!(model.first_violation(ok), None);
        // A sum of 1 matches no indicator.
        let one = |v: BoolVar| v == xs[0] || v == d0;
        assert!(model.first_violation(one).is_some());
        let one = |v: BoolVar| v == xs[0] || v == d2;
        assert!(model.first_violation(one).is_some());
    }

    #[test]
    fn test_conditioned_selector_follows_its_condition() {
        let mut model = MipModel::<i64>::new();
        let cond = model.new_bool_var();
        let indicators = model.add_selector([5, 6], Some(cond));
        let row = model.constraints().last().unwrap().clone();
        assert!(row.terms().contains(&(cond, -1)));

        let (d5, d6) = (indicators[0].1, indicators[1].1);
        assert!(row.is_satisfied_by(|_| false));
        assert!(row.is_satisfied_by(|v| v == cond || v == d6));
        assert!(!row.is_satisfied_by(|v| v == cond));
        assert!(!row.is_satisfied_by(|v| v == d5));
        assert!(!row.is_satisfied_by(|v| v == cond || v == d5 || v == d6));
    }

    #[test]
    fn test_empty_conditioned_selector_forbids_its_condition() {
        let mut model = MipModel::<i64>::new();
        let cond = model.new_bool_var();
        assert!(model.add_selector(std::iter::empty(), Some(cond)).is_empty());
        assert!(model.first_violation(|_| false).is_none());
        assert!(model.first_violation(|v| v == cond).is_some());
    }

    #[test]
    fn test_floor_half_semantics() {
        let mut model = MipModel::<i64>::new();
        let x = model.new_bool_var();
        let y = model.new_bool_var();
        let z = model.add_floor_half(x, y);
        let c = model.constraints().last().unwrap().clone();
        for (vx, vy) in [(false, false), (true, false), (false, true), (true, true)] {
            let both = vx && vy;
            let assign = |v: BoolVar| {
                if v == x {
                    vx
                } else if v == y {
                    vy
                } else {
                    v == z && both
                }
            };
            assert!(c.is_satisfied_by(assign));
            let wrong = |v: BoolVar| {
                if v == x {
                    vx
                } else if v == y {
                    vy
                } else {
                    v == z && !both
                }
            };
            assert!(!c.is_satisfied_by(wrong));
        }
    }

    #[test]
    fn test_objective_accumulates() {
        let mut model = MipModel::<i64>::new();
        let a = model.new_bool_var();
        let b = model.new_bool_var();
        model.minimize([(a, 3), (b, -2)], 2);
        model.minimize([(a, 1)], 0);
        assert_eq!(model.objective_coefficient(a), 4);
        assert_eq!(model.objective_offset(), 2);
        assert_eq!(model.objective_value(|v| v == b), 0);
        assert_eq!(model.objective_value(|_| true), 4);
    }

    #[test]
    fn test_violated_fix_is_reported() {
        let mut model = MipModel::<i64>::new();
        let a = model.new_bool_var();
        model.fix(a, true);
        assert_eq!(model.first_violation(|_| false), Some(Violation::Fix(a)));
        assert_eq!(model.first_violation(|_| true), None);
    }

    #[test]
    #[should_panic(expected = "called `MipModel::fix` with variable index out of bounds")]
    fn test_unknown_variable_panics() {
        let mut model = MipModel::<i64>::new();
        model.fix(BoolVar::new(0), true);
    }
}
