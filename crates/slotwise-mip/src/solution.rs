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

use crate::var::BoolVar;
use fixedbitset::FixedBitSet;

/// A complete assignment together with its objective value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<T> {
    objective_value: T,
    values: FixedBitSet,
}

impl<T> Solution<T>
where
    T: Copy,
{
    /// Creates a solution from the set of variables that are `true`.
    pub fn new(objective_value: T, values: FixedBitSet) -> Self {
        Self {
            objective_value,
            values,
        }
    }

    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    /// Returns the value of `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is not a variable of the solved model.
    #[inline]
    pub fn value(&self, var: BoolVar) -> bool {
        let index = var.get();
        assert!(
            index < self.values.len(),
            "called `Solution::value` with variable index out of bounds: the len is {} but the index is {}",
            self.values.len(),
            index
        );
        self.values.contains(index)
    }

    /// Iterates the variables that are `true`.
    pub fn true_vars(&self) -> impl Iterator<Item = BoolVar> + '_ {
        self.values.ones().map(BoolVar::new)
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution(objective: {}, true: {}/{})",
            self.objective_value,
            self.values.count_ones(..),
            self.values.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_and_true_vars() {
        let mut bits = FixedBitSet::with_capacity(4);
        bits.insert(1);
        bits.insert(3);
        let solution = Solution::new(7i64, bits);
        assert_eq!(solution.objective_value(), 7);
        assert!(solution.value(BoolVar::new(1)));
        assert!(!solution.value(BoolVar::new(2)));
        let ones: Vec<usize> = solution.true_vars().map(|v| v.get()).collect();
        assert_eq!(ones, vec![1, 3]);
        assert_eq!(solution.to_string(), "Solution(objective: 7, true: 2/4)");
    }
}
