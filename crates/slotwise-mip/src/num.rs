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

use num_traits::{FromPrimitive, PrimInt, Signed};

/// Numeric capabilities required from objective and coefficient types.
///
/// Implemented for all signed primitive integers.
pub trait SolverNumeric:
    PrimInt + Signed + FromPrimitive + std::fmt::Debug + std::fmt::Display + Send + Sync
{
}

impl<T> SolverNumeric for T where
    T: PrimInt + Signed + FromPrimitive + std::fmt::Debug + std::fmt::Display + Send + Sync
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requires_numeric<T: SolverNumeric>(value: T) -> T {
        value + T::one()
    }

    #[test]
    fn test_signed_integers_are_solver_numeric() {
        assert_eq!(requires_numeric(1i32), 2);
        assert_eq!(requires_numeric(-1i64), 0);
        assert_eq!(requires_numeric(5isize), 6);
    }
}
