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

//! # Slotwise MIP
//!
//! A 0/1 linear model for assignment problems, solved through `good_lp`.
//!
//! Core flow
//! - Build a `model::MipModel<T>`: binary variables, linear rows, helpers
//!   for set-valued sums and conjunctions, and a linear objective (always
//!   minimised).
//! - Choose a `monitor::SolveMonitor` (progress logging, custom hooks).
//! - Run `solver::MipSolver::solve` and inspect the
//!   `result::MipSolverOutcome`.
//!
//! Every solution is verified against the integer model and its objective
//! is recomputed exactly, so callers never see floating point drift.
//!
//! Module map
//! - `var`: the `BoolVar` typed index.
//! - `model`: `MipModel` and `LinearConstraint`.
//! - `solver`: lowering to good_lp and backend selection.
//! - `monitor`: solve monitors.
//! - `solution`, `result`, `stats`: outputs.

pub mod model;
pub mod monitor;
pub mod num;
pub mod result;
pub mod solution;
pub mod solver;
pub mod stats;
pub mod var;
