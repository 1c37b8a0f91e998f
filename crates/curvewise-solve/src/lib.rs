//! # curvewise-solve
//!
//! Exact real solving over the expression model:
//!
//! - [`Interval`] and [`Domain`]: finite unions of disjoint real intervals
//!   with exact endpoints, printed in set notation
//!   (`(-oo, -1) U (-1, 1) U (1, oo)`)
//! - [`Solver::solve_real`]: the real zeros of an expression as exact
//!   reals over `√d`, `e^r` or `ln c`
//! - [`Solver::continuous_domain`]: where an expression is defined and
//!   continuous
//!
//! ```
//! use curvewise_core::parse;
//! use curvewise_solve::{continuous_domain, solve_real};
//!
//! let f = parse("sqrt(x^2 - 1)").unwrap();
//! assert_eq!(continuous_domain(&f).unwrap().to_string(), "(-oo, -1] U [1, oo)");
//! assert_eq!(solve_real(&f).unwrap().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod continuity;
pub mod domain;
pub mod interval;
pub mod solve;

#[cfg(test)]
mod proptests;

pub use continuity::continuous_domain;
pub use domain::Domain;
pub use interval::{Bound, Interval};
pub use solve::{solve_real, SolveError, Solver, DEFAULT_MAX_DEGREE};
