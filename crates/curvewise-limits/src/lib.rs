//! Limits of real expressions as the variable tends to ±∞.
//!
//! Rational functions are handled exactly by comparing degrees and leading
//! coefficients. Everything else goes through a structural pass (limits of
//! sums, products, powers and function applications built from the limits
//! of their parts) that falls back on growth-rate comparison whenever it
//! meets an indeterminate form such as `∞ − ∞` or `0 · ∞`.
//!
//! # Algorithm Overview
//!
//! 1. Reduce `x → −∞` to `x → +∞` by substituting `x ↦ −x`
//! 2. Try the exact rational-function path
//! 3. Combine the limits of the children
//! 4. On an indeterminate form, compute the leading asymptotic term
//!    `c · x^a · (ln x)^b · exp(k · x^p)` and read the limit off its
//!    growth rate
//!
//! # Example
//!
//! ```
//! use curvewise_core::parse;
//! use curvewise_limits::{compute_limit, Limit, LimitResult};
//!
//! let f = parse("(2x^2 + 1)/(x^2 - 1)").unwrap();
//! let lim = compute_limit(&f, Limit::PosInfinity).unwrap();
//! assert_eq!(lim, LimitResult::Finite(curvewise_core::Expr::integer(2)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod comparison;
pub mod leading;
pub mod limit;

#[cfg(test)]
mod proptests;

pub use comparison::{ComparisonClass, GrowthRate};
pub use leading::Leading;
pub use limit::{compute_limit, Limit, LimitEngine, LimitError, LimitResult};
