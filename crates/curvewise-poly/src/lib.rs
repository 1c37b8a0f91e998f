//! # curvewise-poly
//!
//! Univariate polynomial arithmetic over ℚ for the curvewise analyzer.
//!
//! This crate provides:
//! - Dense univariate polynomials with exact rational coefficients
//! - Division with remainder, GCD and squarefree decomposition
//! - Sturm sequences for certified real-root counting
//! - Exact real roots as square-root values `a + b√d`
//! - Rational functions P(x)/Q(x) in canonical (reduced, monic) form

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod algorithms;
pub mod dense;
pub mod rational_func;
pub mod roots;

#[cfg(test)]
mod proptests;

pub use dense::DensePoly;
pub use rational_func::RationalFunction;
pub use roots::{real_roots, RealRoot, RootError};
