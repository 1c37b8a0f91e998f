//! # curvewise-integers
//!
//! Exact numbers for the curvewise function analyzer.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//! - Exact reals `a + b·t` (`ExactReal`) over one irrational unit `t`,
//!   a square root `√d`, an exponential `e^r` or a logarithm `ln c`
//!
//! Every value here is immutable from the caller's point of view: all
//! operations return new values.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;
pub mod rational;
pub mod real;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use rational::Rational;
pub use real::{ExactReal, Unit};
