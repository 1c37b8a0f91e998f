//! # curvewise-core
//!
//! The expression model for the curvewise function analyzer.
//!
//! This crate provides:
//! - [`Expr`], an immutable, reference-counted expression tree over one
//!   real variable
//! - Normalizing constructors (flattening, constant folding, like-term and
//!   like-base collection) so structurally equal trees mean equal values
//! - A logos-based lexer and recursive-descent parser
//! - Symbolic differentiation, substitution and exact/approximate evaluation
//! - Conversion to and from canonical rational functions
//!
//! ## Design Principles
//!
//! - **Immutable trees**: every operation returns a new expression; shared
//!   subtrees are reference counted, so clones are cheap and expressions
//!   are `Send + Sync`
//! - **Domain-preserving construction**: constructors never cancel a factor
//!   against its inverse, so the parsed tree keeps every point where the
//!   input is undefined; [`Expr::simplify`] is the explicit opt-in

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod diff;
pub mod display;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod simplify;

#[cfg(test)]
mod proptests;

pub use expr::{Constant, Expr, ExprNode, Function};
pub use parser::{parse, ParseError, Parser};
