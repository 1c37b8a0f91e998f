//! # Curvewise
//!
//! Symbolic analysis of real functions of one variable.
//!
//! Given an expression such as `1/(x^2 - 1)`, Curvewise computes its
//! domain, intercepts, asymptotes, monotonicity and concavity exactly,
//! with roots represented exactly, like `sqrt(2)/2` or `exp(-1)`.
//!
//! ## Crates
//!
//! - [`integers`]: big integers, rationals and exact reals
//! - [`poly`]: univariate polynomials and rational functions over ℚ
//! - [`core`]: the expression model, parser and differentiation
//! - [`limits`]: limits at ±∞
//! - [`solve`]: intervals, domains and exact real roots
//! - [`analysis`]: the analysis itself
//!
//! ## Quick Start
//!
//! ```
//! use curvewise::prelude::*;
//!
//! let r = analyze("x^3 - 3x").unwrap();
//! let m = r.monotonicity.as_ref().unwrap();
//! assert_eq!(m.decreasing.to_string(), "(-1, 1)");
//! assert_eq!(m.extrema().count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use curvewise_analysis as analysis;
pub use curvewise_core as core;
pub use curvewise_integers as integers;
pub use curvewise_limits as limits;
pub use curvewise_poly as poly;
pub use curvewise_solve as solve;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use curvewise_analysis::{
        analyze, analyze_many, AlgebraBackend, AnalysisConfig, AnalysisError, AnalysisResult,
        Analyzer, ExactBackend, Partitioner, PointKind, Sign,
    };
    pub use curvewise_core::{parse, Expr};
    pub use curvewise_integers::{ExactReal, Integer, Rational};
    pub use curvewise_limits::{compute_limit, Limit, LimitResult};
    pub use curvewise_poly::{DensePoly, RationalFunction};
    pub use curvewise_solve::{continuous_domain, solve_real, Domain, Interval};
}
