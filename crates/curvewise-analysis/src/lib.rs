//! # curvewise-analysis
//!
//! Analysis of a real function of one variable:
//!
//! - domain of continuity as a union of disjoint intervals
//! - x- and y-intercepts
//! - vertical, horizontal and oblique asymptotes
//! - increasing and decreasing intervals, critical points and extrema
//! - concavity and inflection points
//!
//! The symbolic work goes through the [`AlgebraBackend`] trait;
//! [`ExactBackend`] implements it with exact arithmetic.
//!
//! ```
//! use curvewise_analysis::analyze;
//!
//! let r = analyze("1/(x^2 - 1)").unwrap();
//! assert_eq!(r.domain.to_string(), "(-oo, -1) U (-1, 1) U (1, oo)");
//! assert_eq!(r.asymptotes.vertical.as_ref().unwrap().len(), 2);
//!
//! let m = r.monotonicity.as_ref().unwrap();
//! assert_eq!(m.increasing.to_string(), "(-oo, -1) U (-1, 0)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod asymptotes;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod partition;
pub mod report;
pub mod result;
pub mod roots;

#[cfg(test)]
mod proptests;

pub use analyzer::{analyze, analyze_many, Analyzer};
pub use asymptotes::{AsymptoteClassifier, AsymptoteSet, HorizontalAsymptotes, ObliqueAsymptote};
pub use backend::{AlgebraBackend, ExactBackend, Value};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AsymptoteClass, Stage};
pub use partition::{IntervalClassification, Partitioner, Sign, SignedInterval};
pub use report::{ConcavityReport, CriticalPoint, MonotonicityReport, PointKind, ShapeAnalyzer};
pub use result::{AnalysisResult, Intercepts};
pub use roots::real_roots;
