//! Analysis errors.

use std::fmt;

use curvewise_core::ParseError;
use curvewise_solve::Interval;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// The asymptote families, each computed independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AsymptoteClass {
    /// Poles at finite points.
    Vertical,
    /// Finite limits at ±∞.
    Horizontal,
    /// Non-horizontal lines approached at ±∞.
    Oblique,
}

impl fmt::Display for AsymptoteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Oblique => "oblique",
        })
    }
}

/// The stages of an analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    /// Domain of continuity.
    Domain,
    /// Axis intercepts.
    Intercepts,
    /// Asymptotes.
    Asymptotes,
    /// Monotonicity from the first derivative.
    FirstDerivative,
    /// Concavity from the second derivative.
    SecondDerivative,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Domain => "domain",
            Self::Intercepts => "intercepts",
            Self::Asymptotes => "asymptotes",
            Self::FirstDerivative => "first derivative",
            Self::SecondDerivative => "second derivative",
        })
    }
}

/// Errors that can occur during function analysis.
///
/// Only [`AnalysisError::ExpressionParse`] and
/// [`AnalysisError::DomainUnresolvable`] abort an analysis; the others are
/// attached to the part of the result they concern.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The input text is not a valid expression.
    #[error("invalid expression: {0}")]
    ExpressionParse(#[from] ParseError),

    /// The domain of continuity could not be certified.
    #[error("cannot resolve the domain of {expr}: {reason}")]
    DomainUnresolvable {
        /// The expression being analyzed.
        expr: String,
        /// Why the domain is unknown.
        reason: String,
    },

    /// One asymptote family could not be computed.
    #[error("{class} asymptotes could not be computed: {reason}")]
    AsymptoteComputation {
        /// The family that failed.
        class: AsymptoteClass,
        /// Why it failed.
        reason: String,
    },

    /// Roots needed by a stage could not be found in closed form.
    #[error("root finding failed for {stage}: {reason}")]
    RootFinding {
        /// The stage that needed the roots.
        stage: Stage,
        /// Why the solver gave up.
        reason: String,
    },

    /// The sign of a derivative on a piece of the domain is unknown.
    #[error("the sign of the {stage} on {interval} is inconclusive")]
    InconclusiveInterval {
        /// The stage the piece belongs to.
        stage: Stage,
        /// The piece.
        interval: Interval,
    },

    /// The algebra backend could not differentiate.
    #[error("differentiation failed: {0}")]
    Differentiation(String),
}

impl AnalysisError {
    /// Returns true for errors that abort the whole analysis.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ExpressionParse(_) | Self::DomainUnresolvable { .. }
        )
    }
}

impl Serialize for AnalysisError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = AnalysisError::AsymptoteComputation {
            class: AsymptoteClass::Oblique,
            reason: "division failed".into(),
        };
        assert_eq!(e.to_string(), "oblique asymptotes could not be computed: division failed");
        assert!(!e.is_fatal());

        let e = AnalysisError::InconclusiveInterval {
            stage: Stage::SecondDerivative,
            interval: Interval::real_line(),
        };
        assert_eq!(
            e.to_string(),
            "the sign of the second derivative on (-oo, oo) is inconclusive"
        );
    }

    #[test]
    fn test_parse_errors_are_fatal() {
        let parse = curvewise_core::parse("1 +").unwrap_err();
        let e = AnalysisError::from(parse);
        assert!(e.is_fatal());
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            serde_json::to_string(&e.to_string()).unwrap()
        );
    }
}
