//! Analysis result types.

use curvewise_core::Expr;
use curvewise_integers::ExactReal;
use curvewise_solve::Domain;
use serde::Serialize;

use crate::asymptotes::AsymptoteSet;
use crate::error::{AnalysisError, Stage};
use crate::report::{ConcavityReport, MonotonicityReport};

/// Where the graph meets the axes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Intercepts {
    /// The zeros in the domain, ascending.
    pub x: Result<Vec<ExactReal>, AnalysisError>,
    /// The value at zero, `None` when zero is outside the domain.
    pub y: Option<Expr>,
}

/// Everything known about one function.
///
/// Only parsing and domain resolution can abort an analysis. Every other
/// stage carries its own outcome, so a failure in one does not hide the
/// others.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// The function as parsed.
    pub expression: Expr,
    /// Where it is defined and continuous.
    pub domain: Domain,
    /// Axis intercepts.
    pub intercepts: Intercepts,
    /// Vertical, horizontal and oblique asymptotes.
    pub asymptotes: AsymptoteSet,
    /// First-derivative analysis.
    pub monotonicity: Result<MonotonicityReport, AnalysisError>,
    /// Second-derivative analysis.
    pub concavity: Result<ConcavityReport, AnalysisError>,
}

impl AnalysisResult {
    /// Every failure and every piece of undecided sign, in stage order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<AnalysisError> {
        let mut out: Vec<AnalysisError> = Vec::new();
        out.extend(self.intercepts.x.as_ref().err().cloned());
        out.extend(self.asymptotes.errors().cloned());

        match &self.monotonicity {
            Ok(m) => out.extend(m.inconclusive.iter().map(|i| AnalysisError::InconclusiveInterval {
                stage: Stage::FirstDerivative,
                interval: i.clone(),
            })),
            Err(e) => out.push(e.clone()),
        }
        match &self.concavity {
            Ok(c) => out.extend(c.inconclusive.iter().map(|i| AnalysisError::InconclusiveInterval {
                stage: Stage::SecondDerivative,
                interval: i.clone(),
            })),
            Err(e) => out.push(e.clone()),
        }
        out
    }

    /// Returns true if every stage succeeded and every sign was decided.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.diagnostics().is_empty()
    }

    /// The monotonicity report, if that stage succeeded.
    #[must_use]
    pub fn as_monotonicity(&self) -> Option<&MonotonicityReport> {
        self.monotonicity.as_ref().ok()
    }

    /// The concavity report, if that stage succeeded.
    #[must_use]
    pub fn as_concavity(&self) -> Option<&ConcavityReport> {
        self.concavity.as_ref().ok()
    }
}
