//! The analysis entry points.
//!
//! An analysis runs the stages in order: domain, intercepts, asymptotes,
//! then the first- and second-derivative reports. Each stage is a pure
//! function of the parsed expression and the domain, so independent
//! analyses can run on any thread.

use curvewise_core::Expr;
use curvewise_integers::ExactReal;
use curvewise_solve::{Domain, SolveError};
use rayon::prelude::*;
use tracing::{debug, info_span, warn};

use crate::asymptotes::AsymptoteClassifier;
use crate::backend::{AlgebraBackend, ExactBackend};
use crate::config::AnalysisConfig;
use crate::domain::resolve;
use crate::error::{AnalysisError, Stage};
use crate::report::ShapeAnalyzer;
use crate::result::{AnalysisResult, Intercepts};
use crate::roots::{real_roots, root_finding};

/// Analyzes `text` with the default configuration.
///
/// # Errors
///
/// See [`Analyzer::analyze`].
pub fn analyze(text: &str) -> Result<AnalysisResult, AnalysisError> {
    Analyzer::default().analyze(text)
}

/// Analyzes every text in parallel with the default configuration.
#[must_use]
pub fn analyze_many<S: AsRef<str> + Sync>(texts: &[S]) -> Vec<Result<AnalysisResult, AnalysisError>> {
    Analyzer::default().analyze_many(texts)
}

/// Runs analyses with one backend and configuration.
#[derive(Clone, Debug)]
pub struct Analyzer<B = ExactBackend> {
    backend: B,
    config: AnalysisConfig,
}

impl Default for Analyzer<ExactBackend> {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer<ExactBackend> {
    /// Creates an analyzer on the exact backend.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            backend: ExactBackend::new(&config),
            config,
        }
    }
}

impl<B: AlgebraBackend> Analyzer<B> {
    /// Creates an analyzer on a custom backend.
    #[must_use]
    pub fn with_backend(backend: B, config: AnalysisConfig) -> Self {
        Self { backend, config }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Parses and analyzes `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ExpressionParse`] for malformed input and
    /// [`AnalysisError::DomainUnresolvable`] when the domain cannot be
    /// certified. Failures of later stages are recorded in the result.
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let _span = info_span!("analyze", expr = text).entered();
        let expr = self.backend.parse(text)?;
        self.analyze_expr(&expr)
    }

    /// Analyzes an already parsed expression.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DomainUnresolvable`] when the domain cannot
    /// be certified.
    pub fn analyze_expr(&self, expr: &Expr) -> Result<AnalysisResult, AnalysisError> {
        let tolerance = self.config.sign_tolerance;

        let domain = resolve(&self.backend, expr)?;
        debug!(stage = %Stage::Domain, %expr, %domain);

        let intercepts = self.intercepts(expr, &domain);
        debug!(stage = %Stage::Intercepts, %expr);

        let asymptotes = AsymptoteClassifier::new(&self.backend, tolerance).classify(expr, &domain);
        debug!(stage = %Stage::Asymptotes, %expr);

        let shape = ShapeAnalyzer::new(&self.backend, tolerance);
        let monotonicity = shape.monotonicity(expr, &domain);
        debug!(stage = %Stage::FirstDerivative, %expr, ok = monotonicity.is_ok());
        let concavity = shape.concavity(expr, &domain);
        debug!(stage = %Stage::SecondDerivative, %expr, ok = concavity.is_ok());

        Ok(AnalysisResult {
            expression: expr.clone(),
            domain,
            intercepts,
            asymptotes,
            monotonicity,
            concavity,
        })
    }

    /// Analyzes every text in parallel, in input order.
    #[must_use]
    pub fn analyze_many<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Result<AnalysisResult, AnalysisError>> {
        texts.par_iter().map(|t| self.analyze(t.as_ref())).collect()
    }

    /// The simplified `order`-th derivative of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ExpressionParse`] for malformed input and
    /// [`AnalysisError::Differentiation`] when the backend fails.
    pub fn differentiate(&self, text: &str, order: u32) -> Result<Expr, AnalysisError> {
        let expr = self.backend.parse(text)?;
        Ok(self.backend.simplify(&self.backend.differentiate(&expr, order)?))
    }

    fn intercepts(&self, expr: &Expr, domain: &Domain) -> Intercepts {
        let x = match real_roots(&self.backend, expr, domain) {
            Ok(roots) => Ok(roots),
            Err(e @ SolveError::IdenticallyZero) => Err(AnalysisError::RootFinding {
                stage: Stage::Intercepts,
                reason: format!("{e}; every point of {domain} is a zero"),
            }),
            Err(e) => Err(root_finding(Stage::Intercepts, &e)),
        };
        if let Err(err) = &x {
            warn!(%expr, "{err}");
        }

        let origin = ExactReal::zero();
        let y = if domain.contains(&origin) {
            self.backend
                .substitute(expr, &origin)
                .to_expr()
                .map(|v| self.backend.simplify(&v))
        } else {
            None
        };
        Intercepts { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_is_fatal() {
        let err = analyze("x +* 2").unwrap_err();
        assert!(matches!(err, AnalysisError::ExpressionParse(_)));
        assert!(matches!(analyze("y + 1"), Err(AnalysisError::ExpressionParse(_))));
    }

    #[test]
    fn test_domain_failure_is_fatal() {
        assert!(matches!(
            analyze("tan(x)"),
            Err(AnalysisError::DomainUnresolvable { .. })
        ));
    }

    #[test]
    fn test_intercepts() {
        let r = analyze("x^2 - 4").unwrap();
        assert_eq!(
            r.intercepts.x,
            Ok(vec![ExactReal::from(-2), ExactReal::from(2)])
        );
        assert_eq!(r.intercepts.y, Some(Expr::integer(-4)));

        let r = analyze("ln(x)").unwrap();
        assert_eq!(r.intercepts.x, Ok(vec![ExactReal::from(1)]));
        assert_eq!(r.intercepts.y, None);
    }

    #[test]
    fn test_zero_function() {
        let r = analyze("0").unwrap();
        assert!(matches!(
            r.intercepts.x,
            Err(AnalysisError::RootFinding { stage: Stage::Intercepts, .. })
        ));
        assert_eq!(r.intercepts.y, Some(Expr::zero()));
        let m = r.as_monotonicity().unwrap();
        assert!(m.increasing.is_empty() && m.decreasing.is_empty());
        assert_eq!(r.diagnostics().len(), 1);
    }

    #[test]
    fn test_stage_failures_are_attached() {
        let r = analyze("exp(x) - x^3").unwrap();
        assert!(r.intercepts.x.is_err());
        assert!(r.monotonicity.is_err());
        assert!(r.asymptotes.vertical.is_ok());
        assert!(!r.is_complete());
        assert!(r.diagnostics().iter().all(|e| !e.is_fatal()));
    }

    #[test]
    fn test_custom_variable() {
        let analyzer = Analyzer::new(AnalysisConfig::default().with_variable("t"));
        let r = analyzer.analyze("t^2 - 1").unwrap();
        assert_eq!(r.intercepts.x.unwrap().len(), 2);
        assert_eq!(analyzer.differentiate("t^3", 2).unwrap().to_string(), "6*t");
    }

    #[test]
    fn test_solver_degree_limit() {
        let analyzer = Analyzer::new(AnalysisConfig::default().with_max_solve_degree(2));
        let r = analyzer.analyze("x^3 - x").unwrap();
        assert!(matches!(
            r.intercepts.x,
            Err(AnalysisError::RootFinding { stage: Stage::Intercepts, .. })
        ));
        assert!(r.monotonicity.is_ok());
    }

    #[test]
    fn test_analyze_many_keeps_order() {
        let results = analyze_many(&["x", "1 +", "x^2"]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().expression.to_string(), "x^2");
    }
}
