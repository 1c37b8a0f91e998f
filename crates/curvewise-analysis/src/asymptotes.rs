//! Asymptote classification.
//!
//! The three families are computed independently; a failure in one is
//! recorded in its own field and does not stop the others.
//!
//! A root `r` of the denominator is a vertical asymptote unless the
//! numerator vanishes there to at least the same order. Orders come from
//! exact root multiplicities when both parts are polynomials, and
//! otherwise from the first derivative that does not vanish at `r`.

use curvewise_core::convert::from_polynomial;
use curvewise_core::Expr;
use curvewise_integers::{ExactReal, Rational};
use curvewise_limits::{Limit, LimitResult};
use curvewise_solve::{Bound, Domain, SolveError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{AlgebraBackend, Value};
use crate::error::{AnalysisError, AsymptoteClass};

/// Highest derivative examined when measuring how fast an expression
/// vanishes at a point.
const MAX_VANISHING_ORDER: u32 = 8;

/// Limits at both ends of the real line.
///
/// A side is `None` when the domain does not extend to that infinity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HorizontalAsymptotes {
    /// The limit as the variable tends to -∞.
    pub neg_infinity: Option<LimitResult>,
    /// The limit as the variable tends to +∞.
    pub pos_infinity: Option<LimitResult>,
}

impl HorizontalAsymptotes {
    /// The distinct horizontal lines `y = c`.
    #[must_use]
    pub fn lines(&self) -> Vec<&Expr> {
        let mut lines: Vec<&Expr> = [&self.neg_infinity, &self.pos_infinity]
            .into_iter()
            .filter_map(|side| side.as_ref().and_then(LimitResult::finite_value))
            .collect();
        lines.dedup();
        lines
    }

    /// Returns true if either side has a finite limit.
    #[must_use]
    pub fn has_finite_side(&self) -> bool {
        !self.lines().is_empty()
    }
}

/// A line `y = slope·x + intercept` approached at both infinities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObliqueAsymptote {
    /// The slope, never zero.
    pub slope: Rational,
    /// The y-intercept of the line.
    pub intercept: Rational,
    /// The line as an expression in the variable.
    pub line: Expr,
}

/// All asymptotes of a function, each family with its own outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AsymptoteSet {
    /// The points with a vertical asymptote, ascending.
    pub vertical: Result<Vec<ExactReal>, AnalysisError>,
    /// The limits at ±∞.
    pub horizontal: Result<HorizontalAsymptotes, AnalysisError>,
    /// The oblique asymptote, if there is one.
    pub oblique: Result<Option<ObliqueAsymptote>, AnalysisError>,
}

impl AsymptoteSet {
    /// The errors of the families that failed.
    pub fn errors(&self) -> impl Iterator<Item = &AnalysisError> {
        [
            self.vertical.as_ref().err(),
            self.horizontal.as_ref().err(),
            self.oblique.as_ref().err(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Computes the asymptotes of an expression.
pub struct AsymptoteClassifier<'a, B: ?Sized> {
    backend: &'a B,
    tolerance: f64,
}

impl<'a, B: AlgebraBackend + ?Sized> AsymptoteClassifier<'a, B> {
    /// Creates a classifier; approximate values within `tolerance` of zero
    /// count as zero when measuring vanishing orders.
    pub fn new(backend: &'a B, tolerance: f64) -> Self {
        Self { backend, tolerance }
    }

    /// All three families for `expr` on `domain`.
    #[must_use]
    pub fn classify(&self, expr: &Expr, domain: &Domain) -> AsymptoteSet {
        let vertical = self.vertical(expr);
        let horizontal = self.horizontal(expr, domain);
        let oblique = self.oblique(expr, horizontal.as_ref().ok());
        let set = AsymptoteSet {
            vertical,
            horizontal,
            oblique,
        };
        for err in set.errors() {
            warn!(%expr, "{err}");
        }
        set
    }

    /// The uncancelled real zeros of the denominator, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::AsymptoteComputation`] when the denominator
    /// cannot be solved or the order of a zero cannot be measured.
    pub fn vertical(&self, expr: &Expr) -> Result<Vec<ExactReal>, AnalysisError> {
        let fail = |reason: String| AnalysisError::AsymptoteComputation {
            class: AsymptoteClass::Vertical,
            reason,
        };

        let (num, den) = self.backend.numer_denom(expr);
        if !den.contains_var() {
            return Ok(Vec::new());
        }
        let candidates = match self.backend.solve_real(&den) {
            Ok(roots) => roots,
            Err(SolveError::IdenticallyZero) => return Err(fail(format!("denominator {den} is identically zero"))),
            Err(e) => return Err(fail(e.to_string())),
        };

        let mut poles = Vec::with_capacity(candidates.len());
        for root in candidates {
            let order = self
                .pole_order(&den, &root)
                .ok_or_else(|| fail(format!("cannot measure the zero of {den} at {root}")))?;
            if self.vanishes_to(&num, &root, order) {
                debug!(%expr, %root, order, "removable singularity");
                continue;
            }
            poles.push(root);
        }
        Ok(poles)
    }

    /// The limits at the infinite ends of `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::AsymptoteComputation`] when a limit
    /// computation is abandoned.
    pub fn horizontal(&self, expr: &Expr, domain: &Domain) -> Result<HorizontalAsymptotes, AnalysisError> {
        let side = |direction: Limit, end: &Bound| -> Result<Option<LimitResult>, AnalysisError> {
            let reaches = domain
                .intervals()
                .iter()
                .any(|i| i.start() == end || i.end() == end);
            if !reaches {
                return Ok(None);
            }
            let limit = self
                .backend
                .limit(expr, direction)
                .map_err(|e| AnalysisError::AsymptoteComputation {
                    class: AsymptoteClass::Horizontal,
                    reason: e.to_string(),
                })?;
            if limit == LimitResult::Unknown {
                return Err(AnalysisError::AsymptoteComputation {
                    class: AsymptoteClass::Horizontal,
                    reason: format!("the limit of {expr} at {end} could not be determined"),
                });
            }
            Ok(Some(limit))
        };
        Ok(HorizontalAsymptotes {
            neg_infinity: side(Limit::NegInfinity, &Bound::NegInfinity)?,
            pos_infinity: side(Limit::PosInfinity, &Bound::PosInfinity)?,
        })
    }

    /// The polynomial part of a rational function whose numerator degree
    /// exceeds the denominator degree by one.
    ///
    /// Polynomials have no oblique asymptote; a graph that is itself a
    /// line is not asymptotic to it. When `horizontal` reports a finite
    /// limit on some side, no oblique asymptote is reported.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::AsymptoteComputation`] when the quotient is
    /// not linear.
    pub fn oblique(
        &self,
        expr: &Expr,
        horizontal: Option<&HorizontalAsymptotes>,
    ) -> Result<Option<ObliqueAsymptote>, AnalysisError> {
        let Some(rf) = self.backend.rational_function(expr) else {
            return Ok(None);
        };
        if rf.is_polynomial() || rf.numerator().degree() != rf.denominator().degree() + 1 {
            return Ok(None);
        }
        if horizontal.is_some_and(HorizontalAsymptotes::has_finite_side) {
            return Ok(None);
        }

        let (quotient, _) = rf.decompose_proper();
        if quotient.degree() != 1 {
            return Err(AnalysisError::AsymptoteComputation {
                class: AsymptoteClass::Oblique,
                reason: format!("quotient of {expr} has degree {}", quotient.degree()),
            });
        }
        Ok(Some(ObliqueAsymptote {
            slope: quotient.coeff(1),
            intercept: quotient.coeff(0),
            line: from_polynomial(&quotient, self.backend.variable()),
        }))
    }

    /// The order of the zero of `den` at `root`, rounded up for
    /// fractional orders.
    fn pole_order(&self, den: &Expr, root: &ExactReal) -> Option<u32> {
        if let Some(p) = self.backend.rational_function(den).and_then(|rf| rf.as_polynomial().cloned()) {
            return Some(p.root_multiplicity(root));
        }
        let mut current = den.clone();
        for k in 0..=MAX_VANISHING_ORDER {
            match self.backend.substitute(&current, root) {
                // a derivative blowing up means the order lies between k - 1 and k
                Value::Undefined => return Some(k),
                v if !v.is_zero(self.tolerance) => return Some(k),
                _ => {}
            }
            current = self.backend.differentiate(&current, 1).ok()?;
        }
        None
    }

    /// Returns true if `num` vanishes at `root` to at least `order`.
    fn vanishes_to(&self, num: &Expr, root: &ExactReal, order: u32) -> bool {
        if order == 0 {
            return true;
        }
        if let Some(p) = self.backend.rational_function(num).and_then(|rf| rf.as_polynomial().cloned()) {
            return p.root_multiplicity(root) >= order;
        }
        let mut current = num.clone();
        for _ in 0..order {
            if !self.backend.substitute(&current, root).is_zero(self.tolerance) {
                return false;
            }
            let Ok(next) = self.backend.differentiate(&current, 1) else {
                return false;
            };
            current = next;
        }
        // N^(order) must stay bounded, otherwise N vanishes more slowly
        !matches!(self.backend.substitute(&current, root), Value::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ExactBackend;

    fn classify(text: &str) -> AsymptoteSet {
        let b = ExactBackend::default();
        let f = b.parse(text).unwrap();
        let domain = b.continuous_domain(&f).unwrap();
        AsymptoteClassifier::new(&b, 1e-12).classify(&f, &domain)
    }

    fn vertical(text: &str) -> Vec<String> {
        classify(text).vertical.unwrap().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_vertical_poles() {
        assert_eq!(vertical("1/(x^2 - 1)"), ["-1", "1"]);
        assert_eq!(vertical("1/(x - 1)"), ["1"]);
        assert_eq!(vertical("x^2 + 1"), Vec::<String>::new());
        assert_eq!(vertical("1/(x^2 - 2)"), ["-sqrt(2)", "sqrt(2)"]);
    }

    #[test]
    fn test_removable_singularities() {
        assert!(vertical("(x-1)/(x-1)").is_empty());
        assert!(vertical("(x^2 - 1)/(x - 1)").is_empty());
        assert_eq!(vertical("(x - 1)/(x - 1)^2"), ["1"]);
        assert!(vertical("sin(x)/x").is_empty());
        assert!(vertical("(exp(x) - 1)/x").is_empty());
    }

    #[test]
    fn test_fractional_orders() {
        assert_eq!(vertical("sqrt(x)/x"), ["0"]);
        assert!(vertical("x/sqrt(x)").is_empty());
        assert_eq!(vertical("1/sqrt(x)"), ["0"]);
    }

    #[test]
    fn test_horizontal() {
        let set = classify("1/(x^2 - 1)");
        let h = set.horizontal.unwrap();
        assert_eq!(h.neg_infinity, Some(LimitResult::Finite(Expr::zero())));
        assert_eq!(h.pos_infinity, Some(LimitResult::Finite(Expr::zero())));
        assert_eq!(h.lines(), [&Expr::zero()]);

        let h = classify("exp(x)").horizontal.unwrap();
        assert_eq!(h.neg_infinity, Some(LimitResult::Finite(Expr::zero())));
        assert_eq!(h.pos_infinity, Some(LimitResult::PosInfinity));

        let h = classify("atan(x)").horizontal.unwrap();
        assert_eq!(h.lines().len(), 2);
    }

    #[test]
    fn test_horizontal_respects_domain() {
        let h = classify("sqrt(x)").horizontal.unwrap();
        assert_eq!(h.neg_infinity, None);
        assert_eq!(h.pos_infinity, Some(LimitResult::PosInfinity));

        let h = classify("sqrt(1 - x^2)").horizontal.unwrap();
        assert_eq!(h, HorizontalAsymptotes { neg_infinity: None, pos_infinity: None });
    }

    #[test]
    fn test_undetermined_limit_is_an_error() {
        let set = classify("sin(x) + cos(x)");
        assert!(matches!(
            set.horizontal,
            Err(AnalysisError::AsymptoteComputation { class: AsymptoteClass::Horizontal, .. })
        ));
        assert_eq!(set.errors().count(), 1);

        let h = classify("sqrt(x^2 + 1) - x").horizontal.unwrap();
        assert_eq!(h.pos_infinity, Some(LimitResult::Finite(Expr::zero())));
        assert_eq!(h.neg_infinity, Some(LimitResult::PosInfinity));
    }

    #[test]
    fn test_oblique() {
        let o = classify("(x^2 + 1)/x").oblique.unwrap().unwrap();
        assert_eq!(o.slope, Rational::from(1));
        assert_eq!(o.intercept, Rational::from(0));
        assert_eq!(o.line.to_string(), "x");

        let o = classify("(2x^3 - x + 4)/(x^2 + 1)").oblique.unwrap().unwrap();
        assert_eq!(o.slope, Rational::from(2));
        assert_eq!(o.line.to_string(), "2*x");

        let o = classify("(x^2 - 3x + 1)/(x - 1)").oblique.unwrap().unwrap();
        assert_eq!(o.intercept, Rational::from(-2));
    }

    #[test]
    fn test_no_oblique() {
        assert_eq!(classify("x").oblique, Ok(None));
        assert_eq!(classify("(x^2 - 1)/(x - 1)").oblique, Ok(None));
        assert_eq!(classify("x^3/(x - 1)").oblique, Ok(None));
        assert_eq!(classify("1/(x^2 - 1)").oblique, Ok(None));
        assert_eq!(classify("x + exp(-x)").oblique, Ok(None));
    }

    #[test]
    fn test_families_fail_independently() {
        let b = ExactBackend::default();
        let f = b.parse("1/(exp(x) - x - 2)").unwrap();
        let set = AsymptoteClassifier::new(&b, 1e-12).classify(&f, &Domain::real_line());
        assert!(matches!(
            set.vertical,
            Err(AnalysisError::AsymptoteComputation { class: AsymptoteClass::Vertical, .. })
        ));
        assert!(set.horizontal.is_ok());
        assert_eq!(set.oblique, Ok(None));
        assert_eq!(set.errors().count(), 1);
    }
}
