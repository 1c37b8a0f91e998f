//! The algebra capabilities an analysis relies on.
//!
//! Every algorithm in this crate talks to the symbolic engine through
//! [`AlgebraBackend`], so the classification logic does not depend on how
//! expressions are solved, differentiated or taken to a limit.
//! [`ExactBackend`] is the implementation built on the workspace crates.

use curvewise_core::convert::to_rational_function;
use curvewise_core::{Expr, ParseError, Parser};
use curvewise_integers::ExactReal;
use curvewise_limits::{Limit, LimitEngine, LimitError, LimitResult};
use curvewise_poly::RationalFunction;
use curvewise_solve::{Domain, SolveError, Solver};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::partition::Sign;

/// The result of substituting a point into an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An exact real number.
    Exact(ExactReal),
    /// A finite real that is only known symbolically.
    Symbolic(Expr),
    /// The expression is not defined at the point.
    Undefined,
}

impl Value {
    /// The value as an expression, if defined.
    #[must_use]
    pub fn to_expr(&self) -> Option<Expr> {
        match self {
            Self::Exact(v) => Some(Expr::from_real(v)),
            Self::Symbolic(e) => Some(e.clone()),
            Self::Undefined => None,
        }
    }

    /// Returns true if the value is exactly zero, or approximately zero
    /// within `tolerance`.
    #[must_use]
    pub fn is_zero(&self, tolerance: f64) -> bool {
        match self {
            Self::Exact(v) => v.is_zero(),
            Self::Symbolic(e) => e.approx().is_some_and(|v| v.abs() <= tolerance),
            Self::Undefined => false,
        }
    }

    /// The sign of the value.
    ///
    /// Exact values always have a sign. Symbolic values are judged by a
    /// float approximation, which must exceed `tolerance` in magnitude.
    #[must_use]
    pub fn sign(&self, tolerance: f64) -> Sign {
        match self {
            Self::Exact(v) => match v.signum() {
                1 => Sign::Positive,
                -1 => Sign::Negative,
                _ => Sign::Zero,
            },
            Self::Symbolic(e) => match e.approx() {
                Some(v) if v.is_finite() && v > tolerance => Sign::Positive,
                Some(v) if v.is_finite() && v < -tolerance => Sign::Negative,
                _ => Sign::Inconclusive,
            },
            Self::Undefined => Sign::Inconclusive,
        }
    }
}

/// Symbolic algebra needed by the analysis.
pub trait AlgebraBackend: Send + Sync {
    /// The name of the free variable.
    fn variable(&self) -> &str;

    /// Parses expression text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input.
    fn parse(&self, text: &str) -> Result<Expr, ParseError>;

    /// The `order`-th derivative.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Differentiation`] when the backend cannot
    /// differentiate the expression.
    fn differentiate(&self, expr: &Expr, order: u32) -> Result<Expr, AnalysisError>;

    /// A simplified equivalent of `expr`.
    fn simplify(&self, expr: &Expr) -> Expr;

    /// `expr` evaluated at `at`.
    fn substitute(&self, expr: &Expr, at: &ExactReal) -> Value;

    /// The distinct real zeros of `expr`, ascending.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] when the zeros have no closed form.
    fn solve_real(&self, expr: &Expr) -> Result<Vec<ExactReal>, SolveError>;

    /// The limit of `expr` at ±∞.
    ///
    /// # Errors
    ///
    /// Returns a [`LimitError`] when the computation is abandoned.
    fn limit(&self, expr: &Expr, direction: Limit) -> Result<LimitResult, LimitError>;

    /// Where `expr` is defined and continuous.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] when the domain cannot be certified.
    fn continuous_domain(&self, expr: &Expr) -> Result<Domain, SolveError>;

    /// Numerator and denominator, without cancelling common factors.
    fn numer_denom(&self, expr: &Expr) -> (Expr, Expr);

    /// `expr` as a reduced quotient of polynomials, if it is one.
    fn rational_function(&self, expr: &Expr) -> Option<RationalFunction>;
}

/// The backend built on the workspace's exact arithmetic.
#[derive(Clone, Debug)]
pub struct ExactBackend {
    parser: Parser,
    solver: Solver,
    limits: LimitEngine,
}

impl Default for ExactBackend {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl ExactBackend {
    /// Creates a backend with the bounds in `config`.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            parser: Parser::new(config.variable.as_str()),
            solver: Solver::new(config.max_solve_degree),
            limits: LimitEngine::new(config.limit_depth),
        }
    }
}

impl AlgebraBackend for ExactBackend {
    fn variable(&self) -> &str {
        self.parser.variable()
    }

    fn parse(&self, text: &str) -> Result<Expr, ParseError> {
        self.parser.parse(text)
    }

    fn differentiate(&self, expr: &Expr, order: u32) -> Result<Expr, AnalysisError> {
        let order = usize::try_from(order)
            .map_err(|_| AnalysisError::Differentiation(format!("order {order} is too large")))?;
        Ok(expr.nth_derivative(order))
    }

    fn simplify(&self, expr: &Expr) -> Expr {
        expr.simplify()
    }

    fn substitute(&self, expr: &Expr, at: &ExactReal) -> Value {
        if let Some(v) = expr.eval_exact(at) {
            return Value::Exact(v);
        }
        let substituted = expr.substitute(&Expr::from_real(at));
        match substituted.approx() {
            Some(v) if v.is_finite() => Value::Symbolic(substituted),
            _ => Value::Undefined,
        }
    }

    fn solve_real(&self, expr: &Expr) -> Result<Vec<ExactReal>, SolveError> {
        self.solver.solve_real(expr)
    }

    fn limit(&self, expr: &Expr, direction: Limit) -> Result<LimitResult, LimitError> {
        self.limits.limit(expr, direction)
    }

    fn continuous_domain(&self, expr: &Expr) -> Result<Domain, SolveError> {
        self.solver.continuous_domain(expr)
    }

    fn numer_denom(&self, expr: &Expr) -> (Expr, Expr) {
        expr.as_numer_denom()
    }

    fn rational_function(&self, expr: &Expr) -> Option<RationalFunction> {
        to_rational_function(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surd(n: i64) -> ExactReal {
        ExactReal::from(n)
    }

    #[test]
    fn test_substitute() {
        let b = ExactBackend::default();
        let f = b.parse("1/(x^2 - 1)").unwrap();
        assert_eq!(b.substitute(&f, &surd(0)), Value::Exact(surd(-1)));
        assert_eq!(b.substitute(&f, &surd(1)), Value::Undefined);

        let g = b.parse("exp(x)").unwrap();
        let v = b.substitute(&g, &surd(1));
        assert!(matches!(v, Value::Symbolic(_)));
        assert_eq!(v.sign(1e-12), Sign::Positive);
    }

    #[test]
    fn test_value_signs() {
        assert_eq!(Value::Exact(surd(0)).sign(1e-12), Sign::Zero);
        assert_eq!(Value::Exact(surd(-3)).sign(1e-12), Sign::Negative);
        assert_eq!(Value::Undefined.sign(1e-12), Sign::Inconclusive);
        let tiny = Value::Symbolic(Expr::func(curvewise_core::Function::Exp, Expr::integer(-40)));
        assert_eq!(tiny.sign(1e-12), Sign::Inconclusive);
        assert!(tiny.is_zero(1e-12));
    }

    #[test]
    fn test_variable_name() {
        let b = ExactBackend::new(&AnalysisConfig::default().with_variable("t"));
        assert_eq!(b.variable(), "t");
        assert!(b.parse("t^2 + 1").is_ok());
        assert!(b.parse("x + 1").is_err());
    }

    #[test]
    fn test_differentiate() {
        let b = ExactBackend::default();
        let f = b.parse("x^3").unwrap();
        assert_eq!(b.differentiate(&f, 2).unwrap(), b.parse("6*x").unwrap());
        assert_eq!(b.differentiate(&f, 0).unwrap(), f);
    }
}
