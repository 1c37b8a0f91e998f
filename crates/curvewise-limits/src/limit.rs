//! Limits at ±∞.

use std::fmt;

use curvewise_core::convert::to_rational_function;
use curvewise_core::{Constant, Expr, ExprNode, Function};
use curvewise_integers::Rational;
use curvewise_poly::RationalFunction;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::comparison::{ComparisonClass, GrowthRate};

/// Default recursion bound.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Approximate values smaller than this have no reliable sign.
const SIGN_EPSILON: f64 = 1e-12;

/// The direction of a limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    /// x → +∞
    PosInfinity,
    /// x → -∞
    NegInfinity,
}

/// The result of a limit computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LimitResult {
    /// A finite limit value (a variable-free expression).
    Finite(Expr),
    /// The limit is +∞.
    PosInfinity,
    /// The limit is -∞.
    NegInfinity,
    /// The limit does not exist (e.g., oscillates).
    DoesNotExist,
    /// Could not determine the limit.
    Unknown,
}

impl LimitResult {
    /// Returns true if the limit is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        matches!(self, LimitResult::Finite(_))
    }

    /// Returns true for ±∞.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        matches!(self, LimitResult::PosInfinity | LimitResult::NegInfinity)
    }

    /// Returns the finite value if present.
    #[must_use]
    pub fn finite_value(&self) -> Option<&Expr> {
        match self {
            LimitResult::Finite(v) => Some(v),
            _ => None,
        }
    }

    fn infinity(sign: i8) -> Self {
        if sign < 0 {
            LimitResult::NegInfinity
        } else {
            LimitResult::PosInfinity
        }
    }
}

impl fmt::Display for LimitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitResult::Finite(v) => write!(f, "{v}"),
            LimitResult::PosInfinity => f.write_str("oo"),
            LimitResult::NegInfinity => f.write_str("-oo"),
            LimitResult::DoesNotExist => f.write_str("does not exist"),
            LimitResult::Unknown => f.write_str("unknown"),
        }
    }
}

/// Errors that can occur during limit computation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LimitError {
    /// The expression nests deeper than the configured bound.
    #[error("limit computation exceeded recursion depth {0}")]
    DepthExceeded(usize),
}

/// Computes limits at ±∞ with a recursion bound.
#[derive(Clone, Debug)]
pub struct LimitEngine {
    max_depth: usize,
}

impl Default for LimitEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Computes the limit of `expr` with the default engine.
///
/// # Errors
///
/// Returns [`LimitError::DepthExceeded`] for pathologically deep input.
pub fn compute_limit(expr: &Expr, direction: Limit) -> Result<LimitResult, LimitError> {
    LimitEngine::default().limit(expr, direction)
}

impl LimitEngine {
    /// Creates an engine that gives up beyond `max_depth` nested steps.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// The recursion bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The limit of `expr` as its variable tends to `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::DepthExceeded`] when the recursion bound is hit.
    pub fn limit(&self, expr: &Expr, direction: Limit) -> Result<LimitResult, LimitError> {
        let Some(name) = expr.var_name() else {
            return Ok(LimitResult::Finite(expr.clone()));
        };
        let result = match direction {
            Limit::PosInfinity => self.at_infinity(expr, 0),
            Limit::NegInfinity => {
                let reflected = expr.substitute(&Expr::var(name).neg());
                self.at_infinity(&reflected, 0)
            }
        };
        match &result {
            Ok(r) => trace!(%expr, ?direction, limit = %r),
            Err(e) => debug!(%expr, ?direction, "{e}"),
        }
        result
    }

    pub(crate) fn enter(&self, depth: usize) -> Result<usize, LimitError> {
        if depth >= self.max_depth {
            return Err(LimitError::DepthExceeded(self.max_depth));
        }
        Ok(depth + 1)
    }

    /// Limit as x → +∞.
    pub(crate) fn at_infinity(&self, expr: &Expr, depth: usize) -> Result<LimitResult, LimitError> {
        let depth = self.enter(depth)?;

        if !expr.contains_var() {
            return Ok(LimitResult::Finite(expr.clone()));
        }
        if let Some(rf) = to_rational_function(expr) {
            return Ok(rational_limit(&rf));
        }

        match expr.node() {
            ExprNode::Add(args) => self.limit_add(expr, args, depth),
            ExprNode::Mul(args) => self.limit_mul(expr, args, depth),
            ExprNode::Pow { base, exp } => self.limit_pow(expr, base, exp, depth),
            ExprNode::Function { func, arg } => self.limit_function(*func, arg, depth),
            ExprNode::Var(_) => Ok(LimitResult::PosInfinity),
            ExprNode::Number(_) | ExprNode::Constant(_) => Ok(LimitResult::Finite(expr.clone())),
        }
    }

    /// Decides an indeterminate form from the leading term of `expr`.
    fn resolve(&self, expr: &Expr, depth: usize) -> Result<LimitResult, LimitError> {
        let Some(lead) = self.leading(expr, depth)? else {
            return Ok(LimitResult::Unknown);
        };
        Ok(match lead.rate.compare(&GrowthRate::constant()) {
            ComparisonClass::GreaterThan => LimitResult::infinity(lead.sign),
            ComparisonClass::LessThan => LimitResult::Finite(Expr::zero()),
            ComparisonClass::Comparable => lead.coeff.map_or(LimitResult::Unknown, LimitResult::Finite),
            ComparisonClass::Unknown => LimitResult::Unknown,
        })
    }

    /// Limit of a sum.
    fn limit_add(&self, expr: &Expr, args: &[Expr], depth: usize) -> Result<LimitResult, LimitError> {
        let mut finite = Vec::new();
        let mut positive = false;
        let mut negative = false;
        let mut oscillating = Vec::new();

        for term in args {
            match self.at_infinity(term, depth)? {
                LimitResult::Finite(v) => finite.push(v),
                LimitResult::PosInfinity => positive = true,
                LimitResult::NegInfinity => negative = true,
                LimitResult::DoesNotExist => oscillating.push(term),
                LimitResult::Unknown => return self.resolve(expr, depth),
            }
        }

        // ∞ - ∞: the dominant term decides
        if positive && negative {
            let resolved = self.resolve(expr, depth)?;
            if resolved == LimitResult::Unknown {
                if let Some(conjugate) = rationalize(args) {
                    trace!(%expr, %conjugate, "rationalized");
                    return self.at_infinity(&conjugate, depth);
                }
            }
            return Ok(resolved);
        }
        if positive || negative {
            // A bounded oscillation does not disturb an infinite limit.
            return Ok(if oscillating.iter().all(|t| is_bounded(t)) {
                LimitResult::infinity(if positive { 1 } else { -1 })
            } else {
                LimitResult::Unknown
            });
        }
        Ok(match oscillating.len() {
            0 => LimitResult::Finite(Expr::add(finite)),
            1 => LimitResult::DoesNotExist,
            _ => LimitResult::Unknown,
        })
    }

    /// Limit of a product.
    fn limit_mul(&self, expr: &Expr, args: &[Expr], depth: usize) -> Result<LimitResult, LimitError> {
        let mut values = Vec::new();
        let mut sign: Option<i8> = Some(1);
        let mut zero = false;
        let mut infinite = false;
        let mut oscillating = Vec::new();

        for factor in args {
            match self.at_infinity(factor, depth)? {
                LimitResult::Finite(v) => match constant_sign(&v) {
                    Some(0) => zero = true,
                    s => {
                        sign = sign.zip(s).map(|(a, b)| a * b);
                        values.push(v);
                    }
                },
                LimitResult::PosInfinity => infinite = true,
                LimitResult::NegInfinity => {
                    infinite = true;
                    sign = sign.map(|s| -s);
                }
                LimitResult::DoesNotExist => oscillating.push(factor),
                LimitResult::Unknown => return self.resolve(expr, depth),
            }
        }

        if !oscillating.is_empty() {
            let bounded = oscillating.iter().all(|f| is_bounded(f));
            return Ok(if zero && !infinite && bounded {
                // sin(x)/x → 0
                LimitResult::Finite(Expr::zero())
            } else if !zero && oscillating.len() == 1 {
                LimitResult::DoesNotExist
            } else {
                LimitResult::Unknown
            });
        }

        // 0 · ∞
        if zero && infinite {
            return self.resolve(expr, depth);
        }
        if zero {
            return Ok(LimitResult::Finite(Expr::zero()));
        }
        if infinite {
            return Ok(sign.map_or(LimitResult::Unknown, LimitResult::infinity));
        }
        Ok(LimitResult::Finite(Expr::mul(values)))
    }

    /// Limit of a power.
    fn limit_pow(
        &self,
        expr: &Expr,
        base: &Expr,
        exp: &Expr,
        depth: usize,
    ) -> Result<LimitResult, LimitError> {
        let Some(q) = exp.as_number() else {
            // b^g = exp(g·ln b)
            let rewritten = Expr::func(
                Function::Exp,
                Expr::mul([exp.clone(), Expr::func(Function::Ln, base.clone())]),
            );
            return self.at_infinity(&rewritten, depth);
        };

        Ok(match self.at_infinity(base, depth)? {
            LimitResult::Finite(v) => match constant_sign(&v) {
                Some(0) if q.is_negative() => return self.resolve(expr, depth),
                Some(0) => LimitResult::Finite(Expr::zero()),
                Some(s) if s < 0 && q.denominator().is_even() => LimitResult::DoesNotExist,
                _ => LimitResult::Finite(Expr::pow(v, exp.clone())),
            },
            LimitResult::PosInfinity if q.is_positive() => LimitResult::PosInfinity,
            LimitResult::PosInfinity => LimitResult::Finite(Expr::zero()),
            LimitResult::NegInfinity if q.denominator().is_even() => LimitResult::DoesNotExist,
            LimitResult::NegInfinity if q.is_negative() => LimitResult::Finite(Expr::zero()),
            LimitResult::NegInfinity if q.numerator().is_even() => LimitResult::PosInfinity,
            LimitResult::NegInfinity => LimitResult::NegInfinity,
            LimitResult::DoesNotExist if q.is_positive() => LimitResult::DoesNotExist,
            LimitResult::DoesNotExist => LimitResult::Unknown,
            LimitResult::Unknown => return self.resolve(expr, depth),
        })
    }

    /// Limit of a function application.
    fn limit_function(&self, func: Function, arg: &Expr, depth: usize) -> Result<LimitResult, LimitError> {
        let inner = self.at_infinity(arg, depth)?;
        Ok(match (func, inner) {
            (_, LimitResult::Unknown) => LimitResult::Unknown,

            (Function::Exp, LimitResult::PosInfinity) => LimitResult::PosInfinity,
            (Function::Exp, LimitResult::NegInfinity) => LimitResult::Finite(Expr::zero()),

            (Function::Ln, LimitResult::Finite(v)) => match constant_sign(&v) {
                Some(1) => LimitResult::Finite(Expr::func(Function::Ln, v)),
                // ln(0⁺) = -∞; ln is undefined if the argument approaches from below
                Some(0) => match self.leading(arg, depth)? {
                    Some(lead) if lead.sign > 0 => LimitResult::NegInfinity,
                    Some(_) => LimitResult::DoesNotExist,
                    None => LimitResult::Unknown,
                },
                Some(_) => LimitResult::DoesNotExist,
                None => LimitResult::Unknown,
            },
            (Function::Ln, LimitResult::PosInfinity) => LimitResult::PosInfinity,
            (Function::Ln, LimitResult::NegInfinity) => LimitResult::DoesNotExist,
            (Function::Ln, LimitResult::DoesNotExist) => LimitResult::Unknown,

            // sin, cos and tan oscillate at infinity
            (Function::Sin | Function::Cos | Function::Tan, LimitResult::PosInfinity | LimitResult::NegInfinity) => {
                LimitResult::DoesNotExist
            }

            (Function::Atan, LimitResult::PosInfinity) => LimitResult::Finite(half_pi()),
            (Function::Atan, LimitResult::NegInfinity) => LimitResult::Finite(half_pi().neg()),

            (Function::Abs, LimitResult::PosInfinity | LimitResult::NegInfinity) => LimitResult::PosInfinity,
            (Function::Abs | Function::Exp, LimitResult::DoesNotExist) if is_bounded(arg) => {
                LimitResult::DoesNotExist
            }

            (_, LimitResult::DoesNotExist) => LimitResult::Unknown,
            (func, LimitResult::Finite(v)) => LimitResult::Finite(Expr::func(func, v)),
        })
    }
}

/// Exact limit of a rational function.
fn rational_limit(rf: &RationalFunction) -> LimitResult {
    if rf.is_zero() {
        return LimitResult::Finite(Expr::zero());
    }
    // The denominator is monic, so the ratio of leading coefficients is
    // the numerator's.
    let lead = rf.numerator().leading_coeff();
    match rf.degree_at_infinity().cmp(&0) {
        std::cmp::Ordering::Less => LimitResult::Finite(Expr::zero()),
        std::cmp::Ordering::Equal => LimitResult::Finite(Expr::number(lead.clone())),
        std::cmp::Ordering::Greater => LimitResult::infinity(lead.signum()),
    }
}

/// Rewrites `r + c·√u` as `(r² - c²·u) / (r - c·√u)`.
///
/// The numerator is simplified, so leading terms that cancel in the sum
/// cancel there exactly.
fn rationalize(args: &[Expr]) -> Option<Expr> {
    let half = Rational::from_i64(1, 2);
    let at = args.iter().position(|term| {
        let (_, rest) = term.as_coeff_term();
        let (_, e) = rest.as_base_exp();
        e.as_number() == Some(&half)
    })?;
    let (c, root) = args[at].as_coeff_term();
    let (radicand, _) = root.as_base_exp();
    let rest = Expr::add(
        args.iter()
            .enumerate()
            .filter(|(i, _)| *i != at)
            .map(|(_, t)| t.clone()),
    );
    let numer = Expr::add([
        Expr::mul([rest.clone(), rest.clone()]),
        Expr::mul([Expr::number(-(&c * &c)), radicand]),
    ])
    .simplify();
    Some(numer.div(&rest.sub(&args[at])))
}

fn half_pi() -> Expr {
    Expr::mul([Expr::number(Rational::from_i64(1, 2)), Expr::constant(Constant::Pi)])
}

/// Sign of a variable-free expression, exactly when possible.
pub(crate) fn constant_sign(e: &Expr) -> Option<i8> {
    if let Some(v) = e.exact_value() {
        return Some(v.signum());
    }
    let v = e.approx()?;
    if v.abs() < SIGN_EPSILON {
        None
    } else if v > 0.0 {
        Some(1)
    } else {
        Some(-1)
    }
}

/// Structurally bounded: built from constants, sin, cos and atan.
pub(crate) fn is_bounded(e: &Expr) -> bool {
    match e.node() {
        ExprNode::Number(_) | ExprNode::Constant(_) => true,
        ExprNode::Var(_) => false,
        ExprNode::Add(args) | ExprNode::Mul(args) => args.iter().all(is_bounded),
        ExprNode::Pow { base, exp } => {
            exp.as_number().is_some_and(|q| !q.is_negative()) && is_bounded(base)
        }
        ExprNode::Function { func, arg } => match func {
            Function::Sin | Function::Cos | Function::Atan => true,
            Function::Abs => is_bounded(arg),
            Function::Exp | Function::Ln | Function::Tan => !arg.contains_var(),
        },
    }
}
