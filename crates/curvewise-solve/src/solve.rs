//! Exact real zeros of expressions.
//!
//! A rational function is solved through its reduced numerator. Other
//! shapes are taken apart structurally: the zeros of a product are the
//! zeros of its factors, `ln(g)` vanishes where `g = 1`, and a sum is
//! either factored (a power common to every term is pulled out) or read
//! as a polynomial in a single radical `b^(1/L)`. Once that polynomial
//! fixes `b = v`, logarithms and exponentials in `b` are inverted
//! (`ln(g) = r` gives `g = e^r`, `exp(g) = c` gives `g = ln c`) down to a
//! polynomial in `x`. Every candidate is then checked against the domain
//! of continuity, which removes the points introduced by cleared
//! denominators.

use curvewise_core::convert::{to_polynomial, to_rational_function};
use curvewise_core::{Expr, ExprNode, Function};
use curvewise_integers::{ExactReal, Integer, Rational};
use curvewise_poly::{real_roots, DensePoly, RootError};
use num_traits::{One, Zero};
use thiserror::Error;
use tracing::debug;

/// Default ceiling on the degree of polynomials handed to the root solver.
pub const DEFAULT_MAX_DEGREE: usize = 64;

/// Errors from solving and domain computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Every point of the domain is a zero.
    #[error("the expression is identically zero")]
    IdenticallyZero,
    /// A periodic factor has infinitely many zeros.
    #[error("{0} has infinitely many real zeros")]
    Periodic(String),
    /// No closed form for the zeros.
    #[error("no closed form for the real zeros of {0}")]
    NoClosedForm(String),
    /// The polynomial root solver failed.
    #[error(transparent)]
    Roots(#[from] RootError),
    /// The domain of continuity could not be certified.
    #[error("cannot determine where {0} is continuous")]
    Unresolvable(String),
}

/// Exact solver for real zeros and domains of continuity.
#[derive(Clone, Copy, Debug)]
pub struct Solver {
    max_degree: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEGREE)
    }
}

/// The real zeros of `expr` with the default solver.
///
/// # Errors
///
/// See [`Solver::solve_real`].
pub fn solve_real(expr: &Expr) -> Result<Vec<ExactReal>, SolveError> {
    Solver::default().solve_real(expr)
}

impl Solver {
    /// A solver that refuses polynomials above `max_degree`.
    #[must_use]
    pub fn new(max_degree: usize) -> Self {
        Self { max_degree }
    }

    /// The degree ceiling.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// All real zeros of `expr` inside its domain of continuity, ascending
    /// and without repeats.
    ///
    /// A non-zero constant has no zeros.
    ///
    /// # Errors
    ///
    /// - [`SolveError::IdenticallyZero`] for the zero expression
    /// - [`SolveError::Periodic`] when a trigonometric factor vanishes
    ///   infinitely often
    /// - [`SolveError::NoClosedForm`] and [`SolveError::Roots`] when the
    ///   zeros cannot be expressed exactly
    /// - [`SolveError::Unresolvable`] when the domain cannot be computed
    pub fn solve_real(&self, expr: &Expr) -> Result<Vec<ExactReal>, SolveError> {
        if !expr.contains_var() {
            return if expr.is_exactly_zero() {
                Err(SolveError::IdenticallyZero)
            } else {
                Ok(Vec::new())
            };
        }

        let mut roots = self.zeros(expr)?;
        roots.sort();
        roots.dedup();

        let domain = self.continuous_domain(expr)?;
        roots.retain(|r| domain.contains(r));
        debug!(expr = %expr, roots = roots.len(), "solved");
        Ok(roots)
    }

    /// Candidate zeros; may include points outside the domain.
    fn zeros(&self, expr: &Expr) -> Result<Vec<ExactReal>, SolveError> {
        if !expr.contains_var() {
            return if expr.is_exactly_zero() {
                Err(SolveError::IdenticallyZero)
            } else {
                Ok(Vec::new())
            };
        }
        if let Some(rf) = to_rational_function(expr) {
            if rf.is_zero() {
                return Err(SolveError::IdenticallyZero);
            }
            return self.poly_zeros(rf.numerator());
        }

        match expr.node() {
            ExprNode::Mul(args) => {
                let mut out = Vec::new();
                for factor in args {
                    out.extend(self.zeros(factor)?);
                }
                Ok(out)
            }
            ExprNode::Pow { base, exp } => match exp.as_number() {
                Some(q) if !q.is_positive() => Ok(Vec::new()),
                _ => self.zeros(base),
            },
            ExprNode::Add(args) => self.sum_zeros(expr, args),
            ExprNode::Function { func, arg } => match func {
                Function::Exp => Ok(Vec::new()),
                Function::Ln => self.zeros(&arg.sub(&Expr::one())),
                Function::Abs | Function::Atan => self.zeros(arg),
                Function::Sin | Function::Cos | Function::Tan => {
                    Err(SolveError::Periodic(expr.to_string()))
                }
            },
            ExprNode::Var(_) | ExprNode::Number(_) | ExprNode::Constant(_) => Ok(Vec::new()),
        }
    }

    fn poly_zeros(&self, p: &DensePoly) -> Result<Vec<ExactReal>, SolveError> {
        if p.is_constant() {
            return Ok(Vec::new());
        }
        Ok(real_roots(p, self.max_degree)?
            .into_iter()
            .map(|r| r.value)
            .collect())
    }

    fn sum_zeros(&self, expr: &Expr, args: &[Expr]) -> Result<Vec<ExactReal>, SolveError> {
        if let Some((common, rest)) = pull_common_powers(args) {
            let mut out = self.zeros(&rest)?;
            for (base, power) in &common {
                if power.is_positive() {
                    out.extend(self.zeros(base)?);
                }
            }
            return Ok(out);
        }
        if let Some(found) = self.radical_zeros(args)? {
            return Ok(found);
        }
        Err(SolveError::NoClosedForm(expr.to_string()))
    }

    /// Zeros of `Σ cᵢ·b^(eᵢ)` through the substitution `t = b^(1/L)`.
    fn radical_zeros(&self, args: &[Expr]) -> Result<Option<Vec<ExactReal>>, SolveError> {
        let Some((base, terms)) = radical_terms(args) else {
            return Ok(None);
        };

        let lcm = terms
            .iter()
            .fold(Integer::one(), |acc, (_, e)| acc.lcm(&e.denominator()));
        let Some(l) = lcm.to_i64() else {
            return Ok(None);
        };
        let scaled: Vec<(Rational, i64)> = terms
            .iter()
            .filter_map(|(c, e)| (e * &Rational::from(l)).to_i64().map(|n| (c.clone(), n)))
            .collect();
        let shift = scaled.iter().map(|(_, n)| *n).min().unwrap_or(0).min(0);
        let Some(degree) = scaled
            .iter()
            .map(|(_, n)| n - shift)
            .max()
            .and_then(|d| usize::try_from(d).ok())
        else {
            return Ok(None);
        };
        if degree > self.max_degree {
            return Err(RootError::DegreeLimit {
                degree,
                limit: self.max_degree,
            }
            .into());
        }

        let mut coeffs = vec![Rational::zero(); degree + 1];
        for (c, n) in scaled {
            let Ok(k) = usize::try_from(n - shift) else {
                return Ok(None);
            };
            coeffs[k] = &coeffs[k] + &c;
        }
        let in_t = DensePoly::new(coeffs);
        let Ok(exp) = i32::try_from(l) else {
            return Ok(None);
        };

        let mut out = Vec::new();
        for t in self.poly_zeros(&in_t)? {
            // an even root is never negative
            if l % 2 == 0 && t.signum() < 0 {
                continue;
            }
            let Some(value) = t.checked_powi(exp) else {
                continue;
            };
            let Some(found) = self.preimage(&base, &value)? else {
                return Ok(None);
            };
            out.extend(found);
        }
        Ok(Some(out))
    }

    /// The points where `inner(x) = value`, or `None` without a closed form.
    fn preimage(&self, inner: &Expr, value: &ExactReal) -> Result<Option<Vec<ExactReal>>, SolveError> {
        match inner.node() {
            ExprNode::Var(_) => return Ok(Some(vec![value.clone()])),
            ExprNode::Function {
                func: Function::Ln,
                arg,
            } => {
                let Some(target) = value.as_rational().and_then(ExactReal::exp_of) else {
                    return Ok(None);
                };
                debug!(inner = %arg, target = %target, "inverting ln");
                return self.preimage(arg, &target);
            }
            ExprNode::Function {
                func: Function::Exp,
                arg,
            } => {
                if value.signum() <= 0 {
                    return Ok(Some(Vec::new()));
                }
                let Some(target) = value.as_rational().and_then(ExactReal::ln_of) else {
                    return Ok(None);
                };
                debug!(inner = %arg, target = %target, "inverting exp");
                return self.preimage(arg, &target);
            }
            _ => {}
        }

        let Some(p) = to_polynomial(inner) else {
            return Ok(None);
        };
        if let Some(v) = value.as_rational() {
            return self.poly_zeros(&p.sub(&DensePoly::constant(v.clone()))).map(Some);
        }
        // a·x + b = value
        match p.coeffs() {
            [b, a] => {
                let Some(scale) = a.checked_recip() else {
                    return Ok(None);
                };
                let shifted = value.checked_sub(&ExactReal::from_rational(b.clone()));
                Ok(shifted.map(|v| vec![v.scale(&scale)]))
            }
            _ => Ok(None),
        }
    }
}

/// Splits a term into its factors.
fn factors_of(term: &Expr) -> Vec<Expr> {
    match term.node() {
        ExprNode::Mul(args) => args.to_vec(),
        _ => vec![term.clone()],
    }
}

/// Pulls `b^m` out of every term of a sum, for each non-constant base `b`
/// that appears with a numeric exponent in all terms (`m` is the least
/// exponent). Returns the pulled powers and the remaining sum.
fn pull_common_powers(args: &[Expr]) -> Option<(Vec<(Expr, Rational)>, Expr)> {
    let factored: Vec<Vec<Expr>> = args.iter().map(factors_of).collect();
    let first = factored.first()?;

    let mut common: Vec<(Expr, Rational)> = Vec::new();
    for candidate in first {
        let (base, _) = candidate.as_base_exp();
        if !base.contains_var() || common.iter().any(|(b, _)| *b == base) {
            continue;
        }
        let mut least: Option<Rational> = None;
        for term in &factored {
            let exponent = total_exponent(term, &base);
            match (exponent, &least) {
                (None, _) => {
                    least = None;
                    break;
                }
                (Some(e), Some(m)) if e >= *m => {}
                (Some(e), _) => least = Some(e),
            }
        }
        if let Some(m) = least {
            common.push((base, m));
        }
    }
    if common.is_empty() {
        return None;
    }

    let rest = Expr::add(factored.into_iter().map(|term| {
        let mut pending: Vec<&(Expr, Rational)> = common.iter().collect();
        Expr::mul(term.into_iter().map(|f| {
            let (b, e) = f.as_base_exp();
            let Some(at) = pending.iter().position(|(c, _)| *c == b) else {
                return f;
            };
            match e.as_number() {
                Some(e) => Expr::pow(b, Expr::number(e - &pending.swap_remove(at).1)),
                None => f,
            }
        }))
    }));
    Some((common, rest))
}

/// The summed numeric exponent of `base` among `factors`.
fn total_exponent(factors: &[Expr], base: &Expr) -> Option<Rational> {
    let mut total: Option<Rational> = None;
    for f in factors {
        let (b, e) = f.as_base_exp();
        if b != *base {
            continue;
        }
        let e = e.as_number()?;
        total = Some(total.map_or_else(|| e.clone(), |t| t + e));
    }
    total
}

/// Reads a sum as `Σ cᵢ·b^(eᵢ)` over a single non-constant base.
fn radical_terms(args: &[Expr]) -> Option<(Expr, Vec<(Rational, Rational)>)> {
    let mut base: Option<Expr> = None;
    let mut terms = Vec::with_capacity(args.len());
    for term in args {
        let (c, rest) = term.as_coeff_term();
        if rest.is_one() {
            terms.push((c, Rational::zero()));
            continue;
        }
        let (b, e) = rest.as_base_exp();
        let e = e.as_number()?.clone();
        if !b.contains_var() {
            return None;
        }
        match &base {
            Some(known) if *known != b => return None,
            Some(_) => {}
            None => base = Some(b),
        }
        terms.push((c, e));
    }
    Some((base?, terms))
}
