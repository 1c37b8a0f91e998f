//! Domains of continuity.
//!
//! The domain of an expression is the intersection of the domains of its
//! parts, narrowed by the constraints each node imposes:
//!
//! | node | constraint |
//! |---|---|
//! | `b^k`, `k < 0` | `b ≠ 0` |
//! | `b^(p/q)`, `q` even | `b ≥ 0` (`b > 0` when `p < 0`) |
//! | `b^g`, `g` non-numeric | `b > 0` |
//! | `ln(g)` | `g > 0` |
//! | `tan(g)` | only for constant `g` |

use curvewise_core::{Expr, ExprNode, Function};
use curvewise_integers::ExactReal;
use tracing::trace;

use crate::domain::Domain;
use crate::solve::{SolveError, Solver};

/// Approximate values below this magnitude have no certain sign.
const SIGN_EPSILON: f64 = 1e-12;

/// The domain of continuity of `expr` with the default solver.
///
/// # Errors
///
/// See [`Solver::continuous_domain`].
pub fn continuous_domain(expr: &Expr) -> Result<Domain, SolveError> {
    Solver::default().continuous_domain(expr)
}

impl Solver {
    /// The set of real points where `expr` is defined and continuous.
    ///
    /// Isolated points (such as the single point where `sqrt(-x^2)` is
    /// defined) are not part of any interval and are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Unresolvable`] when a constraint cannot be
    /// solved exactly, for example `1/sin(x)` or `tan(x)`.
    pub fn continuous_domain(&self, expr: &Expr) -> Result<Domain, SolveError> {
        if !expr.contains_var() {
            return Ok(if expr.approx().is_some() {
                Domain::real_line()
            } else {
                Domain::empty()
            });
        }

        match expr.node() {
            ExprNode::Var(_) | ExprNode::Number(_) | ExprNode::Constant(_) => {
                Ok(Domain::real_line())
            }
            ExprNode::Add(args) | ExprNode::Mul(args) => {
                let mut domain = Domain::real_line();
                for arg in args {
                    domain = domain.intersect(&self.continuous_domain(arg)?);
                }
                Ok(domain)
            }
            ExprNode::Pow { base, exp } => self.power_domain(expr, base, exp),
            ExprNode::Function { func, arg } => match func {
                Function::Ln => self.sign_set(expr, arg, true),
                Function::Tan => Err(SolveError::Unresolvable(expr.to_string())),
                Function::Sin | Function::Cos | Function::Exp | Function::Abs | Function::Atan => {
                    self.continuous_domain(arg)
                }
            },
        }
    }

    fn power_domain(&self, expr: &Expr, base: &Expr, exp: &Expr) -> Result<Domain, SolveError> {
        let Some(q) = exp.as_number() else {
            let exp_domain = self.continuous_domain(exp)?;
            if !base.contains_var() {
                return match base.approx() {
                    Some(b) if b > 0.0 => Ok(exp_domain),
                    _ => Err(SolveError::Unresolvable(expr.to_string())),
                };
            }
            return Ok(self.sign_set(expr, base, true)?.intersect(&exp_domain));
        };

        if q.denominator().is_even() {
            return self.sign_set(expr, base, q.is_negative());
        }
        let base_domain = self.continuous_domain(base)?;
        if q.is_negative() {
            let poles = self.solve_or_unresolvable(expr, base)?;
            return Ok(base_domain.remove_points(&poles));
        }
        Ok(base_domain)
    }

    /// Where `g > 0` (or `g ≥ 0` when `strict` is false), inside the domain
    /// of `g`.
    fn sign_set(&self, owner: &Expr, g: &Expr, strict: bool) -> Result<Domain, SolveError> {
        let domain = self.continuous_domain(g)?;
        let zeros = self.solve_or_unresolvable(owner, g)?;

        let mut kept = Vec::new();
        for piece in domain.remove_points(&zeros).iter() {
            let point = piece.representative();
            let sign = sign_at(g, &point).ok_or_else(|| SolveError::Unresolvable(owner.to_string()))?;
            trace!(piece = %piece, point = %point, sign, "sign of {g}");
            if sign > 0 {
                kept.push(piece.clone());
            }
        }
        let set = Domain::from_intervals(kept);
        Ok(if strict { set } else { set.close_at(&zeros) })
    }

    fn solve_or_unresolvable(
        &self,
        owner: &Expr,
        g: &Expr,
    ) -> Result<Vec<ExactReal>, SolveError> {
        match self.solve_real(g) {
            Ok(zeros) => Ok(zeros),
            Err(SolveError::Roots(e)) => Err(SolveError::Roots(e)),
            Err(_) => Err(SolveError::Unresolvable(owner.to_string())),
        }
    }
}

/// The sign of `g` at `point`: exact when possible, else from a float
/// evaluation that is clearly away from zero.
pub(crate) fn sign_at(g: &Expr, point: &ExactReal) -> Option<i8> {
    if let Some(v) = g.eval_exact(point) {
        return Some(v.signum());
    }
    let v = g.eval_f64(point.to_f64())?;
    if v.abs() <= SIGN_EPSILON {
        return None;
    }
    Some(if v > 0.0 { 1 } else { -1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvewise_core::parse;

    fn dom(s: &str) -> String {
        continuous_domain(&parse(s).unwrap()).unwrap().to_string()
    }

    #[test]
    fn test_polynomials_and_poles() {
        assert_eq!(dom("x^3 - 2x"), "(-oo, oo)");
        assert_eq!(dom("1/(x^2 - 1)"), "(-oo, -1) U (-1, 1) U (1, oo)");
        assert_eq!(dom("(x-1)/(x-1)"), "(-oo, 1) U (1, oo)");
        assert_eq!(dom("1/(x^2 + 1)"), "(-oo, oo)");
    }

    #[test]
    fn test_roots() {
        assert_eq!(dom("sqrt(x)"), "[0, oo)");
        assert_eq!(dom("1/sqrt(x)"), "(0, oo)");
        assert_eq!(dom("sqrt(x^2 - 1)"), "(-oo, -1] U [1, oo)");
        assert_eq!(dom("sqrt(1 - x^2)"), "[-1, 1]");
        assert_eq!(dom("x^(1/3)"), "(-oo, oo)");
        assert_eq!(dom("x^(-1/3)"), "(-oo, 0) U (0, oo)");
    }

    #[test]
    fn test_logarithms_and_exponentials() {
        assert_eq!(dom("ln(x)"), "(0, oo)");
        assert_eq!(dom("ln(x^2 - 4)"), "(-oo, -2) U (2, oo)");
        assert_eq!(dom("x*ln(x)"), "(0, oo)");
        assert_eq!(dom("exp(-x^2)"), "(-oo, oo)");
        assert_eq!(dom("2^x"), "(-oo, oo)");
        assert_eq!(dom("x^x"), "(0, oo)");
        assert_eq!(dom("ln(x)/(x - 2)"), "(0, 2) U (2, oo)");
        assert_eq!(dom("1/(ln(x) + 1)"), "(0, exp(-1)) U (exp(-1), oo)");
        assert_eq!(dom("ln(ln(x))"), "(1, oo)");
        assert_eq!(dom("sqrt(exp(x) - 2)"), "[ln(2), oo)");
    }

    #[test]
    fn test_trig() {
        assert_eq!(dom("sin(x)/x"), "(-oo, 0) U (0, oo)");
        assert_eq!(dom("atan(1/x)"), "(-oo, 0) U (0, oo)");
        assert!(matches!(
            continuous_domain(&parse("tan(x)").unwrap()),
            Err(SolveError::Unresolvable(_))
        ));
        assert!(matches!(
            continuous_domain(&parse("1/sin(x)").unwrap()),
            Err(SolveError::Unresolvable(_))
        ));
    }
}
