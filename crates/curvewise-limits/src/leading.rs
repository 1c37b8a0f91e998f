//! Leading asymptotic terms at +∞.
//!
//! The leading term of f is `c · r(x)` where `r` is a [`GrowthRate`] and
//! `f(x) / (c · r(x)) → 1`. The sign of `c` is always known; the exact
//! coefficient may not be (for instance inside an exponential whose
//! argument has an unbounded lower-order part).

use curvewise_core::convert::to_rational_function;
use curvewise_core::{Constant, Expr, ExprNode, Function};
use curvewise_integers::Rational;
use curvewise_poly::RationalFunction;
use num_traits::{One, Zero};

use crate::comparison::{ComparisonClass, GrowthRate};
use crate::limit::{constant_sign, LimitEngine, LimitError, LimitResult};

/// Leading term `coeff · rate` of an expression as x → +∞.
#[derive(Clone, Debug, PartialEq)]
pub struct Leading {
    /// Sign of the coefficient, ±1.
    pub sign: i8,
    /// The exact coefficient, when known.
    pub coeff: Option<Expr>,
    /// The growth rate.
    pub rate: GrowthRate,
}

impl Leading {
    /// The leading term of a non-zero constant.
    #[must_use]
    pub fn constant(value: Expr) -> Option<Self> {
        let sign = constant_sign(&value).filter(|&s| s != 0)?;
        Some(Self {
            sign,
            coeff: Some(value),
            rate: GrowthRate::constant(),
        })
    }

    fn rational(rf: &RationalFunction) -> Option<Self> {
        if rf.is_zero() {
            return None;
        }
        let lead = rf.numerator().leading_coeff().clone();
        Some(Self {
            sign: lead.signum(),
            coeff: Some(Expr::number(lead)),
            rate: GrowthRate::poly(Rational::from(rf.degree_at_infinity())),
        })
    }

    fn mul(self, other: Self) -> Self {
        Self {
            sign: self.sign * other.sign,
            coeff: self.coeff.zip(other.coeff).map(|(a, b)| Expr::mul([a, b])),
            rate: self.rate.mul(&other.rate),
        }
    }
}

impl LimitEngine {
    /// The leading term of `expr` at +∞, or `None` when it cannot be
    /// determined (cancellation, oscillation, unknown growth).
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::DepthExceeded`] when the recursion bound is hit.
    pub fn leading(&self, expr: &Expr, depth: usize) -> Result<Option<Leading>, LimitError> {
        let depth = self.enter(depth)?;

        if !expr.contains_var() {
            return Ok(Leading::constant(expr.clone()));
        }
        if let Some(rf) = to_rational_function(expr) {
            return Ok(Leading::rational(&rf));
        }

        match expr.node() {
            ExprNode::Mul(args) => {
                let mut acc: Option<Leading> = None;
                for factor in args {
                    let Some(lead) = self.leading(factor, depth)? else {
                        return Ok(None);
                    };
                    acc = Some(match acc {
                        Some(prev) => prev.mul(lead),
                        None => lead,
                    });
                }
                Ok(acc)
            }
            ExprNode::Add(args) => self.leading_sum(args, depth),
            ExprNode::Pow { base, exp } => match exp.as_number() {
                Some(q) => Ok(self
                    .leading(base, depth)?
                    .and_then(|lead| leading_power(lead, exp, q))),
                None => {
                    let rewritten = Expr::func(
                        Function::Exp,
                        Expr::mul([exp.clone(), Expr::func(Function::Ln, base.clone())]),
                    );
                    self.leading(&rewritten, depth)
                }
            },
            ExprNode::Function { func, arg } => self.leading_function(*func, arg, depth),
            ExprNode::Var(_) | ExprNode::Number(_) | ExprNode::Constant(_) => Ok(None),
        }
    }

    /// The dominant term of a sum; comparable leaders are added up.
    fn leading_sum(&self, args: &[Expr], depth: usize) -> Result<Option<Leading>, LimitError> {
        let mut best: Vec<Leading> = Vec::new();
        for term in args {
            let Some(lead) = self.leading(term, depth)? else {
                return Ok(None);
            };
            let class = match best.first() {
                Some(top) => lead.rate.compare(&top.rate),
                None => ComparisonClass::GreaterThan,
            };
            match class {
                ComparisonClass::GreaterThan => best = vec![lead],
                ComparisonClass::Comparable => best.push(lead),
                ComparisonClass::LessThan => {}
                ComparisonClass::Unknown => return Ok(None),
            }
        }

        if best.len() == 1 {
            return Ok(best.pop());
        }
        let Some(rate) = best.first().map(|l| l.rate.clone()) else {
            return Ok(None);
        };
        let coeffs: Option<Vec<Expr>> = best.into_iter().map(|l| l.coeff).collect();
        let Some(coeffs) = coeffs else {
            return Ok(None);
        };
        // Leading terms that cancel need a finer expansion than this.
        let sum = Expr::add(coeffs);
        Ok(Leading::constant(sum).map(|lead| Leading { rate, ..lead }))
    }

    fn leading_function(
        &self,
        func: Function,
        arg: &Expr,
        depth: usize,
    ) -> Result<Option<Leading>, LimitError> {
        let inner = self.at_infinity(arg, depth)?;
        match (func, inner) {
            (Function::Exp, LimitResult::PosInfinity | LimitResult::NegInfinity) => {
                self.leading_exp(arg, depth)
            }
            (Function::Ln, LimitResult::PosInfinity) => self.leading_log(arg, depth),
            (Function::Ln, LimitResult::Finite(v)) if constant_sign(&v) == Some(0) => {
                self.leading_log(arg, depth)
            }
            (Function::Atan, LimitResult::PosInfinity) => Ok(Leading::constant(quarter_turn(1))),
            (Function::Atan, LimitResult::NegInfinity) => Ok(Leading::constant(quarter_turn(-1))),
            (Function::Abs, _) => Ok(self.leading(arg, depth)?.map(|lead| Leading {
                sign: 1,
                coeff: lead.coeff.map(|c| Expr::func(Function::Abs, c)),
                rate: lead.rate,
            })),
            (func, LimitResult::Finite(v)) => Ok(Leading::constant(Expr::func(func, v))),
            _ => Ok(None),
        }
    }

    /// `exp(g)` with `g → ±∞`.
    fn leading_exp(&self, arg: &Expr, depth: usize) -> Result<Option<Leading>, LimitError> {
        let Some(g) = self.leading(arg, depth)? else {
            return Ok(None);
        };
        let GrowthRate::Scale {
            power,
            log_power,
            exp_coeff,
            ..
        } = &g.rate
        else {
            return Ok(None);
        };
        if *exp_coeff != 0.0 {
            return Ok((g.sign > 0 && g.rate.is_exponential_growth()).then(|| Leading {
                sign: 1,
                coeff: None,
                rate: GrowthRate::SuperExponential,
            }));
        }
        let Some(c) = g.coeff.clone() else {
            return Ok(None);
        };
        let Some(var) = arg.var_name() else {
            return Ok(None);
        };
        let x = Expr::var(var);

        // exp(c·x^p + rest) ~ exp(lim rest) · exp(c·x^p)
        let (head, rate) = if log_power.is_zero() && power.is_positive() {
            let Some(c_approx) = c.approx() else {
                return Ok(None);
            };
            let head = Expr::mul([c.clone(), Expr::pow(x, Expr::number(power.clone()))]);
            (head, GrowthRate::exp(c_approx, power.clone()))
        } else if power.is_zero() && log_power.is_one() {
            // exp(c·ln x + rest) ~ exp(lim rest) · x^c
            let Some(c_exact) = c.as_number() else {
                return Ok(None);
            };
            let head = Expr::mul([c.clone(), Expr::func(Function::Ln, x)]);
            (head, GrowthRate::poly(c_exact.clone()))
        } else {
            return Ok(None);
        };

        let coeff = match self.at_infinity(&arg.sub(&head), depth)? {
            LimitResult::Finite(v) => Some(Expr::func(Function::Exp, v)),
            _ => None,
        };
        Ok(Some(Leading { sign: 1, coeff, rate }))
    }

    /// `ln(g)` with `g → +∞` or `g → 0⁺`.
    fn leading_log(&self, arg: &Expr, depth: usize) -> Result<Option<Leading>, LimitError> {
        let Some(g) = self.leading(arg, depth)? else {
            return Ok(None);
        };
        if g.sign < 0 {
            return Ok(None);
        }
        let GrowthRate::Scale {
            power,
            exp_coeff,
            exp_power,
            ..
        } = g.rate
        else {
            return Ok(None);
        };
        if exp_coeff != 0.0 {
            // ln(exp(k·x^p)) = k·x^p
            return Ok(Some(Leading {
                sign: if exp_coeff > 0.0 { 1 } else { -1 },
                coeff: None,
                rate: GrowthRate::poly(exp_power),
            }));
        }
        if power.is_zero() {
            return Ok(None);
        }
        // ln(c·x^p·(ln x)^q) ~ p·ln x
        Ok(Some(Leading {
            sign: power.signum(),
            coeff: Some(Expr::number(power)),
            rate: GrowthRate::log(Rational::one()),
        }))
    }
}

/// `sign · π/2`.
fn quarter_turn(sign: i64) -> Expr {
    Expr::mul([
        Expr::number(Rational::from_i64(sign, 2)),
        Expr::constant(Constant::Pi),
    ])
}

/// Leading term of `base^q` from that of `base`.
fn leading_power(lead: Leading, exp: &Expr, q: &Rational) -> Option<Leading> {
    let sign = if lead.sign > 0 {
        1
    } else if q.denominator().is_even() {
        return None;
    } else if q.numerator().is_even() {
        1
    } else {
        -1
    };
    Some(Leading {
        sign,
        coeff: lead.coeff.map(|c| Expr::pow(c, exp.clone())),
        rate: lead.rate.powr(q),
    })
}
