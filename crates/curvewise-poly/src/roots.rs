//! Exact real roots of rational polynomials.
//!
//! Roots are produced as [`ExactReal`]s. Each squarefree factor is
//! stripped of its rational roots (rational root test). What remains is
//! solved in closed form when it is quadratic or a polynomial in x², and
//! otherwise split into quadratic factors over ℚ where possible. A Sturm
//! count certifies that nothing was missed; a factor whose real roots are
//! not all quadratic surds is reported as an error rather than silently
//! dropped.

use curvewise_integers::{ExactReal, Integer, Rational};
use num_traits::{One, Zero};
use thiserror::Error;

use crate::algorithms::factor::quadratic_factor;
use crate::algorithms::gcd::exact_div;
use crate::algorithms::squarefree::squarefree_decomposition;
use crate::algorithms::sturm::count_real_roots;
use crate::dense::DensePoly;

/// A real root with its multiplicity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealRoot {
    /// The exact root.
    pub value: ExactReal,
    /// Multiplicity in the input polynomial.
    pub multiplicity: u32,
}

/// Errors from exact root isolation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootError {
    /// Every point is a root.
    #[error("the zero polynomial has every real number as a root")]
    ZeroPolynomial,
    /// The polynomial degree exceeds the configured ceiling.
    #[error("degree {degree} exceeds the solver limit of {limit}")]
    DegreeLimit {
        /// Input degree.
        degree: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// A factor has real roots that are not quadratic surds.
    #[error("a degree-{degree} factor has {missing} real root(s) with no closed form")]
    NoClosedForm {
        /// Degree of the unresolved factor.
        degree: usize,
        /// Number of roots that could not be expressed.
        missing: usize,
    },
    /// A coefficient was too large to factor for the rational root test.
    #[error("coefficient {0} is too large to enumerate rational root candidates")]
    CoefficientTooLarge(Integer),
}

/// All distinct real roots of `p`, ascending, with multiplicities.
///
/// The degree ceiling applies once the root at zero is divided out, so
/// `x^200` is solvable under any ceiling.
///
/// # Errors
///
/// Fails for the zero polynomial, inputs above `max_degree`, and factors
/// whose real roots have no quadratic-surd form.
pub fn real_roots(p: &DensePoly, max_degree: usize) -> Result<Vec<RealRoot>, RootError> {
    if p.is_zero() {
        return Err(RootError::ZeroPolynomial);
    }
    let at_zero = p.coeffs().iter().take_while(|c| c.is_zero()).count();
    let rest = DensePoly::new(p.coeffs()[at_zero..].to_vec());
    if rest.degree() > max_degree {
        return Err(RootError::DegreeLimit {
            degree: rest.degree(),
            limit: max_degree,
        });
    }

    let mut roots = Vec::new();
    if at_zero > 0 {
        roots.push(RealRoot {
            value: ExactReal::zero(),
            multiplicity: u32::try_from(at_zero).unwrap_or(u32::MAX),
        });
    }
    for sf in squarefree_decomposition(&rest).factors {
        for value in squarefree_roots(&sf.factor)? {
            roots.push(RealRoot {
                value,
                multiplicity: sf.multiplicity,
            });
        }
    }
    roots.sort_by(|a, b| a.value.cmp(&b.value));
    Ok(roots)
}

/// Roots of a squarefree polynomial.
fn squarefree_roots(f: &DensePoly) -> Result<Vec<ExactReal>, RootError> {
    let (mut roots, rest) = strip_rational_roots(f)?;
    roots.extend(irrational_roots(&rest)?);
    Ok(roots)
}

/// Roots of a squarefree polynomial without rational roots.
fn irrational_roots(f: &DensePoly) -> Result<Vec<ExactReal>, RootError> {
    match f.degree() {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![linear_root(f)]),
        2 => return Ok(quadratic_roots(f)),
        _ => {}
    }
    let expected = count_real_roots(f);
    if expected == 0 {
        return Ok(Vec::new());
    }
    let found = biquadratic_roots(f)?;
    if found.len() == expected {
        return Ok(found);
    }
    if let Some((q, cofactor)) = quadratic_factor(f) {
        let mut roots = quadratic_roots(&q);
        roots.extend(irrational_roots(&cofactor)?);
        return Ok(roots);
    }
    Err(RootError::NoClosedForm {
        degree: f.degree(),
        missing: expected.saturating_sub(found.len()),
    })
}

/// Divides out every rational root, returning the roots and the cofactor.
fn strip_rational_roots(f: &DensePoly) -> Result<(Vec<ExactReal>, DensePoly), RootError> {
    let mut roots = Vec::new();
    let mut rest = f.clone();

    // x = 0 first, so the constant term below is non-zero.
    while rest.degree() > 0 && rest.coeff(0).is_zero() {
        roots.push(ExactReal::zero());
        rest = DensePoly::new(rest.coeffs()[1..].to_vec());
    }
    if rest.degree() <= 2 {
        return Ok((roots, rest));
    }

    let ints = rest.to_primitive_integers();
    let constant = &ints[0];
    let leading = &ints[ints.len() - 1];
    let p_divs = constant
        .positive_divisors()
        .ok_or_else(|| RootError::CoefficientTooLarge(constant.clone()))?;
    let q_divs = leading
        .positive_divisors()
        .ok_or_else(|| RootError::CoefficientTooLarge(leading.clone()))?;

    let mut candidates: Vec<Rational> = Vec::new();
    for p in &p_divs {
        for q in &q_divs {
            let c = Rational::new(p.clone(), q.clone());
            candidates.push(-c.clone());
            candidates.push(c);
        }
    }
    candidates.sort();
    candidates.dedup();

    for c in candidates {
        if rest.degree() <= 2 {
            break;
        }
        if rest.eval(&c).is_zero() {
            let linear = DensePoly::new(vec![-c.clone(), Rational::one()]);
            if let Some(q) = exact_div(&rest, &linear) {
                rest = q;
                roots.push(ExactReal::from_rational(c));
            }
        }
    }
    Ok((roots, rest))
}

fn linear_root(p: &DensePoly) -> ExactReal {
    // a + b·x = 0
    let b = p.coeff(1);
    let root = b
        .checked_recip()
        .map_or_else(Rational::zero, |inv| -(p.coeff(0) * inv));
    ExactReal::from_rational(root)
}

/// Real roots of a quadratic, ascending.
fn quadratic_roots(p: &DensePoly) -> Vec<ExactReal> {
    let (c, b, a) = (p.coeff(0), p.coeff(1), p.coeff(2));
    let disc = &b * &b - Rational::from(4) * &a * &c;
    if disc.is_negative() {
        return Vec::new();
    }
    let Some(two_a_inv) = (Rational::from(2) * &a).checked_recip() else {
        return Vec::new();
    };
    let vertex = ExactReal::from_rational(-(&b * &two_a_inv));
    if disc.is_zero() {
        return vec![vertex];
    }
    let Some(offset) = ExactReal::sqrt_of(&disc)
        .and_then(|s| s.checked_mul(&ExactReal::from_rational(two_a_inv.abs())))
    else {
        return Vec::new();
    };
    let mut roots: Vec<ExactReal> = [vertex.checked_sub(&offset), vertex.checked_add(&offset)]
        .into_iter()
        .flatten()
        .collect();
    roots.sort();
    roots
}

/// Roots of p(x) = h(x²) through the non-negative rational roots of h.
///
/// Only the rational values of t = x² are used; an irrational t would
/// need a nested radical.
fn biquadratic_roots(p: &DensePoly) -> Result<Vec<ExactReal>, RootError> {
    let Some(h) = p.even_part() else {
        return Ok(Vec::new());
    };
    let (mut t_roots, rest) = strip_rational_roots(&h)?;
    match rest.degree() {
        1 => t_roots.push(linear_root(&rest)),
        2 => t_roots.extend(quadratic_roots(&rest)),
        _ => {}
    }

    let mut roots = Vec::new();
    for t in t_roots {
        let Some(t) = t.as_rational().filter(|t| !t.is_negative()).cloned() else {
            continue;
        };
        if let Some(s) = ExactReal::sqrt_of(&t) {
            if !s.is_zero() {
                roots.push(s.neg());
            }
            roots.push(s);
        }
    }
    roots.sort();
    roots.dedup();
    Ok(roots)
}
