//! Quadratic factors over ℚ by Kronecker's method.
//!
//! A quadratic factor `q` of an integer polynomial `f` takes values at
//! -1, 0 and 1 that divide `f(-1)`, `f(0)` and `f(1)`. Every choice of
//! divisors interpolates to exactly one candidate, which is accepted if it
//! divides `f`. The search is exhaustive up to a candidate budget, so a
//! `None` within budget means `f` has no quadratic factor.

use curvewise_integers::{Integer, Rational};
use num_traits::Zero;

use crate::algorithms::gcd::exact_div;
use crate::dense::DensePoly;

/// Upper bound on the number of interpolated candidates tried.
pub const MAX_CANDIDATES: usize = 1 << 16;

/// Splits `f = q·g` with `q` quadratic, for `f` of degree at least four
/// without rational roots.
///
/// Returns `None` when no quadratic factor exists, when `f` vanishes at
/// one of the interpolation points, or when the divisor counts exceed
/// [`MAX_CANDIDATES`].
#[must_use]
pub fn quadratic_factor(f: &DensePoly) -> Option<(DensePoly, DensePoly)> {
    if f.degree() < 4 {
        return None;
    }
    let ints = DensePoly::new(
        f.to_primitive_integers()
            .into_iter()
            .map(Rational::from_integer)
            .collect(),
    );

    let at = |t: i64| ints.eval(&Rational::from(t)).numerator();
    let (at_minus, at_zero, at_one) = (at(-1), at(0), at(1));
    if at_minus.is_zero() || at_zero.is_zero() || at_one.is_zero() {
        return None;
    }

    let zero_values = at_zero.positive_divisors()?;
    let one_values = signed(at_one.positive_divisors()?);
    let minus_values = signed(at_minus.positive_divisors()?);
    let budget = zero_values
        .len()
        .saturating_mul(one_values.len())
        .saturating_mul(minus_values.len());
    if budget > MAX_CANDIDATES {
        return None;
    }

    let half = Rational::from_i64(1, 2);
    // q(0) > 0 fixes the sign of q.
    for c in &zero_values {
        let c = Rational::from_integer(c.clone());
        for u in &one_values {
            for v in &minus_values {
                // q(1) = a + b + c, q(-1) = a - b + c
                let a = &(u + v) * &half - &c;
                if a.is_zero() {
                    continue;
                }
                let b = &(u - v) * &half;
                let q = DensePoly::new(vec![c.clone(), b, a]);
                if let Some(g) = exact_div(f, &q) {
                    return Some((q, g));
                }
            }
        }
    }
    None
}

fn signed(divisors: Vec<Integer>) -> Vec<Rational> {
    divisors
        .into_iter()
        .flat_map(|d| {
            let d = Rational::from_integer(d);
            [-d.clone(), d]
        })
        .collect()
}
