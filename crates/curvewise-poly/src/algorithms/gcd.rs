//! Polynomial division and GCD over ℚ.

use curvewise_integers::Rational;
use num_traits::Zero;

use crate::dense::DensePoly;

/// Divides `a` by `b`, returning `(quotient, remainder)`.
///
/// Returns `None` when `b` is the zero polynomial.
#[must_use]
pub fn poly_div_rem(a: &DensePoly, b: &DensePoly) -> Option<(DensePoly, DensePoly)> {
    if b.is_zero() {
        return None;
    }
    if a.degree() < b.degree() {
        return Some((DensePoly::zero(), a.clone()));
    }

    let b_lead_inv = b.leading_coeff().checked_recip()?;
    let b_len = b.coeffs().len();
    let mut quotient = vec![Rational::zero(); a.degree() - b.degree() + 1];
    let mut remainder = a.coeffs().to_vec();

    while remainder.len() >= b_len {
        let deg_diff = remainder.len() - b_len;
        let Some(top) = remainder.last() else { break };
        let coeff = top * &b_lead_inv;

        for (i, bc) in b.coeffs().iter().enumerate() {
            remainder[deg_diff + i] = &remainder[deg_diff + i] - &(&coeff * bc);
        }
        quotient[deg_diff] = coeff;

        // The top term cancels exactly; drop it along with any new zeros.
        remainder.pop();
        while remainder.last().is_some_and(Zero::is_zero) {
            remainder.pop();
        }
        if remainder.is_empty() {
            break;
        }
    }

    Some((DensePoly::new(quotient), DensePoly::new(remainder)))
}

/// Exact quotient `a / b`, or `None` if `b` does not divide `a`.
#[must_use]
pub fn exact_div(a: &DensePoly, b: &DensePoly) -> Option<DensePoly> {
    let (q, r) = poly_div_rem(a, b)?;
    r.is_zero().then_some(q)
}

/// Makes a polynomial monic (leading coefficient 1).
#[must_use]
pub fn make_monic(p: &DensePoly) -> DensePoly {
    match p.leading_coeff().checked_recip() {
        Some(inv) => p.scale(&inv),
        None => p.clone(),
    }
}

/// Monic GCD of two polynomials via the Euclidean algorithm.
///
/// `gcd(0, 0)` is the zero polynomial.
#[must_use]
pub fn poly_gcd(a: &DensePoly, b: &DensePoly) -> DensePoly {
    let mut p = a.clone();
    let mut q = b.clone();

    while let Some((_, r)) = poly_div_rem(&p, &q) {
        p = q;
        q = r;
    }

    make_monic(&p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[i64]) -> DensePoly {
        DensePoly::from_i64s(coeffs)
    }

    #[test]
    fn test_poly_div_rem() {
        // (x^2 + 2x + 1) / (x + 1) = x + 1, remainder 0
        let (q, r) = poly_div_rem(&poly(&[1, 2, 1]), &poly(&[1, 1])).unwrap();
        assert_eq!(q, poly(&[1, 1]));
        assert!(r.is_zero());

        // (x^3 + 1) / (x^2 - 1) = x, remainder x + 1
        let (q, r) = poly_div_rem(&poly(&[1, 0, 0, 1]), &poly(&[-1, 0, 1])).unwrap();
        assert_eq!(q, poly(&[0, 1]));
        assert_eq!(r, poly(&[1, 1]));
    }

    #[test]
    fn test_div_by_zero() {
        assert!(poly_div_rem(&poly(&[1, 1]), &DensePoly::zero()).is_none());
    }

    #[test]
    fn test_poly_gcd() {
        // gcd(x^2 - 1, x^2 - 2x + 1) = x - 1
        let g = poly_gcd(&poly(&[-1, 0, 1]), &poly(&[1, -2, 1]));
        assert_eq!(g, poly(&[-1, 1]));

        // coprime inputs give 1
        assert_eq!(poly_gcd(&poly(&[1, 1]), &poly(&[-1, 1])), DensePoly::one());
    }

    #[test]
    fn test_gcd_with_zero() {
        let g = poly_gcd(&poly(&[2, 4]), &DensePoly::zero());
        assert_eq!(g, DensePoly::new(vec![Rational::from_i64(1, 2), Rational::from(1)]));
    }

    #[test]
    fn test_exact_div() {
        assert_eq!(exact_div(&poly(&[-1, 0, 1]), &poly(&[1, 1])), Some(poly(&[-1, 1])));
        assert_eq!(exact_div(&poly(&[1, 0, 1]), &poly(&[1, 1])), None);
    }
}
