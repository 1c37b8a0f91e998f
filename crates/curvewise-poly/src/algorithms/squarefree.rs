//! Squarefree decomposition of polynomials.
//!
//! Writes a polynomial as
//!
//! f = c · f₁ · f₂² · f₃³ · …
//!
//! where each fᵢ is monic, squarefree and coprime to the others. Root
//! multiplicities fall straight out of the decomposition.
//!
//! # Algorithm
//!
//! Yun's algorithm, valid in characteristic 0.

use curvewise_integers::Rational;

use crate::algorithms::gcd::{exact_div, make_monic, poly_gcd};
use crate::dense::DensePoly;

/// A factor with its multiplicity in the squarefree decomposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquarefreeFactor {
    /// The squarefree, monic polynomial factor.
    pub factor: DensePoly,
    /// The power this factor appears with.
    pub multiplicity: u32,
}

/// Result of squarefree decomposition.
#[derive(Clone, Debug)]
pub struct SquarefreeDecomposition {
    /// The leading coefficient of the input.
    pub unit: Rational,
    /// Non-constant factors in increasing multiplicity.
    pub factors: Vec<SquarefreeFactor>,
}

impl SquarefreeDecomposition {
    /// Reconstructs the original polynomial.
    #[must_use]
    pub fn to_polynomial(&self) -> DensePoly {
        self.factors
            .iter()
            .fold(DensePoly::constant(self.unit.clone()), |acc, sf| {
                acc.mul(&sf.factor.pow(sf.multiplicity))
            })
    }

    /// Product of the distinct factors.
    #[must_use]
    pub fn squarefree_part(&self) -> DensePoly {
        self.factors
            .iter()
            .fold(DensePoly::one(), |acc, sf| acc.mul(&sf.factor))
    }
}

/// Squarefree decomposition via Yun's algorithm.
///
/// Constant input (including zero) yields no factors.
#[must_use]
pub fn squarefree_decomposition(f: &DensePoly) -> SquarefreeDecomposition {
    let unit = f.leading_coeff().clone();
    if f.degree() == 0 {
        return SquarefreeDecomposition {
            unit,
            factors: Vec::new(),
        };
    }

    let f = make_monic(f);
    let f_prime = f.derivative();
    let g = poly_gcd(&f, &f_prime);

    // g divides both f and f' by construction.
    let (Some(mut a), Some(mut b)) = (exact_div(&f, &g), exact_div(&f_prime, &g)) else {
        return SquarefreeDecomposition {
            unit,
            factors: vec![SquarefreeFactor {
                factor: f,
                multiplicity: 1,
            }],
        };
    };

    let mut factors = Vec::new();
    let mut multiplicity = 1u32;

    while a.degree() > 0 {
        let c = b.sub(&a.derivative());
        let d = if c.is_zero() { a.clone() } else { poly_gcd(&a, &c) };

        if d.degree() > 0 {
            factors.push(SquarefreeFactor {
                factor: d.clone(),
                multiplicity,
            });
        }

        match (exact_div(&a, &d), exact_div(&c, &d)) {
            (Some(next_a), Some(next_b)) => {
                a = next_a;
                b = next_b;
            }
            _ => break,
        }
        multiplicity += 1;
    }

    SquarefreeDecomposition { unit, factors }
}

/// The squarefree part f / gcd(f, f'), made monic.
#[must_use]
pub fn squarefree_part(f: &DensePoly) -> DensePoly {
    if f.degree() == 0 {
        return f.clone();
    }
    let g = poly_gcd(f, &f.derivative());
    exact_div(f, &g).map_or_else(|| f.clone(), |p| make_monic(&p))
}

/// Checks whether gcd(f, f') = 1.
#[must_use]
pub fn is_squarefree(f: &DensePoly) -> bool {
    f.degree() == 0 || poly_gcd(f, &f.derivative()).degree() == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[i64]) -> DensePoly {
        DensePoly::from_i64s(coeffs)
    }

    #[test]
    fn test_is_squarefree() {
        assert!(is_squarefree(&poly(&[2, -3, 1])));
        assert!(!is_squarefree(&poly(&[1, 2, 1])));
    }

    #[test]
    fn test_decomposition_mixed() {
        // (x + 1)^2 (x - 2)^3 · 5
        let f = poly(&[1, 1])
            .pow(2)
            .mul(&poly(&[-2, 1]).pow(3))
            .scale(&Rational::from(5));
        let d = squarefree_decomposition(&f);

        assert_eq!(d.unit, Rational::from(5));
        assert_eq!(d.factors.len(), 2);
        assert_eq!(d.factors[0].factor, poly(&[1, 1]));
        assert_eq!(d.factors[0].multiplicity, 2);
        assert_eq!(d.factors[1].factor, poly(&[-2, 1]));
        assert_eq!(d.factors[1].multiplicity, 3);
        assert_eq!(d.to_polynomial(), f);
    }

    #[test]
    fn test_decomposition_skips_multiplicities() {
        // x · (x - 1)^3
        let f = poly(&[0, 1]).mul(&poly(&[-1, 1]).pow(3));
        let d = squarefree_decomposition(&f);
        let mults: Vec<u32> = d.factors.iter().map(|sf| sf.multiplicity).collect();
        assert_eq!(mults, vec![1, 3]);
        assert_eq!(d.squarefree_part(), poly(&[0, -1, 1]));
    }

    #[test]
    fn test_squarefree_part() {
        assert_eq!(squarefree_part(&poly(&[2, 4, 2])), poly(&[1, 1]));
    }

    #[test]
    fn test_constant() {
        assert!(squarefree_decomposition(&poly(&[7])).factors.is_empty());
    }
}
