//! Sturm sequences for counting distinct real roots.

use curvewise_integers::Rational;

use crate::algorithms::gcd::poly_div_rem;
use crate::dense::DensePoly;

/// The Sturm sequence p₀ = p, p₁ = p', pₖ₊₁ = -rem(pₖ₋₁, pₖ).
#[derive(Clone, Debug)]
pub struct SturmSequence {
    chain: Vec<DensePoly>,
}

impl SturmSequence {
    /// Builds the sequence for `p`.
    #[must_use]
    pub fn new(p: &DensePoly) -> Self {
        let mut chain = vec![p.clone()];
        if p.degree() == 0 {
            return Self { chain };
        }
        chain.push(p.derivative());
        loop {
            let n = chain.len();
            let Some((_, r)) = poly_div_rem(&chain[n - 2], &chain[n - 1]) else {
                break;
            };
            if r.is_zero() {
                break;
            }
            chain.push(r.neg());
        }
        Self { chain }
    }

    /// Length of the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns true if the chain is empty (never for a constructed sequence).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    fn variations(signs: impl Iterator<Item = i8>) -> usize {
        let mut count = 0;
        let mut last = 0i8;
        for s in signs.filter(|&s| s != 0) {
            if last != 0 && s != last {
                count += 1;
            }
            last = s;
        }
        count
    }

    /// Sign variations at a rational point.
    #[must_use]
    pub fn variations_at(&self, x: &Rational) -> usize {
        Self::variations(self.chain.iter().map(|p| p.eval(x).signum()))
    }

    /// Sign variations as x → +∞.
    #[must_use]
    pub fn variations_at_pos_infinity(&self) -> usize {
        Self::variations(self.chain.iter().map(DensePoly::sign_at_pos_infinity))
    }

    /// Sign variations as x → -∞.
    #[must_use]
    pub fn variations_at_neg_infinity(&self) -> usize {
        Self::variations(self.chain.iter().map(DensePoly::sign_at_neg_infinity))
    }

    /// Number of distinct real roots.
    #[must_use]
    pub fn count_real_roots(&self) -> usize {
        self.variations_at_neg_infinity()
            .saturating_sub(self.variations_at_pos_infinity())
    }

    /// Number of distinct real roots in the half-open interval (a, b].
    #[must_use]
    pub fn count_roots_in(&self, a: &Rational, b: &Rational) -> usize {
        self.variations_at(a).saturating_sub(self.variations_at(b))
    }
}

/// Number of distinct real roots of `p`.
#[must_use]
pub fn count_real_roots(p: &DensePoly) -> usize {
    if p.is_zero() {
        return 0;
    }
    SturmSequence::new(p).count_real_roots()
}
