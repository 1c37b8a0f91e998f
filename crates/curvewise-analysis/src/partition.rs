//! Sign partitions of a domain.
//!
//! A domain is cut at the real zeros of an expression. Inside each piece
//! the expression is continuous and has no zero, so its sign is constant
//! and a single evaluation decides it. The sample point of a piece is
//! [`Interval::representative`], which is always finite and strictly
//! inside the piece, also when one or both ends are infinite.

use curvewise_core::Expr;
use curvewise_integers::ExactReal;
use curvewise_solve::{Domain, Interval, SolveError};
use serde::Serialize;
use tracing::trace;

use crate::backend::AlgebraBackend;
use crate::roots::real_roots;

/// The sign of an expression on a piece of a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Sign {
    /// Positive throughout.
    Positive,
    /// Negative throughout.
    Negative,
    /// Zero throughout.
    Zero,
    /// The sample could not be evaluated with certainty.
    Inconclusive,
}

impl Sign {
    /// Returns true for [`Sign::Positive`] and [`Sign::Negative`].
    #[must_use]
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Positive | Self::Negative)
    }
}

/// A piece of a partition with its sample point and sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedInterval {
    /// The piece.
    pub interval: Interval,
    /// The sample point, strictly inside `interval`.
    pub point: ExactReal,
    /// The sign at `point`.
    pub sign: Sign,
}

/// A domain split into sign-homogeneous pieces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntervalClassification {
    roots: Vec<ExactReal>,
    pieces: Vec<SignedInterval>,
}

impl IntervalClassification {
    /// The zeros the domain was cut at.
    #[must_use]
    pub fn roots(&self) -> &[ExactReal] {
        &self.roots
    }

    /// The pieces, ascending.
    #[must_use]
    pub fn pieces(&self) -> &[SignedInterval] {
        &self.pieces
    }

    /// The union of the pieces with the given sign.
    #[must_use]
    pub fn union_of(&self, sign: Sign) -> Domain {
        Domain::from_intervals(self.intervals_with(sign))
    }

    /// The pieces with the given sign, unmerged.
    #[must_use]
    pub fn intervals_with(&self, sign: Sign) -> Vec<Interval> {
        self.pieces
            .iter()
            .filter(|p| p.sign == sign)
            .map(|p| p.interval.clone())
            .collect()
    }

    /// The sign of the piece ending at `point`, if there is one.
    #[must_use]
    pub fn sign_before(&self, point: &ExactReal) -> Option<Sign> {
        self.pieces
            .iter()
            .find(|p| p.interval.end().finite() == Some(point))
            .map(|p| p.sign)
    }

    /// The sign of the piece starting at `point`, if there is one.
    #[must_use]
    pub fn sign_after(&self, point: &ExactReal) -> Option<Sign> {
        self.pieces
            .iter()
            .find(|p| p.interval.start().finite() == Some(point))
            .map(|p| p.sign)
    }
}

/// Splits domains into sign-homogeneous pieces.
pub struct Partitioner<'a, B: ?Sized> {
    backend: &'a B,
    tolerance: f64,
}

impl<'a, B: AlgebraBackend + ?Sized> Partitioner<'a, B> {
    /// Creates a partitioner; approximate values within `tolerance` of
    /// zero are inconclusive.
    pub fn new(backend: &'a B, tolerance: f64) -> Self {
        Self { backend, tolerance }
    }

    /// Partitions `domain` at the zeros of `expr` and classifies each
    /// piece.
    ///
    /// An identically zero `expr` has no isolated zeros; every piece then
    /// classifies as [`Sign::Zero`].
    ///
    /// # Errors
    ///
    /// Returns the [`SolveError`] when the zeros of `expr` cannot be found.
    pub fn partition(&self, expr: &Expr, domain: &Domain) -> Result<IntervalClassification, SolveError> {
        let roots = match real_roots(self.backend, expr, domain) {
            Ok(roots) => roots,
            Err(SolveError::IdenticallyZero) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(self.classify(expr, &roots, domain))
    }

    /// Classifies the pieces of `domain` cut at `cuts` (ascending).
    ///
    /// `cuts` must contain every zero of `expr` inside `domain`. Pieces are
    /// open at the cuts and keep the openness of `domain` at its own
    /// boundaries.
    #[must_use]
    pub fn classify(&self, expr: &Expr, cuts: &[ExactReal], domain: &Domain) -> IntervalClassification {
        let mut pieces = Vec::new();
        for interval in domain.iter().flat_map(|i| i.split_at(cuts)) {
            let point = interval.representative();
            let sign = self.backend.substitute(expr, &point).sign(self.tolerance);
            trace!(piece = %interval, point = %point, ?sign, "classified piece of {expr}");
            pieces.push(SignedInterval { interval, point, sign });
        }
        IntervalClassification {
            roots: cuts.to_vec(),
            pieces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ExactBackend;
    use curvewise_solve::Bound;

    fn shown(intervals: &[Interval]) -> Vec<String> {
        intervals.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_cubic_signs() {
        let b = ExactBackend::default();
        let f = b.parse("x^3 - x").unwrap();
        let c = Partitioner::new(&b, 1e-12).partition(&f, &Domain::real_line()).unwrap();
        let signs: Vec<Sign> = c.pieces().iter().map(|p| p.sign).collect();
        assert_eq!(
            signs,
            [Sign::Negative, Sign::Positive, Sign::Negative, Sign::Positive]
        );
        assert_eq!(c.union_of(Sign::Positive).to_string(), "(-1, 0) U (1, oo)");
        assert_eq!(c.sign_before(&ExactReal::from(0)), Some(Sign::Positive));
        assert_eq!(c.sign_after(&ExactReal::from(0)), Some(Sign::Negative));
    }

    #[test]
    fn test_domain_pieces_are_independent() {
        let b = ExactBackend::default();
        let f = b.parse("-2*x/(x^2 - 1)^2").unwrap();
        let domain = b.continuous_domain(&f).unwrap();
        let c = Partitioner::new(&b, 1e-12).partition(&f, &domain).unwrap();
        assert_eq!(
            shown(&c.intervals_with(Sign::Positive)),
            ["(-oo, -1)", "(-1, 0)"]
        );
        assert_eq!(
            shown(&c.intervals_with(Sign::Negative)),
            ["(0, 1)", "(1, oo)"]
        );
        for piece in c.pieces() {
            assert!(piece.interval.contains_interior(&piece.point));
        }
    }

    #[test]
    fn test_closed_ends_are_kept() {
        let b = ExactBackend::default();
        let f = b.parse("x").unwrap();
        let domain = Domain::from_intervals([Interval::closed(Bound::int(-1), Bound::int(1)).unwrap()]);
        let c = Partitioner::new(&b, 1e-12).partition(&f, &domain).unwrap();
        assert_eq!(shown(&c.intervals_with(Sign::Negative)), ["[-1, 0)"]);
        assert_eq!(shown(&c.intervals_with(Sign::Positive)), ["(0, 1]"]);
    }

    #[test]
    fn test_identically_zero_is_flat() {
        let b = ExactBackend::default();
        let c = Partitioner::new(&b, 1e-12)
            .partition(&Expr::zero(), &Domain::real_line())
            .unwrap();
        assert_eq!(c.pieces().len(), 1);
        assert_eq!(c.pieces()[0].sign, Sign::Zero);
        assert!(c.union_of(Sign::Positive).is_empty());
        assert!(c.intervals_with(Sign::Inconclusive).is_empty());
    }

    #[test]
    fn test_transcendental_sign() {
        let b = ExactBackend::default();
        let f = b.parse("exp(-x) - x*exp(-x)").unwrap();
        let c = Partitioner::new(&b, 1e-12).partition(&f, &Domain::real_line()).unwrap();
        assert_eq!(c.roots(), [ExactReal::from(1)]);
        assert_eq!(c.union_of(Sign::Positive).to_string(), "(-oo, 1)");
        assert_eq!(c.union_of(Sign::Negative).to_string(), "(1, oo)");
    }
}
