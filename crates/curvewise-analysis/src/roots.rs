//! Real roots restricted to a domain.

use curvewise_core::Expr;
use curvewise_integers::ExactReal;
use curvewise_solve::{Domain, SolveError};

use crate::backend::AlgebraBackend;
use crate::error::{AnalysisError, Stage};

/// The distinct real zeros of `expr` that lie in `domain`, ascending.
///
/// Zeros on an open boundary of `domain` are excluded.
///
/// # Errors
///
/// Propagates the backend's [`SolveError`], including
/// [`SolveError::IdenticallyZero`] so callers can decide what an
/// everywhere-zero expression means for them.
pub fn real_roots<B: AlgebraBackend + ?Sized>(
    backend: &B,
    expr: &Expr,
    domain: &Domain,
) -> Result<Vec<ExactReal>, SolveError> {
    let mut roots: Vec<ExactReal> = backend
        .solve_real(expr)?
        .into_iter()
        .filter(|r| domain.contains(r))
        .collect();
    roots.sort();
    roots.dedup();
    Ok(roots)
}

/// Maps a solver failure to the error reported for `stage`.
pub(crate) fn root_finding(stage: Stage, err: &SolveError) -> AnalysisError {
    AnalysisError::RootFinding {
        stage,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ExactBackend;
    use curvewise_solve::{Bound, Interval};

    #[test]
    fn test_restricted_to_domain() {
        let b = ExactBackend::default();
        let f = b.parse("x^3 - x").unwrap();
        let all = real_roots(&b, &f, &Domain::real_line()).unwrap();
        assert_eq!(all, vec![ExactReal::from(-1), ExactReal::from(0), ExactReal::from(1)]);

        let half = Domain::from_intervals([Interval::open(Bound::int(0), Bound::PosInfinity).unwrap()]);
        assert_eq!(real_roots(&b, &f, &half).unwrap(), vec![ExactReal::from(1)]);
    }

    #[test]
    fn test_closed_boundary_kept() {
        let b = ExactBackend::default();
        let f = b.parse("x^2 - 4").unwrap();
        let d = Domain::from_intervals([Interval::closed(Bound::int(-2), Bound::int(2)).unwrap()]);
        assert_eq!(real_roots(&b, &f, &d).unwrap().len(), 2);
        let d = Domain::from_intervals([Interval::open(Bound::int(-2), Bound::int(2)).unwrap()]);
        assert!(real_roots(&b, &f, &d).unwrap().is_empty());
    }

    #[test]
    fn test_identically_zero() {
        let b = ExactBackend::default();
        let f = b.parse("x - x").unwrap();
        assert_eq!(real_roots(&b, &f, &Domain::real_line()), Err(SolveError::IdenticallyZero));
        let err = root_finding(Stage::Intercepts, &SolveError::IdenticallyZero);
        assert_eq!(
            err.to_string(),
            "root finding failed for intercepts: the expression is identically zero"
        );
    }
}
