//! Domain resolution.

use curvewise_core::Expr;
use curvewise_solve::Domain;
use tracing::debug;

use crate::backend::AlgebraBackend;
use crate::error::AnalysisError;

/// The maximal domain of continuity of `expr`.
///
/// # Errors
///
/// Returns [`AnalysisError::DomainUnresolvable`] when the backend cannot
/// certify where `expr` is continuous.
pub fn resolve<B: AlgebraBackend + ?Sized>(backend: &B, expr: &Expr) -> Result<Domain, AnalysisError> {
    let domain = backend
        .continuous_domain(expr)
        .map_err(|e| AnalysisError::DomainUnresolvable {
            expr: expr.to_string(),
            reason: e.to_string(),
        })?;
    debug!(%expr, %domain, "resolved domain");
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ExactBackend;

    #[test]
    fn test_resolve() {
        let b = ExactBackend::default();
        let f = b.parse("1/(x^2 - 1)").unwrap();
        assert_eq!(resolve(&b, &f).unwrap().to_string(), "(-oo, -1) U (-1, 1) U (1, oo)");

        let f = b.parse("ln(x) + sqrt(4 - x)").unwrap();
        assert_eq!(resolve(&b, &f).unwrap().to_string(), "(0, 4]");
    }

    #[test]
    fn test_unresolvable() {
        let b = ExactBackend::default();
        let f = b.parse("tan(x)").unwrap();
        let err = resolve(&b, &f).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, AnalysisError::DomainUnresolvable { .. }));
    }
}
