//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`Analyzer`](crate::Analyzer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name of the free variable.
    pub variable: String,
    /// Recursion bound for limits at infinity.
    pub limit_depth: usize,
    /// Approximate values at most this large in magnitude have no
    /// certain sign.
    pub sign_tolerance: f64,
    /// Polynomials of higher degree are not solved.
    pub max_solve_degree: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            variable: "x".to_string(),
            limit_depth: 64,
            sign_tolerance: 1e-12,
            max_solve_degree: curvewise_solve::DEFAULT_MAX_DEGREE,
        }
    }
}

impl AnalysisConfig {
    /// Sets the variable name.
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Sets the limit recursion bound.
    #[must_use]
    pub fn with_limit_depth(mut self, depth: usize) -> Self {
        self.limit_depth = depth;
        self
    }

    /// Sets the sign tolerance.
    #[must_use]
    pub fn with_sign_tolerance(mut self, tolerance: f64) -> Self {
        self.sign_tolerance = tolerance;
        self
    }

    /// Sets the largest polynomial degree the solver attempts.
    #[must_use]
    pub fn with_max_solve_degree(mut self, degree: usize) -> Self {
        self.max_solve_degree = degree;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"variable": "t"}"#).unwrap();
        assert_eq!(config.variable, "t");
        assert_eq!(config.limit_depth, 64);
        assert_eq!(config.max_solve_degree, 64);
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default()
            .with_variable("u")
            .with_limit_depth(8)
            .with_max_solve_degree(4);
        assert_eq!(config.variable, "u");
        assert_eq!(config.limit_depth, 8);
        assert_eq!(config.max_solve_degree, 4);
        assert!((config.sign_tolerance - 1e-12).abs() < f64::EPSILON);
    }
}
