//! Monotonicity and concavity from sign partitions of derivatives.
//!
//! Both reports are built the same way. The `n`-th derivative is
//! partitioned over the part of the function's domain where that
//! derivative is defined. The cut points are its zeros together with the
//! points of the domain where it is undefined. Pieces where it is positive
//! give the increasing (concave up) set. The decreasing (concave down) set
//! comes from partitioning the negated derivative at the same cuts, so
//! flat and inconclusive pieces stay out of both sets.

use curvewise_core::Expr;
use curvewise_integers::ExactReal;
use curvewise_solve::{Domain, Interval, SolveError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::AlgebraBackend;
use crate::error::{AnalysisError, Stage};
use crate::partition::{IntervalClassification, Partitioner, Sign};
use crate::roots::{real_roots, root_finding};

/// How a cut point of a derivative partition behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PointKind {
    /// The first derivative changes from negative to positive.
    LocalMinimum,
    /// The first derivative changes from positive to negative.
    LocalMaximum,
    /// The first derivative has the same sign on both sides.
    NotExtremum,
    /// The second derivative changes sign.
    Inflection,
    /// The second derivative has the same sign on both sides.
    NotInflection,
    /// A side is missing, flat or inconclusive.
    Undetermined,
}

impl PointKind {
    fn from_signs(order: u32, before: Option<Sign>, after: Option<Sign>) -> Self {
        let (Some(before), Some(after)) = (before, after) else {
            return Self::Undetermined;
        };
        if !before.is_strict() || !after.is_strict() {
            return Self::Undetermined;
        }
        match (order, before == after) {
            (1, true) => Self::NotExtremum,
            (1, false) if before == Sign::Negative => Self::LocalMinimum,
            (1, false) => Self::LocalMaximum,
            (_, true) => Self::NotInflection,
            (_, false) => Self::Inflection,
        }
    }

    /// Returns true for local minima and maxima.
    #[must_use]
    pub fn is_extremum(self) -> bool {
        matches!(self, Self::LocalMinimum | Self::LocalMaximum)
    }
}

/// A zero of a derivative, or a point of the domain where it is
/// undefined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CriticalPoint {
    /// The location.
    pub x: ExactReal,
    /// The function's value there, `None` when undefined.
    pub value: Option<Expr>,
    /// The behaviour read from the neighbouring pieces.
    pub kind: PointKind,
}

/// Where a function increases and decreases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonotonicityReport {
    /// The first derivative, simplified.
    pub derivative: Expr,
    /// The critical points, ascending.
    pub critical_points: Vec<CriticalPoint>,
    /// Where the first derivative is positive.
    pub increasing: Domain,
    /// Where the first derivative is negative.
    pub decreasing: Domain,
    /// Pieces whose sign could not be decided.
    pub inconclusive: Vec<Interval>,
    /// The full sign partition of the first derivative.
    pub partition: IntervalClassification,
}

impl MonotonicityReport {
    /// The local minima and maxima.
    pub fn extrema(&self) -> impl Iterator<Item = &CriticalPoint> {
        self.critical_points.iter().filter(|p| p.kind.is_extremum())
    }

    /// Every critical point with its function value, skipping points
    /// where the function is undefined.
    #[must_use]
    pub fn extrema_values(&self) -> Vec<(&ExactReal, &Expr)> {
        self.critical_points
            .iter()
            .filter_map(|p| p.value.as_ref().map(|v| (&p.x, v)))
            .collect()
    }
}

/// Where a function is concave up and concave down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConcavityReport {
    /// The second derivative, simplified.
    pub derivative: Expr,
    /// The inflection candidates, ascending.
    pub critical_points: Vec<CriticalPoint>,
    /// Where the second derivative is positive.
    pub concave_up: Domain,
    /// Where the second derivative is negative.
    pub concave_down: Domain,
    /// Pieces whose sign could not be decided.
    pub inconclusive: Vec<Interval>,
    /// The full sign partition of the second derivative.
    pub partition: IntervalClassification,
}

impl ConcavityReport {
    /// The candidates where concavity changes.
    pub fn inflection_points(&self) -> impl Iterator<Item = &CriticalPoint> {
        self.critical_points
            .iter()
            .filter(|p| p.kind == PointKind::Inflection)
    }

    /// The inflection points with their function values.
    #[must_use]
    pub fn inflection_values(&self) -> Vec<(&ExactReal, &Expr)> {
        self.inflection_points()
            .filter_map(|p| p.value.as_ref().map(|v| (&p.x, v)))
            .collect()
    }
}

/// The parts shared by both reports.
struct Shape {
    derivative: Expr,
    critical_points: Vec<CriticalPoint>,
    positive: Domain,
    negative: Domain,
    inconclusive: Vec<Interval>,
    partition: IntervalClassification,
}

/// Builds derivative reports for one function.
pub struct ShapeAnalyzer<'a, B: ?Sized> {
    backend: &'a B,
    tolerance: f64,
}

impl<'a, B: AlgebraBackend + ?Sized> ShapeAnalyzer<'a, B> {
    /// Creates an analyzer with the given sign tolerance.
    pub fn new(backend: &'a B, tolerance: f64) -> Self {
        Self { backend, tolerance }
    }

    /// Monotonicity of `f` on `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RootFinding`] when the zeros of `f'` cannot
    /// be found, or [`AnalysisError::Differentiation`].
    pub fn monotonicity(&self, f: &Expr, domain: &Domain) -> Result<MonotonicityReport, AnalysisError> {
        let shape = self.shape(f, domain, 1, Stage::FirstDerivative)?;
        Ok(MonotonicityReport {
            derivative: shape.derivative,
            critical_points: shape.critical_points,
            increasing: shape.positive,
            decreasing: shape.negative,
            inconclusive: shape.inconclusive,
            partition: shape.partition,
        })
    }

    /// Concavity of `f` on `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RootFinding`] when the zeros of `f''`
    /// cannot be found, or [`AnalysisError::Differentiation`].
    pub fn concavity(&self, f: &Expr, domain: &Domain) -> Result<ConcavityReport, AnalysisError> {
        let shape = self.shape(f, domain, 2, Stage::SecondDerivative)?;
        Ok(ConcavityReport {
            derivative: shape.derivative,
            critical_points: shape.critical_points,
            concave_up: shape.positive,
            concave_down: shape.negative,
            inconclusive: shape.inconclusive,
            partition: shape.partition,
        })
    }

    fn shape(&self, f: &Expr, domain: &Domain, order: u32, stage: Stage) -> Result<Shape, AnalysisError> {
        let derivative = self.backend.simplify(&self.backend.differentiate(f, order)?);
        debug!(%f, %derivative, order, "differentiated");

        let region = match self.backend.continuous_domain(&derivative) {
            Ok(d) => domain.intersect(&d),
            Err(e) => {
                warn!(%derivative, "{e}; sampling over the whole domain");
                domain.clone()
            }
        };

        let mut cuts = match real_roots(self.backend, &derivative, &region) {
            Ok(roots) => roots,
            Err(SolveError::IdenticallyZero) => Vec::new(),
            Err(e) => {
                let err = root_finding(stage, &e);
                warn!(%f, "{err}");
                return Err(err);
            }
        };
        cuts.extend(
            region
                .boundary_points()
                .into_iter()
                .filter(|p| domain.contains(p) && !region.contains(p)),
        );
        cuts.sort();
        cuts.dedup();

        let partitioner = Partitioner::new(self.backend, self.tolerance);
        let partition = partitioner.classify(&derivative, &cuts, &region);
        let negated = partitioner.classify(&derivative.neg(), &cuts, &region);

        let inconclusive = partition.intervals_with(Sign::Inconclusive);
        for piece in &inconclusive {
            warn!(%derivative, %piece, "inconclusive sign");
        }

        let critical_points = cuts
            .iter()
            .map(|c| CriticalPoint {
                x: c.clone(),
                value: self
                    .backend
                    .substitute(f, c)
                    .to_expr()
                    .map(|v| self.backend.simplify(&v)),
                kind: PointKind::from_signs(order, partition.sign_before(c), partition.sign_after(c)),
            })
            .collect();

        Ok(Shape {
            derivative,
            critical_points,
            positive: partition.union_of(Sign::Positive),
            negative: negated.union_of(Sign::Positive),
            inconclusive,
            partition,
        })
    }
}
