//! Real intervals with exact, possibly infinite, endpoints.

use std::cmp::Ordering;
use std::fmt;

use curvewise_integers::{ExactReal, Rational};
use serde::{Serialize, Serializer};

/// An interval endpoint.
///
/// The derived order puts `NegInfinity` below every finite value and
/// `PosInfinity` above.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    /// -∞
    NegInfinity,
    /// A finite exact value.
    Finite(ExactReal),
    /// +∞
    PosInfinity,
}

impl Bound {
    /// A finite bound at an integer.
    #[must_use]
    pub fn int(n: i64) -> Self {
        Self::Finite(ExactReal::from(n))
    }

    /// The finite value, if any.
    #[must_use]
    pub fn finite(&self) -> Option<&ExactReal> {
        match self {
            Self::Finite(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true for ±∞.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        !matches!(self, Self::Finite(_))
    }

    fn cmp_value(&self, v: &ExactReal) -> Ordering {
        match self {
            Self::NegInfinity => Ordering::Less,
            Self::Finite(b) => b.cmp(v),
            Self::PosInfinity => Ordering::Greater,
        }
    }
}

impl From<ExactReal> for Bound {
    fn from(v: ExactReal) -> Self {
        Self::Finite(v)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegInfinity => f.write_str("-oo"),
            Self::Finite(v) => write!(f, "{v}"),
            Self::PosInfinity => f.write_str("oo"),
        }
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A non-empty real interval.
///
/// # Invariants
///
/// - `start < end`
/// - infinite endpoints are open
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: Bound,
    end: Bound,
    start_open: bool,
    end_open: bool,
}

impl Interval {
    /// Builds an interval, or `None` when it would be empty.
    ///
    /// Infinite endpoints are forced open.
    #[must_use]
    pub fn new(start: Bound, end: Bound, start_open: bool, end_open: bool) -> Option<Self> {
        if start >= end {
            return None;
        }
        let start_open = start_open || start.is_infinite();
        let end_open = end_open || end.is_infinite();
        Some(Self {
            start,
            end,
            start_open,
            end_open,
        })
    }

    /// `(start, end)`
    #[must_use]
    pub fn open(start: Bound, end: Bound) -> Option<Self> {
        Self::new(start, end, true, true)
    }

    /// `[start, end]`
    #[must_use]
    pub fn closed(start: Bound, end: Bound) -> Option<Self> {
        Self::new(start, end, false, false)
    }

    /// `(-∞, ∞)`
    #[must_use]
    pub fn real_line() -> Self {
        Self {
            start: Bound::NegInfinity,
            end: Bound::PosInfinity,
            start_open: true,
            end_open: true,
        }
    }

    /// The lower endpoint.
    #[must_use]
    pub fn start(&self) -> &Bound {
        &self.start
    }

    /// The upper endpoint.
    #[must_use]
    pub fn end(&self) -> &Bound {
        &self.end
    }

    /// Whether the lower endpoint is excluded.
    #[must_use]
    pub fn start_open(&self) -> bool {
        self.start_open
    }

    /// Whether the upper endpoint is excluded.
    #[must_use]
    pub fn end_open(&self) -> bool {
        self.end_open
    }

    /// Returns true if both endpoints are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        !self.start.is_infinite() && !self.end.is_infinite()
    }

    /// Membership, respecting endpoint openness.
    #[must_use]
    pub fn contains(&self, v: &ExactReal) -> bool {
        let above = match self.start.cmp_value(v) {
            Ordering::Less => true,
            Ordering::Equal => !self.start_open,
            Ordering::Greater => false,
        };
        let below = match self.end.cmp_value(v) {
            Ordering::Greater => true,
            Ordering::Equal => !self.end_open,
            Ordering::Less => false,
        };
        above && below
    }

    /// Membership in the open interior.
    #[must_use]
    pub fn contains_interior(&self, v: &ExactReal) -> bool {
        self.start.cmp_value(v).is_lt() && self.end.cmp_value(v).is_gt()
    }

    /// The intersection, or `None` when it is empty.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let (start, start_open) = match self.start.cmp(&other.start) {
            Ordering::Less => (other.start.clone(), other.start_open),
            Ordering::Greater => (self.start.clone(), self.start_open),
            Ordering::Equal => (self.start.clone(), self.start_open || other.start_open),
        };
        let (end, end_open) = match self.end.cmp(&other.end) {
            Ordering::Less => (self.end.clone(), self.end_open),
            Ordering::Greater => (other.end.clone(), other.end_open),
            Ordering::Equal => (self.end.clone(), self.end_open || other.end_open),
        };
        Self::new(start, end, start_open, end_open)
    }

    /// Splits at every point of `points` (ascending) strictly inside the
    /// interval.
    ///
    /// The pieces keep this interval's openness at its own endpoints and
    /// are open at every split point, so the split points themselves are
    /// not covered.
    #[must_use]
    pub fn split_at(&self, points: &[ExactReal]) -> Vec<Self> {
        let mut pieces = Vec::new();
        let mut prev = self.start.clone();
        let mut prev_open = self.start_open;
        for p in points.iter().filter(|p| self.contains_interior(p)) {
            let cut = Bound::Finite(p.clone());
            if let Some(piece) = Self::new(prev, cut.clone(), prev_open, true) {
                pieces.push(piece);
            }
            prev = cut;
            prev_open = true;
        }
        if let Some(last) = Self::new(prev, self.end.clone(), prev_open, self.end_open) {
            pieces.push(last);
        }
        pieces
    }

    /// A finite point strictly inside the interval.
    ///
    /// - both ends finite: the midpoint, or a rational strictly between
    ///   them when the ends lie in different quadratic fields
    /// - `(a, ∞)`: `a + 1`
    /// - `(-∞, b)`: `b - 1`
    /// - `(-∞, ∞)`: `0`
    #[must_use]
    pub fn representative(&self) -> ExactReal {
        let one = ExactReal::from(1);
        match (&self.start, &self.end) {
            (Bound::Finite(a), Bound::Finite(b)) => a.checked_midpoint(b).unwrap_or_else(|| {
                // start < end, so the two values differ
                a.rational_between(b)
                    .map_or_else(|| a.clone(), ExactReal::from)
            }),
            (Bound::Finite(a), _) => a.checked_add(&one).unwrap_or_else(|| a.clone()),
            (_, Bound::Finite(b)) => b.checked_sub(&one).unwrap_or_else(|| b.clone()),
            _ => ExactReal::zero(),
        }
    }

    /// Sets the openness of a finite endpoint that equals `v`.
    #[must_use]
    pub(crate) fn with_endpoint_open(&self, v: &ExactReal, open: bool) -> Self {
        let mut out = self.clone();
        if self.start.finite() == Some(v) {
            out.start_open = open;
        }
        if self.end.finite() == Some(v) {
            out.end_open = open;
        }
        out
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.start_open { '(' } else { '[' };
        let close = if self.end_open { ')' } else { ']' };
        write!(f, "{open}{}, {}{close}", self.start, self.end)
    }
}

impl From<Rational> for Bound {
    fn from(v: Rational) -> Self {
        Self::Finite(ExactReal::from(v))
    }
}
