//! Finite unions of disjoint real intervals.

use std::fmt;

use curvewise_integers::ExactReal;
use serde::Serialize;

use crate::interval::{Bound, Interval};

/// An ordered union of pairwise disjoint, non-mergeable intervals.
///
/// # Invariants
///
/// - intervals are sorted ascending by start
/// - `domain[i].end <= domain[i + 1].start`
/// - no two neighbours touch at a point covered by either of them
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Domain {
    intervals: Vec<Interval>,
}

impl Domain {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The whole real line.
    #[must_use]
    pub fn real_line() -> Self {
        Self {
            intervals: vec![Interval::real_line()],
        }
    }

    /// The union of `intervals`, normalized.
    #[must_use]
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut sorted: Vec<Interval> = intervals.into_iter().collect();
        sorted.sort_by(|a, b| {
            a.start()
                .cmp(b.start())
                .then_with(|| a.start_open().cmp(&b.start_open()))
        });

        let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
        for next in sorted {
            let Some(last) = merged.last_mut() else {
                merged.push(next);
                continue;
            };
            let touches = match next.start().cmp(last.end()) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Equal => !(last.end_open() && next.start_open()),
                std::cmp::Ordering::Greater => false,
            };
            if !touches {
                merged.push(next);
                continue;
            }
            let (end, end_open) = match next.end().cmp(last.end()) {
                std::cmp::Ordering::Greater => (next.end().clone(), next.end_open()),
                std::cmp::Ordering::Less => (last.end().clone(), last.end_open()),
                std::cmp::Ordering::Equal => {
                    (last.end().clone(), last.end_open() && next.end_open())
                }
            };
            if let Some(joined) =
                Interval::new(last.start().clone(), end, last.start_open(), end_open)
            {
                *last = joined;
            }
        }
        Self { intervals: merged }
    }

    /// The intervals, ascending.
    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Iterates over the intervals.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Number of maximal intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true for the empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns true for `(-∞, ∞)`.
    #[must_use]
    pub fn is_real_line(&self) -> bool {
        self.intervals == [Interval::real_line()]
    }

    /// Membership.
    #[must_use]
    pub fn contains(&self, v: &ExactReal) -> bool {
        self.intervals.iter().any(|i| i.contains(v))
    }

    /// The finite boundary points, ascending.
    #[must_use]
    pub fn boundary_points(&self) -> Vec<ExactReal> {
        let mut points: Vec<ExactReal> = self
            .intervals
            .iter()
            .flat_map(|i| [i.start(), i.end()])
            .filter_map(Bound::finite)
            .cloned()
            .collect();
        points.dedup();
        points
    }

    /// Set intersection.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let pieces = self
            .intervals
            .iter()
            .flat_map(|a| other.intervals.iter().filter_map(move |b| a.intersect(b)));
        Self::from_intervals(pieces)
    }

    /// Set union.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_intervals(self.intervals.iter().chain(&other.intervals).cloned())
    }

    /// The domain with the given points removed.
    #[must_use]
    pub fn remove_points(&self, points: &[ExactReal]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort();
        Self {
            intervals: self
                .intervals
                .iter()
                .flat_map(|i| i.split_at(&sorted))
                .map(|i| sorted.iter().fold(i, |acc, p| acc.with_endpoint_open(p, true)))
                .collect(),
        }
    }

    /// The domain with every open finite endpoint in `points` closed.
    #[must_use]
    pub fn close_at(&self, points: &[ExactReal]) -> Self {
        Self::from_intervals(
            self.intervals
                .iter()
                .map(|i| points.iter().fold(i.clone(), |acc, p| acc.with_endpoint_open(p, false))),
        )
    }
}

impl<'a> IntoIterator for &'a Domain {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl FromIterator<Interval> for Domain {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        Self::from_intervals(iter)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.is_empty() {
            return f.write_str("{}");
        }
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(" U ")?;
            }
            write!(f, "{interval}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(a: Bound, b: Bound) -> Interval {
        Interval::open(a, b).unwrap()
    }

    #[test]
    fn test_merge_overlapping() {
        let d = Domain::from_intervals([
            open(Bound::int(2), Bound::int(5)),
            open(Bound::int(0), Bound::int(3)),
        ]);
        assert_eq!(d.to_string(), "(0, 5)");
    }

    #[test]
    fn test_touching_open_ends_stay_apart() {
        let d = Domain::from_intervals([
            open(Bound::int(1), Bound::PosInfinity),
            open(Bound::NegInfinity, Bound::int(1)),
        ]);
        assert_eq!(d.to_string(), "(-oo, 1) U (1, oo)");
        assert_eq!(d.len(), 2);
        assert!(!d.contains(&ExactReal::from(1)));
    }

    #[test]
    fn test_touching_closed_end_merges() {
        let d = Domain::from_intervals([
            Interval::new(Bound::NegInfinity, Bound::int(1), true, false).unwrap(),
            open(Bound::int(1), Bound::PosInfinity),
        ]);
        assert!(d.is_real_line());
    }

    #[test]
    fn test_remove_points() {
        let d = Domain::real_line().remove_points(&[ExactReal::from(1), ExactReal::from(-1)]);
        assert_eq!(d.to_string(), "(-oo, -1) U (-1, 1) U (1, oo)");
        assert_eq!(
            d.boundary_points(),
            vec![ExactReal::from(-1), ExactReal::from(1)]
        );
    }

    #[test]
    fn test_intersect_and_union() {
        let a = Domain::real_line().remove_points(&[ExactReal::from(0)]);
        let b = Domain::from_intervals([Interval::new(Bound::int(-2), Bound::int(2), false, true).unwrap()]);
        assert_eq!(a.intersect(&b).to_string(), "[-2, 0) U (0, 2)");
        assert!(a.union(&b).is_real_line());
        assert!(a.intersect(&Domain::empty()).is_empty());
    }

    #[test]
    fn test_close_at() {
        let d = Domain::real_line()
            .remove_points(&[ExactReal::from(-1), ExactReal::from(1)])
            .close_at(&[ExactReal::from(1)]);
        assert_eq!(d.to_string(), "(-oo, -1) U (-1, oo)");
    }

    #[test]
    fn test_serialize() {
        let d = Domain::real_line().remove_points(&[ExactReal::from(0)]);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            r#"[{"start":"-oo","end":"0","start_open":true,"end_open":true},{"start":"0","end":"oo","start_open":true,"end_open":true}]"#
        );
        assert_eq!(Domain::empty().to_string(), "{}");
    }
}
