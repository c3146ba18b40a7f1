//! Pairwise spatial-distance aggregation over zone groups.
//!
//! For every record, the mean weighted Euclidean distance to all other
//! records sharing its zone label. The O(n²) pairwise kernel is isolated in
//! [`mean_pairwise_distance`] so it can be swapped for an approximate
//! spatial-index version without touching the aggregation contract; group
//! computations run in parallel under the `parallel` feature.
//!
//! # Examples
//!
//! ```
//! use inferir::dataset::{Dataset, Record};
//! use inferir::spatial::GroupAggregator;
//!
//! let ds = Dataset::new(vec![
//!     Record::new("t01", 0.0, 0.0, "N"),
//!     Record::new("t02", 3.0, 4.0, "N"),
//!     Record::new("t03", 8.0, 8.0, "S"),
//! ]).unwrap();
//!
//! let report = GroupAggregator::new().aggregate(&ds).unwrap();
//! assert!((report.group_means["N"] - 5.0).abs() < 1e-12);
//! assert!((report.group_means["S"] - 0.0).abs() < 1e-12); // singleton group
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::error::{InferirError, Result};

/// A point in the planar survey coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Weighted Euclidean distance between two points.
///
/// Returns `w * sqrt((a.x-b.x)² + (a.y-b.y)²)`. Symmetric in `a`/`b` and zero
/// for coincident points. The weight is a free real parameter: no validation,
/// a negative `w` yields the correspondingly signed result.
///
/// # Examples
///
/// ```
/// use inferir::spatial::{weighted_distance, Point};
///
/// let d = weighted_distance(Point::new(2.0, 3.0), Point::new(-1.0, -1.0), 2.0);
/// assert!((d - 10.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn weighted_distance(a: Point, b: Point, w: f64) -> f64 {
    w * ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Mean weighted distance over all unordered pairs of `points`.
///
/// A group with fewer than two members has no pairs and a defined mean of 0.
/// This is the O(n²) kernel behind [`GroupAggregator`]; swapping it for a
/// spatial-index approximation leaves the aggregation contract untouched.
#[must_use]
pub fn mean_pairwise_distance(points: &[Point], weight: f64) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += weighted_distance(points[i], points[j], weight);
        }
    }

    let n_pairs = (n * (n - 1) / 2) as f64;
    sum / n_pairs
}

/// Per-group mean distances plus the per-record broadcast, both inspectable.
#[derive(Debug, Clone)]
pub struct GroupDistances {
    /// Mean pairwise distance per zone label.
    pub group_means: BTreeMap<String, f64>,
    /// Each record's group mean, in dataset order.
    pub per_record: Vec<f64>,
}

impl GroupDistances {
    /// Keys the per-record values by record identifier.
    #[must_use]
    pub fn by_id(&self, dataset: &Dataset) -> BTreeMap<String, f64> {
        dataset
            .iter()
            .zip(self.per_record.iter())
            .map(|(rec, &v)| (rec.id().to_string(), v))
            .collect()
    }
}

/// Group-wise mean-pairwise-distance aggregation engine.
///
/// Partitions a dataset by zone label, computes each group's mean pairwise
/// weighted distance, and broadcasts the group value back onto every member
/// row without reordering.
#[derive(Debug, Clone)]
pub struct GroupAggregator {
    weight: f64,
}

impl Default for GroupAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupAggregator {
    /// Creates an aggregator with unit weight.
    #[must_use]
    pub fn new() -> Self {
        Self { weight: 1.0 }
    }

    /// Sets the distance weight passed through to every pair.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Mean pairwise distance per zone label.
    ///
    /// Groups are induced from the dataset's zone labels; every record
    /// belongs to exactly one. Singleton groups yield 0.0.
    #[must_use]
    pub fn group_means(&self, dataset: &Dataset) -> BTreeMap<String, f64> {
        let mut groups: BTreeMap<String, Vec<Point>> = BTreeMap::new();
        for rec in dataset.iter() {
            groups
                .entry(rec.zone().to_string())
                .or_default()
                .push(rec.point());
        }

        let weight = self.weight;
        let entries: Vec<(String, Vec<Point>)> = groups.into_iter().collect();

        #[cfg(feature = "parallel")]
        let means: Vec<(String, f64)> = entries
            .into_par_iter()
            .map(|(label, points)| {
                let mean = mean_pairwise_distance(&points, weight);
                (label, mean)
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let means: Vec<(String, f64)> = entries
            .into_iter()
            .map(|(label, points)| {
                let mean = mean_pairwise_distance(&points, weight);
                (label, mean)
            })
            .collect();

        means.into_iter().collect()
    }

    /// Attaches each group's mean to every member record, in dataset order.
    ///
    /// # Errors
    ///
    /// Returns [`InferirError::EmptyGroup`] if a record's zone label is
    /// missing from `group_means` — unreachable when the map came from
    /// [`GroupAggregator::group_means`] on the same dataset, but reported
    /// rather than silently producing NaN.
    pub fn broadcast(
        &self,
        dataset: &Dataset,
        group_means: &BTreeMap<String, f64>,
    ) -> Result<Vec<f64>> {
        dataset
            .iter()
            .map(|rec| {
                group_means
                    .get(rec.zone())
                    .copied()
                    .ok_or_else(|| InferirError::EmptyGroup {
                        label: rec.zone().to_string(),
                    })
            })
            .collect()
    }

    /// Computes group means and their broadcast in one call.
    ///
    /// # Errors
    ///
    /// Propagates [`InferirError::EmptyGroup`] from the broadcast step.
    pub fn aggregate(&self, dataset: &Dataset) -> Result<GroupDistances> {
        let group_means = self.group_means(dataset);
        let per_record = self.broadcast(dataset, &group_means)?;
        Ok(GroupDistances {
            group_means,
            per_record,
        })
    }
}
