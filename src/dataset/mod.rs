//! In-memory table of geolocated observational records.
//!
//! A [`Dataset`] is an ordered collection of [`Record`]s, one per sampled
//! site/transect: two coordinates, a categorical zone label, and named
//! real-valued covariates. The caller builds it (typically from a CSV it
//! loaded itself); the core subsystems only read it and return derived
//! columns for the caller to merge.
//!
//! # Examples
//!
//! ```
//! use inferir::dataset::{Dataset, Record};
//!
//! let records = vec![
//!     Record::new("t01", 518_000.0, 5_030_000.0, "N").with_covariate("grassland", 0.42),
//!     Record::new("t02", 519_500.0, 5_031_200.0, "S").with_covariate("grassland", 0.13),
//! ];
//! let ds = Dataset::new(records).unwrap();
//! assert_eq!(ds.len(), 2);
//! assert_eq!(ds.covariate("grassland").unwrap().len(), 2);
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::error::{InferirError, Result};
use crate::spatial::Point;

/// One sampled site: identifier, planar coordinates, zone label, covariates.
///
/// Immutable once loaded. Covariates are named f64 measures (e.g. land-cover
/// fractions around the site).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    x: f64,
    y: f64,
    zone: String,
    covariates: BTreeMap<String, f64>,
}

impl Record {
    /// Creates a record with no covariates.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64, zone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            zone: zone.into(),
            covariates: BTreeMap::new(),
        }
    }

    /// Attaches a named covariate value.
    #[must_use]
    pub fn with_covariate(mut self, name: impl Into<String>, value: f64) -> Self {
        self.covariates.insert(name.into(), value);
        self
    }

    /// Unique record identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Planar coordinates as a [`Point`].
    #[must_use]
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Zone label this record belongs to.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Looks up a covariate by name.
    #[must_use]
    pub fn covariate(&self, name: &str) -> Option<f64> {
        self.covariates.get(name).copied()
    }
}

/// Ordered collection of records indexed by identifier.
///
/// Identifiers are unique; construction fails on duplicates. Iteration order
/// is insertion order, and all derived per-record outputs preserve it.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Creates a dataset from records, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the record list is empty or two records share an id.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err("Dataset must have at least one record".into());
        }

        let mut index = HashMap::with_capacity(records.len());
        for (pos, rec) in records.iter().enumerate() {
            if index.insert(rec.id.clone(), pos).is_some() {
                return Err(InferirError::Other(format!(
                    "Duplicate record identifier '{}'",
                    rec.id
                )));
            }
        }

        Ok(Self { records, index })
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records (never true after `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a position in insertion order.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&Record> {
        self.records.get(pos)
    }

    /// Record by identifier.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Coordinates of every record, in insertion order.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        self.records.iter().map(Record::point).collect()
    }

    /// Extracts a named covariate as a column, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if any record lacks the covariate.
    pub fn covariate(&self, name: &str) -> Result<Vec<f64>> {
        self.records
            .iter()
            .map(|rec| {
                rec.covariate(name).ok_or_else(|| {
                    InferirError::Other(format!(
                        "Record '{}' has no covariate '{name}'",
                        rec.id
                    ))
                })
            })
            .collect()
    }

    /// Number of records per zone label.
    #[must_use]
    pub fn zone_sizes(&self) -> BTreeMap<String, usize> {
        let mut sizes = BTreeMap::new();
        for rec in &self.records {
            *sizes.entry(rec.zone.clone()).or_insert(0) += 1;
        }
        sizes
    }
}
