//! Shared axis bounds across the clusters of a selection.

use crate::projection::ClusterRecord;
use serde::Serialize;

/// Bounds for plot data in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataBounds {
    /// Left edge.
    pub x_min: f64,
    /// Bottom edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Top edge.
    pub y_max: f64,
}

impl DataBounds {
    /// Creates bounds from `(x_min, y_min, x_max, y_max)`.
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Degenerate bounds that contain nothing; the identity of [`Self::expand_to_include`].
    pub const fn empty() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY)
    }

    /// True when no point has been included yet.
    pub const fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Grows the bounds to cover `(x, y)`.
    ///
    /// A point with a non-finite coordinate is skipped on both axes.
    pub fn include_point(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Grows the bounds to cover `other`.
    pub fn expand_to_include(&mut self, other: &DataBounds) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Same bounds with the x-range replaced.
    pub const fn with_x_range(self, x_min: f64, x_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            ..self
        }
    }

    /// Extent along x.
    pub const fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along y.
    pub const fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Bounds of a single cluster's points.
    pub fn of_record(record: &ClusterRecord) -> Self {
        record.points().fold(Self::empty(), |mut bounds, (x, y)| {
            bounds.include_point(x, y);
            bounds
        })
    }
}

impl Default for DataBounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// Folds the records of a selection into one rectangle and stamps it onto
/// every record.
///
/// Records without spikes do not contribute, and neither do spikes whose
/// time or value is NaN or infinite. The result is empty (see
/// [`DataBounds::is_empty`]) when no record has any spike, and the caller
/// should skip drawing.
pub fn aggregate(records: &mut [ClusterRecord]) -> DataBounds {
    let bounds = records
        .iter()
        .filter(|record| !record.is_empty())
        .fold(DataBounds::empty(), |mut acc, record| {
            acc.expand_to_include(&DataBounds::of_record(record));
            acc
        });

    for record in records.iter_mut() {
        record.bounds = Some(bounds);
    }
    bounds
}
