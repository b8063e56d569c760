//! Per-cluster projection of spikes onto (time, value) coordinates.
//!
//! Each spike carries several template feature components. They are reduced
//! to one scalar per spike with a weighted average whose weights are the
//! template counts of the first cluster in the selection. The same weights
//! are reused for every other cluster drawn alongside it.

use crate::bounds::DataBounds;
use crate::remap::GapRemapper;
use crate::source::SpikeSource;
use crate::timeline::Timeline;
use crate::types::{ClusterId, SpikeId};
use crate::{ViewError, ViewResult};
use ndarray::{Array1, ArrayView2};
use serde::Serialize;

/// Weight vector with one entry per template feature component.
///
/// Derived from a single cluster and shared by all clusters of a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeights {
    weights: Array1<f64>,
    sum: f64,
}

impl FeatureWeights {
    /// Wraps a weight vector.
    ///
    /// # Errors
    /// Returns an error if the weights sum to zero or are not finite, since
    /// no average can be formed from them.
    pub fn new(weights: Array1<f64>) -> ViewResult<Self> {
        let sum = weights.sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(ViewError::InvalidParameter(format!(
                "feature weights must have a finite non-zero sum, got {sum}"
            )));
        }
        Ok(Self { weights, sum })
    }

    /// Weights taken from the template counts of `cluster`.
    pub fn from_cluster<S: SpikeSource + ?Sized>(source: &S, cluster: ClusterId) -> ViewResult<Self> {
        Self::new(source.template_counts(cluster)?)
    }

    /// Number of feature components.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when there are no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Raw weight vector.
    pub fn as_array(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Weighted average of every row of `features`.
    ///
    /// # Errors
    /// Returns an error if the matrix has a different number of columns than
    /// there are weights.
    pub fn weighted_average(&self, features: ArrayView2<f64>) -> ViewResult<Array1<f64>> {
        if features.ncols() != self.weights.len() {
            return Err(ViewError::DimensionMismatch(format!(
                "feature matrix has {} components but {} weights were given",
                features.ncols(),
                self.weights.len()
            )));
        }
        Ok(features.dot(&self.weights) / self.sum)
    }
}

/// Display coordinates of one cluster's spikes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterRecord {
    /// Cluster the spikes belong to.
    pub cluster_id: ClusterId,
    /// Spikes in the same order as `time` and `value`.
    pub spike_ids: Vec<SpikeId>,
    /// Display time of each spike (raw or gap-compressed).
    pub time: Array1<f64>,
    /// Weighted template projection of each spike.
    pub value: Array1<f64>,
    /// Shared bounds of the selection, set once all clusters are projected.
    pub bounds: Option<DataBounds>,
}

impl ClusterRecord {
    /// Number of spikes.
    pub fn len(&self) -> usize {
        self.spike_ids.len()
    }

    /// True when the cluster has no spikes.
    pub fn is_empty(&self) -> bool {
        self.spike_ids.is_empty()
    }

    /// Iterates over `(time, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.value.iter().copied())
    }
}

/// Turns clusters into [`ClusterRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct ClusterProjector<'a, S: SpikeSource + ?Sized> {
    source: &'a S,
    timeline: Option<&'a Timeline>,
    max_spikes: Option<usize>,
}

impl<'a, S: SpikeSource + ?Sized> ClusterProjector<'a, S> {
    /// Creates a projector reading from `source`, fetching at most `max_spikes` per cluster.
    pub const fn new(source: &'a S, timeline: Option<&'a Timeline>, max_spikes: Option<usize>) -> Self {
        Self {
            source,
            timeline,
            max_spikes,
        }
    }

    /// Projects the spikes of `cluster`.
    ///
    /// Gap compression only applies when a timeline is present; without one
    /// the raw times are kept whatever `gap_compressed` says.
    pub fn project(
        &self,
        cluster: ClusterId,
        weights: &FeatureWeights,
        gap_compressed: bool,
    ) -> ViewResult<ClusterRecord> {
        let spike_ids = self.source.spike_ids(cluster, self.max_spikes)?;
        let raw_time = self.source.spike_times(&spike_ids)?;
        let features = self.source.template_features(&spike_ids)?;

        if raw_time.len() != spike_ids.len() || features.nrows() != spike_ids.len() {
            return Err(ViewError::DimensionMismatch(format!(
                "cluster {cluster}: {} spike ids, {} times, {} feature rows",
                spike_ids.len(),
                raw_time.len(),
                features.nrows()
            )));
        }

        let value = weights.weighted_average(features.view())?;
        let time = match self.timeline {
            Some(timeline) if gap_compressed => GapRemapper::new(timeline).compress_times(raw_time.view()),
            _ => raw_time,
        };

        tracing::trace!(cluster, n_spikes = spike_ids.len(), "cluster projected");

        Ok(ClusterRecord {
            cluster_id: cluster,
            spike_ids,
            time,
            value,
            bounds: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySpikeSource;
    use approx_eq::assert_approx_eq;
    use ndarray::array;

    fn source() -> InMemorySpikeSource {
        InMemorySpikeSource::new(
            array![10.0, 120.0, 160.0, 180.0],
            vec![1, 1, 2, 2],
            array![[1.0, 3.0], [2.0, 2.0], [4.0, 0.0], [-1.0, -1.0]],
            200.0,
        )
        .expect("consistent arrays")
        .with_template_counts(1, array![3.0, 1.0])
        .with_template_counts(2, array![0.0, 1.0])
    }

    fn timeline() -> Timeline {
        Timeline::build(Some(&[100, 50][..]), Some(&[0, 150][..]), 1.0)
            .expect("valid layout")
            .expect("layout present")
    }

    #[test]
    fn test_weighted_average() {
        let weights = FeatureWeights::new(array![3.0, 1.0]).expect("valid weights");
        let avg = weights
            .weighted_average(array![[1.0, 3.0], [4.0, 0.0]].view())
            .expect("matching dims");

        assert_approx_eq!(avg[0], 1.5, 1e-12);
        assert_approx_eq!(avg[1], 3.0, 1e-12);
    }

    #[test]
    fn test_weight_validation() {
        assert!(matches!(
            FeatureWeights::new(array![1.0, -1.0]),
            Err(ViewError::InvalidParameter(_))
        ));

        let weights = FeatureWeights::new(array![1.0, 1.0, 1.0]).expect("valid weights");
        assert!(matches!(
            weights.weighted_average(array![[1.0, 2.0]].view()),
            Err(ViewError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_project_raw_times() {
        let src = source();
        let weights = FeatureWeights::from_cluster(&src, 1).expect("weights");
        let projector = ClusterProjector::new(&src, None, None);

        let record = projector.project(1, &weights, false).expect("projection");
        assert_eq!(record.cluster_id, 1);
        assert_eq!(record.spike_ids, vec![0, 1]);
        assert_eq!(record.time, array![10.0, 120.0]);
        assert_approx_eq!(record.value[0], 1.5, 1e-12);
        assert_approx_eq!(record.value[1], 2.0, 1e-12);
        assert!(record.bounds.is_none());
    }

    #[test]
    fn test_first_cluster_weights_are_reused() {
        let src = source();
        // Weights from cluster 1 applied to cluster 2, whose own counts differ.
        let weights = FeatureWeights::from_cluster(&src, 1).expect("weights");
        let projector = ClusterProjector::new(&src, None, None);

        let record = projector.project(2, &weights, false).expect("projection");
        assert_approx_eq!(record.value[0], 3.0, 1e-12);
        assert_approx_eq!(record.value[1], -1.0, 1e-12);
    }

    #[test]
    fn test_project_compressed_times() {
        let src = source();
        let tl = timeline();
        let weights = FeatureWeights::from_cluster(&src, 1).expect("weights");
        let projector = ClusterProjector::new(&src, Some(&tl), None);

        let record = projector.project(2, &weights, true).expect("projection");
        assert_eq!(record.time, array![110.0, 130.0]);

        let record = projector.project(2, &weights, false).expect("projection");
        assert_eq!(record.time, array![160.0, 180.0]);
    }

    #[test]
    fn test_gap_mode_ignored_without_timeline() {
        let src = source();
        let weights = FeatureWeights::from_cluster(&src, 1).expect("weights");
        let projector = ClusterProjector::new(&src, None, None);

        let record = projector.project(2, &weights, true).expect("projection");
        assert_eq!(record.time, array![160.0, 180.0]);
    }

    #[test]
    fn test_empty_cluster() {
        let src = source();
        let weights = FeatureWeights::from_cluster(&src, 1).expect("weights");
        let projector = ClusterProjector::new(&src, None, Some(100));

        let record = projector.project(42, &weights, false).expect("projection");
        assert!(record.is_empty());
        assert_eq!(record.value.len(), 0);
    }
}
