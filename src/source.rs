//! Access to per-spike data owned by the host.
//!
//! The view never reads spike files itself. A [`SpikeSource`] hands over the
//! spike ids selected for a cluster, their raw times, their template feature
//! values, and the template counts used to weight those features.

use crate::types::{ClusterId, SpikeId};
use crate::{ViewError, ViewResult};
use ndarray::{Array1, Array2, Axis};
use std::collections::HashMap;

/// Provider of spike times and template features, keyed by cluster.
pub trait SpikeSource {
    /// Spike ids belonging to `cluster`, in ascending order.
    ///
    /// When `max_spikes` is given the source applies its own sampling policy
    /// and returns at most that many ids.
    fn spike_ids(&self, cluster: ClusterId, max_spikes: Option<usize>) -> ViewResult<Vec<SpikeId>>;

    /// Raw recording times of the given spikes, in seconds.
    fn spike_times(&self, spike_ids: &[SpikeId]) -> ViewResult<Array1<f64>>;

    /// Template feature matrix with one row per spike and one column per component.
    fn template_features(&self, spike_ids: &[SpikeId]) -> ViewResult<Array2<f64>>;

    /// Number of spikes of `cluster` attributed to each template feature component.
    fn template_counts(&self, cluster: ClusterId) -> ViewResult<Array1<f64>>;

    /// Total recording duration in seconds.
    fn duration(&self) -> f64;
}

/// A [`SpikeSource`] over arrays that are already loaded in memory.
#[derive(Debug, Clone)]
pub struct InMemorySpikeSource {
    spike_times: Array1<f64>,
    spike_clusters: Vec<ClusterId>,
    features: Array2<f64>,
    template_counts: HashMap<ClusterId, Array1<f64>>,
    duration: f64,
}

impl InMemorySpikeSource {
    /// Creates a source from recording-wide spike arrays.
    ///
    /// # Arguments
    /// * `spike_times` - Time of every spike in seconds
    /// * `spike_clusters` - Cluster assignment of every spike
    /// * `features` - Template features, one row per spike
    /// * `duration` - Total recording duration in seconds
    ///
    /// # Errors
    /// Returns an error if the three spike arrays disagree on the spike count.
    pub fn new(
        spike_times: Array1<f64>,
        spike_clusters: Vec<ClusterId>,
        features: Array2<f64>,
        duration: f64,
    ) -> ViewResult<Self> {
        let n_spikes = spike_times.len();
        if spike_clusters.len() != n_spikes || features.nrows() != n_spikes {
            return Err(ViewError::DimensionMismatch(format!(
                "{n_spikes} spike times, {} cluster assignments, {} feature rows",
                spike_clusters.len(),
                features.nrows()
            )));
        }

        Ok(Self {
            spike_times,
            spike_clusters,
            features,
            template_counts: HashMap::new(),
            duration,
        })
    }

    /// Registers the template counts of a cluster.
    pub fn with_template_counts(mut self, cluster: ClusterId, counts: Array1<f64>) -> Self {
        self.template_counts.insert(cluster, counts);
        self
    }

    /// Number of loaded spikes.
    pub fn n_spikes(&self) -> usize {
        self.spike_times.len()
    }

    fn check_ids(&self, spike_ids: &[SpikeId]) -> ViewResult<()> {
        let n_spikes = self.n_spikes();
        match spike_ids.iter().find(|&&id| id >= n_spikes) {
            Some(&spike_id) => Err(ViewError::SpikeIndexOutOfRange { spike_id, n_spikes }),
            None => Ok(()),
        }
    }
}

/// Picks `max` ids spread evenly over `ids`, keeping their order.
///
/// Returns the input untouched when it already fits.
pub fn regular_subset(ids: Vec<SpikeId>, max: usize) -> Vec<SpikeId> {
    let n = ids.len();
    if n <= max {
        return ids;
    }
    if max == 0 {
        return Vec::new();
    }
    (0..max).map(|i| ids[i * n / max]).collect()
}

impl SpikeSource for InMemorySpikeSource {
    fn spike_ids(&self, cluster: ClusterId, max_spikes: Option<usize>) -> ViewResult<Vec<SpikeId>> {
        let ids: Vec<SpikeId> = self
            .spike_clusters
            .iter()
            .enumerate()
            .filter_map(|(id, &c)| (c == cluster).then_some(id))
            .collect();

        Ok(match max_spikes {
            Some(max) => regular_subset(ids, max),
            None => ids,
        })
    }

    fn spike_times(&self, spike_ids: &[SpikeId]) -> ViewResult<Array1<f64>> {
        self.check_ids(spike_ids)?;
        Ok(spike_ids.iter().map(|&id| self.spike_times[id]).collect())
    }

    fn template_features(&self, spike_ids: &[SpikeId]) -> ViewResult<Array2<f64>> {
        self.check_ids(spike_ids)?;
        Ok(self.features.select(Axis(0), spike_ids))
    }

    fn template_counts(&self, cluster: ClusterId) -> ViewResult<Array1<f64>> {
        self.template_counts
            .get(&cluster)
            .cloned()
            .ok_or(ViewError::UnknownCluster(cluster))
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}
