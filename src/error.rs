//! Error types and result utilities for feature-time view operations.

use crate::types::{ClusterId, SpikeId};
use thiserror::Error;

/// Convenience type alias for results that may contain ViewError
pub type ViewResult<T> = Result<T, ViewError>;

/// Error types that can occur while computing view coordinates.
///
/// Degenerate but valid inputs (no block layout, an empty selection) are not
/// errors. These variants only surface when a collaborator hands over data
/// that cannot be combined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Error that occurs when invalid parameters are provided to an operation.
    ///
    /// This includes cases like a non-positive sample rate or feature weights summing to zero.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// Error that occurs when array dimensions don't match expected values.
    ///
    /// This happens when the feature matrix width differs from the weight vector length, etc.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),

    /// The spike source knows nothing about the requested cluster.
    #[error("Unknown cluster: {0}")]
    UnknownCluster(ClusterId),

    /// A spike id points past the end of the loaded spike arrays.
    #[error("Spike id {spike_id} out of range for {n_spikes} loaded spikes")]
    SpikeIndexOutOfRange {
        /// Offending spike id.
        spike_id: SpikeId,
        /// Number of spikes the source holds.
        n_spikes: usize,
    },
}
