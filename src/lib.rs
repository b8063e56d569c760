// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # FeatureTimeView
//!
//! Coordinate and timeline-remapping core of a spike-sorting scatter view that
//! plots each selected cluster's spikes by recording time (x) against a
//! weighted template projection (y).
//!
//! ## Overview
//!
//! Recordings are often made of several blocks separated by idle gaps. The
//! view can show those gaps as dead time or compress them away so the blocks
//! sit back to back, and it marks block starts and removed gaps with
//! reference lines.
//!
//! The pieces, leaf to root:
//!
//! - [`Timeline`]: block start times, durations, and gaps from sample-unit arrays
//! - [`GapRemapper`]: raw time to gap-compressed display time and back
//! - [`ClusterProjector`]: one cluster's spikes to `(time, value)` coordinates
//! - [`aggregate`]: shared axis bounds across the clusters of a selection
//! - [`build_overlay`]: block, gap, and baseline reference lines
//! - [`FeatureTimeView`]: the selection handler the host calls
//!
//! ## Error Handling
//!
//! Missing block data and empty selections are not errors. Inconsistent
//! collaborator data surfaces as a [`ViewError`]:
//!
//! ```rust
//! use feature_time_view::{ViewError, ViewResult};
//!
//! let result: ViewResult<()> = Err(ViewError::UnknownCluster(12));
//!
//! match result {
//!     Ok(()) => {}
//!     Err(ViewError::UnknownCluster(id)) => eprintln!("no template counts for {id}"),
//!     Err(other) => eprintln!("view error: {other}"),
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use feature_time_view::{
//!     ClusterPalette, FeatureTimeView, InMemorySpikeSource, SelectionOutcome, Timeline,
//!     ViewActions, ViewConfig, ViewContext,
//! };
//! use ndarray::array;
//!
//! let source = InMemorySpikeSource::new(
//!     array![10.0, 160.0],
//!     vec![4, 4],
//!     array![[1.0, 0.0], [0.0, 1.0]],
//!     200.0,
//! )
//! .unwrap()
//! .with_template_counts(4, array![1.0, 1.0]);
//!
//! let timeline = Timeline::build(Some(&[100, 50][..]), Some(&[0, 150][..]), 1.0).unwrap();
//! let context = ViewContext::new(timeline, 200.0, ViewConfig::default());
//! let mut view = FeatureTimeView::new(context, source, ClusterPalette::default());
//!
//! if let SelectionOutcome::Draw(plan) = view.on_select(&[4]).unwrap() {
//!     assert_eq!(plan.layers[0].record.time[1], 160.0);
//! }
//!
//! // Remove the gap between the two blocks.
//! if let SelectionOutcome::Draw(plan) = view.toggle_gap_compression().unwrap() {
//!     assert_eq!(plan.layers[0].record.time[1], 110.0);
//! }
//! ```

pub mod bounds;
pub mod color;
mod error;
pub mod overlay;
pub mod projection;
pub mod remap;
pub mod source;
pub mod timeline;
pub mod types;
pub mod view;

pub use crate::bounds::{DataBounds, aggregate};
pub use crate::color::{ClusterPalette, ColorSelector};
pub use crate::error::{ViewError, ViewResult};
pub use crate::overlay::{OverlayKind, OverlayLine, build_overlay};
pub use crate::projection::{ClusterProjector, ClusterRecord, FeatureWeights};
pub use crate::remap::GapRemapper;
pub use crate::source::{InMemorySpikeSource, SpikeSource, regular_subset};
pub use crate::timeline::{Block, Timeline};
pub use crate::types::{ClusterId, Rgba, SpikeId, ViewConfig, XAxisPolicy};
pub use crate::view::{
    ClusterLayer, DrawPlan, FeatureTimeView, SelectionOutcome, ViewActions, ViewContext,
};
