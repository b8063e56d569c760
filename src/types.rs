//! Supporting types and configuration for the feature-time view.
//!
//! This module contains the identifiers, colours, and configuration structures
//! shared by the timeline, projection, and overlay components.

use serde::{Deserialize, Serialize};

/// Identifier of a sorted cluster, as assigned by the host.
pub type ClusterId = u32;

/// Index of a spike into the recording-wide spike arrays.
pub type SpikeId = usize;

/// An RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha (opacity).
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque mid-dark grey used for gap markers.
    pub const GREY: Rgba = Rgba::new(0.4, 0.4, 0.4, 1.0);

    /// Creates a colour from its components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque colour from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// How the x-axis upper bound behaves when gaps are compressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxisPolicy {
    /// The x-axis always spans `[0, recording_duration]`.
    ///
    /// In compressed mode the events crowd toward lower x values and leave
    /// blank space at the right edge, but the axis does not jump when the
    /// user toggles the mode.
    #[default]
    RecordingDuration,
    /// In compressed mode the x-axis spans `[0, recording_duration - total_gap]`.
    ShrinkWithCompression,
}

/// Configuration of a feature-time view.
///
/// Unknown fields fall back to their defaults when deserializing, so a host
/// may store only the settings it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Upper bound on the spikes fetched per cluster. `None` fetches all of them.
    pub max_spikes_per_cluster: Option<usize>,
    /// X-axis bound policy in compressed mode.
    pub x_axis: XAxisPolicy,
    /// Whether the view starts with gaps compressed. Ignored without a timeline.
    pub gap_compressed: bool,
    /// Marker size handed to the renderer.
    pub point_size: f32,
    /// Colour of the vertical block-start markers.
    pub block_line_color: Rgba,
    /// Colour of the vertical gap markers (compressed mode only).
    pub gap_line_color: Rgba,
    /// Colour of the horizontal zero baseline.
    pub baseline_color: Rgba,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_spikes_per_cluster: Some(10_000),
            x_axis: XAxisPolicy::RecordingDuration,
            gap_compressed: false,
            point_size: 3.0,
            block_line_color: Rgba::WHITE,
            gap_line_color: Rgba::GREY,
            baseline_color: Rgba::WHITE.with_alpha(0.5),
        }
    }
}

impl ViewConfig {
    /// Sets the per-cluster spike limit.
    pub fn with_max_spikes_per_cluster(mut self, max: Option<usize>) -> Self {
        self.max_spikes_per_cluster = max;
        self
    }

    /// Sets the x-axis policy.
    pub fn with_x_axis(mut self, policy: XAxisPolicy) -> Self {
        self.x_axis = policy;
        self
    }

    /// Sets the initial gap mode.
    pub fn with_gap_compressed(mut self, compressed: bool) -> Self {
        self.gap_compressed = compressed;
        self
    }

    /// Sets the marker size.
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Sets the block, gap, and baseline line colours.
    pub fn with_overlay_colors(mut self, block: Rgba, gap: Rgba, baseline: Rgba) -> Self {
        self.block_line_color = block;
        self.gap_line_color = gap;
        self.baseline_color = baseline;
        self
    }
}
