//! Selection-driven entry point of the feature-time view.
//!
//! [`FeatureTimeView`] is the only component the host talks to. On every
//! selection change it projects each selected cluster, reconciles the axis
//! bounds, builds the overlay lines, and returns a [`DrawPlan`] for the
//! renderer. It holds no state besides its [`ViewContext`], the gap mode, and
//! the last selection (so a mode toggle can redraw it).

use crate::bounds::{self, DataBounds};
use crate::color::{ClusterPalette, ColorSelector};
use crate::overlay::{OverlayLine, build_overlay};
use crate::projection::{ClusterProjector, ClusterRecord, FeatureWeights};
use crate::remap::GapRemapper;
use crate::source::SpikeSource;
use crate::timeline::Timeline;
use crate::types::{ClusterId, Rgba, ViewConfig, XAxisPolicy};
use crate::ViewResult;
use serde::Serialize;

/// State fixed for the lifetime of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    timeline: Option<Timeline>,
    duration: f64,
    config: ViewConfig,
}

impl ViewContext {
    /// Creates a context.
    ///
    /// # Arguments
    /// * `timeline` - Block layout, or `None` when the recording has none
    /// * `duration` - Total recording duration in seconds
    /// * `config` - View configuration
    pub const fn new(timeline: Option<Timeline>, duration: f64, config: ViewConfig) -> Self {
        Self {
            timeline,
            duration,
            config,
        }
    }

    /// Context whose duration is taken from the spike source.
    pub fn for_source<S: SpikeSource + ?Sized>(
        timeline: Option<Timeline>,
        source: &S,
        config: ViewConfig,
    ) -> Self {
        Self::new(timeline, source.duration(), config)
    }

    /// Block layout, if the recording has one.
    pub const fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Total recording duration in seconds.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// View configuration.
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// X-axis range for the given gap mode.
    pub fn x_range(&self, gap_compressed: bool) -> (f64, f64) {
        match (self.config.x_axis, self.timeline.as_ref()) {
            (XAxisPolicy::ShrinkWithCompression, Some(timeline)) if gap_compressed => {
                (0.0, self.duration - timeline.total_gap())
            }
            _ => (0.0, self.duration),
        }
    }
}

/// The points of one cluster with the colour they are drawn in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterLayer {
    /// Projected spikes of the cluster.
    pub record: ClusterRecord,
    /// Colour assigned to the cluster.
    pub color: Rgba,
}

/// Everything the renderer needs to draw one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawPlan {
    /// One layer per selected cluster, in selection order.
    pub layers: Vec<ClusterLayer>,
    /// Block, gap, and baseline markers.
    pub lines: Vec<OverlayLine>,
    /// Axis bounds all layers and lines are drawn against.
    pub bounds: DataBounds,
    /// Marker size for the points.
    pub point_size: f32,
    /// Whether times are gap-compressed.
    pub gap_compressed: bool,
}

/// Result of handling a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectionOutcome {
    /// Nothing to draw; the renderer keeps what it has.
    NoOp,
    /// Draw the enclosed plan.
    Draw(DrawPlan),
}

impl SelectionOutcome {
    /// The plan, unless this is a no-op.
    pub const fn plan(&self) -> Option<&DrawPlan> {
        match self {
            SelectionOutcome::Draw(plan) => Some(plan),
            SelectionOutcome::NoOp => None,
        }
    }

    /// True for [`SelectionOutcome::NoOp`].
    pub const fn is_noop(&self) -> bool {
        matches!(self, SelectionOutcome::NoOp)
    }
}

/// Host-facing actions beyond plain selection changes.
pub trait ViewActions {
    /// Whether the gap toggle should be offered (only with a block layout).
    fn gap_toggle_available(&self) -> bool;

    /// Flips gap compression and redraws the current selection.
    fn toggle_gap_compression(&mut self) -> ViewResult<SelectionOutcome>;

    /// Raw recording time under a normalized device x coordinate in `[-1, 1]`.
    fn time_at(&self, ndc_x: f64) -> f64;
}

/// Feature projection versus time scatter view.
#[derive(Debug)]
pub struct FeatureTimeView<S, C = ClusterPalette> {
    context: ViewContext,
    source: S,
    colors: C,
    gap_compressed: bool,
    selection: Vec<ClusterId>,
}

impl<S: SpikeSource, C: ColorSelector> FeatureTimeView<S, C> {
    /// Creates a view; gap mode starts as configured when a timeline exists.
    pub fn new(context: ViewContext, source: S, colors: C) -> Self {
        let gap_compressed = context.config.gap_compressed && context.timeline.is_some();
        Self {
            context,
            source,
            colors,
            gap_compressed,
            selection: Vec::new(),
        }
    }

    /// Fixed view context.
    pub const fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Spike source the view reads from.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Whether gaps are currently compressed.
    pub const fn gap_compressed(&self) -> bool {
        self.gap_compressed
    }

    /// Sets the gap mode and returns the mode actually in effect, which stays
    /// `false` without a timeline.
    pub fn set_gap_compressed(&mut self, compressed: bool) -> bool {
        self.gap_compressed = compressed && self.context.timeline.is_some();
        tracing::debug!(gap_compressed = self.gap_compressed, "gap mode set");
        self.gap_compressed
    }

    /// Clusters of the last selection.
    pub fn selection(&self) -> &[ClusterId] {
        &self.selection
    }

    /// Handles a selection change.
    ///
    /// Returns [`SelectionOutcome::NoOp`] for an empty selection or when none
    /// of the selected clusters has any spike.
    ///
    /// # Errors
    /// Propagates inconsistencies reported by the spike source, such as a
    /// first cluster without template counts.
    pub fn on_select(&mut self, cluster_ids: &[ClusterId]) -> ViewResult<SelectionOutcome> {
        self.selection = cluster_ids.to_vec();
        self.redraw()
    }

    /// Redraws the last selection with the current gap mode.
    pub fn redraw(&self) -> ViewResult<SelectionOutcome> {
        let Some(&first) = self.selection.first() else {
            tracing::debug!("empty selection, nothing to draw");
            return Ok(SelectionOutcome::NoOp);
        };

        let weights = FeatureWeights::from_cluster(&self.source, first)?;
        let projector = ClusterProjector::new(
            &self.source,
            self.context.timeline(),
            self.context.config.max_spikes_per_cluster,
        );

        let mut records = self
            .selection
            .iter()
            .map(|&cluster| projector.project(cluster, &weights, self.gap_compressed))
            .collect::<ViewResult<Vec<ClusterRecord>>>()?;

        let data_bounds = bounds::aggregate(&mut records);
        if data_bounds.is_empty() {
            tracing::debug!(n_clusters = records.len(), "selected clusters have no spikes");
            return Ok(SelectionOutcome::NoOp);
        }

        let (x_min, x_max) = self.context.x_range(self.gap_compressed);
        let bounds = data_bounds.with_x_range(x_min, x_max);
        let lines = build_overlay(
            self.context.timeline(),
            &bounds,
            self.gap_compressed,
            &self.context.config,
        );

        tracing::debug!(
            n_clusters = records.len(),
            gap_compressed = self.gap_compressed,
            y_min = bounds.y_min,
            y_max = bounds.y_max,
            "selection drawn"
        );

        let layers = records
            .into_iter()
            .enumerate()
            .map(|(ordinal, record)| ClusterLayer {
                record,
                color: self.colors.color(ordinal),
            })
            .collect();

        Ok(SelectionOutcome::Draw(DrawPlan {
            layers,
            lines,
            bounds,
            point_size: self.context.config.point_size,
            gap_compressed: self.gap_compressed,
        }))
    }
}

impl<S: SpikeSource, C: ColorSelector> ViewActions for FeatureTimeView<S, C> {
    fn gap_toggle_available(&self) -> bool {
        self.context.timeline.is_some()
    }

    fn toggle_gap_compression(&mut self) -> ViewResult<SelectionOutcome> {
        self.set_gap_compressed(!self.gap_compressed);
        self.redraw()
    }

    fn time_at(&self, ndc_x: f64) -> f64 {
        let (x_min, x_max) = self.context.x_range(self.gap_compressed);
        let display = x_min + (ndc_x + 1.0) / 2.0 * (x_max - x_min);
        match self.context.timeline() {
            Some(timeline) if self.gap_compressed => GapRemapper::new(timeline).to_raw_time(display),
            _ => display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayKind;
    use crate::source::InMemorySpikeSource;
    use crate::ViewError;
    use approx_eq::assert_approx_eq;
    use ndarray::array;

    const DURATION: f64 = 200.0;

    fn source() -> InMemorySpikeSource {
        InMemorySpikeSource::new(
            array![10.0, 90.0, 160.0, 190.0, 50.0],
            vec![1, 1, 2, 2, 3],
            array![[1.0, 1.0], [-1.0, -3.0], [2.0, 4.0], [0.0, 0.0], [5.0, 5.0]],
            DURATION,
        )
        .expect("consistent arrays")
        .with_template_counts(1, array![1.0, 1.0])
        .with_template_counts(2, array![0.0, 1.0])
    }

    fn timeline() -> Timeline {
        Timeline::build(Some(&[100, 50][..]), Some(&[0, 150][..]), 1.0)
            .expect("valid layout")
            .expect("layout present")
    }

    fn view(
        timeline: Option<Timeline>,
        config: ViewConfig,
    ) -> FeatureTimeView<InMemorySpikeSource> {
        FeatureTimeView::new(
            ViewContext::new(timeline, DURATION, config),
            source(),
            ClusterPalette::default(),
        )
    }

    fn draw(outcome: ViewResult<SelectionOutcome>) -> DrawPlan {
        match outcome.expect("selection handled") {
            SelectionOutcome::Draw(plan) => plan,
            SelectionOutcome::NoOp => panic!("expected a draw plan"),
        }
    }

    #[test]
    fn test_context_duration_from_source() {
        let context = ViewContext::for_source(None, &source(), ViewConfig::default());
        assert_eq!(context.duration(), DURATION);
        assert_eq!(context.x_range(true), (0.0, DURATION));
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut v = view(Some(timeline()), ViewConfig::default());
        assert_eq!(v.on_select(&[]), Ok(SelectionOutcome::NoOp));
    }

    #[test]
    fn test_selection_without_spikes_is_noop() {
        let src = source().with_template_counts(9, array![1.0, 1.0]);
        let mut v = FeatureTimeView::new(
            ViewContext::new(None, DURATION, ViewConfig::default()),
            src,
            ClusterPalette::default(),
        );
        assert_eq!(v.on_select(&[9]), Ok(SelectionOutcome::NoOp));

        // An empty cluster next to a populated one still draws.
        let plan = draw(v.on_select(&[9, 3]));
        assert_eq!(plan.layers.len(), 2);
        assert!(plan.layers[0].record.is_empty());
    }

    #[test]
    fn test_first_cluster_without_counts_is_an_error() {
        let mut v = view(None, ViewConfig::default());
        assert_eq!(v.on_select(&[3, 1]), Err(ViewError::UnknownCluster(3)));
    }

    #[test]
    fn test_expanded_plan() {
        let mut v = view(Some(timeline()), ViewConfig::default());
        let plan = draw(v.on_select(&[1, 2]));

        assert!(!plan.gap_compressed);
        assert_eq!(plan.layers.len(), 2);
        assert_eq!(plan.layers[0].record.cluster_id, 1);
        assert_eq!(plan.layers[1].record.time, array![160.0, 190.0]);
        assert_ne!(plan.layers[0].color, plan.layers[1].color);

        // Values: cluster 1 -> [1, -2], cluster 2 -> [3, 0] with weights [1, 1].
        assert_eq!(plan.bounds, DataBounds::new(0.0, -2.0, DURATION, 3.0));

        let aggregated = DataBounds::new(10.0, -2.0, 190.0, 3.0);
        assert!(plan.layers.iter().all(|l| l.record.bounds == Some(aggregated)));

        let block_lines = plan.lines.iter().filter(|l| l.kind == OverlayKind::BlockStart).count();
        assert_eq!(block_lines, 2);
        assert_eq!(plan.lines.len(), 3);
    }

    #[test]
    fn test_compressed_plan() {
        let mut v = view(Some(timeline()), ViewConfig::default().with_gap_compressed(true));
        assert!(v.gap_compressed());

        let plan = draw(v.on_select(&[2]));
        assert!(plan.gap_compressed);
        assert_eq!(plan.layers[0].record.time, array![110.0, 140.0]);
        // Axis keeps the full recording duration.
        assert_eq!((plan.bounds.x_min, plan.bounds.x_max), (0.0, DURATION));

        let gap_lines = plan.lines.iter().filter(|l| l.kind == OverlayKind::Gap).count();
        assert_eq!(gap_lines, 1);
        assert_eq!(plan.lines.len(), 4);
    }

    #[test]
    fn test_shrinking_axis_policy() {
        let config = ViewConfig::default()
            .with_gap_compressed(true)
            .with_x_axis(XAxisPolicy::ShrinkWithCompression);
        let mut v = view(Some(timeline()), config);

        let plan = draw(v.on_select(&[1]));
        assert_eq!(plan.bounds.x_max, DURATION - 50.0);

        v.set_gap_compressed(false);
        let plan = draw(v.redraw());
        assert_eq!(plan.bounds.x_max, DURATION);
    }

    #[test]
    fn test_gap_mode_forced_off_without_timeline() {
        let mut v = view(None, ViewConfig::default().with_gap_compressed(true));
        assert!(!v.gap_compressed());
        assert!(!v.gap_toggle_available());
        assert!(!v.set_gap_compressed(true));

        let plan = draw(v.on_select(&[2]));
        assert_eq!(plan.layers[0].record.time, array![160.0, 190.0]);
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].kind, OverlayKind::Baseline);
    }

    #[test]
    fn test_toggle_redraws_last_selection() {
        let mut v = view(Some(timeline()), ViewConfig::default());
        assert!(v.gap_toggle_available());
        draw(v.on_select(&[2]));

        let plan = draw(v.toggle_gap_compression());
        assert!(plan.gap_compressed);
        assert_eq!(plan.layers[0].record.time, array![110.0, 140.0]);
        assert_eq!(v.selection(), &[2]);

        let plan = draw(v.toggle_gap_compression());
        assert!(!plan.gap_compressed);
        assert_eq!(plan.layers[0].record.time, array![160.0, 190.0]);
    }

    #[test]
    fn test_time_at_position() {
        let mut v = view(Some(timeline()), ViewConfig::default());
        assert_approx_eq!(v.time_at(-1.0), 0.0, 1e-12);
        assert_approx_eq!(v.time_at(0.0), 100.0, 1e-12);
        assert_approx_eq!(v.time_at(1.0), 200.0, 1e-12);

        v.set_gap_compressed(true);
        // Display time 110 lies in block 1, raw time 160.
        assert_approx_eq!(v.time_at(0.1), 160.0, 1e-9);
        assert_approx_eq!(v.time_at(-0.5), 50.0, 1e-9);
    }
}
