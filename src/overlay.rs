//! Reference lines drawn on top of the scatter points.
//!
//! Vertical lines mark where blocks start (and, in compressed mode, where a
//! gap was removed). A horizontal line marks the zero projection value.

use crate::bounds::DataBounds;
use crate::timeline::Timeline;
use crate::types::{Rgba, ViewConfig};
use serde::Serialize;

/// What an overlay line marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Start of a recording block.
    BlockStart,
    /// Position of a removed gap.
    Gap,
    /// Zero projection value.
    Baseline,
}

/// A line segment in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayLine {
    /// Start x.
    pub x1: f64,
    /// Start y.
    pub y1: f64,
    /// End x.
    pub x2: f64,
    /// End y.
    pub y2: f64,
    /// Line colour; its alpha is the opacity.
    pub color: Rgba,
    /// What the line marks.
    pub kind: OverlayKind,
}

impl OverlayLine {
    const fn vertical(x: f64, bounds: &DataBounds, color: Rgba, kind: OverlayKind) -> Self {
        Self {
            x1: x,
            y1: bounds.y_min,
            x2: x,
            y2: bounds.y_max,
            color,
            kind,
        }
    }

    const fn horizontal(y: f64, bounds: &DataBounds, color: Rgba, kind: OverlayKind) -> Self {
        Self {
            x1: bounds.x_min,
            y1: y,
            x2: bounds.x_max,
            y2: y,
            color,
            kind,
        }
    }

    /// Opacity of the line.
    pub const fn opacity(&self) -> f32 {
        self.color.a
    }
}

/// Builds the overlay lines for the current bounds and gap mode.
///
/// Without a timeline only the baseline is produced. With one, every block
/// start gets a line; in compressed mode the block starts are placed on the
/// compressed axis and each of the `n_blocks - 1` gaps gets a dimmer line.
pub fn build_overlay(
    timeline: Option<&Timeline>,
    bounds: &DataBounds,
    gap_compressed: bool,
    config: &ViewConfig,
) -> Vec<OverlayLine> {
    let mut lines = Vec::new();

    if let Some(timeline) = timeline {
        let n_blocks = timeline.n_blocks();
        if gap_compressed {
            lines.extend((0..n_blocks).filter_map(|k| {
                timeline.compressed_block_start(k).map(|x| {
                    OverlayLine::vertical(x, bounds, config.block_line_color, OverlayKind::BlockStart)
                })
            }));
            lines.extend((0..n_blocks.saturating_sub(1)).filter_map(|k| {
                timeline
                    .compressed_block_end(k)
                    .map(|x| OverlayLine::vertical(x, bounds, config.gap_line_color, OverlayKind::Gap))
            }));
        } else {
            lines.extend(timeline.blocks().iter().map(|block| {
                OverlayLine::vertical(
                    block.start_time,
                    bounds,
                    config.block_line_color,
                    OverlayKind::BlockStart,
                )
            }));
        }
    }

    lines.push(OverlayLine::horizontal(
        0.0,
        bounds,
        config.baseline_color,
        OverlayKind::Baseline,
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> Timeline {
        Timeline::build(Some(&[10, 10, 10][..]), Some(&[0, 15, 40][..]), 1.0)
            .expect("valid layout")
            .expect("layout present")
    }

    fn count(lines: &[OverlayLine], kind: OverlayKind) -> usize {
        lines.iter().filter(|l| l.kind == kind).count()
    }

    fn xs(lines: &[OverlayLine], kind: OverlayKind) -> Vec<f64> {
        lines.iter().filter(|l| l.kind == kind).map(|l| l.x1).collect()
    }

    #[test]
    fn test_baseline_only_without_timeline() {
        let bounds = DataBounds::new(0.0, -2.0, 50.0, 3.0);
        let lines = build_overlay(None, &bounds, true, &ViewConfig::default());

        assert_eq!(lines.len(), 1);
        let baseline = lines[0];
        assert_eq!(baseline.kind, OverlayKind::Baseline);
        assert_eq!((baseline.x1, baseline.y1, baseline.x2, baseline.y2), (0.0, 0.0, 50.0, 0.0));
        assert_eq!(baseline.opacity(), 0.5);
    }

    #[test]
    fn test_expanded_mode_lines() {
        let tl = timeline();
        let bounds = DataBounds::new(0.0, -2.0, 50.0, 3.0);
        let lines = build_overlay(Some(&tl), &bounds, false, &ViewConfig::default());

        assert_eq!(count(&lines, OverlayKind::BlockStart), 3);
        assert_eq!(count(&lines, OverlayKind::Gap), 0);
        assert_eq!(count(&lines, OverlayKind::Baseline), 1);
        assert_eq!(xs(&lines, OverlayKind::BlockStart), vec![0.0, 15.0, 40.0]);

        let first = lines[0];
        assert_eq!((first.y1, first.y2), (-2.0, 3.0));
        assert_eq!(first.color, Rgba::WHITE);
    }

    #[test]
    fn test_compressed_mode_lines() {
        let tl = timeline();
        let bounds = DataBounds::new(0.0, -2.0, 50.0, 3.0);
        let lines = build_overlay(Some(&tl), &bounds, true, &ViewConfig::default());

        assert_eq!(count(&lines, OverlayKind::BlockStart), 3);
        assert_eq!(count(&lines, OverlayKind::Gap), 2);
        assert_eq!(count(&lines, OverlayKind::Baseline), 1);
        assert_eq!(xs(&lines, OverlayKind::BlockStart), vec![0.0, 10.0, 20.0]);
        assert_eq!(xs(&lines, OverlayKind::Gap), vec![10.0, 20.0]);
        assert!(
            lines
                .iter()
                .filter(|l| l.kind == OverlayKind::Gap)
                .all(|l| l.color == Rgba::GREY)
        );
    }

    #[test]
    fn test_single_block_compressed_has_no_gap_lines() {
        let tl = Timeline::build(Some(&[10][..]), Some(&[5][..]), 1.0)
            .expect("valid layout")
            .expect("layout present");
        let bounds = DataBounds::new(0.0, 0.0, 20.0, 1.0);
        let lines = build_overlay(Some(&tl), &bounds, true, &ViewConfig::default());

        assert_eq!(count(&lines, OverlayKind::BlockStart), 1);
        assert_eq!(count(&lines, OverlayKind::Gap), 0);
        assert_eq!(lines.len(), 2);
    }
}
