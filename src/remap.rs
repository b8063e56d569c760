//! Conversion between raw recording time and gap-compressed display time.
//!
//! In compressed time the idle gaps between blocks are removed so the blocks
//! sit back to back. An event inside block `k` is moved earlier by the summed
//! duration of every gap before block `k`. The mapping is continuous and
//! non-decreasing:
//!
//! - events before the end of the first block are unchanged,
//! - an event exactly at the start of a block belongs to that (later) block,
//! - an event inside a gap collapses onto the gap's compressed position,
//! - events after the last block shift by the total gap.

use crate::timeline::Timeline;
use ndarray::{Array1, ArrayView1};

/// Maps event times onto the gap-compressed display axis of a [`Timeline`].
#[derive(Debug, Clone, Copy)]
pub struct GapRemapper<'a> {
    timeline: &'a Timeline,
}

impl<'a> GapRemapper<'a> {
    /// Creates a remapper over `timeline`.
    pub const fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }

    /// Returns the compressed display time of a raw event time.
    pub fn to_compressed_time(&self, raw_time: f64) -> f64 {
        let blocks = self.timeline.blocks();
        if blocks.len() < 2 {
            return raw_time;
        }

        // Number of gaps fully behind the event; a start equal to the event
        // time counts, so boundary events land in the later block.
        let passed = blocks[1..].partition_point(|b| b.start_time <= raw_time);
        let mut shift = self.timeline.cumulative_gap_before(passed);

        if let Some(gap) = self.timeline.gap_times().get(passed) {
            let into_gap = raw_time - blocks[passed].end_time();
            if into_gap > 0.0 {
                shift += into_gap.min(*gap);
            }
        }

        raw_time - shift
    }

    /// Returns the raw recording time of a compressed display time.
    ///
    /// Gap positions map to the start of the block after the gap.
    pub fn to_raw_time(&self, compressed_time: f64) -> f64 {
        let n_blocks = self.timeline.n_blocks();
        if n_blocks < 2 {
            return compressed_time;
        }

        let block = (1..n_blocks)
            .take_while(|&k| {
                self.timeline
                    .compressed_block_start(k)
                    .is_some_and(|start| start <= compressed_time)
            })
            .last()
            .unwrap_or(0);

        compressed_time + self.timeline.cumulative_gap_before(block)
    }

    /// Remaps every event time, elementwise.
    pub fn compress_times(&self, raw_times: ArrayView1<f64>) -> Array1<f64> {
        raw_times.mapv(|t| self.to_compressed_time(t))
    }
}
