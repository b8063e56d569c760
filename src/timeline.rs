//! Recording block layout.
//!
//! A recording is made of contiguous blocks separated by idle gaps. The
//! [`Timeline`] derives each block's start time, duration, and the gap that
//! follows it from the raw sample-unit arrays the acquisition system writes.

use crate::{ViewError, ViewResult};
use serde::Serialize;

/// One contiguous recording segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Block {
    /// 0-based position in recording order.
    pub index: usize,
    /// First sample of the block.
    pub start_sample: u64,
    /// Length of the block in samples.
    pub size_samples: u64,
    /// Start of the block in seconds.
    pub start_time: f64,
    /// Length of the block in seconds.
    pub size_time: f64,
}

impl Block {
    /// Time at which the block ends, in seconds.
    pub const fn end_time(&self) -> f64 {
        self.start_time + self.size_time
    }
}

/// Ordered blocks of a recording together with the gaps between them.
///
/// The layout is never validated: overlapping or unsorted blocks produce
/// negative gaps and undefined remapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    blocks: Vec<Block>,
    /// `gap_times[i]` is the idle time between block `i` and block `i + 1`.
    gap_times: Vec<f64>,
    /// `cumulative_gaps[k]` is the summed gap time before block `k`.
    cumulative_gaps: Vec<f64>,
}

impl Timeline {
    /// Builds a timeline from block sizes and block start positions given in samples.
    ///
    /// Returns `Ok(None)` when either array is absent, which disables every
    /// gap-related feature of the view.
    ///
    /// # Arguments
    /// * `block_sizes` - Length of each block in samples
    /// * `block_starts` - First sample of each block
    /// * `sample_rate` - Sampling rate in Hz
    ///
    /// # Errors
    /// Returns an error if the sample rate is not positive or the two arrays
    /// differ in length.
    pub fn build(
        block_sizes: Option<&[u64]>,
        block_starts: Option<&[u64]>,
        sample_rate: f64,
    ) -> ViewResult<Option<Self>> {
        let (Some(sizes), Some(starts)) = (block_sizes, block_starts) else {
            tracing::debug!("block layout unavailable, gap display disabled");
            return Ok(None);
        };

        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return Err(ViewError::InvalidParameter(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        if sizes.len() != starts.len() {
            return Err(ViewError::DimensionMismatch(format!(
                "{} block sizes but {} block starts",
                sizes.len(),
                starts.len()
            )));
        }

        let blocks: Vec<Block> = starts
            .iter()
            .zip(sizes)
            .enumerate()
            .map(|(index, (&start_sample, &size_samples))| Block {
                index,
                start_sample,
                size_samples,
                start_time: start_sample as f64 / sample_rate,
                size_time: size_samples as f64 / sample_rate,
            })
            .collect();

        Ok(Some(Self::from_blocks(blocks)))
    }

    fn from_blocks(blocks: Vec<Block>) -> Self {
        let gap_times: Vec<f64> = blocks
            .windows(2)
            .map(|pair| pair[1].start_time - pair[0].end_time())
            .collect();

        for (i, gap) in gap_times.iter().enumerate() {
            if *gap < 0.0 {
                tracing::warn!(block = i, gap, "block overlaps its successor");
            }
        }

        let mut cumulative_gaps = Vec::with_capacity(blocks.len());
        let mut acc = 0.0;
        cumulative_gaps.push(acc);
        for gap in &gap_times {
            acc += gap;
            cumulative_gaps.push(acc);
        }

        tracing::debug!(
            n_blocks = blocks.len(),
            total_gap = acc,
            "timeline constructed"
        );

        Self {
            blocks,
            gap_times,
            cumulative_gaps,
        }
    }

    /// Blocks in recording order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Idle time between each adjacent pair of blocks.
    pub fn gap_times(&self) -> &[f64] {
        &self.gap_times
    }

    /// Summed idle time over the whole recording.
    pub fn total_gap(&self) -> f64 {
        self.gap_times.iter().sum()
    }

    /// Summed gap time preceding block `block`.
    ///
    /// Indices past the last block return the total gap.
    pub fn cumulative_gap_before(&self, block: usize) -> f64 {
        self.cumulative_gaps
            .get(block)
            .copied()
            .unwrap_or_else(|| self.total_gap())
    }

    /// Start time of block `block` with all preceding gaps removed.
    pub fn compressed_block_start(&self, block: usize) -> Option<f64> {
        self.blocks
            .get(block)
            .map(|b| b.start_time - self.cumulative_gap_before(block))
    }

    /// End time of block `block` with all preceding gaps removed.
    pub fn compressed_block_end(&self, block: usize) -> Option<f64> {
        self.blocks
            .get(block)
            .map(|b| b.end_time() - self.cumulative_gap_before(block))
    }

    /// Time from the first block start to the last block end.
    pub fn span(&self) -> f64 {
        match (self.blocks.first(), self.blocks.last()) {
            (Some(first), Some(last)) => last.end_time() - first.start_time,
            _ => 0.0,
        }
    }
}
