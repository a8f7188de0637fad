//! # Haplotype Blocks
//!
//! Run-length representation of a decoded state path in genomic coordinates.
//!
//! Compression emits a new block whenever the decoded state changes. A block
//! ends one base before the next block's first SNP, so the gap between two
//! SNPs belongs to the block before it; the last block ends at the last SNP.
//!
//! Extension then resolves the slot ambiguity of unordered pairs: after
//! `(0,1) -> (1,2)` nothing in the state says whether strain 1 stayed on the
//! first or second homolog. A single greedy left-to-right pass swaps a
//! block's two labels whenever that lets a label continue a run that started
//! earlier than any run the unswapped labelling continues. The pass only
//! looks at the immediately preceding block and is not globally optimal;
//! downstream reports depend on its exact choices.
//!
//! ## Coincident positions
//! SNPs sharing a `position_bp` are legal. If the state changes between two
//! of them, the earlier block ends one base before it starts
//! (`end_position_bp == start_position_bp - 1`) and covers no position.
//! Coordinates alone then cannot tell the SNPs apart: `expand_blocks` and
//! `block_for_each_snp` assign every SNP at that position to the later
//! block, so the path does not round-trip.

use serde::{Deserialize, Serialize};

use crate::data::strain::StrainIdx;
use crate::error::{Result, StrainHapError};
use crate::model::states::DiplotypeState;

/// A genomic interval assigned to one diplotype
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaplotypeBlock {
    pub start_position_bp: u64,
    pub end_position_bp: u64,
    pub haplotype_index_1: StrainIdx,
    pub haplotype_index_2: StrainIdx,
}

impl HaplotypeBlock {
    pub fn new(start_position_bp: u64, end_position_bp: u64, state: DiplotypeState) -> Self {
        Self {
            start_position_bp,
            end_position_bp,
            haplotype_index_1: state.first,
            haplotype_index_2: state.second,
        }
    }

    /// Diplotype in the block's current slot order
    pub fn state(&self) -> DiplotypeState {
        DiplotypeState {
            first: self.haplotype_index_1,
            second: self.haplotype_index_2,
        }
    }

    /// Base pairs covered, inclusive of both ends
    pub fn length_bp(&self) -> u64 {
        (self.end_position_bp + 1).saturating_sub(self.start_position_bp)
    }

    pub fn contains(&self, position_bp: u64) -> bool {
        self.start_position_bp <= position_bp && position_bp <= self.end_position_bp
    }

    fn swap_labels(&mut self) {
        std::mem::swap(&mut self.haplotype_index_1, &mut self.haplotype_index_2);
    }
}

/// Collapse a per-SNP state path into blocks
pub fn compress(states: &[DiplotypeState], positions: &[u64]) -> Result<Vec<HaplotypeBlock>> {
    StrainHapError::check_len("SNP positions", states.len(), positions.len())?;
    let Some(&first) = states.first() else {
        return Ok(Vec::new());
    };

    let mut blocks = Vec::new();
    let mut start_state = first;
    let mut start_pos = positions[0];
    for (&state, &pos) in states.iter().zip(positions).skip(1) {
        if state != start_state {
            blocks.push(HaplotypeBlock::new(start_pos, pos.saturating_sub(1), start_state));
            start_state = state;
            start_pos = pos;
        }
    }
    blocks.push(HaplotypeBlock::new(
        start_pos,
        positions[positions.len() - 1],
        start_state,
    ));
    Ok(blocks)
}

/// Earliest run start continued by a labelling, if either slot continues.
///
/// Slot 1 continues when `prev1 == curr1`, slot 2 when `prev2 == curr2`.
/// When both continue the comparison is against `prev1_start`.
fn earliest_run_start(
    prev1_start: u64,
    prev1: StrainIdx,
    curr1: StrainIdx,
    prev2_start: u64,
    prev2: StrainIdx,
    curr2: StrainIdx,
) -> Option<u64> {
    let mut earliest = None;
    if prev1 == curr1 {
        earliest = Some(prev1_start);
    }
    if prev2 == curr2 && (earliest.is_none() || prev2_start < prev1_start) {
        earliest = Some(prev2_start);
    }
    earliest
}

/// Greedy single-pass label extension, in place
pub fn extend(blocks: &mut [HaplotypeBlock]) {
    // run starts are seeded at 0, not at the first block's start
    let mut prev1_start = 0u64;
    let mut prev2_start = 0u64;

    for i in 1..blocks.len() {
        let prev1 = blocks[i - 1].haplotype_index_1;
        let prev2 = blocks[i - 1].haplotype_index_2;
        let curr = &mut blocks[i];
        let curr1 = curr.haplotype_index_1;
        let curr2 = curr.haplotype_index_2;

        if let Some(swapped) =
            earliest_run_start(prev1_start, prev1, curr2, prev2_start, prev2, curr1)
        {
            let unswapped = earliest_run_start(prev1_start, prev1, curr1, prev2_start, prev2, curr2);
            if unswapped.map_or(true, |noswap| swapped < noswap) {
                curr.swap_labels();
            }
        }

        if curr.haplotype_index_1 != prev1 {
            prev1_start = curr.start_position_bp;
        }
        if curr.haplotype_index_2 != prev2 {
            prev2_start = curr.start_position_bp;
        }
    }
}

/// Compress a path and run the extension pass
pub fn compress_and_extend(
    states: &[DiplotypeState],
    positions: &[u64],
) -> Result<Vec<HaplotypeBlock>> {
    let mut blocks = compress(states, positions)?;
    extend(&mut blocks);
    Ok(blocks)
}

/// Index of the block covering each SNP, in one forward sweep.
///
/// `positions` must be sorted. SNPs outside every block map to `None`.
pub fn block_for_each_snp(blocks: &[HaplotypeBlock], positions: &[u64]) -> Vec<Option<usize>> {
    let mut block_idx = 0;
    positions
        .iter()
        .map(|&pos| {
            while block_idx < blocks.len() && blocks[block_idx].end_position_bp < pos {
                block_idx += 1;
            }
            blocks
                .get(block_idx)
                .filter(|b| b.start_position_bp <= pos)
                .map(|_| block_idx)
        })
        .collect()
}

/// Re-expand blocks into a per-SNP state path
pub fn expand_blocks(blocks: &[HaplotypeBlock], positions: &[u64]) -> Result<Vec<DiplotypeState>> {
    block_for_each_snp(blocks, positions)
        .into_iter()
        .zip(positions)
        .map(|(idx, &pos)| {
            idx.map(|i| blocks[i].state()).ok_or_else(|| {
                StrainHapError::invalid_data(format!("no haplotype block covers position {}", pos))
            })
        })
        .collect()
}
