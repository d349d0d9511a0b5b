//! Batched drivers over flat `[n, 24, 2]` / `[n, 24]` buffers.
//!
//! - `sort_batch_par`: one instance per rayon task, disjoint output rows.
//! - `sort_batch_seq`: strictly sequential in batch order; the golden reference.
//!
//! Both call `sort::sort_instance` on identical inputs, so their rows are
//! bit-identical. Diagnostics are assembled sequentially after the map.

use rayon::prelude::*;

use crate::harness::KernelError;
use crate::sort::{
    sort_instance, Candidates, SortCfg, SortOutcome, MAX_NUM_VERT_IDX, NUM_CANDIDATES,
};

/// Borrowed batch of whole instances.
///
/// Invariant: `mask.len() == 24 * n`, `xy.len() == 2 * mask.len()`, and `num_valid`
/// (when present) holds `n` entries.
#[derive(Clone, Copy, Debug)]
pub struct BatchView<'a> {
    xy: &'a [f32],
    mask: &'a [bool],
    num_valid: Option<&'a [i32]>,
}

impl<'a> BatchView<'a> {
    pub fn new(
        xy: &'a [f32],
        mask: &'a [bool],
        num_valid: Option<&'a [i32]>,
    ) -> Result<Self, KernelError> {
        if mask.len() % NUM_CANDIDATES != 0 {
            return Err(KernelError::RaggedBatch {
                tensor: "mask",
                len: mask.len(),
                row: NUM_CANDIDATES,
            });
        }
        if xy.len() != 2 * mask.len() {
            return Err(KernelError::Storage {
                tensor: "vertices",
                numel: 2 * mask.len(),
                len: xy.len(),
            });
        }
        let n = mask.len() / NUM_CANDIDATES;
        if let Some(nv) = num_valid {
            if nv.len() != n {
                return Err(KernelError::Storage {
                    tensor: "num_valid",
                    numel: n,
                    len: nv.len(),
                });
            }
        }
        Ok(Self {
            xy,
            mask,
            num_valid,
        })
    }

    #[inline]
    pub fn instances(&self) -> usize {
        self.mask.len() / NUM_CANDIDATES
    }
}

/// Instances worth reporting after a batch run.
///
/// Degenerate instances are expected (disjoint boxes) and do not make a batch unclean.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortDiagnostics {
    /// Fewer than 3 valid candidates.
    pub degenerate: Vec<usize>,
    /// More than 8 valid candidates; the row was truncated.
    pub over_capacity: Vec<usize>,
    /// `num_valid` disagreed with the mask.
    pub count_mismatch: Vec<usize>,
}

impl SortDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.over_capacity.is_empty() && self.count_mismatch.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedBatch {
    /// Row-major `[n, 9]`.
    pub idx: Vec<i32>,
    pub diagnostics: SortDiagnostics,
}

pub fn sort_batch_par(batch: BatchView<'_>, cfg: &SortCfg) -> SortedBatch {
    let mut idx = vec![0i32; batch.instances() * MAX_NUM_VERT_IDX];
    let outcomes: Vec<SortOutcome> = idx
        .par_chunks_mut(MAX_NUM_VERT_IDX)
        .zip(batch.xy.par_chunks(2 * NUM_CANDIDATES))
        .zip(batch.mask.par_chunks(NUM_CANDIDATES))
        .map(|((out, xy), mask)| write_row(out, xy, mask, cfg))
        .collect();
    finish(idx, &outcomes, batch.num_valid, cfg)
}

pub fn sort_batch_seq(batch: BatchView<'_>, cfg: &SortCfg) -> SortedBatch {
    let mut idx = vec![0i32; batch.instances() * MAX_NUM_VERT_IDX];
    let outcomes: Vec<SortOutcome> = idx
        .chunks_mut(MAX_NUM_VERT_IDX)
        .zip(batch.xy.chunks(2 * NUM_CANDIDATES))
        .zip(batch.mask.chunks(NUM_CANDIDATES))
        .map(|((out, xy), mask)| write_row(out, xy, mask, cfg))
        .collect();
    finish(idx, &outcomes, batch.num_valid, cfg)
}

/// Cost estimate: worst-case comparator work per instance, `valid²`.
pub fn theory_ops(mask: &[bool]) -> u64 {
    mask.chunks(NUM_CANDIDATES)
        .map(|m| {
            let v = m.iter().filter(|&&b| b).count() as u64;
            v * v
        })
        .sum()
}

#[inline]
fn write_row(out: &mut [i32], xy: &[f32], mask: &[bool], cfg: &SortCfg) -> SortOutcome {
    let s = sort_instance(Candidates::new(xy, mask), cfg);
    out.copy_from_slice(&s.idx);
    s
}

fn finish(
    idx: Vec<i32>,
    outcomes: &[SortOutcome],
    num_valid: Option<&[i32]>,
    cfg: &SortCfg,
) -> SortedBatch {
    let mut d = SortDiagnostics::default();
    for (i, o) in outcomes.iter().enumerate() {
        if o.is_degenerate() {
            d.degenerate.push(i);
        }
        if o.is_truncated() {
            d.over_capacity.push(i);
        }
        if let Some(&reported) = num_valid.and_then(|nv| nv.get(i)) {
            if i64::from(reported) != o.valid as i64 {
                d.count_mismatch.push(i);
            }
        }
    }
    tracing::debug!(
        instances = outcomes.len(),
        degenerate = d.degenerate.len(),
        "sort_vertices_batch"
    );
    if cfg.diagnostics && !d.is_clean() {
        tracing::warn!(
            over_capacity = d.over_capacity.len(),
            count_mismatch = d.count_mismatch.len(),
            first_over_capacity = ?d.over_capacity.first(),
            first_count_mismatch = ?d.count_mismatch.first(),
            "sort_vertices_unclean_batch"
        );
    }
    SortedBatch {
        idx,
        diagnostics: d,
    }
}
