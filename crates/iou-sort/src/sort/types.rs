//! Fixed buffer widths, tolerances, and the per-instance candidate view.
//!
//! - `NUM_CANDIDATES`, `MAX_NUM_VERT_IDX`, `INTERSECTION_OFFSET`: protocol constants
//!   shared with the upstream intersection stage and the downstream area kernel.
//! - `SortCfg`: centralizes the tie-break epsilon and the diagnostics switch.
//! - `Candidates`: borrowed view over one instance's 24 points and mask.

use nalgebra::Vector2;

/// Candidate slots per box pair: 4 + 4 corners and 16 edge intersections.
pub const NUM_CANDIDATES: usize = 24;
/// Width of one ordered-index row.
pub const MAX_NUM_VERT_IDX: usize = 9;
/// Slot of the vertex count inside an ordered-index row; also the number of index slots.
pub const INTERSECTION_OFFSET: usize = 8;
/// Angle/distance tolerance below which two candidates tie.
pub const EPSILON: f64 = 1e-8;

/// One packed output row: 8 vertex slots followed by the count.
pub type OrderedIdx = [i32; MAX_NUM_VERT_IDX];

/// Sorting configuration.
#[derive(Clone, Copy, Debug)]
pub struct SortCfg {
    /// Tie tolerance for angles (radians, via `sin Δθ`) and centroid distances.
    pub eps: f64,
    /// Log non-clean batches (degenerate, truncated, `num_valid` disagreement).
    pub diagnostics: bool,
}

impl Default for SortCfg {
    fn default() -> Self {
        Self {
            eps: EPSILON,
            diagnostics: false,
        }
    }
}

/// Candidate points and validity mask of one box-pair instance.
///
/// `xy` is the interleaved `[24, 2]` row, `mask` the matching `[24]` row.
#[derive(Clone, Copy, Debug)]
pub struct Candidates<'a> {
    xy: &'a [f32],
    mask: &'a [bool],
}

impl<'a> Candidates<'a> {
    #[inline]
    pub fn new(xy: &'a [f32], mask: &'a [bool]) -> Self {
        debug_assert_eq!(xy.len(), 2 * NUM_CANDIDATES);
        debug_assert_eq!(mask.len(), NUM_CANDIDATES);
        Self { xy, mask }
    }

    /// Point in slot `k`, widened to f64.
    #[inline]
    pub fn point(&self, k: usize) -> Vector2<f64> {
        Vector2::new(f64::from(self.xy[2 * k]), f64::from(self.xy[2 * k + 1]))
    }

    #[inline]
    pub fn mask(&self) -> &'a [bool] {
        self.mask
    }
}
