//! Per-instance vertex sorting for rotated-box intersection polygons.
//!
//! Purpose
//! - Turn 24 candidate points plus a validity mask into a CCW index row of width 9:
//!   eight vertex slots (padded with the first ordered index) and the count.
//!
//! Pipeline (strictly forward)
//! - `filter::ValidSet` → `centroid::centroid` → `compare::AngularComparator`
//!   → `order::order_vertices` → `pack::pack`.
//!
//! Conventions
//! - Fewer than 3 valid points: count is written as-is, every index slot holds the
//!   first valid slot (0 when none is valid).
//! - More than 8 valid points: the first 8 in angular order are kept, the count slot
//!   says 8.
//! - The sequence starts at the smallest angle from +x around the centroid.
//!
//! Code cross-refs: `crate::batch` (parallel and sequential drivers).

pub mod centroid;
pub mod compare;
pub mod filter;
pub mod order;
pub mod pack;
mod types;

pub use centroid::centroid;
pub use compare::{AngleKey, AngularComparator, OrderKey, Polar};
pub use filter::ValidSet;
pub use order::{order_vertices, VertexOrder};
pub use pack::pack;
pub use types::{
    Candidates, OrderedIdx, SortCfg, EPSILON, INTERSECTION_OFFSET, MAX_NUM_VERT_IDX,
    NUM_CANDIDATES,
};

/// Packed row plus the raw mask count it was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOutcome {
    pub idx: OrderedIdx,
    pub valid: usize,
}

impl SortOutcome {
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.valid < 3
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.valid > INTERSECTION_OFFSET
    }
}

/// Sort one instance. Total over well-formed rows; never fails.
pub fn sort_instance(c: Candidates<'_>, cfg: &SortCfg) -> SortOutcome {
    let valid = ValidSet::from_mask(c.mask());
    let center = centroid(&c, &valid).filter(|_| !valid.is_degenerate());
    let idx = match center {
        Some(center) => {
            let cmp = AngularComparator::new(center, cfg.eps);
            let order = order_vertices(&c, &valid, &cmp);
            pack(order.as_slice(), order.len(), order.first().unwrap_or(0))
        }
        None => pack(&[], valid.len(), valid.first().unwrap_or(0)),
    };
    SortOutcome {
        idx,
        valid: valid.len(),
    }
}
