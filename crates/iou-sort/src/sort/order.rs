use super::compare::{AngularComparator, Polar};
use super::filter::ValidSet;
use super::types::{Candidates, INTERSECTION_OFFSET, NUM_CANDIDATES};

/// CCW sequence of valid slots, starting at the smallest angle.
///
/// Invariant: `len <= INTERSECTION_OFFSET`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexOrder {
    slots: [usize; INTERSECTION_OFFSET],
    len: usize,
}

impl VertexOrder {
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.slots[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.as_slice().first().copied()
    }
}

/// Sort the valid slots with `cmp`, keeping the first `INTERSECTION_OFFSET`.
pub fn order_vertices(
    c: &Candidates<'_>,
    valid: &ValidSet,
    cmp: &AngularComparator,
) -> VertexOrder {
    let mut buf = [Polar::default(); NUM_CANDIDATES];
    for (e, &k) in buf.iter_mut().zip(valid.as_slice()) {
        *e = cmp.polar(c, k);
    }
    let entries = &mut buf[..valid.len()];
    cmp.rank(entries);

    let mut slots = [0usize; INTERSECTION_OFFSET];
    for (s, e) in slots.iter_mut().zip(entries.iter()) {
        *s = e.slot;
    }
    let len = entries.len().min(INTERSECTION_OFFSET);
    VertexOrder { slots, len }
}
