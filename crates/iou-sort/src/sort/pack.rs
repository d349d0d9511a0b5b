use super::types::{OrderedIdx, INTERSECTION_OFFSET, MAX_NUM_VERT_IDX};

/// Write `seq` into the index slots, pad the rest with `pad`, and store `count`.
///
/// `seq` longer than `INTERSECTION_OFFSET` is cut; the count slot is always last.
pub fn pack(seq: &[usize], count: usize, pad: usize) -> OrderedIdx {
    let mut out = [pad as i32; MAX_NUM_VERT_IDX];
    for (o, &s) in out[..INTERSECTION_OFFSET].iter_mut().zip(seq) {
        *o = s as i32;
    }
    out[INTERSECTION_OFFSET] = count as i32;
    out
}
