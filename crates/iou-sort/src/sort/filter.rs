use super::types::NUM_CANDIDATES;

/// Valid slot indices of one instance, in slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidSet {
    slots: [usize; NUM_CANDIDATES],
    len: usize,
}

impl ValidSet {
    /// Scan the mask; entries past `NUM_CANDIDATES` are ignored.
    pub fn from_mask(mask: &[bool]) -> Self {
        let mut slots = [0usize; NUM_CANDIDATES];
        let mut len = 0;
        for (k, &m) in mask.iter().take(NUM_CANDIDATES).enumerate() {
            if m {
                slots[len] = k;
                len += 1;
            }
        }
        Self { slots, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fewer than three points: no proper polygon.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.len < 3
    }

    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.as_slice().first().copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.slots[..self.len]
    }
}
