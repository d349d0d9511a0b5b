//! Angular comparator around the instance centroid.
//!
//! Order, encoded as one strict total order (`OrderKey`):
//! 1. CCW angle from +x in [0, 2π). The half-plane bucket comes first (upper half is
//!    `y > 0`, or `y == 0` with `x >= 0`), then a trig-free pseudo-angle inside it.
//! 2. Angles within eps (`|sin Δθ| < eps` and same direction) tie; closer to the
//!    centroid comes first.
//! 3. Distances within eps tie; the lower slot index comes first.
//!
//! Near-equality is chained between neighbours of the exact order, so tie classes
//! stay well defined where the eps relation itself is not transitive.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::types::Candidates;

/// Primary angular key: half-plane bucket plus pseudo-angle in [0, 2) inside it.
///
/// The pseudo-angle `1 ∓ x / (|x| + |y|)` is monotone in the true angle on each
/// half, so comparing keys orders exactly like `atan2` without calling it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleKey {
    pub half: u8,
    pub pseudo: f64,
}

impl AngleKey {
    pub fn of(v: Vector2<f64>) -> Self {
        let upper = v.y > 0.0 || (v.y == 0.0 && v.x >= 0.0);
        let l1 = v.x.abs() + v.y.abs();
        // The zero vector sits on the reference axis.
        let p = if l1 > 0.0 { v.x / l1 } else { 1.0 };
        if upper {
            Self {
                half: 0,
                pseudo: 1.0 - p,
            }
        } else {
            Self {
                half: 1,
                pseudo: 1.0 + p,
            }
        }
    }

    #[inline]
    pub fn cmp_exact(&self, other: &Self) -> Ordering {
        self.half
            .cmp(&other.half)
            .then(self.pseudo.total_cmp(&other.pseudo))
    }
}

/// Final sort key. Unique per slot, so any sort algorithm yields the same sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    pub angle_class: usize,
    pub dist_class: usize,
    pub slot: usize,
}

/// One valid candidate expressed relative to the centroid.
#[derive(Clone, Copy, Debug)]
pub struct Polar {
    pub slot: usize,
    pub offset: Vector2<f64>,
    pub angle: AngleKey,
    pub dist: f64,
    pub key: OrderKey,
}

impl Default for Polar {
    fn default() -> Self {
        Self {
            slot: 0,
            offset: Vector2::zeros(),
            angle: AngleKey::of(Vector2::zeros()),
            dist: 0.0,
            key: OrderKey::default(),
        }
    }
}

/// Comparator parameterized by the instance centroid.
#[derive(Clone, Copy, Debug)]
pub struct AngularComparator {
    centroid: Vector2<f64>,
    eps: f64,
}

impl AngularComparator {
    #[inline]
    pub fn new(centroid: Vector2<f64>, eps: f64) -> Self {
        Self { centroid, eps }
    }

    pub fn polar(&self, c: &Candidates<'_>, slot: usize) -> Polar {
        let offset = c.point(slot) - self.centroid;
        Polar {
            slot,
            offset,
            angle: AngleKey::of(offset),
            dist: offset.norm(),
            key: OrderKey::default(),
        }
    }

    /// Same direction up to eps. Scale-free: compares `sin Δθ`, not the raw cross product.
    pub fn angle_tie(&self, a: &Polar, b: &Polar) -> bool {
        if a.dist == 0.0 || b.dist == 0.0 {
            return a.dist == b.dist;
        }
        let (u, v) = (a.offset, b.offset);
        let cross = u.x * v.y - u.y * v.x;
        u.dot(&v) > 0.0 && cross.abs() < self.eps * a.dist * b.dist
    }

    #[inline]
    pub fn dist_tie(&self, a: &Polar, b: &Polar) -> bool {
        (a.dist - b.dist).abs() < self.eps
    }

    /// Assign each entry its `OrderKey` and leave `entries` sorted by it.
    pub fn rank(&self, entries: &mut [Polar]) {
        if entries.is_empty() {
            return;
        }
        entries.sort_unstable_by(|a, b| {
            a.angle
                .cmp_exact(&b.angle)
                .then(a.dist.total_cmp(&b.dist))
                .then(a.slot.cmp(&b.slot))
        });
        entries[0].key.angle_class = 0;
        for k in 1..entries.len() {
            let tie = self.angle_tie(&entries[k - 1], &entries[k]);
            let prev = entries[k - 1].key.angle_class;
            entries[k].key.angle_class = if tie { prev } else { prev + 1 };
        }

        entries.sort_unstable_by(|a, b| {
            a.key
                .angle_class
                .cmp(&b.key.angle_class)
                .then(a.dist.total_cmp(&b.dist))
                .then(a.slot.cmp(&b.slot))
        });
        entries[0].key.dist_class = 0;
        entries[0].key.slot = entries[0].slot;
        for k in 1..entries.len() {
            let tie = entries[k - 1].key.angle_class == entries[k].key.angle_class
                && self.dist_tie(&entries[k - 1], &entries[k]);
            let prev = entries[k - 1].key.dist_class;
            entries[k].key.dist_class = if tie { prev } else { prev + 1 };
            entries[k].key.slot = entries[k].slot;
        }

        entries.sort_unstable_by_key(|p| p.key);
    }
}
