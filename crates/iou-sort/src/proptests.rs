//! Property suite over synthetic convex rows.
//!
//! - closure: index slots only name valid slots (or 0 on an empty mask)
//! - count: slot 8 is `min(mask count, 8)`
//! - shape: CCW, simple, and a rotation of the generator's parametric order
//! - invariance: rotating and translating every point keeps the cyclic sequence
//! - determinism: repeated runs agree

use nalgebra::{Rotation2, Vector2};
use proptest::prelude::*;

use crate::gen::{draw_row, CandidateCfg, ReplayToken, Row, VertexCount};
use crate::sort::{
    sort_instance, Candidates, OrderedIdx, SortCfg, INTERSECTION_OFFSET, NUM_CANDIDATES,
};

fn sort_row(row: &Row) -> OrderedIdx {
    sort_instance(Candidates::new(&row.xy, &row.mask), &SortCfg::default()).idx
}

fn point(row: &Row, k: usize) -> Vector2<f64> {
    Vector2::new(f64::from(row.xy[2 * k]), f64::from(row.xy[2 * k + 1]))
}

/// `seq` equals `truth` up to a cyclic shift.
fn is_rotation(seq: &[usize], truth: &[usize]) -> bool {
    if seq.len() != truth.len() {
        return false;
    }
    if seq.is_empty() {
        return true;
    }
    truth
        .iter()
        .position(|&t| t == seq[0])
        .is_some_and(|s| (0..seq.len()).all(|k| seq[k] == truth[(s + k) % truth.len()]))
}

fn convex_cfg(n: usize) -> CandidateCfg {
    CandidateCfg {
        vertex_count: VertexCount::Fixed(n),
        ..CandidateCfg::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn closure_and_count(seed in any::<u64>(), index in 0u64..1_000, max in 0usize..=NUM_CANDIDATES) {
        let cfg = CandidateCfg {
            vertex_count: VertexCount::Uniform { min: 0, max },
            ..CandidateCfg::default()
        };
        let row = draw_row(cfg, ReplayToken { seed, index });
        let idx = sort_row(&row);
        let valid = row.mask.iter().filter(|&&m| m).count();
        prop_assert_eq!(idx[INTERSECTION_OFFSET] as usize, valid.min(INTERSECTION_OFFSET));
        for &k in &idx[..INTERSECTION_OFFSET] {
            let k = k as usize;
            prop_assert!(k < NUM_CANDIDATES);
            prop_assert!(row.mask[k] || (valid == 0 && k == 0));
        }
        if valid >= 3 {
            let placed = valid.min(INTERSECTION_OFFSET);
            let mut seen: Vec<i32> = idx[..placed].to_vec();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), placed);
            prop_assert!(idx[placed..INTERSECTION_OFFSET].iter().all(|&k| k == idx[0]));
        }
    }

    #[test]
    fn convex_rows_come_out_ccw(seed in any::<u64>(), index in 0u64..1_000, n in 3usize..=8) {
        let row = draw_row(convex_cfg(n), ReplayToken { seed, index });
        let idx = sort_row(&row);
        let seq: Vec<usize> = idx[..n].iter().map(|&k| k as usize).collect();
        prop_assert!(is_rotation(&seq, &row.ccw), "seq {:?} truth {:?}", seq, row.ccw);
        for k in 0..n {
            let a = point(&row, seq[k]);
            let b = point(&row, seq[(k + 1) % n]);
            let c = point(&row, seq[(k + 2) % n]);
            let (u, v) = (b - a, c - b);
            prop_assert!(u.x * v.y - u.y * v.x > 0.0);
        }
    }

    #[test]
    fn sequence_starts_at_smallest_angle(seed in any::<u64>(), index in 0u64..1_000, n in 3usize..=8) {
        let row = draw_row(convex_cfg(n), ReplayToken { seed, index });
        let idx = sort_row(&row);
        let slots: Vec<usize> = (0..NUM_CANDIDATES).filter(|&k| row.mask[k]).collect();
        let center = slots.iter().map(|&k| point(&row, k)).sum::<Vector2<f64>>() / n as f64;
        let angle = |k: usize| {
            let d = point(&row, k) - center;
            d.y.atan2(d.x).rem_euclid(std::f64::consts::TAU)
        };
        prop_assume!(slots.iter().all(|&k| {
            let a = angle(k);
            a > 1e-6 && a < std::f64::consts::TAU - 1e-6
        }));
        let first = idx[0] as usize;
        prop_assert!(slots.iter().all(|&k| angle(first) <= angle(k)));
    }

    #[test]
    fn rigid_motion_keeps_cyclic_order(
        seed in any::<u64>(),
        index in 0u64..1_000,
        n in 3usize..=8,
        theta in 0.0f64..std::f64::consts::TAU,
        shift in (-3.0f64..3.0, -3.0f64..3.0),
    ) {
        let row = draw_row(convex_cfg(n), ReplayToken { seed, index });
        let rot = Rotation2::new(theta);
        let mut moved = row.clone();
        for k in 0..NUM_CANDIDATES {
            let p = rot * point(&row, k) + Vector2::new(shift.0, shift.1);
            moved.xy[2 * k] = p.x as f32;
            moved.xy[2 * k + 1] = p.y as f32;
        }
        let a: Vec<usize> = sort_row(&row)[..n].iter().map(|&k| k as usize).collect();
        let b: Vec<usize> = sort_row(&moved)[..n].iter().map(|&k| k as usize).collect();
        prop_assert!(is_rotation(&a, &b), "{:?} vs {:?}", a, b);
    }

    #[test]
    fn repeated_runs_agree(seed in any::<u64>(), index in 0u64..1_000) {
        let cfg = CandidateCfg {
            vertex_count: VertexCount::Uniform { min: 0, max: NUM_CANDIDATES },
            ..CandidateCfg::default()
        };
        let row = draw_row(cfg, ReplayToken { seed, index });
        let first = sort_row(&row);
        for _ in 0..4 {
            prop_assert_eq!(sort_row(&row), first);
        }
    }
}
