//! Synthetic candidate rows: convex polygons scattered into random slots.
//!
//! Purpose
//! - Reproducible inputs for property tests, benches and the CLI, without the
//!   rectangle-intersection stage. Valid points are vertices of a strictly convex
//!   polygon; masked-out slots hold junk that must never reach the output.
//!
//! Model
//! - `n` equally spaced angles with bounded jitter (< Δ/2, so the parametric order
//!   survives), placed on a rotated ellipse around a random center.
//! - The vertices go into `n` distinct random slots of the 24.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use std::f64::consts::TAU;

use nalgebra::{Rotation2, Vector2};
use rand::rngs::StdRng;
use rand::{seq::index, Rng, SeedableRng};

use crate::harness::SortVerticesInput;
use crate::sort::NUM_CANDIDATES;
use crate::tensor::Tensor;

/// Valid-vertex count distribution; samples are clamped to `0..=24`.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.min(NUM_CANDIDATES),
            VertexCount::Uniform { min, max } => {
                let lo = min.min(NUM_CANDIDATES);
                let hi = max.clamp(lo, NUM_CANDIDATES);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct CandidateCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.45].
    pub angle_jitter_frac: f64,
    /// Minor/major axis ratio of the ellipse. Clamped to [0.05, 1].
    pub aspect: f64,
    /// Major semi-axis.
    pub radius: f64,
    /// Center drawn uniformly from `[-center_spread, center_spread]²`.
    pub center_spread: f64,
    /// Random ellipse orientation and angular phase?
    pub random_phase: bool,
}

impl Default for CandidateCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 3, max: 8 },
            angle_jitter_frac: 0.3,
            aspect: 0.6,
            radius: 1.0,
            center_spread: 5.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// One drawn instance plus its ground truth.
#[derive(Clone, Debug)]
pub struct Row {
    pub xy: [f32; 2 * NUM_CANDIDATES],
    pub mask: [bool; NUM_CANDIDATES],
    /// Valid slots in CCW parametric order (starting point arbitrary).
    pub ccw: Vec<usize>,
}

/// Flat `[n, 24, 2]` / `[n, 24]` / `[n]` buffers.
#[derive(Clone, Debug, Default)]
pub struct Rows {
    pub xy: Vec<f32>,
    pub mask: Vec<bool>,
    pub num_valid: Vec<i32>,
}

impl Rows {
    pub fn instances(&self) -> usize {
        self.num_valid.len()
    }

    /// Package as a `[n, 24, 2]` kernel input with the `num_valid` side input.
    pub fn into_input(self) -> SortVerticesInput {
        let n = self.instances();
        SortVerticesInput::new(
            Tensor::f32(vec![n, NUM_CANDIDATES, 2], self.xy),
            Tensor::bool(vec![n, NUM_CANDIDATES], self.mask),
        )
        .with_num_valid(Tensor::i32(vec![n], self.num_valid))
    }
}

pub fn draw_row(cfg: CandidateCfg, tok: ReplayToken) -> Row {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.45);
    let r = cfg.radius.max(1e-6);
    let b = r * cfg.aspect.clamp(0.05, 1.0);
    let (phase, rot) = if cfg.random_phase {
        (rng.gen::<f64>() * TAU, Rotation2::new(rng.gen::<f64>() * TAU))
    } else {
        (0.0, Rotation2::identity())
    };
    let s = cfg.center_spread.abs();
    let center = if s > 0.0 {
        Vector2::new(rng.gen_range(-s..=s), rng.gen_range(-s..=s))
    } else {
        Vector2::zeros()
    };

    let delta = TAU / n.max(1) as f64;
    let verts: Vec<Vector2<f64>> = (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let th = phase + k as f64 * delta + jitter;
            center + rot * Vector2::new(r * th.cos(), b * th.sin())
        })
        .collect();

    let mut xy = [0.0f32; 2 * NUM_CANDIDATES];
    for v in xy.iter_mut() {
        *v = (rng.gen::<f64>() * 2.0 - 1.0) as f32 * 50.0;
    }
    let mut mask = [false; NUM_CANDIDATES];
    let slots = index::sample(&mut rng, NUM_CANDIDATES, n).into_vec();
    for (&k, p) in slots.iter().zip(&verts) {
        xy[2 * k] = p.x as f32;
        xy[2 * k + 1] = p.y as f32;
        mask[k] = true;
    }
    Row {
        xy,
        mask,
        ccw: slots,
    }
}

/// Draw `instances` rows with tokens `(seed, 0..instances)`.
pub fn draw_rows(cfg: CandidateCfg, seed: u64, instances: usize) -> Rows {
    let mut out = Rows {
        xy: Vec::with_capacity(instances * 2 * NUM_CANDIDATES),
        mask: Vec::with_capacity(instances * NUM_CANDIDATES),
        num_valid: Vec::with_capacity(instances),
    };
    for i in 0..instances {
        let row = draw_row(
            cfg,
            ReplayToken {
                seed,
                index: i as u64,
            },
        );
        out.xy.extend_from_slice(&row.xy);
        out.mask.extend_from_slice(&row.mask);
        out.num_valid.push(row.ccw.len() as i32);
    }
    out
}
