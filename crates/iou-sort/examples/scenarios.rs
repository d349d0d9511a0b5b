//! Print sorted index rows for a few synthetic box-pair instances.
//!
//! Usage:
//!   cargo run -p iou-sort --example scenarios -- 8

use iou_sort::prelude::*;

fn main() {
    let n = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5usize);
    let cfg = CandidateCfg {
        vertex_count: VertexCount::Uniform { min: 0, max: 9 },
        ..CandidateCfg::default()
    };
    for i in 0..n {
        let row = draw_row(cfg, ReplayToken { seed: 2025, index: i as u64 });
        let out = sort_instance(Candidates::new(&row.xy, &row.mask), &SortCfg::default());
        println!("instance {i}: valid={} idx={:?}", out.valid, out.idx);
    }
}
