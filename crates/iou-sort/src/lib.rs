//! Vertex sorting for differentiable rotated-box IoU.
//!
//! Given 24 candidate points per box pair (8 rectangle corners, 16 edge
//! intersections) and a validity mask, produce a `[9]` index row tracing the convex
//! intersection polygon counter-clockwise: 8 vertex slots padded with the first
//! ordered index, then the vertex count. Downstream area code runs a fixed-length
//! shoelace loop over the row.
//!
//! Layout
//! - `sort`: the per-instance pipeline (filter, centroid, comparator, order, pack).
//! - `batch`: rayon-parallel and sequential drivers plus diagnostics.
//! - `harness`: the `Kernel` trait (param check, compute, reference, cost) and the
//!   sort-vertices kernel over batched tensors.
//! - `tensor`: small owned tensors with shape and dtype.
//! - `gen`: reproducible synthetic candidate rows for tests, benches and the CLI.

pub mod batch;
pub mod gen;
pub mod harness;
pub mod sort;
pub mod tensor;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::batch::{sort_batch_par, sort_batch_seq, BatchView, SortDiagnostics};
    pub use crate::gen::{draw_row, draw_rows, CandidateCfg, ReplayToken, VertexCount};
    pub use crate::harness::{
        run_case, CaseReport, Golden, Kernel, KernelError, SortVerticesInput,
        SortVerticesKernel, SortVerticesOutput,
    };
    pub use crate::sort::{
        sort_instance, Candidates, OrderedIdx, SortCfg, EPSILON, INTERSECTION_OFFSET,
        MAX_NUM_VERT_IDX, NUM_CANDIDATES,
    };
    pub use crate::tensor::{DType, Tensor, TensorDesc};
}

#[cfg(test)]
mod proptests;
