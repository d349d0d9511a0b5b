//! Kernel harness surface.
//!
//! Purpose
//! - One trait (`Kernel`) with the four entry points a test/benchmark harness drives:
//!   `param_check`, `compute` (parallel), `reference_compute` (sequential golden), and
//!   `theory_ops` (throughput normalization).
//! - `SortVerticesKernel` implements it for rotated-box vertex sorting over
//!   `[.., 24, 2]` vertices and `[.., 24]` masks; leading dimensions flatten to instances.
//!
//! Error policy
//! - Shape/dtype/storage problems are rejected before any computation (`KernelError`).
//! - Geometry never fails: degenerate and over-capacity rows have defined outputs and
//!   surface only through `SortDiagnostics`.

use std::fmt;

use crate::batch::{sort_batch_par, sort_batch_seq, BatchView, SortDiagnostics, SortedBatch};
use crate::sort::{SortCfg, MAX_NUM_VERT_IDX, NUM_CANDIDATES};
use crate::tensor::{DType, Tensor, TensorData, TensorDesc};

/// Precondition failures surfaced by `Kernel::param_check`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// Tensor has the wrong element type.
    DType {
        tensor: &'static str,
        expected: &'static str,
        got: DType,
    },
    /// Tensor rank or trailing dimensions are wrong.
    Shape {
        tensor: &'static str,
        expected: &'static str,
        got: Vec<usize>,
    },
    /// Leading (instance) dimensions disagree with the vertex tensor.
    BatchMismatch {
        tensor: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    /// Storage length does not match the shape product.
    Storage {
        tensor: &'static str,
        numel: usize,
        len: usize,
    },
    /// Flat buffer length is not a whole number of rows.
    RaggedBatch {
        tensor: &'static str,
        len: usize,
        row: usize,
    },
    /// A `u8` mask element other than 0 or 1.
    NonBooleanMask { offset: usize, value: u8 },
    /// Declared output buffer has the wrong shape (width must be 9).
    OutputShape { expected: Vec<usize>, got: Vec<usize> },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::DType {
                tensor,
                expected,
                got,
            } => write!(f, "{tensor}: expected dtype {expected}, got {got}"),
            KernelError::Shape {
                tensor,
                expected,
                got,
            } => write!(f, "{tensor}: expected shape {expected}, got {got:?}"),
            KernelError::BatchMismatch {
                tensor,
                expected,
                got,
            } => write!(
                f,
                "{tensor}: leading dims {got:?} disagree with vertices {expected:?}"
            ),
            KernelError::Storage { tensor, numel, len } => write!(
                f,
                "{tensor}: shape holds {numel} elements but storage has {len}"
            ),
            KernelError::RaggedBatch { tensor, len, row } => {
                write!(f, "{tensor}: {len} elements is not a multiple of the row width {row}")
            }
            KernelError::NonBooleanMask { offset, value } => {
                write!(f, "mask: element {offset} is {value}, expected 0 or 1")
            }
            KernelError::OutputShape { expected, got } => {
                write!(f, "output: expected shape {expected:?}, got {got:?}")
            }
        }
    }
}

impl std::error::Error for KernelError {}

/// A kernel under test.
pub trait Kernel {
    type Input;
    type Output: Golden;

    fn name(&self) -> &'static str;
    /// Reject malformed inputs before any computation.
    fn param_check(&self, input: &Self::Input) -> Result<(), KernelError>;
    /// Production (parallel) path.
    fn compute(&self, input: &Self::Input) -> Result<Self::Output, KernelError>;
    /// Sequential reference; must agree exactly with `compute`.
    fn reference_compute(&self, input: &Self::Input) -> Result<Self::Output, KernelError>;
    /// Throughput normalization figure. Inputs failing `param_check` count as zero.
    fn theory_ops(&self, input: &Self::Input) -> u64;
}

/// Row-wise exact comparison for golden checks.
pub trait Golden {
    /// Number of instances covered.
    fn instances(&self) -> usize;
    /// Index of the first differing instance, or `None` when identical.
    fn first_mismatch(&self, other: &Self) -> Option<usize>;
}

/// First differing `[9]`-row of two flat index buffers; a length difference counts
/// as a mismatch at the first missing row.
pub fn first_row_mismatch(a: &[i32], b: &[i32]) -> Option<usize> {
    a.chunks(MAX_NUM_VERT_IDX)
        .zip(b.chunks(MAX_NUM_VERT_IDX))
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len()) / MAX_NUM_VERT_IDX))
}

/// Inputs of one sort-vertices invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SortVerticesInput {
    /// `[.., 24, 2]`, f32.
    pub vertices: Tensor,
    /// `[.., 24]`, bool or 0/1 u8.
    pub mask: Tensor,
    /// Optional `[..]` i32 vertex counts reported upstream.
    pub num_valid: Option<Tensor>,
    /// Declared output buffer, `[.., 9]` i32.
    pub output: TensorDesc,
}

impl SortVerticesInput {
    /// Inputs with the output buffer derived from the vertex shape.
    pub fn new(vertices: Tensor, mask: Tensor) -> Self {
        let mut shape = leading_dims(vertices.shape()).to_vec();
        shape.push(MAX_NUM_VERT_IDX);
        Self {
            vertices,
            mask,
            num_valid: None,
            output: TensorDesc::new(DType::I32, shape),
        }
    }

    pub fn with_num_valid(mut self, num_valid: Tensor) -> Self {
        self.num_valid = Some(num_valid);
        self
    }

    pub fn with_output(mut self, output: TensorDesc) -> Self {
        self.output = output;
        self
    }

    /// Flattened instance count.
    pub fn instances(&self) -> usize {
        leading_dims(self.vertices.shape()).iter().product()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SortVerticesOutput {
    /// `[.., 9]` i32.
    pub idx: Tensor,
    pub diagnostics: SortDiagnostics,
}

impl Golden for SortVerticesOutput {
    fn instances(&self) -> usize {
        self.idx.numel() / MAX_NUM_VERT_IDX
    }

    fn first_mismatch(&self, other: &Self) -> Option<usize> {
        match (self.idx.as_i32(), other.idx.as_i32()) {
            (Some(a), Some(b)) => first_row_mismatch(a, b),
            _ => Some(0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SortVerticesKernel {
    pub cfg: SortCfg,
}

impl SortVerticesKernel {
    pub fn new(cfg: SortCfg) -> Self {
        Self { cfg }
    }

    fn run(
        &self,
        input: &SortVerticesInput,
        driver: fn(BatchView<'_>, &SortCfg) -> SortedBatch,
    ) -> Result<SortVerticesOutput, KernelError> {
        self.param_check(input)?;
        let xy = input.vertices.as_f32().ok_or(KernelError::DType {
            tensor: "vertices",
            expected: "f32",
            got: input.vertices.dtype(),
        })?;
        let mask = input.mask.to_mask().ok_or(KernelError::DType {
            tensor: "mask",
            expected: "bool or u8",
            got: input.mask.dtype(),
        })?;
        let num_valid = input.num_valid.as_ref().and_then(Tensor::as_i32);
        let sorted = driver(BatchView::new(xy, &mask, num_valid)?, &self.cfg);
        Ok(SortVerticesOutput {
            idx: Tensor::i32(input.output.shape.clone(), sorted.idx),
            diagnostics: sorted.diagnostics,
        })
    }
}

impl Kernel for SortVerticesKernel {
    type Input = SortVerticesInput;
    type Output = SortVerticesOutput;

    fn name(&self) -> &'static str {
        "diff_iou_rotated_sort_vertices_forward"
    }

    fn param_check(&self, input: &SortVerticesInput) -> Result<(), KernelError> {
        let v = &input.vertices;
        if v.dtype() != DType::F32 {
            return Err(KernelError::DType {
                tensor: "vertices",
                expected: "f32",
                got: v.dtype(),
            });
        }
        let vs = v.shape();
        if vs.len() < 3 || vs[vs.len() - 2..] != [NUM_CANDIDATES, 2] {
            return Err(KernelError::Shape {
                tensor: "vertices",
                expected: "[.., 24, 2]",
                got: vs.to_vec(),
            });
        }
        check_storage("vertices", v)?;
        let lead = leading_dims(vs);

        let m = &input.mask;
        if !matches!(m.dtype(), DType::Bool | DType::U8) {
            return Err(KernelError::DType {
                tensor: "mask",
                expected: "bool or u8",
                got: m.dtype(),
            });
        }
        let ms = m.shape();
        if ms.last() != Some(&NUM_CANDIDATES) {
            return Err(KernelError::Shape {
                tensor: "mask",
                expected: "[.., 24]",
                got: ms.to_vec(),
            });
        }
        if ms[..ms.len() - 1] != *lead {
            return Err(KernelError::BatchMismatch {
                tensor: "mask",
                expected: lead.to_vec(),
                got: ms[..ms.len() - 1].to_vec(),
            });
        }
        check_storage("mask", m)?;
        if let TensorData::U8(bytes) = m.data() {
            if let Some((offset, &value)) = bytes.iter().enumerate().find(|&(_, &b)| b > 1) {
                return Err(KernelError::NonBooleanMask { offset, value });
            }
        }

        if let Some(nv) = &input.num_valid {
            if nv.dtype() != DType::I32 {
                return Err(KernelError::DType {
                    tensor: "num_valid",
                    expected: "i32",
                    got: nv.dtype(),
                });
            }
            if nv.shape() != lead {
                return Err(KernelError::BatchMismatch {
                    tensor: "num_valid",
                    expected: lead.to_vec(),
                    got: nv.shape().to_vec(),
                });
            }
            check_storage("num_valid", nv)?;
        }

        let out = &input.output;
        if out.dtype != DType::I32 {
            return Err(KernelError::DType {
                tensor: "output",
                expected: "i32",
                got: out.dtype,
            });
        }
        let mut expected = lead.to_vec();
        expected.push(MAX_NUM_VERT_IDX);
        if out.shape != expected {
            return Err(KernelError::OutputShape {
                expected,
                got: out.shape.clone(),
            });
        }
        Ok(())
    }

    fn compute(&self, input: &SortVerticesInput) -> Result<SortVerticesOutput, KernelError> {
        self.run(input, sort_batch_par)
    }

    fn reference_compute(
        &self,
        input: &SortVerticesInput,
    ) -> Result<SortVerticesOutput, KernelError> {
        self.run(input, sort_batch_seq)
    }

    fn theory_ops(&self, input: &SortVerticesInput) -> u64 {
        if self.param_check(input).is_err() {
            return 0;
        }
        input
            .mask
            .to_mask()
            .map_or(0, |m| crate::batch::theory_ops(&m))
    }
}

/// Summary of one harness case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseReport {
    pub kernel: &'static str,
    pub instances: usize,
    pub theory_ops: u64,
    /// First instance where `compute` and `reference_compute` disagree.
    pub first_mismatch: Option<usize>,
}

impl CaseReport {
    #[inline]
    pub fn agrees(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Param-check, run both paths, and compare them exactly. Returns the `compute` output
/// alongside the report.
pub fn run_case<K: Kernel>(
    kernel: &K,
    input: &K::Input,
) -> Result<(CaseReport, K::Output), KernelError> {
    kernel.param_check(input)?;
    let out = kernel.compute(input)?;
    let reference = kernel.reference_compute(input)?;
    let report = CaseReport {
        kernel: kernel.name(),
        instances: out.instances(),
        theory_ops: kernel.theory_ops(input),
        first_mismatch: out.first_mismatch(&reference),
    };
    tracing::info!(
        kernel = report.kernel,
        instances = report.instances,
        theory_ops = report.theory_ops,
        first_mismatch = ?report.first_mismatch,
        "case"
    );
    Ok((report, out))
}

#[inline]
fn leading_dims(shape: &[usize]) -> &[usize] {
    &shape[..shape.len().saturating_sub(2)]
}

fn check_storage(tensor: &'static str, t: &Tensor) -> Result<(), KernelError> {
    let (numel, len) = (t.numel(), t.data().len());
    if numel != len {
        return Err(KernelError::Storage { tensor, numel, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
