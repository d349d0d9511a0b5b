//! Minimal owned tensors for the kernel harness: a shape plus typed, row-major storage.
//!
//! Tensors do not validate themselves on construction; `harness::Kernel::param_check`
//! owns every shape/dtype/storage precondition so that rejections carry context.

use std::borrow::Cow;
use std::fmt;

/// Element type of a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    Bool,
    U8,
    I32,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::F32 => "f32",
            DType::Bool => "bool",
            DType::U8 => "u8",
            DType::I32 => "i32",
        };
        f.write_str(s)
    }
}

/// Typed storage.
#[derive(Clone, Debug, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    Bool(Vec<bool>),
    U8(Vec<u8>),
    I32(Vec<i32>),
}

impl TensorData {
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::F32(_) => DType::F32,
            TensorData::Bool(_) => DType::Bool,
            TensorData::U8(_) => DType::U8,
            TensorData::I32(_) => DType::I32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::F32(v) => v.len(),
            TensorData::Bool(v) => v.len(),
            TensorData::U8(v) => v.len(),
            TensorData::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shape and dtype without storage (what a harness declares for an output buffer).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorDesc {
    pub dtype: DType,
    pub shape: Vec<usize>,
}

impl TensorDesc {
    pub fn new(dtype: DType, shape: Vec<usize>) -> Self {
        Self { dtype, shape }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: TensorData) -> Self {
        Self { shape, data }
    }

    pub fn f32(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self::new(shape, TensorData::F32(data))
    }

    pub fn bool(shape: Vec<usize>, data: Vec<bool>) -> Self {
        Self::new(shape, TensorData::Bool(data))
    }

    pub fn u8(shape: Vec<usize>, data: Vec<u8>) -> Self {
        Self::new(shape, TensorData::U8(data))
    }

    pub fn i32(shape: Vec<usize>, data: Vec<i32>) -> Self {
        Self::new(shape, TensorData::I32(data))
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    #[inline]
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::F32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<&[i32]> {
        match &self.data {
            TensorData::I32(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean view: borrowed for `Bool`, converted (`!= 0`) for `U8`, `None` otherwise.
    pub fn to_mask(&self) -> Option<Cow<'_, [bool]>> {
        match &self.data {
            TensorData::Bool(v) => Some(Cow::Borrowed(v.as_slice())),
            TensorData::U8(v) => Some(Cow::Owned(v.iter().map(|&b| b != 0).collect())),
            _ => None,
        }
    }
}
