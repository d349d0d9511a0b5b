//! PyO3 bindings for `iou-sort`.
//!
//! Inputs arrive as nested lists (one entry per instance); NumPy reshaping to
//! `[N, 24, 2]` / `[N, 24]` stays in the Python wrapper.

use iou_sort::prelude::*;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn map_kernel_err(err: KernelError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn flatten(vertices: Vec<Vec<(f32, f32)>>, mask: Vec<Vec<bool>>) -> PyResult<SortVerticesInput> {
    if vertices.len() != mask.len() {
        return Err(PyValueError::new_err(format!(
            "vertices has {} instances, mask has {}",
            vertices.len(),
            mask.len()
        )));
    }
    let n = vertices.len();
    let mut xy = Vec::with_capacity(n * NUM_CANDIDATES * 2);
    let mut flat_mask = Vec::with_capacity(n * NUM_CANDIDATES);
    for (i, (pts, m)) in vertices.into_iter().zip(mask).enumerate() {
        if pts.len() != NUM_CANDIDATES || m.len() != NUM_CANDIDATES {
            return Err(PyValueError::new_err(format!(
                "instance {i}: need {NUM_CANDIDATES} points and mask entries, got {} and {}",
                pts.len(),
                m.len()
            )));
        }
        xy.extend(pts.into_iter().flat_map(|(x, y)| [x, y]));
        flat_mask.extend(m);
    }
    Ok(SortVerticesInput::new(
        Tensor::f32(vec![n, NUM_CANDIDATES, 2], xy),
        Tensor::bool(vec![n, NUM_CANDIDATES], flat_mask),
    ))
}

/// Sort candidate vertices; returns one `[9]` row per instance.
#[pyfunction]
fn sort_vertices(
    vertices: Vec<Vec<(f32, f32)>>,
    mask: Vec<Vec<bool>>,
) -> PyResult<Vec<Vec<i32>>> {
    let input = flatten(vertices, mask)?;
    let out = SortVerticesKernel::default()
        .compute(&input)
        .map_err(map_kernel_err)?;
    let idx = out.idx.as_i32().unwrap_or_default();
    Ok(idx.chunks(MAX_NUM_VERT_IDX).map(<[i32]>::to_vec).collect())
}

/// Cost model: sum over instances of (valid count)^2.
#[pyfunction]
fn theory_ops(mask: Vec<Vec<bool>>) -> u64 {
    mask.iter().map(|m| iou_sort::batch::theory_ops(m)).sum()
}

#[pymodule]
fn iou_sort_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(sort_vertices, m)?)?;
    m.add_function(wrap_pyfunction!(theory_ops, m)?)?;
    m.add("NUM_CANDIDATES", NUM_CANDIDATES)?;
    m.add("MAX_NUM_VERT_IDX", MAX_NUM_VERT_IDX)?;
    Ok(())
}
