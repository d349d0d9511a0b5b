use super::*;
use crate::gen::{draw_rows, CandidateCfg, VertexCount};

fn zeros_input(lead: &[usize]) -> SortVerticesInput {
    let n: usize = lead.iter().product();
    let mut vs = lead.to_vec();
    vs.extend([NUM_CANDIDATES, 2]);
    let mut ms = lead.to_vec();
    ms.push(NUM_CANDIDATES);
    SortVerticesInput::new(
        Tensor::f32(vs, vec![0.0; n * NUM_CANDIDATES * 2]),
        Tensor::bool(ms, vec![false; n * NUM_CANDIDATES]),
    )
}

#[test]
fn accepts_batched_leading_dims() {
    let input = zeros_input(&[2, 3]);
    let k = SortVerticesKernel::default();
    k.param_check(&input).unwrap();
    let out = k.compute(&input).unwrap();
    assert_eq!(out.idx.shape(), &[2, 3, MAX_NUM_VERT_IDX]);
    assert_eq!(out.idx.as_i32().unwrap(), &[0; 6 * MAX_NUM_VERT_IDX][..]);
    assert_eq!(out.diagnostics.degenerate, (0..6).collect::<Vec<_>>());
}

#[test]
fn empty_batch_is_fine() {
    let input = zeros_input(&[0]);
    let (report, _) = run_case(&SortVerticesKernel::default(), &input).unwrap();
    assert!(report.agrees());
    assert_eq!(report.instances, 0);
    assert_eq!(report.theory_ops, 0);
}

#[test]
fn rejects_non_float_vertices() {
    let mut input = zeros_input(&[1]);
    input.vertices = Tensor::i32(vec![1, NUM_CANDIDATES, 2], vec![0; 48]);
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert!(matches!(err, KernelError::DType { tensor: "vertices", .. }));
}

#[test]
fn rejects_wrong_trailing_shape() {
    let mut input = zeros_input(&[2]);
    input.vertices = Tensor::f32(vec![2, NUM_CANDIDATES, 3], vec![0.0; 2 * 72]);
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert!(matches!(err, KernelError::Shape { tensor: "vertices", .. }));
    assert!(err.to_string().contains("[.., 24, 2]"));
}

#[test]
fn rejects_mask_batch_mismatch() {
    let mut input = zeros_input(&[2]);
    input.mask = Tensor::bool(vec![3, NUM_CANDIDATES], vec![false; 72]);
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert_eq!(
        err,
        KernelError::BatchMismatch {
            tensor: "mask",
            expected: vec![2],
            got: vec![3],
        }
    );
}

#[test]
fn rejects_non_boolean_masks() {
    let mut input = zeros_input(&[1]);
    input.mask = Tensor::f32(vec![1, NUM_CANDIDATES], vec![0.0; NUM_CANDIDATES]);
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert!(matches!(err, KernelError::DType { tensor: "mask", .. }));

    let mut bytes = vec![0u8; NUM_CANDIDATES];
    bytes[7] = 2;
    input.mask = Tensor::u8(vec![1, NUM_CANDIDATES], bytes);
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert_eq!(err, KernelError::NonBooleanMask { offset: 7, value: 2 });
}

#[test]
fn rejects_short_storage() {
    let mut input = zeros_input(&[2]);
    input.vertices = Tensor::f32(vec![2, NUM_CANDIDATES, 2], vec![0.0; 50]);
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert_eq!(
        err,
        KernelError::Storage {
            tensor: "vertices",
            numel: 96,
            len: 50,
        }
    );
}

#[test]
fn compute_never_writes_rows_past_short_vertices() {
    let mut mask = vec![false; 2 * NUM_CANDIDATES];
    mask[NUM_CANDIDATES..NUM_CANDIDATES + 3].fill(true);
    let input = SortVerticesInput::new(
        Tensor::f32(vec![2, NUM_CANDIDATES, 2], vec![0.0; 2 * NUM_CANDIDATES]),
        Tensor::bool(vec![2, NUM_CANDIDATES], mask),
    );
    let k = SortVerticesKernel::default();
    assert!(matches!(
        k.compute(&input),
        Err(KernelError::Storage { tensor: "vertices", .. })
    ));
    assert!(k.reference_compute(&input).is_err());
}

#[test]
fn rejects_output_width() {
    let input = zeros_input(&[4]).with_output(TensorDesc::new(DType::I32, vec![4, 8]));
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert_eq!(
        err,
        KernelError::OutputShape {
            expected: vec![4, MAX_NUM_VERT_IDX],
            got: vec![4, 8],
        }
    );
    assert!(SortVerticesKernel::default().compute(&input).is_err());
    assert_eq!(SortVerticesKernel::default().theory_ops(&input), 0);
}

#[test]
fn rejects_num_valid_shape() {
    let input = zeros_input(&[4]).with_num_valid(Tensor::i32(vec![5], vec![0; 5]));
    let err = SortVerticesKernel::default().param_check(&input).unwrap_err();
    assert!(matches!(err, KernelError::BatchMismatch { tensor: "num_valid", .. }));
}

#[test]
fn u8_mask_matches_bool_mask() {
    let rows = draw_rows(CandidateCfg::default(), 5, 64);
    let bytes: Vec<u8> = rows.mask.iter().map(|&m| u8::from(m)).collect();
    let as_bool = rows.into_input();
    let mut as_u8 = as_bool.clone();
    as_u8.mask = Tensor::u8(as_bool.mask.shape().to_vec(), bytes);
    let k = SortVerticesKernel::default();
    assert_eq!(k.compute(&as_bool).unwrap(), k.compute(&as_u8).unwrap());
}

#[test]
fn run_case_agrees_on_generated_batch() {
    let cfg = CandidateCfg {
        vertex_count: VertexCount::Uniform { min: 0, max: 12 },
        ..CandidateCfg::default()
    };
    let input = draw_rows(cfg, 2024, 1000).into_input();
    let k = SortVerticesKernel::new(SortCfg {
        diagnostics: true,
        ..SortCfg::default()
    });
    let (report, out) = run_case(&k, &input).unwrap();
    assert!(report.agrees());
    assert_eq!(report.kernel, "diff_iou_rotated_sort_vertices_forward");
    assert_eq!(report.instances, 1000);
    assert!(report.theory_ops > 0);
    assert_eq!(out, k.reference_compute(&input).unwrap());
}

#[test]
fn golden_mismatch_reports_first_row() {
    let a = vec![0; 3 * MAX_NUM_VERT_IDX];
    let mut b = a.clone();
    b[MAX_NUM_VERT_IDX + 4] = 1;
    assert_eq!(first_row_mismatch(&a, &a), None);
    assert_eq!(first_row_mismatch(&a, &b), Some(1));
    assert_eq!(first_row_mismatch(&a, &a[..MAX_NUM_VERT_IDX]), Some(1));
}
