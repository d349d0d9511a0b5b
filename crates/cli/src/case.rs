//! Case files (JSON) and index tables (CSV/Parquet).

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use iou_sort::gen::Rows;
use iou_sort::prelude::*;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One batch of sort-vertices inputs, optionally with golden rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    /// Leading (instance) dimensions; vertices are `shape + [24, 2]`.
    pub shape: Vec<usize>,
    pub vertices: Vec<f32>,
    pub mask: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_valid: Option<Vec<i32>>,
    /// Golden `[.., 9]` rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<i32>>,
}

impl CaseFile {
    pub fn from_rows(rows: Rows) -> Self {
        Self {
            shape: vec![rows.instances()],
            vertices: rows.xy,
            mask: rows.mask,
            num_valid: Some(rows.num_valid),
            expected: None,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        fs::write(path, serde_json::to_vec(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }

    pub fn to_input(&self) -> SortVerticesInput {
        let mut vs = self.shape.clone();
        vs.extend([NUM_CANDIDATES, 2]);
        let mut ms = self.shape.clone();
        ms.push(NUM_CANDIDATES);
        let input = SortVerticesInput::new(
            Tensor::f32(vs, self.vertices.clone()),
            Tensor::bool(ms, self.mask.clone()),
        );
        match &self.num_valid {
            Some(nv) => input.with_num_valid(Tensor::i32(self.shape.clone(), nv.clone())),
            None => input,
        }
    }
}

/// `instance, v0..v7, count` table from flat `[n, 9]` rows.
pub fn index_table(idx: &[i32]) -> Result<DataFrame> {
    let rows: Vec<&[i32]> = idx.chunks(MAX_NUM_VERT_IDX).collect();
    let mut cols = Vec::with_capacity(MAX_NUM_VERT_IDX + 1);
    cols.push(Series::new(
        "instance".into(),
        (0..rows.len() as u32).collect::<Vec<u32>>(),
    ));
    for j in 0..INTERSECTION_OFFSET {
        let col: Vec<i32> = rows.iter().map(|r| r[j]).collect();
        cols.push(Series::new(format!("v{j}").into(), col));
    }
    let counts: Vec<i32> = rows.iter().map(|r| r[INTERSECTION_OFFSET]).collect();
    cols.push(Series::new("count".into(), counts));
    Ok(DataFrame::new(cols)?)
}

/// Instances per vertex count, ascending by count.
pub fn count_histogram(df: &DataFrame) -> Result<DataFrame> {
    let hist = df
        .clone()
        .lazy()
        .group_by([col("count")])
        .agg([col("instance").count().alias("instances")])
        .sort(["count"], Default::default())
        .collect()?;
    Ok(hist)
}

/// Write by extension: `.csv` or `.parquet`.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match ext {
        "csv" => CsvWriter::new(&mut file).include_header(true).finish(df)?,
        "parquet" => {
            ParquetWriter::new(file).finish(df)?;
        }
        other => bail!("unsupported table extension {other:?} (use .csv or .parquet)"),
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    Ok(())
}
