use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact.
pub struct Payload {
    pub kernel: &'static str,
    pub params: Value,
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    lib_version: &'static str,
    callsite: Callsite,
    kernel: &'a str,
    params: &'a Value,
    outputs: Vec<String>,
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: &Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    let caller = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        lib_version: iou_sort::VERSION,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        kernel: payload.kernel,
        params: &payload.params,
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then runtime `GIT_COMMIT`, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_replaces_extension() {
        let derived = sidecar_path(Path::new("/tmp/out/idx.parquet"));
        assert_eq!(derived, Path::new("/tmp/out/idx.provenance.json"));
    }

    #[test]
    fn sidecar_records_kernel_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("idx.csv");
        fs::write(&artifact, "instance\n").unwrap();
        let payload = Payload {
            kernel: "diff_iou_rotated_sort_vertices_forward",
            params: json!({"instances": 3}),
        };
        let path = write_sidecar(&artifact, &payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["kernel"], payload.kernel);
        assert_eq!(parsed["params"]["instances"], 3);
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
    }
}
