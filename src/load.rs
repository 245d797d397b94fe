use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::ReportError;
use crate::payload::ReportPayload;

/// Default upper bound on a single report file.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// Resource bounds applied while reading reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_input_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Parse a report payload from raw JSON bytes.
pub fn read_report_bytes(bytes: &[u8]) -> Result<ReportPayload, ReportError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ReportError::MalformedInput(format!("invalid JSON format: {e}")))
}

/// Read and parse one report file.
pub fn read_report(path: &Path, limits: Limits) -> Result<ReportPayload, ReportError> {
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ReportError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ReportError::io(path, e)),
    };

    if meta.len() > limits.max_input_bytes {
        return Err(ReportError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            limit: limits.max_input_bytes,
        });
    }

    let bytes = fs::read(path).map_err(|e| ReportError::io(path, e))?;
    read_report_bytes(&bytes).map_err(|e| match e {
        ReportError::MalformedInput(msg) => {
            ReportError::MalformedInput(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Read every path in order, stopping at the first failure.
pub fn read_reports(paths: &[PathBuf], limits: Limits) -> Result<Vec<ReportPayload>, ReportError> {
    paths.iter().map(|p| read_report(p, limits)).collect()
}

/// Resolve an input path to the report files it names.
///
/// A file is returned as is. A directory is walked recursively (honoring
/// `.gitignore`) for `*.json` files, returned sorted by path. Walked files
/// that resolve to one of `exclude` (the tool's own outputs) are skipped.
pub fn discover_reports(root: &Path, exclude: &[PathBuf]) -> Result<Vec<PathBuf>, ReportError> {
    let meta = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ReportError::NotFound(root.to_path_buf()));
        }
        Err(e) => return Err(ReportError::io(root, e)),
    };

    if !meta.is_dir() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excluded: Vec<PathBuf> = exclude
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect();

    let mut builder = WalkBuilder::new(root);
    builder.hidden(true);
    builder.git_ignore(true);
    builder.follow_links(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|e| {
            ReportError::io(
                root,
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;

        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if fs::canonicalize(path).is_ok_and(|c| excluded.contains(&c)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Expand every input (file or directory) into report files, keeping input order.
pub fn discover_all(inputs: &[PathBuf], exclude: &[PathBuf]) -> Result<Vec<PathBuf>, ReportError> {
    let mut files = Vec::new();
    for input in inputs {
        files.extend(discover_reports(input, exclude)?);
    }
    Ok(files)
}
