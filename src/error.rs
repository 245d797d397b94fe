use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, aggregating or rendering a report.
///
/// Every variant is fatal for the run: nothing is rendered once one is raised.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Input is not valid JSON, or the merge configuration cannot be satisfied.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Checksum extraction addressed a token past the end of the split output.
    #[error(
        "{category} entry #{index}: process output has {tokens} space-separated token(s), \
         checksum expected at index {wanted}: {output:?}"
    )]
    OutOfRange {
        category: &'static str,
        index: usize,
        tokens: usize,
        wanted: usize,
        output: String,
    },

    /// An error raised while grouping one report of a merge.
    #[error("in report #{position}")]
    InReport {
        /// Zero-based position in the merged report list.
        position: usize,
        #[source]
        source: Box<ReportError>,
    },

    /// A referenced input path does not exist.
    #[error("report not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input file exceeds the configured size bound.
    #[error("report {} is {size} bytes, limit is {limit}", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Template cannot be used for rendering.
    #[error("template error: {0}")]
    Template(String),

    /// Underlying filesystem operation failed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
