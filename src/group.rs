use std::collections::BTreeMap;

use crate::checksum::{CHECKSUM_TOKEN_INDEX, extract_checksum};
use crate::error::ReportError;
use crate::payload::{MutantResult, ReportPayload};
use crate::report::{AggregatedReport, FileReportDetails, MutatorDetail};

/// Outcome list an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Escaped,
    Killed,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Escaped => "escaped",
            Category::Killed => "killed",
        }
    }
}

/// Group the mutants of one payload by source file.
///
/// Stats are copied verbatim. Fails on the first entry whose process output
/// carries no checksum; no partial report is returned.
pub fn group(payload: &ReportPayload) -> Result<AggregatedReport, ReportError> {
    let mut files: BTreeMap<String, FileReportDetails> = BTreeMap::new();

    for (category, entries) in [
        (Category::Escaped, &payload.escaped),
        (Category::Killed, &payload.killed),
    ] {
        for (index, entry) in entries.iter().enumerate() {
            let detail = to_detail(category, index, entry)?;
            let bucket = files
                .entry(entry.metadata.original_file_path.clone())
                .or_default();

            match category {
                Category::Escaped => bucket.escaped.push(detail),
                Category::Killed => bucket.killed.push(detail),
            }
        }
    }

    Ok(AggregatedReport {
        stats: payload.stats.clone(),
        files,
    })
}

fn to_detail(
    category: Category,
    index: usize,
    entry: &MutantResult,
) -> Result<MutatorDetail, ReportError> {
    let checksum =
        extract_checksum(&entry.process_output).map_err(|e| ReportError::OutOfRange {
            category: category.label(),
            index,
            tokens: e.tokens,
            wanted: CHECKSUM_TOKEN_INDEX,
            output: entry.process_output.clone(),
        })?;

    Ok(MutatorDetail {
        mutator_name: entry.metadata.mutator_name.clone(),
        diff: entry.diff.clone(),
        checksum: checksum.to_string(),
    })
}
