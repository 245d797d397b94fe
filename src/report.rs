use std::collections::BTreeMap;

use serde::Serialize;

use crate::payload::Stats;

/// Per-mutant record kept in the rendered report.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MutatorDetail {
    pub mutator_name: String,
    pub diff: String,
    pub checksum: String,
}

/// Escaped and killed mutants of one source file, each in input order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct FileReportDetails {
    pub escaped: Vec<MutatorDetail>,
    pub killed: Vec<MutatorDetail>,
}

impl FileReportDetails {
    /// Append the entries of `other` after the entries already present.
    pub fn extend(&mut self, other: FileReportDetails) {
        self.escaped.extend(other.escaped);
        self.killed.extend(other.killed);
    }
}

/// File-grouped report handed to the renderer.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AggregatedReport {
    /// Global stats of the run, copied from exactly one payload.
    #[serde(rename = "Stats")]
    pub stats: Stats,

    /// Source file path to its mutants, sorted by path.
    #[serde(rename = "ReportDetail")]
    pub files: BTreeMap<String, FileReportDetails>,
}

impl AggregatedReport {
    /// Number of escaped mutants across all files.
    pub fn escaped_total(&self) -> usize {
        self.files.values().map(|d| d.escaped.len()).sum()
    }

    /// Number of killed mutants across all files.
    pub fn killed_total(&self) -> usize {
        self.files.values().map(|d| d.killed.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(checksum: &str) -> MutatorDetail {
        MutatorDetail {
            checksum: checksum.to_string(),
            ..MutatorDetail::default()
        }
    }

    #[test]
    fn extend_appends_both_categories() {
        let mut a = FileReportDetails {
            escaped: vec![detail("e1")],
            killed: vec![],
        };
        a.extend(FileReportDetails {
            escaped: vec![detail("e2")],
            killed: vec![detail("k1")],
        });

        assert_eq!(a.escaped, vec![detail("e1"), detail("e2")]);
        assert_eq!(a.killed, vec![detail("k1")]);
    }

    #[test]
    fn totals_count_all_files() {
        let mut report = AggregatedReport::default();
        report.files.insert(
            "a.go".to_string(),
            FileReportDetails {
                escaped: vec![detail("1"), detail("2")],
                killed: vec![detail("3")],
            },
        );
        report.files.insert(
            "b.go".to_string(),
            FileReportDetails {
                escaped: vec![],
                killed: vec![detail("4")],
            },
        );

        assert_eq!(report.escaped_total(), 2);
        assert_eq!(report.killed_total(), 2);
    }

    #[test]
    fn serializes_with_template_field_names() {
        let mut report = AggregatedReport::default();
        report.files.insert(
            "x.go".to_string(),
            FileReportDetails {
                escaped: vec![MutatorDetail {
                    mutator_name: "branch/if".to_string(),
                    diff: "-a\n+b\n".to_string(),
                    checksum: "c1".to_string(),
                }],
                killed: vec![],
            },
        );

        let value = serde_json::to_value(&report).expect("serialize report");
        let bucket = &value["ReportDetail"]["x.go"];
        assert_eq!(bucket["Escaped"][0]["MutatorName"], "branch/if");
        assert_eq!(bucket["Escaped"][0]["Checksum"], "c1");
        assert_eq!(bucket["Killed"], serde_json::json!([]));
        assert_eq!(value["Stats"]["TotalMutantsCount"], 0);
    }
}
