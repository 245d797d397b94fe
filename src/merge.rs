use std::collections::btree_map::Entry;

use clap::ValueEnum;

use crate::error::ReportError;
use crate::group::group;
use crate::payload::ReportPayload;
use crate::report::AggregatedReport;

/// What to do when two payloads report mutants for the same file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Collision {
    /// Keep both: later payloads append after earlier ones.
    #[default]
    Append,

    /// The later payload's bucket replaces the earlier one.
    Replace,

    /// Fail the merge.
    Reject,
}

/// Merge configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub collision: Collision,

    /// Zero-based position of the payload whose stats are used.
    pub stats_from: usize,
}

/// Group every payload and union all file buckets into one report.
///
/// Stats are taken verbatim from the payload at `options.stats_from`;
/// they are never summed. Grouping errors are wrapped in
/// [`ReportError::InReport`] with the payload position.
pub fn merge(
    payloads: &[ReportPayload],
    options: MergeOptions,
) -> Result<AggregatedReport, ReportError> {
    if payloads.is_empty() {
        return Err(ReportError::MalformedInput(
            "no reports to merge".to_string(),
        ));
    }

    let stats_index = options.stats_from;
    let Some(stats_payload) = payloads.get(stats_index) else {
        return Err(ReportError::MalformedInput(format!(
            "stats source index {stats_index} is out of range for {} report(s)",
            payloads.len()
        )));
    };

    let mut merged = AggregatedReport {
        stats: stats_payload.stats.clone(),
        ..AggregatedReport::default()
    };

    for (position, payload) in payloads.iter().enumerate() {
        let grouped = group(payload).map_err(|e| ReportError::InReport {
            position,
            source: Box::new(e),
        })?;

        for (path, details) in grouped.files {
            match merged.files.entry(path) {
                Entry::Vacant(slot) => {
                    slot.insert(details);
                }
                Entry::Occupied(mut slot) => match options.collision {
                    Collision::Append => slot.get_mut().extend(details),
                    Collision::Replace => {
                        slot.insert(details);
                    }
                    Collision::Reject => {
                        return Err(ReportError::MalformedInput(format!(
                            "report #{position} repeats file {:?} already present in an earlier report",
                            slot.key()
                        )));
                    }
                },
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{MutantMetadata, MutantResult, Stats};

    fn entry(path: &str, checksum: &str) -> MutantResult {
        MutantResult {
            metadata: MutantMetadata {
                original_file_path: path.to_string(),
                ..MutantMetadata::default()
            },
            process_output: format!("PASS \"{path}\" with checksum {checksum}\n"),
            ..MutantResult::default()
        }
    }

    fn payload(total: i64, escaped: Vec<MutantResult>, killed: Vec<MutantResult>) -> ReportPayload {
        ReportPayload {
            stats: Stats {
                total_mutants_count: total,
                ..Stats::default()
            },
            escaped,
            killed,
            ..ReportPayload::default()
        }
    }

    fn checksums(report: &AggregatedReport, path: &str) -> (Vec<String>, Vec<String>) {
        let d = &report.files[path];
        (
            d.escaped.iter().map(|m| m.checksum.clone()).collect(),
            d.killed.iter().map(|m| m.checksum.clone()).collect(),
        )
    }

    #[test]
    fn unions_all_files_of_all_payloads() {
        let payloads = vec![
            payload(3, vec![entry("a.go", "a1")], vec![entry("b.go", "b1")]),
            payload(4, vec![], vec![entry("c.go", "c1"), entry("d.go", "d1")]),
            // No killed entries: still contributes its buckets.
            payload(5, vec![entry("e.go", "e1")], vec![]),
        ];

        let report = merge(&payloads, MergeOptions::default()).expect("merge should succeed");

        assert_eq!(
            report.files.keys().collect::<Vec<_>>(),
            vec!["a.go", "b.go", "c.go", "d.go", "e.go"]
        );
        assert_eq!(report.stats.total_mutants_count, 3);
    }

    #[test]
    fn single_payload_matches_group() {
        let p = payload(
            2,
            vec![entry("x.go", "e")],
            vec![entry("x.go", "k"), entry("y.go", "k2")],
        );

        let merged = merge(std::slice::from_ref(&p), MergeOptions::default())
            .expect("merge should succeed");

        assert_eq!(merged, group(&p).expect("group should succeed"));
    }

    #[test]
    fn append_keeps_payload_order() {
        let payloads = vec![
            payload(1, vec![entry("x.go", "e1")], vec![entry("x.go", "k1")]),
            payload(1, vec![entry("x.go", "e2")], vec![]),
            payload(1, vec![], vec![entry("x.go", "k2")]),
        ];

        let report = merge(&payloads, MergeOptions::default()).expect("merge should succeed");

        assert_eq!(
            checksums(&report, "x.go"),
            (
                vec!["e1".to_string(), "e2".to_string()],
                vec!["k1".to_string(), "k2".to_string()]
            )
        );
    }

    #[test]
    fn replace_lets_later_payload_win() {
        let payloads = vec![
            payload(1, vec![entry("x.go", "old")], vec![entry("y.go", "y")]),
            payload(1, vec![], vec![entry("x.go", "new")]),
        ];
        let options = MergeOptions {
            collision: Collision::Replace,
            ..MergeOptions::default()
        };

        let report = merge(&payloads, options).expect("merge should succeed");

        assert_eq!(
            checksums(&report, "x.go"),
            (vec![], vec!["new".to_string()])
        );
        assert_eq!(checksums(&report, "y.go"), (vec![], vec!["y".to_string()]));
    }

    #[test]
    fn reject_fails_on_shared_file() {
        let payloads = vec![
            payload(1, vec![entry("x.go", "1")], vec![]),
            payload(1, vec![], vec![entry("x.go", "2")]),
        ];
        let options = MergeOptions {
            collision: Collision::Reject,
            ..MergeOptions::default()
        };

        let err = merge(&payloads, options).expect_err("collision must fail");
        assert!(matches!(err, ReportError::MalformedInput(ref m) if m.contains("x.go")));
    }

    #[test]
    fn reject_allows_disjoint_files() {
        let payloads = vec![
            payload(1, vec![entry("x.go", "1")], vec![entry("x.go", "2")]),
            payload(1, vec![], vec![entry("y.go", "3")]),
        ];
        let options = MergeOptions {
            collision: Collision::Reject,
            ..MergeOptions::default()
        };

        let report = merge(&payloads, options).expect("merge should succeed");
        assert_eq!(report.files.len(), 2);
    }

    #[test]
    fn stats_come_from_selected_payload() {
        let payloads = vec![payload(10, vec![], vec![]), payload(20, vec![], vec![])];
        let options = MergeOptions {
            stats_from: 1,
            ..MergeOptions::default()
        };

        let report = merge(&payloads, options).expect("merge should succeed");
        assert_eq!(report.stats.total_mutants_count, 20);
    }

    #[test]
    fn stats_index_out_of_range_is_malformed() {
        let payloads = vec![payload(10, vec![], vec![])];
        let options = MergeOptions {
            stats_from: 3,
            ..MergeOptions::default()
        };

        assert!(matches!(
            merge(&payloads, options),
            Err(ReportError::MalformedInput(_))
        ));
    }

    #[test]
    fn empty_payload_list_is_malformed() {
        assert!(matches!(
            merge(&[], MergeOptions::default()),
            Err(ReportError::MalformedInput(_))
        ));
    }

    #[test]
    fn bad_entry_in_any_payload_fails_the_merge() {
        let mut bad = entry("z.go", "x");
        bad.process_output = "broken".to_string();
        let payloads = vec![
            payload(1, vec![entry("a.go", "1")], vec![]),
            payload(1, vec![bad], vec![]),
        ];

        match merge(&payloads, MergeOptions::default()) {
            Err(ReportError::InReport { position, source }) => {
                assert_eq!(position, 1);
                assert!(matches!(*source, ReportError::OutOfRange { index: 0, .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
