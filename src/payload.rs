use serde::{Deserialize, Deserializer, Serialize};

/// Metadata describing the mutator that produced a mutant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MutantMetadata {
    /// Transformation rule that produced the mutant (for example `branch/if`).
    pub mutator_name: String,

    /// Source code before mutation (may be empty).
    pub original_source_code: String,

    /// Source code after mutation (may be empty).
    pub mutated_source_code: String,

    /// Path of the mutated source file. Used as the grouping key.
    pub original_file_path: String,

    /// First line of the mutated region.
    pub original_start_line: i64,
}

/// A single executed mutant as recorded by the mutation-test runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MutantResult {
    /// Mutator metadata for this mutant.
    #[serde(rename = "mutator")]
    pub metadata: MutantMetadata,

    /// Unified diff between original and mutated source.
    pub diff: String,

    /// Free-text runner output, e.g. `PASS "<path>" with checksum <value>`.
    pub process_output: String,
}

/// Aggregate counters for a run. Copied through, never recomputed.
///
/// Parsed from camelCase keys; serialized with the field names the report
/// template expects (`TotalMutantsCount`, `Msi`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(
    rename_all(serialize = "PascalCase", deserialize = "camelCase"),
    default
)]
pub struct Stats {
    pub total_mutants_count: i64,
    pub killed_count: i64,
    pub not_covered_count: i64,
    pub escaped_count: i64,
    pub error_count: i64,
    pub skipped_count: i64,
    pub time_out_count: i64,

    /// Mutation score indicator.
    pub msi: f64,
    pub mutation_code_coverage: f64,
    pub covered_code_msi: f64,
}

/// One mutation-testing run: stats plus escaped and killed mutants.
///
/// `stats` is required; a JSON object without it is not a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportPayload {
    pub stats: Stats,

    /// Mutants that survived the test suite, in runner order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub escaped: Vec<MutantResult>,

    /// Opaque; carried through without interpretation.
    #[serde(default)]
    pub timeouted: serde_json::Value,

    /// Mutants detected by the test suite, in runner order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub killed: Vec<MutantResult>,

    /// Opaque; carried through without interpretation.
    #[serde(default)]
    pub errored: serde_json::Value,
}

// go-mutesting writes `null` for empty lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stats_and_ignores_unknown_fields() {
        let json = r#"{
            "stats": {
                "totalMutantsCount": 10,
                "killedCount": 5,
                "msi": 0.50,
                "extraField": "shouldBeIgnored"
            },
            "escaped": [],
            "killed": []
        }"#;

        let payload: ReportPayload = serde_json::from_str(json).expect("valid payload");
        assert_eq!(payload.stats.total_mutants_count, 10);
        assert_eq!(payload.stats.killed_count, 5);
        assert_eq!(payload.stats.msi, 0.50);
        assert_eq!(payload.stats.escaped_count, 0);
        assert!(payload.escaped.is_empty());
        assert!(payload.killed.is_empty());
    }

    #[test]
    fn null_and_missing_lists_are_empty() {
        let payload: ReportPayload =
            serde_json::from_str(r#"{"stats": {}, "escaped": null}"#).expect("valid payload");
        assert!(payload.escaped.is_empty());
        assert!(payload.killed.is_empty());
        assert!(payload.timeouted.is_null());
    }

    #[test]
    fn opaque_fields_are_kept_verbatim() {
        let json = r#"{
            "stats": {},
            "timeouted": [{"anything": [1, 2, 3]}],
            "errored": "free text"
        }"#;

        let payload: ReportPayload = serde_json::from_str(json).expect("valid payload");
        assert_eq!(
            payload.timeouted,
            serde_json::json!([{"anything": [1, 2, 3]}])
        );
        assert_eq!(payload.errored, serde_json::json!("free text"));
    }

    #[test]
    fn missing_stats_is_rejected() {
        let err = serde_json::from_str::<ReportPayload>(r#"{"escaped": [], "killed": []}"#)
            .expect_err("stats is required");
        assert!(err.to_string().contains("missing field `stats`"), "{err}");
    }

    #[test]
    fn aggregated_output_is_not_a_payload() {
        let json = r#"{"Stats": {"TotalMutantsCount": 4}, "ReportDetail": {}}"#;
        assert!(serde_json::from_str::<ReportPayload>(json).is_err());
    }

    #[test]
    fn parses_mutant_entry() {
        let json = r#"{
            "mutator": {
                "mutatorName": "branch/if",
                "originalSourceCode": "a",
                "mutatedSourceCode": "b",
                "originalFilePath": "pkg/x.go",
                "originalStartLine": 12
            },
            "diff": "--- a\n+++ b\n",
            "processOutput": "PASS \"pkg/x.go\" with checksum abc\n"
        }"#;

        let entry: MutantResult = serde_json::from_str(json).expect("valid entry");
        assert_eq!(entry.metadata.mutator_name, "branch/if");
        assert_eq!(entry.metadata.original_file_path, "pkg/x.go");
        assert_eq!(entry.metadata.original_start_line, 12);
        assert_eq!(entry.diff, "--- a\n+++ b\n");
    }

    #[test]
    fn stats_serialize_with_template_names() {
        let stats = Stats {
            total_mutants_count: 3,
            time_out_count: 1,
            ..Stats::default()
        };

        let value = serde_json::to_value(&stats).expect("serialize stats");
        assert_eq!(value["TotalMutantsCount"], 3);
        assert_eq!(value["TimeOutCount"], 1);
        assert_eq!(value["Msi"], 0.0);
        assert_eq!(value["CoveredCodeMsi"], 0.0);
    }
}
