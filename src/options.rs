use std::path::{Path, PathBuf};

use crate::load::Limits;
use crate::merge::{Collision, MergeOptions};

/// Default input report, as written by go-mutesting's JSON reporter.
pub const DEFAULT_INPUT: &str = "report.json";

/// Template picked up from the working directory when present.
pub const DEFAULT_TEMPLATE_FILE: &str = "report.tmpl";

/// Default rendered output.
pub const DEFAULT_OUTPUT: &str = "report.html";

/// Where the HTML template came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Named with `--template`; must be usable.
    Explicit(PathBuf),

    /// `report.tmpl` found in the working directory. Files written for the
    /// Go tool use `html/template` syntax and are skipped when they carry no
    /// placeholder.
    WorkingDir(PathBuf),
}

impl TemplateSource {
    pub fn path(&self) -> &Path {
        match self {
            TemplateSource::Explicit(p) | TemplateSource::WorkingDir(p) => p,
        }
    }
}

/// Configuration options for mutesting-report derived from the CLI.
#[derive(Debug, Clone)]
pub struct Options {
    /// Report files or directories to scan for `*.json` reports.
    pub inputs: Vec<PathBuf>,

    /// Template to fill; `None` means the built-in one.
    pub template: Option<TemplateSource>,

    /// Where to write the HTML report.
    pub output: PathBuf,

    /// Optional path for the aggregated report as JSON.
    pub json_output: Option<PathBuf>,

    pub merge: MergeOptions,

    pub limits: Limits,
}

impl Options {
    /// Construct an `Options` instance with default values.
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        let inputs = if inputs.is_empty() {
            vec![PathBuf::from(DEFAULT_INPUT)]
        } else {
            inputs
        };

        Self {
            inputs,
            template: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            json_output: None,
            merge: MergeOptions::default(),
            limits: Limits::default(),
        }
    }

    pub fn with_collision(mut self, collision: Collision) -> Self {
        self.merge.collision = collision;
        self
    }

    pub fn with_stats_from(mut self, index: usize) -> Self {
        self.merge.stats_from = index;
        self
    }

    pub fn with_max_input_bytes(mut self, max: Option<u64>) -> Self {
        if let Some(max) = max {
            self.limits.max_input_bytes = max;
        }
        self
    }

    /// Use `explicit` when given, else `report.tmpl` in `cwd` if it exists.
    pub fn with_template(mut self, explicit: Option<PathBuf>, cwd: &Path) -> Self {
        self.template = match explicit {
            Some(path) => Some(TemplateSource::Explicit(path)),
            None => {
                let candidate = cwd.join(DEFAULT_TEMPLATE_FILE);
                candidate
                    .is_file()
                    .then_some(TemplateSource::WorkingDir(candidate))
            }
        };
        self
    }

    /// Output files a directory scan must not read back as reports.
    pub fn outputs(&self) -> Vec<PathBuf> {
        std::iter::once(self.output.clone())
            .chain(self.json_output.clone())
            .collect()
    }
}
