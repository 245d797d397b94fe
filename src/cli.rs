use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::error::ReportError;
use crate::load::{discover_all, read_reports};
use crate::merge::{Collision, merge};
use crate::options::{DEFAULT_INPUT, DEFAULT_OUTPUT, Options, TemplateSource};
use crate::render::{
    BODY_PLACEHOLDER, JSON_PLACEHOLDER, has_placeholders, render_html, to_json, write_report,
};
use crate::report::AggregatedReport;
use crate::ui::Ui;

const EXIT_ERROR: i32 = 1;

/// Top-level CLI arguments for the `mutesting-report` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mutesting-report",
    version,
    about = "File-grouped reports for go-mutesting JSON results"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Input selection shared by all subcommands.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Report file, or directory scanned recursively for `*.json` reports. Repeatable.
    #[arg(long = "file", short = 'f', value_name = "PATH", default_value = DEFAULT_INPUT)]
    pub files: Vec<PathBuf>,

    /// How to combine reports that cover the same source file.
    #[arg(long, value_enum, default_value_t = Collision::Append)]
    pub on_collision: Collision,

    /// Index (in discovery order) of the report whose stats are used.
    #[arg(long, default_value_t = 0)]
    pub stats_from: usize,

    /// Refuse report files larger than this many bytes.
    #[arg(long)]
    pub max_input_bytes: Option<u64>,
}

/// Subcommands supported by `mutesting-report`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render an HTML report.
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// HTML template with `{{REPORT_BODY}}` and/or `{{REPORT_JSON}}` placeholders.
        /// Defaults to `report.tmpl` in the working directory when it has a placeholder,
        /// else a built-in template.
        #[arg(long, short = 't', value_name = "PATH")]
        template: Option<PathBuf>,

        /// Output HTML path.
        #[arg(long, short = 'o', value_name = "PATH", default_value = DEFAULT_OUTPUT)]
        out: PathBuf,

        /// Also write the aggregated report as JSON.
        #[arg(long, value_name = "PATH")]
        json_out: Option<PathBuf>,
    },

    /// Print per-file mutant counts and global stats.
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Emit the aggregated report as JSON to stdout.
        #[arg(long)]
        json: bool,
    },
}

impl InputArgs {
    fn into_options(self) -> Options {
        Options::new(self.files)
            .with_collision(self.on_collision)
            .with_stats_from(self.stats_from)
            .with_max_input_bytes(self.max_input_bytes)
    }
}

/// Parse CLI arguments and dispatch the selected command.
///
/// Command failures are printed once through [`Ui::error`] and end the
/// process with [`EXIT_ERROR`].
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let json = matches!(cli.command, Command::Summary { json: true, .. });
    let mut ui = Ui::new(json);

    if let Err(e) = dispatch(cli.command, &mut ui) {
        ui.error(format!("error: {e:#}"));
        std::process::exit(EXIT_ERROR);
    }
    Ok(())
}

fn dispatch(command: Command, ui: &mut Ui) -> Result<()> {
    match command {
        Command::Render {
            input,
            template,
            out,
            json_out,
        } => {
            let cwd = std::env::current_dir().context("failed to resolve working directory")?;
            let mut options = input.into_options().with_template(template, &cwd);
            options.output = out;
            options.json_output = json_out;

            ui.title("mutesting-report: render");

            let report = aggregate(&options, ui).context("failed to aggregate reports")?;
            let template = load_template(&options, ui)?;

            let html = render_html(&report, template.as_deref())
                .context("failed to render report")?;
            let mut outputs = vec![(options.output.as_path(), html)];
            if let Some(path) = &options.json_output {
                outputs.push((path.as_path(), to_json(&report)?));
            }
            write_outputs(&outputs)?;

            ui.report_summary(&report);
            for (path, _) in &outputs {
                ui.line(format!("wrote {}", path.display()));
            }
            Ok(())
        }

        Command::Summary { input, json } => {
            let options = input.into_options();

            ui.title("mutesting-report: summary");

            let report = aggregate(&options, ui).context("failed to aggregate reports")?;

            if json {
                println!("{}", to_json(&report)?);
                return Ok(());
            }

            ui.report_summary(&report);
            Ok(())
        }
    }
}

/// Discover, read and merge every input into one report.
fn aggregate(options: &Options, ui: &Ui) -> Result<AggregatedReport> {
    let files = discover_all(&options.inputs, &options.outputs())?;
    if files.is_empty() {
        anyhow::bail!("no *.json reports found in {:?}", options.inputs);
    }

    for path in &files {
        ui.line(format!("report: {}", path.display()));
    }

    let payloads = read_reports(&files, options.limits)?;
    let report = merge(&payloads, options.merge).map_err(|e| {
        let path = match &e {
            ReportError::InReport { position, .. } => files.get(*position).cloned(),
            _ => None,
        };
        match path {
            Some(path) => anyhow::Error::new(e).context(path.display().to_string()),
            None => anyhow::Error::new(e),
        }
    })?;

    if report.files.is_empty() {
        ui.warn("reports contain no escaped or killed mutants");
    }

    Ok(report)
}

/// Read the selected template, if any.
///
/// A `report.tmpl` picked up from the working directory that has no
/// placeholder is ignored with a warning; an explicit `--template` is not.
fn load_template(options: &Options, ui: &Ui) -> Result<Option<String>> {
    let Some(source) = &options.template else {
        return Ok(None);
    };

    let path = source.path();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read template {}", path.display()))?;

    if matches!(source, TemplateSource::WorkingDir(_)) && !has_placeholders(&text) {
        ui.warn(format!(
            "ignoring {}: no {BODY_PLACEHOLDER} or {JSON_PLACEHOLDER} placeholder, using the built-in template",
            path.display()
        ));
        return Ok(None);
    }

    ui.line(format!("template: {}", path.display()));
    Ok(Some(text))
}

/// Write every output, removing the ones already written if a later one fails.
fn write_outputs(outputs: &[(&Path, String)]) -> Result<()> {
    for (i, (path, contents)) in outputs.iter().enumerate() {
        if let Err(e) = write_report(path, contents) {
            for (written, _) in &outputs[..i] {
                let _ = fs::remove_file(written);
            }
            return Err(e.into());
        }
    }
    Ok(())
}
