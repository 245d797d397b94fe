use console::{Term, style};
use std::{env, fmt::Display};

use crate::payload::Stats;
use crate::report::{AggregatedReport, FileReportDetails};

/// Small UI helper:
/// - normal mode: human output to stdout, errors to stderr
/// - `--json` mode: ALL human output to stderr (stdout stays machine-readable JSON)
/// - fancy styling only on a real TTY and when NO_COLOR/CI are not set
#[derive(Debug, Clone)]
pub struct Ui {
    out: Term,
    err: Term,
    fancy: bool,
    enabled: bool,

    // Counts lines emitted per kind; used by unit tests.
    files_listed: u64,
    errors: u64,
}

impl Ui {
    pub fn new(json: bool) -> Self {
        let out = if json { Term::stderr() } else { Term::stdout() };
        let err = Term::stderr();

        let out_is_tty = out.is_term();
        let no_color = env::var_os("NO_COLOR").is_some();
        let in_ci = env::var_os("CI").is_some();

        Self {
            out,
            err,
            fancy: out_is_tty && !no_color && !in_ci,
            enabled: true,
            files_listed: 0,
            errors: 0,
        }
    }

    /// Useful for unit tests to avoid noisy output.
    #[cfg(test)]
    pub fn silent() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            fancy: false,
            enabled: false,
            files_listed: 0,
            errors: 0,
        }
    }

    fn write_out(&self, s: &str) {
        if self.enabled {
            let _ = self.out.write_line(s);
        }
    }

    fn write_err(&self, s: &str) {
        if self.enabled {
            let _ = self.err.write_line(s);
        }
    }

    pub fn line(&self, msg: impl Display) {
        self.write_out(&msg.to_string());
    }

    pub fn title(&self, msg: impl Display) {
        let s = msg.to_string();
        if self.fancy {
            self.write_out(&style(s).bold().to_string());
        } else {
            self.write_out(&s);
        }
    }

    pub fn warn(&self, msg: impl Display) {
        let s = msg.to_string();
        if self.fancy {
            self.write_err(&style(s).yellow().to_string());
        } else {
            self.write_err(&s);
        }
    }

    pub fn error(&mut self, msg: impl Display) {
        self.errors += 1;
        let s = msg.to_string();
        if self.fancy {
            self.write_err(&style(s).red().bold().to_string());
        } else {
            self.write_err(&s);
        }
    }

    /// One line per source file: `<path>: <n> escaped, <m> killed`.
    pub fn file_summary(&mut self, path: &str, details: &FileReportDetails) {
        self.files_listed = self.files_listed.saturating_add(1);

        let name = if path.is_empty() { "<no path>" } else { path };
        let escaped = details.escaped.len();
        let killed = details.killed.len();

        if !self.fancy {
            self.line(format!("{name}: {escaped} escaped, {killed} killed"));
            return;
        }

        let escaped = if escaped > 0 {
            style(format!("{escaped} escaped")).yellow().bold()
        } else {
            style(format!("{escaped} escaped")).dim()
        };
        let killed = style(format!("{killed} killed")).green();
        self.line(format!("{}: {escaped}, {killed}", style(name).cyan()));
    }

    pub fn stats(&self, stats: &Stats) {
        self.title("--- stats ---");
        self.line(format!("mutants total:    {}", stats.total_mutants_count));
        self.line(format!("mutants killed:   {}", stats.killed_count));
        self.line(format!("mutants escaped:  {}", stats.escaped_count));
        self.line(format!("not covered:      {}", stats.not_covered_count));
        self.line(format!("errored:          {}", stats.error_count));
        self.line(format!("skipped:          {}", stats.skipped_count));
        self.line(format!("timed out:        {}", stats.time_out_count));
        self.line(format!("msi:              {:.2}", stats.msi));
        self.line(format!("code coverage:    {:.2}", stats.mutation_code_coverage));
        self.line(format!("covered code msi: {:.2}", stats.covered_code_msi));
    }

    /// Per-file lines followed by the global stats block.
    pub fn report_summary(&mut self, report: &AggregatedReport) {
        self.title(format!("--- files ({}) ---", report.files.len()));
        for (path, details) in &report.files {
            self.file_summary(path, details);
        }
        self.line(format!(
            "listed: {} escaped, {} killed",
            report.escaped_total(),
            report.killed_total()
        ));
        self.stats(&report.stats);
    }

    #[allow(dead_code)]
    pub fn is_fancy(&self) -> bool {
        self.fancy && self.enabled
    }
}
