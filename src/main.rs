mod checksum;
mod cli;
mod error;
mod group;
mod load;
mod merge;
mod options;
mod payload;
mod render;
mod report;
mod ui;

/// Entry point for the `mutesting-report` binary.
fn main() -> anyhow::Result<()> {
    cli::run()
}
