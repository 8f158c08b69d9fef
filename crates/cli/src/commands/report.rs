//! Report Command
//!
//! Re-renders Markdown/HTML artifacts from a previously written JSON
//! report, for the case where the run is long gone but the data is not.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sitecheck_common::SiteConfig;
use sitecheck_report::{load_report, ConsoleRenderer, ReportFormat, Reporter};

use crate::output::print_success;

#[derive(Args)]
pub struct ReportArgs {
    /// Prior JSON report to re-render
    #[arg(short, long, default_value = "test-results/report.json")]
    input: PathBuf,

    /// Directory to write the re-rendered artifacts to
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn execute(args: ReportArgs, config: SiteConfig) -> Result<bool> {
    let report = load_report(&args.input)
        .with_context(|| format!("cannot read prior report {}", args.input.display()))?;

    let output_dir = args.output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output_dir)?;

    for format in [ReportFormat::Markdown, ReportFormat::Html] {
        let file_name = format.file_name().expect("artifact format");
        Reporter::new(format).write_to_file(&report, &output_dir.join(file_name))?;
    }

    println!("{}", ConsoleRenderer::render(&report));
    print_success(&format!(
        "re-rendered report.md and report.html into {}",
        output_dir.display()
    ));

    Ok(true)
}
