//! Analyze command: parse an ADIF log and render the analysis.

use std::path::Path;

use anyhow::{Context, Result};

use cla_core::AnalysisConfig;

use crate::commands::report;

/// Runs the analyze command.
pub fn run(
    file: &Path,
    config: &AnalysisConfig,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let summary = cla_adif::parse_file(file)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    if summary.skipped_records > 0 {
        tracing::warn!(
            skipped = summary.skipped_records,
            total = summary.total_records,
            "some records could not be parsed"
        );
    }

    let analysis = cla_core::analyze(&summary.contacts, config);
    tracing::debug!(
        qsos = analysis.total_qsos,
        operators = analysis.operators.len(),
        gaps = analysis.gaps.len(),
        "analysis complete"
    );

    let rendered = if json {
        report::format_report_json(&analysis)?
    } else {
        report::format_report(&analysis)
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
