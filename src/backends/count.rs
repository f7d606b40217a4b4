//! Word count command: runs the concurrent tally on one file

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::core::model::{ItemError, ResultItem, ResultSet};
use crate::core::paths::{display_name, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::tally::counter::{count_file, Outcome, TallyConfig, TallyReport};
use crate::tally::error::TallyError;

/// Count output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountFormat {
    /// Standard ResultSet format (respects --format flag)
    #[default]
    Standard,
    /// `Top N Words:` header followed by `word: count` lines
    Summary,
    /// JSON object with the full report
    Json,
}

impl std::str::FromStr for CountFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "default" => Ok(CountFormat::Standard),
            "summary" | "text" => Ok(CountFormat::Summary),
            "json" => Ok(CountFormat::Json),
            _ => Err(format!("Unknown count format: {}", s)),
        }
    }
}

/// Convert a report to a ResultSet: one summary item, then one item per ranked word
pub fn report_to_result_set(report: &TallyReport) -> ResultSet {
    let mut result_set = ResultSet::new();

    let summary = ResultItem::summary(report.source.clone(), report.summary()).with_data(
        serde_json::json!({
            "shown": report.top.len(),
            "distinct_words": report.distinct_words,
            "total_words": report.total_words,
            "lines_read": report.lines_read,
            "lines_lossy": report.lines_lossy,
            "workers": report.workers,
            "elapsed_ms": report.elapsed_ms,
            "outcome": report.outcome,
        }),
    );
    result_set.push(summary);

    for (index, entry) in report.top.iter().enumerate() {
        result_set.push(ResultItem::word(report.source.clone(), index + 1, entry));
    }

    if let Outcome::Partial { abandoned } = report.outcome {
        let err = TallyError::PartialCompletion {
            abandoned,
            timeout_secs: report.timeout_secs,
        };
        result_set.push(
            ResultItem::error(ItemError::new(err.code(), err.to_string()))
                .with_path(report.source.clone()),
        );
    }

    result_set
}

/// Tally a file relative to root
pub fn tally(root: &Path, file: &Path, config: &TallyConfig) -> Result<TallyReport> {
    let path = resolve(root, file);
    let mut report = count_file(&path, config)?;
    report.source = display_name(&path, root);
    Ok(report)
}

/// Write the legacy text summary
fn write_summary<W: Write>(report: &TallyReport, mut out: W) -> std::io::Result<()> {
    writeln!(out, "{}", format!("Top {} Words:", report.top.len()).bold())?;
    for entry in &report.top {
        writeln!(out, "{}: {}", entry.word, entry.count)?;
    }
    if report.is_partial() {
        writeln!(out, "{}", "(partial result: counting timed out)".yellow())?;
    }
    Ok(())
}

/// Run the count command
pub fn run_count(
    root: &Path,
    file: &Path,
    config: &TallyConfig,
    count_format: CountFormat,
    render_config: RenderConfig,
) -> Result<()> {
    let report = tally(root, file, config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match count_format {
        CountFormat::Summary => write_summary(&report, &mut out)?,
        CountFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("failed to serialize tally report")?;
            writeln!(out, "{}", json)?;
        }
        CountFormat::Standard => {
            let result_set = report_to_result_set(&report);
            Renderer::with_config(render_config).render_to(&result_set, &mut out)?;
        }
    }

    Ok(())
}
