use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::compare::{FrequencyRow, FrequencyTable};
use crate::error::{MaccabyteError, Result};
use crate::pipeline::ComparisonReport;
use crate::types::{FeatureMode, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One `"<surface> POS: .., Lemma: .., Morph: {..}"` line per token.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{token}");
    }
    out
}

pub fn render_tokens_as(tokens: &[Token], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_tokens(tokens)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tokens)?),
    }
}

/// Writes the analysis results file, replacing any previous contents.
pub fn write_analysis(tokens: &[Token], path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MaccabyteError::io(parent, e))?;
    }
    let rendered = render_tokens_as(tokens, format)?;
    fs::write(path, rendered).map_err(|e| MaccabyteError::io(path, e))
}

fn title_case(mode: FeatureMode) -> &'static str {
    match mode {
        FeatureMode::Lemma => "Lemma",
        FeatureMode::Pos => "Pos",
    }
}

/// Aligned three-column table: value, count in text 1, count in text 2.
pub fn render_frequency_table(title: &str, mode: FeatureMode, rows: &[FrequencyRow]) -> String {
    let header = [title_case(mode).to_string(), "Text 1".to_string(), "Text 2".to_string()];
    let body: Vec<[String; 3]> = rows
        .iter()
        .map(|row| [row.value.clone(), row.count_a.to_string(), row.count_b.to_string()])
        .collect();

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "{} | {} | {}",
        pad_right(&header[0], widths[0]),
        pad_left(&header[1], widths[1]),
        pad_left(&header[2], widths[2])
    );
    let _ = writeln!(
        out,
        "{}-+-{}-+-{}",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2])
    );
    for cells in &body {
        let _ = writeln!(
            out,
            "{} | {} | {}",
            pad_right(&cells[0], widths[0]),
            pad_left(&cells[1], widths[1]),
            pad_left(&cells[2], widths[2])
        );
    }
    out
}

fn pad_right(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

fn pad_left(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{}{cell}", " ".repeat(fill))
}

/// First `limit` values alphabetically, with the full count.
pub fn render_unique_line(label: &str, values: &BTreeSet<String>, limit: usize) -> String {
    if values.is_empty() {
        return format!("{label} (0): -");
    }
    let shown: Vec<&str> = values.iter().take(limit).map(String::as_str).collect();
    let more = values.len() - shown.len();
    let mut line = format!("{label} ({}): {}", values.len(), shown.join(", "));
    if more > 0 {
        let _ = write!(line, " … and {more} more");
    }
    line
}

/// `"Text 1: 120 LEMMA values, 48 distinct"`.
pub fn render_totals_line(label: &str, mode: FeatureMode, table: &FrequencyTable) -> String {
    format!(
        "{label}: {} {} values, {} distinct",
        table.total(),
        mode.as_str().to_uppercase(),
        table.len()
    )
}

/// Text report for a comparison: the shared ranking (or the union ranking when
/// `combined` is set), per-text totals, then the truncated unique-vocabulary lists.
pub fn render_comparison(report: &ComparisonReport, combined: bool, unique_limit: usize) -> String {
    let label = report.mode.as_str().to_uppercase();
    let mut out = if combined {
        render_frequency_table(
            &format!("Top {} {label} Frequencies Comparison", report.top_n),
            report.mode,
            &report.combined,
        )
    } else {
        render_frequency_table(
            &format!("Top {} Shared {label} Frequencies", report.top_n),
            report.mode,
            &report.result.shared,
        )
    };
    out.push('\n');
    let _ = writeln!(out, "{}", render_totals_line("Text 1", report.mode, &report.frequencies_a));
    let _ = writeln!(out, "{}", render_totals_line("Text 2", report.mode, &report.frequencies_b));
    let _ = writeln!(
        out,
        "{}",
        render_unique_line("Unique to Text 1", &report.result.unique_to_a, unique_limit)
    );
    let _ = writeln!(
        out,
        "{}",
        render_unique_line("Unique to Text 2", &report.result.unique_to_b, unique_limit)
    );
    out
}

pub fn render_comparison_as(
    report: &ComparisonReport,
    format: OutputFormat,
    combined: bool,
    unique_limit: usize,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_comparison(report, combined, unique_limit)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}
