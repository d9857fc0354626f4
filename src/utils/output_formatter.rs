/// Output formatter for audit reports
///
/// This module renders a `Report` for the console and exports it as JSON or
/// CSV. Exports are written to their own paths; the scanned file is never
/// touched.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use crate::core::auditor::{Report, ReportEntry};

/// Closing notice printed after every non-empty report
pub const ADVISORY: &str = "Note: apply these changes manually. Complex f-strings \
(multiple expressions, nested braces, format specs, nested quotes) may need special handling.";

/// Format a report for console output
///
/// # Arguments
///
/// * `report` - The audit report
/// * `use_markdown` - Wrap the output in markdown triple backticks
/// * `summary_only` - Skip the per-line blocks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_report(report: &Report, use_markdown: bool, summary_only: bool) -> String {
    let mut output = String::new();

    if use_markdown {
        output.push_str("```\n");
    }

    output.push_str(&format!("{} {}\n", "F-string scan:".bold(), report.path));

    if report.entries.is_empty() {
        output.push_str(&format!(
            "No f-string candidates found in {}.\n",
            report.path
        ));
    } else {
        output.push_str(&format!(
            "Found {} candidate line(s) in {} lines\n\n",
            report.candidate_count(),
            report.total_lines
        ));

        if !summary_only {
            for entry in &report.entries {
                output.push_str(&format_entry(entry));
                output.push('\n');
            }
        }

        output.push_str(&format!(
            "{} {} candidates, {} with suggestions, {} without\n",
            "Summary:".yellow().bold(),
            report.candidate_count(),
            report.suggested_count(),
            report.unresolved_count()
        ));
        output.push_str(&format!("{}\n", ADVISORY.dimmed()));
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Two-line block for one candidate
fn format_entry(entry: &ReportEntry) -> String {
    let mut block = format!(
        "{} {}\n",
        format!("Line {}:", entry.line).cyan().bold(),
        entry.original
    );

    match (&entry.suggestion, &entry.rule) {
        (Some(suggestion), rule) => {
            block.push_str(&format!(
                "  {} {}",
                "Suggested:".green(),
                suggestion.trim()
            ));
            if let Some(rule) = rule {
                block.push_str(&format!("  [{}]", rule));
            }
            block.push('\n');
        }
        (None, _) => {
            let note = match entry.reason {
                Some(reason) => format!("No suggestion available ({})", reason),
                None => "No suggestion available".to_string(),
            };
            block.push_str(&format!("  {}\n", note.yellow()));
        }
    }

    block
}

/// Export a report to a JSON file
///
/// # Arguments
///
/// * `report` - The audit report
/// * `output_path` - Path where the JSON file will be written
pub fn export_report_json(report: &Report, output_path: &Path) -> Result<()> {
    let json_output = json!({
        "path": report.path,
        "total_lines": report.total_lines,
        "summary": {
            "candidates": report.candidate_count(),
            "suggested": report.suggested_count(),
            "unresolved": report.unresolved_count(),
        },
        "entries": report.entries,
    });

    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, &json_output)
        .context("Failed to write JSON data")?;

    Ok(())
}

/// Export a report as a CSV checklist, one row per candidate
///
/// # Arguments
///
/// * `report` - The audit report
/// * `output_path` - Path where the CSV file will be written
pub fn create_csv_report(report: &Report, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Line", "Original", "Suggestion", "Rule", "Note"])
        .context("Failed to write CSV header")?;

    for entry in &report.entries {
        let note = entry.reason.map(|reason| reason.to_string()).unwrap_or_default();
        writer
            .write_record([
                entry.line.to_string().as_str(),
                entry.original.as_str(),
                entry.suggestion.as_deref().unwrap_or(""),
                entry.rule.as_deref().unwrap_or(""),
                note.as_str(),
            ])
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}
