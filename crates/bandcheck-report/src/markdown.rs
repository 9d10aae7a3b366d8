//! Markdown report output, for pasting into notes or issues.

use std::path::Path;

use anyhow::{Context, Result};

use bandcheck_core::attempt::AttemptRecord;

/// Escape characters that would break a markdown table cell.
fn cell(s: &str) -> String {
    inline(s).replace('|', "\\|")
}

/// Collapse line breaks so text stays on one heading or table line.
fn inline(s: &str) -> String {
    s.split(['\r', '\n'])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate a markdown report from a scored attempt.
pub fn generate_markdown(attempt: &AttemptRecord) -> String {
    let report = &attempt.report;
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", inline(&attempt.test.title)));
    md.push_str(&format!(
        "**Score:** {}/{} ({}%)",
        report.total_score, report.total_questions, report.accuracy
    ));
    if let Some(band) = attempt.band {
        md.push_str(&format!(" | **Band:** {band:.1}"));
    }
    md.push_str("\n\n");

    for section in &report.by_section {
        let title = if section.section_title.is_empty() {
            section.section_id.to_string()
        } else {
            section.section_title.clone()
        };
        md.push_str(&format!(
            "## {} ({}/{})\n\n",
            inline(&title),
            section.score,
            section.total_questions
        ));
        md.push_str("| # | Your answer | Correct answer | Result |\n");
        md.push_str("|---|-------------|----------------|--------|\n");
        for d in &section.details {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                d.question_number,
                cell(&d.user_answer.to_string()),
                cell(&d.correct_answer),
                if d.is_correct { "correct" } else { "incorrect" }
            ));
        }
        md.push('\n');
    }

    md
}

/// Write a markdown report to a file.
pub fn write_markdown_report(attempt: &AttemptRecord, path: &Path) -> Result<()> {
    let md = generate_markdown(attempt);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}
