//! Saved attempts with JSON persistence and attempt-to-attempt comparison.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::band::band_score;
use crate::model::{TestDefinition, TestSummary};
use crate::scoring::ScoreReport;

/// One scored attempt at a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// Unique attempt identifier.
    pub id: Uuid,
    /// When the attempt was scored.
    pub created_at: DateTime<Utc>,
    /// Summary of the test.
    pub test: TestSummary,
    /// The score report.
    pub report: ScoreReport,
    /// Estimated IELTS band, absent for an empty test.
    #[serde(default)]
    pub band: Option<f32>,
}

impl AttemptRecord {
    pub fn new(definition: &TestDefinition, report: ScoreReport) -> Self {
        let band = band_score(
            definition.test_type,
            report.total_score,
            report.total_questions,
        );
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test: definition.summary(),
            report,
            band,
        }
    }

    /// Save the attempt as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize attempt")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write attempt to {}", path.display()))?;
        Ok(())
    }

    /// Load an attempt from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read attempt from {}", path.display()))?;
        let attempt: AttemptRecord =
            serde_json::from_str(&content).context("failed to parse attempt JSON")?;
        Ok(attempt)
    }

    /// Compare this attempt against an earlier one, question by question.
    ///
    /// Questions are matched on `(section, question)` so listening tests
    /// with per-section numbering compare correctly.
    pub fn compare(&self, baseline: &AttemptRecord) -> AttemptComparison {
        let verdicts = |attempt: &AttemptRecord| -> HashMap<(String, String), (u32, bool)> {
            attempt
                .report
                .details
                .iter()
                .map(|d| {
                    (
                        (d.section_id.to_string(), d.question_id.to_string()),
                        (d.question_number, d.is_correct),
                    )
                })
                .collect()
        };

        let baseline_verdicts = verdicts(baseline);

        let mut newly_correct = Vec::new();
        let mut newly_incorrect = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        // Walk the current details in order so the output follows the test.
        for detail in &self.report.details {
            let key = (detail.section_id.to_string(), detail.question_id.to_string());
            match baseline_verdicts.get(&key) {
                Some(&(_, was_correct)) if was_correct == detail.is_correct => unchanged += 1,
                Some(_) => {
                    let change = QuestionChange {
                        section_id: key.0,
                        question_id: key.1,
                        question_number: detail.question_number,
                    };
                    if detail.is_correct {
                        newly_correct.push(change);
                    } else {
                        newly_incorrect.push(change);
                    }
                }
                None => new_questions += 1,
            }
        }

        let current_keys: std::collections::HashSet<(String, String)> = self
            .report
            .details
            .iter()
            .map(|d| (d.section_id.to_string(), d.question_id.to_string()))
            .collect();
        let removed_questions = baseline_verdicts
            .keys()
            .filter(|k| !current_keys.contains(*k))
            .count();

        AttemptComparison {
            baseline_score: baseline.report.total_score,
            current_score: self.report.total_score,
            score_delta: self.report.total_score as i64 - baseline.report.total_score as i64,
            baseline_band: baseline.band,
            current_band: self.band,
            newly_correct,
            newly_incorrect,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptComparison {
    pub baseline_score: u32,
    pub current_score: u32,
    pub score_delta: i64,
    pub baseline_band: Option<f32>,
    pub current_band: Option<f32>,
    /// Questions wrong in the baseline and right now.
    pub newly_correct: Vec<QuestionChange>,
    /// Questions right in the baseline and wrong now.
    pub newly_incorrect: Vec<QuestionChange>,
    /// Questions with the same verdict in both attempts.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

/// A question whose verdict changed between attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionChange {
    pub section_id: String,
    pub question_id: String,
    pub question_number: u32,
}

fn format_band(band: Option<f32>) -> String {
    band.map(|b| format!("{b:.1}")).unwrap_or_else(|| "-".into())
}

impl AttemptComparison {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** score {} -> {} ({:+}), band {} -> {}; {} newly correct, {} newly incorrect, {} unchanged\n\n",
            self.baseline_score,
            self.current_score,
            self.score_delta,
            format_band(self.baseline_band),
            format_band(self.current_band),
            self.newly_correct.len(),
            self.newly_incorrect.len(),
            self.unchanged
        ));

        if !self.newly_incorrect.is_empty() {
            md.push_str("### Newly incorrect\n\n");
            md.push_str("| Section | Question |\n");
            md.push_str("|---------|----------|\n");
            for q in &self.newly_incorrect {
                md.push_str(&format!("| {} | {} |\n", q.section_id, q.question_number));
            }
            md.push('\n');
        }

        if !self.newly_correct.is_empty() {
            md.push_str("### Newly correct\n\n");
            md.push_str("| Section | Question |\n");
            md.push_str("|---------|----------|\n");
            for q in &self.newly_correct {
                md.push_str(&format!("| {} | {} |\n", q.section_id, q.question_number));
            }
        }

        md
    }

    /// Returns true if any question went from correct to incorrect.
    pub fn has_regressions(&self) -> bool {
        !self.newly_incorrect.is_empty()
    }
}
