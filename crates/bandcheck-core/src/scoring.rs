//! The scoring engine.
//!
//! Scores a snapshot of user answers against a test definition. Scoring is
//! a pure transform: it never fails, never touches storage, and returns the
//! same report for the same inputs.

use serde::{Deserialize, Serialize};

use crate::answer::{AnswerSheet, LookupStrategy, Response};
use crate::model::{QuestionId, SectionId, TestDefinition};
use crate::normalize::{normalize, normalized_sorted};

/// Separator used when rendering several accepted answers for display.
pub const ANSWER_SEPARATOR: &str = " / ";

/// Scoring outcome for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    pub section_id: SectionId,
    pub question_id: QuestionId,
    pub question_number: u32,
    pub question_type: String,
    pub question_text: String,
    /// The raw submitted value.
    pub user_answer: Response,
    /// Accepted answers joined for display.
    pub correct_answer: String,
    pub is_correct: bool,
    pub points: u32,
}

/// The details of one section, in question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScore {
    pub section_id: SectionId,
    pub section_title: String,
    pub score: u32,
    pub total_questions: u32,
    pub details: Vec<ScoreDetail>,
}

/// Aggregate scoring outcome for a whole test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub total_score: u32,
    pub total_questions: u32,
    /// Whole-number percentage of correct answers.
    pub accuracy: u32,
    pub details: Vec<ScoreDetail>,
    /// `details` grouped by section, in first-seen section order.
    pub by_section: Vec<SectionScore>,
}

impl ScoreReport {
    pub fn incorrect(&self) -> impl Iterator<Item = &ScoreDetail> {
        self.details.iter().filter(|d| !d.is_correct)
    }
}

/// `round(score / total * 100)`, or 0 when there are no questions.
pub fn accuracy(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (score as f64 / total as f64 * 100.0).round() as u32
}

/// Decide whether one response matches the accepted candidates.
///
/// Single answers match if they equal any candidate after normalization.
/// Multi-select answers must equal the whole candidate set, ignoring order.
/// An empty candidate list never matches.
pub fn is_correct(candidates: &[String], response: &Response) -> bool {
    if candidates.is_empty() {
        return false;
    }
    match response {
        Response::Single(text) => {
            let given = normalize(text);
            !given.is_empty() && candidates.iter().any(|c| normalize(c) == given)
        }
        Response::Multi(items) => {
            !items.is_empty() && normalized_sorted(items) == normalized_sorted(candidates)
        }
        Response::NoAnswer => false,
    }
}

/// Scores answer sheets against test definitions with a fixed lookup strategy.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    strategy: LookupStrategy,
}

impl ScoringEngine {
    pub fn new(strategy: LookupStrategy) -> Self {
        Self { strategy }
    }

    /// Engine using the lookup convention of the definition's test type.
    pub fn for_test(definition: &TestDefinition) -> Self {
        Self::new(definition.test_type.lookup_strategy())
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    pub fn score(&self, definition: &TestDefinition, sheet: &AnswerSheet) -> ScoreReport {
        let answers = sheet.index(self.strategy);
        let no_answer = Response::NoAnswer;

        let mut details = Vec::with_capacity(definition.question_count());
        let mut by_section: Vec<SectionScore> = Vec::new();
        let mut total_score = 0u32;

        for section in &definition.sections {
            let mut section_details = Vec::with_capacity(section.questions.len());
            let mut section_score = 0u32;

            for question in &section.questions {
                let key = self.strategy.question_key(section, question);
                let response = answers.get(&key).copied().unwrap_or(&no_answer);
                let candidates = question.accepted_candidates();
                if candidates.is_empty() {
                    tracing::warn!(
                        "question {key} in test '{}' has no accepted answers, scoring as incorrect",
                        definition.id
                    );
                }

                let correct = is_correct(&candidates, response);
                let points = u32::from(correct);
                tracing::debug!(%key, correct, "scored question");

                section_score += points;
                section_details.push(ScoreDetail {
                    section_id: section.section_id.clone(),
                    question_id: question.id.clone(),
                    question_number: question.question_number,
                    question_type: section.question_type.clone(),
                    question_text: question.question_text.clone(),
                    user_answer: response.clone(),
                    correct_answer: candidates.join(ANSWER_SEPARATOR),
                    is_correct: correct,
                    points,
                });
            }

            total_score += section_score;
            details.extend(section_details.iter().cloned());

            // Sections sharing an id fold into the first occurrence.
            match by_section
                .iter_mut()
                .find(|s| s.section_id == section.section_id)
            {
                Some(existing) => {
                    existing.score += section_score;
                    existing.total_questions += section_details.len() as u32;
                    existing.details.extend(section_details);
                }
                None => by_section.push(SectionScore {
                    section_id: section.section_id.clone(),
                    section_title: section.section_title.clone(),
                    score: section_score,
                    total_questions: section_details.len() as u32,
                    details: section_details,
                }),
            }
        }

        let total_questions = details.len() as u32;
        tracing::info!(
            test = %definition.id,
            total_score,
            total_questions,
            "scored answer sheet"
        );

        ScoreReport {
            total_score,
            total_questions,
            accuracy: accuracy(total_score, total_questions),
            details,
            by_section,
        }
    }
}

/// Score a sheet using the lookup convention of the test's type.
pub fn score_test(definition: &TestDefinition, sheet: &AnswerSheet) -> ScoreReport {
    ScoringEngine::for_test(definition).score(definition, sheet)
}
