//! Core data model types for bandcheck.
//!
//! These types mirror the JSON test definitions served by the practice
//! backend (and bundled as static files): a test is an ordered list of
//! sections, each holding typed questions with their accepted answers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::answer::LookupStrategy;

/// Identifier of a question or section.
///
/// Test data uses integers for some tests and strings/GUIDs for others, so
/// both are accepted on input and compared by their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier of a question, unique within a test (or section, for listening).
pub type QuestionId = ItemId;
/// Identifier of a section, unique within a test.
pub type SectionId = ItemId;

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// Integral numbers print without a fraction, so `1`, `1.0` and `"1"` name
/// the same item.
fn canonical_number(n: &serde_json::Number) -> String {
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ItemId(canonical_number(&n)),
            RawId::Text(s) => ItemId(s),
        })
    }
}

/// Kind of practice test. Selects how user answers are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    #[default]
    Reading,
    Listening,
}

impl TestType {
    /// Reading tests key answers by question id alone; listening tests
    /// restart numbering per section and key by `(section, question)`.
    pub fn lookup_strategy(self) -> LookupStrategy {
        match self {
            TestType::Reading => LookupStrategy::QuestionId,
            TestType::Listening => LookupStrategy::SectionAndQuestion,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Reading => write!(f, "reading"),
            TestType::Listening => write!(f, "listening"),
        }
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading" | "academic" => Ok(TestType::Reading),
            "listening" => Ok(TestType::Listening),
            other => Err(format!("unknown test type: {other}")),
        }
    }
}

/// One accepted-answer value as it appears in test data.
///
/// Lists may nest one level for multi-select questions
/// (`"answers": [["A", "C"]]`); all leaves are flattened into candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<AnswerValue>),
}

impl AnswerValue {
    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            AnswerValue::Text(s) => out.push(s.clone()),
            AnswerValue::Number(n) => out.push(n.to_string()),
            AnswerValue::Bool(b) => out.push(b.to_string()),
            AnswerValue::List(items) => {
                for item in items {
                    item.collect_into(out);
                }
            }
        }
    }

    /// Flatten into an ordered list of candidate strings. A scalar yields a
    /// one-element list.
    pub fn candidates(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl<T: Into<AnswerValue>> From<Vec<T>> for AnswerValue {
    fn from(items: Vec<T>) -> Self {
        AnswerValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// Display number; may differ from `id`.
    #[serde(default)]
    pub question_number: u32,
    #[serde(default)]
    pub question_text: String,
    /// Structured accepted answers.
    #[serde(
        default,
        alias = "correctAnswers",
        skip_serializing_if = "Option::is_none"
    )]
    pub answers: Option<AnswerValue>,
    /// Legacy single accepted answer, used when `answers` is absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerValue>,
    /// Displayed choices for choice questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    /// Resolve the flat candidate list, favoring the structured field and
    /// falling back to the legacy scalar.
    pub fn accepted_candidates(&self) -> Vec<String> {
        if let Some(structured) = &self.answers {
            let candidates = structured.candidates();
            if !candidates.is_empty() {
                return candidates;
            }
        }
        self.answer
            .as_ref()
            .map(AnswerValue::candidates)
            .unwrap_or_default()
    }
}

/// An ordered group of questions sharing one question type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: SectionId,
    #[serde(default)]
    pub section_title: String,
    /// Display grouping only; never consulted by scoring.
    #[serde(default)]
    pub question_type: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A complete practice test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub test_type: TestType,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl TestDefinition {
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    pub fn summary(&self) -> TestSummary {
        TestSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            test_type: self.test_type,
            question_count: self.question_count(),
        }
    }
}

/// Summary of a test (without the section and question bodies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub test_type: TestType,
    #[serde(default)]
    pub question_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display_and_parse() {
        assert_eq!(TestType::Reading.to_string(), "reading");
        assert_eq!(TestType::Listening.to_string(), "listening");
        assert_eq!("Listening".parse::<TestType>().unwrap(), TestType::Listening);
        assert_eq!("academic".parse::<TestType>().unwrap(), TestType::Reading);
        assert!("speaking".parse::<TestType>().is_err());
    }

    #[test]
    fn ids_accept_integers_and_strings() {
        let q: Question = serde_json::from_str(r#"{"id": 7, "answers": ["x"]}"#).unwrap();
        assert_eq!(q.id, ItemId::new("7"));
        let q: Question =
            serde_json::from_str(r#"{"id": "3f2a-guid", "answers": ["x"]}"#).unwrap();
        assert_eq!(q.id.as_str(), "3f2a-guid");
    }

    #[test]
    fn ids_accept_large_and_float_numbers() {
        let q: Question =
            serde_json::from_str(r#"{"id": 18446744073709551615, "answers": ["x"]}"#).unwrap();
        assert_eq!(q.id.as_str(), "18446744073709551615");

        let q: Question = serde_json::from_str(r#"{"id": 1.0, "answers": ["x"]}"#).unwrap();
        assert_eq!(q.id, ItemId::new("1"));

        let q: Question = serde_json::from_str(r#"{"id": -4, "answers": ["x"]}"#).unwrap();
        assert_eq!(q.id.as_str(), "-4");

        let q: Question = serde_json::from_str(r#"{"id": 2.5, "answers": ["x"]}"#).unwrap();
        assert_eq!(q.id.as_str(), "2.5");
    }

    #[test]
    fn structured_answers_win_over_legacy() {
        let q: Question = serde_json::from_str(
            r#"{"id": 1, "answers": ["color", "colour"], "answer": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(q.accepted_candidates(), vec!["color", "colour"]);
    }

    #[test]
    fn legacy_scalar_fallback() {
        let q: Question = serde_json::from_str(r#"{"id": 1, "answer": "42"}"#).unwrap();
        assert_eq!(q.accepted_candidates(), vec!["42"]);

        let q: Question = serde_json::from_str(r#"{"id": 1, "answer": 42}"#).unwrap();
        assert_eq!(q.accepted_candidates(), vec!["42"]);

        let q: Question =
            serde_json::from_str(r#"{"id": 1, "answers": [], "answer": "B"}"#).unwrap();
        assert_eq!(q.accepted_candidates(), vec!["B"]);
    }

    #[test]
    fn nested_multi_select_flattens() {
        let q: Question =
            serde_json::from_str(r#"{"id": 1, "correctAnswers": [["A", "C"]]}"#).unwrap();
        assert_eq!(q.accepted_candidates(), vec!["A", "C"]);
    }

    #[test]
    fn no_accepted_answers_is_empty() {
        let q: Question = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(q.accepted_candidates().is_empty());
    }

    #[test]
    fn definition_defaults() {
        let def: TestDefinition = serde_json::from_str(
            r#"{"id": "t1", "sections": [{"sectionId": 1, "questions": [{"id": 1, "answer": "a"}]}]}"#,
        )
        .unwrap();
        assert_eq!(def.test_type, TestType::Reading);
        assert_eq!(def.question_count(), 1);
        assert_eq!(def.summary().question_count, 1);
        assert_eq!(def.sections[0].section_id.as_str(), "1");
    }
}
