//! User answers and how they are matched to questions.
//!
//! Raw answers arrive as loosely-typed JSON from the UI layer. They are
//! converted once, at this boundary, into the tagged [`Response`] so the
//! scoring engine can match on it exhaustively.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::model::{Question, QuestionId, Section, SectionId};

/// A submitted answer to one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Response {
    /// Nothing submitted, or a shape the UI never produces (objects, bare numbers).
    #[default]
    NoAnswer,
    /// Free text or a single choice.
    Single(String),
    /// Multi-select choices, in the order they were picked.
    Multi(Vec<String>),
}

impl Response {
    /// Convert a raw JSON answer. Strings become [`Response::Single`], arrays
    /// become [`Response::Multi`] with every element turned into a string,
    /// and everything else is [`Response::NoAnswer`].
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Response::Single(s.clone()),
            Value::Array(items) => Response::Multi(items.iter().map(element_to_string).collect()),
            _ => Response::NoAnswer,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Response::NoAnswer => Value::Null,
            Response::Single(s) => Value::String(s.clone()),
            Response::Multi(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Build a response from zero or more values: none clears the answer,
    /// one is a single answer, several are a multi-select answer.
    pub fn from_values(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => Response::NoAnswer,
            1 => Response::Single(values.remove(0)),
            _ => Response::Multi(values),
        }
    }

    /// Build a multi-select response, even from a single value. A subset of
    /// a multi-select key must stay a [`Response::Multi`] so it is compared
    /// as a whole set rather than against any one candidate.
    pub fn from_selection(values: Vec<String>) -> Self {
        if values.is_empty() {
            Response::NoAnswer
        } else {
            Response::Multi(values)
        }
    }

    pub fn is_no_answer(&self) -> bool {
        matches!(self, Response::NoAnswer)
    }
}

fn element_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::NoAnswer => f.write_str("-"),
            Response::Single(s) => f.write_str(s),
            Response::Multi(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Response {
    fn from(s: &str) -> Self {
        Response::Single(s.to_string())
    }
}

impl From<String> for Response {
    fn from(s: String) -> Self {
        Response::Single(s)
    }
}

impl From<Vec<&str>> for Response {
    fn from(items: Vec<&str>) -> Self {
        Response::Multi(items.into_iter().map(str::to_string).collect())
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Response::from_json(&value))
    }
}

/// One `{questionId, answer}` pair as produced by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: QuestionId,
    /// Required to match listening questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(default)]
    pub answer: Response,
}

impl UserAnswer {
    pub fn new(question_id: impl Into<QuestionId>, answer: impl Into<Response>) -> Self {
        Self {
            question_id: question_id.into(),
            section_id: None,
            answer: answer.into(),
        }
    }

    pub fn in_section(mut self, section_id: impl Into<SectionId>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }
}

/// A point-in-time snapshot of every answer submitted for one test.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    entries: Vec<UserAnswer>,
}

impl AnswerSheet {
    pub fn new(entries: Vec<UserAnswer>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, answer: UserAnswer) {
        self.entries.push(answer);
    }

    pub fn entries(&self) -> &[UserAnswer] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index the answers by lookup key. When a key repeats, the later entry wins.
    pub fn index(&self, strategy: LookupStrategy) -> HashMap<AnswerKey, &Response> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            let key = strategy.answer_key(entry);
            if map.insert(key.clone(), &entry.answer).is_some() {
                tracing::debug!("answer for {key} submitted more than once, keeping the last");
            }
        }
        map
    }
}

impl FromIterator<UserAnswer> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = UserAnswer>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// `{"answers": [...]}`, possibly alongside metadata such as `testId`.
#[derive(Deserialize)]
struct WrappedSheet {
    answers: Vec<UserAnswer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSheet {
    List(Vec<UserAnswer>),
    Wrapped(WrappedSheet),
    Map(serde_json::Map<String, Value>),
}

impl<'de> Deserialize<'de> for AnswerSheet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = match RawSheet::deserialize(deserializer)? {
            RawSheet::List(entries) => entries,
            RawSheet::Wrapped(wrapped) => wrapped.answers,
            RawSheet::Map(map) => map
                .into_iter()
                .map(|(id, value)| UserAnswer {
                    question_id: QuestionId::from(id),
                    section_id: None,
                    answer: Response::from_json(&value),
                })
                .collect(),
        };
        Ok(Self { entries })
    }
}

/// Key used to match a submitted answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerKey {
    pub section_id: Option<SectionId>,
    pub question_id: QuestionId,
}

impl AnswerKey {
    pub fn question(question_id: impl Into<QuestionId>) -> Self {
        Self {
            section_id: None,
            question_id: question_id.into(),
        }
    }

    pub fn in_section(section_id: impl Into<SectionId>, question_id: impl Into<QuestionId>) -> Self {
        Self {
            section_id: Some(section_id.into()),
            question_id: question_id.into(),
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section_id {
            Some(section) => write!(f, "{section}/{}", self.question_id),
            None => write!(f, "{}", self.question_id),
        }
    }
}

/// How answers are keyed for a given test type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Flat question id, unique across the whole test.
    QuestionId,
    /// `(sectionId, questionId)` pair.
    SectionAndQuestion,
}

impl LookupStrategy {
    pub fn question_key(self, section: &Section, question: &Question) -> AnswerKey {
        match self {
            LookupStrategy::QuestionId => AnswerKey::question(question.id.clone()),
            LookupStrategy::SectionAndQuestion => {
                AnswerKey::in_section(section.section_id.clone(), question.id.clone())
            }
        }
    }

    /// An answer without a section id only ever matches under
    /// [`LookupStrategy::QuestionId`].
    pub fn answer_key(self, answer: &UserAnswer) -> AnswerKey {
        match self {
            LookupStrategy::QuestionId => AnswerKey::question(answer.question_id.clone()),
            LookupStrategy::SectionAndQuestion => AnswerKey {
                section_id: answer.section_id.clone(),
                question_id: answer.question_id.clone(),
            },
        }
    }
}
