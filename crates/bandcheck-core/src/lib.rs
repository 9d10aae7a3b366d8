//! bandcheck-core: Answer normalization, scoring engine, and data model.
//!
//! This crate defines the test definition and answer types, the scoring
//! engine that turns an answer snapshot into a score report, and the
//! supporting loader, draft store, and attempt history.

pub mod answer;
pub mod attempt;
pub mod band;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod scoring;
pub mod store;
pub mod traits;

pub use answer::{AnswerKey, AnswerSheet, LookupStrategy, Response, UserAnswer};
pub use error::SourceError;
pub use model::{Question, Section, TestDefinition, TestSummary, TestType};
pub use scoring::{score_test, ScoreDetail, ScoreReport, ScoringEngine, SectionScore};
