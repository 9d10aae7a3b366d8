//! JSON test definition and answer sheet loader.
//!
//! Loads test definitions from JSON files and directories, and validates them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::answer::AnswerSheet;
use crate::model::{TestDefinition, TestType};
use crate::normalize::normalize;

/// Parse a single JSON file into a `TestDefinition`.
pub fn parse_test_definition(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test definition: {}", path.display()))?;

    parse_test_definition_str(&content, path)
}

/// Parse a JSON string into a `TestDefinition` (useful for testing).
///
/// A definition without an `id` takes the file stem of `source_path`.
pub fn parse_test_definition_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let mut definition: TestDefinition = serde_json::from_str(content)
        .with_context(|| format!("failed to parse test definition: {}", source_path.display()))?;

    if definition.id.is_empty() {
        if let Some(stem) = source_path.file_stem().and_then(|s| s.to_str()) {
            definition.id = stem.to_string();
        }
    }

    Ok(definition)
}

/// Recursively load all `.json` test definitions from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut definitions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            definitions.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_test_definition(&path) {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(definitions)
}

/// Parse an answer sheet file.
pub fn parse_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;

    parse_answer_sheet_str(&content, path)
}

/// Parse an answer sheet from a JSON string.
pub fn parse_answer_sheet_str(content: &str, source_path: &Path) -> Result<AnswerSheet> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse answers: {}", source_path.display()))
}

/// A warning from test definition validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn test(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(id: impl ToString, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a test definition for common data issues.
pub fn validate_test_definition(definition: &TestDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate section ids
    let mut seen_sections = HashSet::new();
    for section in &definition.sections {
        if !seen_sections.insert(&section.section_id) {
            warnings.push(ValidationWarning::test(format!(
                "duplicate section ID: {}",
                section.section_id
            )));
        }
    }

    // Duplicate question ids: test-wide for reading, per section for listening
    match definition.test_type {
        TestType::Reading => {
            let mut seen = HashSet::new();
            for question in definition.sections.iter().flat_map(|s| &s.questions) {
                if !seen.insert(&question.id) {
                    warnings.push(ValidationWarning::question(
                        &question.id,
                        format!("duplicate question ID: {}", question.id),
                    ));
                }
            }
        }
        TestType::Listening => {
            for section in &definition.sections {
                let mut seen = HashSet::new();
                for question in &section.questions {
                    if !seen.insert(&question.id) {
                        warnings.push(ValidationWarning::question(
                            &question.id,
                            format!(
                                "duplicate question ID {} in section {}",
                                question.id, section.section_id
                            ),
                        ));
                    }
                }
            }
        }
    }

    // Duplicate display numbers
    let mut numbers: HashMap<u32, usize> = HashMap::new();
    for question in definition.sections.iter().flat_map(|s| &s.questions) {
        if question.question_number > 0 {
            *numbers.entry(question.question_number).or_default() += 1;
        }
    }
    let mut repeated: Vec<u32> = numbers
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(number, _)| number)
        .collect();
    repeated.sort_unstable();
    for number in repeated {
        warnings.push(ValidationWarning::test(format!(
            "question number {number} is used more than once"
        )));
    }

    for question in definition.sections.iter().flat_map(|s| &s.questions) {
        let candidates = question.accepted_candidates();

        if candidates.is_empty() {
            warnings.push(ValidationWarning::question(
                &question.id,
                "no accepted answers; question can never be scored correct",
            ));
            continue;
        }

        if candidates.iter().any(|c| normalize(c).is_empty()) {
            warnings.push(ValidationWarning::question(
                &question.id,
                "an accepted answer is blank after normalization",
            ));
        }

        if !question.options.is_empty() {
            let options: HashSet<String> = question.options.iter().map(|o| normalize(o)).collect();
            for candidate in &candidates {
                if !options.contains(&normalize(candidate)) {
                    warnings.push(ValidationWarning::question(
                        &question.id,
                        format!("accepted answer '{candidate}' is not one of the options"),
                    ));
                }
            }
        }
    }

    if definition.question_count() == 0 {
        warnings.push(ValidationWarning::test("test has no questions"));
    }

    warnings
}
