//! Draft answer storage.
//!
//! The UI layer stages in-progress answers in a key-value store so they
//! survive reloads. The scoring engine never reads the store; it only
//! consumes the [`AnswerSheet`] snapshot the store produces.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::answer::{AnswerKey, AnswerSheet, Response, UserAnswer};

/// A synchronous key-value store of draft answers.
pub trait AnswerStore {
    fn get(&self, key: &AnswerKey) -> Option<Response>;

    /// Store an answer. Setting [`Response::NoAnswer`] removes the key.
    fn set(&mut self, key: AnswerKey, value: Response) -> Result<()>;

    fn remove(&mut self, key: &AnswerKey) -> Result<()>;

    /// Copy every stored answer into a sheet, ordered by key.
    fn snapshot(&self) -> AnswerSheet;
}

/// In-memory store, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct MemoryAnswerStore {
    answers: BTreeMap<AnswerKey, Response>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sheet(sheet: &AnswerSheet) -> Self {
        let answers = sheet
            .entries()
            .iter()
            .filter(|e| !e.answer.is_no_answer())
            .map(|e| {
                let key = AnswerKey {
                    section_id: e.section_id.clone(),
                    question_id: e.question_id.clone(),
                };
                (key, e.answer.clone())
            })
            .collect();
        Self { answers }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn get(&self, key: &AnswerKey) -> Option<Response> {
        self.answers.get(key).cloned()
    }

    fn set(&mut self, key: AnswerKey, value: Response) -> Result<()> {
        if value.is_no_answer() {
            self.answers.remove(&key);
        } else {
            self.answers.insert(key, value);
        }
        Ok(())
    }

    fn remove(&mut self, key: &AnswerKey) -> Result<()> {
        self.answers.remove(key);
        Ok(())
    }

    fn snapshot(&self) -> AnswerSheet {
        self.answers
            .iter()
            .map(|(key, answer)| UserAnswer {
                question_id: key.question_id.clone(),
                section_id: key.section_id.clone(),
                answer: answer.clone(),
            })
            .collect()
    }
}

/// Write-through store backed by a JSON answers file.
///
/// The file holds the same shape the scorer reads, so a draft file can be
/// passed straight to `bandcheck score --answers`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryAnswerStore,
}

impl JsonFileStore {
    /// Open a draft file, starting empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let sheet = crate::loader::parse_answer_sheet(&path)?;
            MemoryAnswerStore::from_sheet(&sheet)
        } else {
            MemoryAnswerStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every answer and delete the file.
    pub fn clear(&mut self) -> Result<()> {
        self.inner.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove draft: {}", self.path.display()))?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.inner.snapshot())
            .context("failed to serialize draft answers")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write draft to {}", self.path.display()))?;
        Ok(())
    }
}

impl AnswerStore for JsonFileStore {
    fn get(&self, key: &AnswerKey) -> Option<Response> {
        self.inner.get(key)
    }

    fn set(&mut self, key: AnswerKey, value: Response) -> Result<()> {
        self.inner.set(key, value)?;
        self.flush()
    }

    fn remove(&mut self, key: &AnswerKey) -> Result<()> {
        self.inner.remove(key)?;
        self.flush()
    }

    fn snapshot(&self) -> AnswerSheet {
        self.inner.snapshot()
    }
}
