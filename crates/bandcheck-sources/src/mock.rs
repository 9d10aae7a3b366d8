//! Mock source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use bandcheck_core::error::SourceError;
use bandcheck_core::model::{TestDefinition, TestSummary};
use bandcheck_core::traits::DefinitionSource;

/// An in-memory definition source for exercising callers without files
/// or a server.
pub struct MockSource {
    /// Map of test id → definition.
    definitions: HashMap<String, TestDefinition>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Last test id requested.
    last_requested: Mutex<Option<String>>,
}

impl MockSource {
    /// Create a mock serving the given definitions, keyed by their ids.
    pub fn new(definitions: Vec<TestDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
            call_count: AtomicU32::new(0),
            last_requested: Mutex::new(None),
        }
    }

    /// Get the number of fetches made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last test id requested.
    pub fn last_requested(&self) -> Option<String> {
        self.last_requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DefinitionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, test_id: &str) -> anyhow::Result<TestDefinition> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(test_id.to_string());

        self.definitions
            .get(test_id)
            .cloned()
            .ok_or_else(|| SourceError::TestNotFound(test_id.to_string()).into())
    }

    async fn list(&self) -> anyhow::Result<Vec<TestSummary>> {
        let mut tests: Vec<TestSummary> =
            self.definitions.values().map(TestDefinition::summary).collect();
        tests.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tests)
    }
}
