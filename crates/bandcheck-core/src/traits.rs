//! Core trait definitions for test definition sources.
//!
//! Implemented by the `bandcheck-sources` crate for bundled JSON files and
//! the practice backend API.

use async_trait::async_trait;

use crate::model::{TestDefinition, TestSummary};

/// Where test definitions come from.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Human-readable source name (e.g. "bundled").
    fn name(&self) -> &str;

    /// Fetch one test definition by id.
    async fn fetch(&self, test_id: &str) -> anyhow::Result<TestDefinition>;

    /// List the tests this source can serve.
    async fn list(&self) -> anyhow::Result<Vec<TestSummary>>;
}
