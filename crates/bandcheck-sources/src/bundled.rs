//! Bundled static JSON test definitions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use bandcheck_core::error::SourceError;
use bandcheck_core::loader::{load_test_directory, parse_test_definition_str};
use bandcheck_core::model::{TestDefinition, TestSummary};
use bandcheck_core::traits::DefinitionSource;

/// Serves `<root>/<test_id>.json` files.
pub struct BundledSource {
    root: PathBuf,
}

impl BundledSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_plain_id(test_id: &str) -> bool {
    !test_id.is_empty()
        && !test_id.starts_with('.')
        && !test_id.contains(['/', '\\'])
}

#[async_trait]
impl DefinitionSource for BundledSource {
    fn name(&self) -> &str {
        "bundled"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, test_id: &str) -> anyhow::Result<TestDefinition> {
        if !is_plain_id(test_id) {
            return Err(SourceError::TestNotFound(test_id.to_string()).into());
        }

        let path = self.root.join(format!("{test_id}.json"));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::TestNotFound(test_id.to_string()).into());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read test definition: {}", path.display())));
            }
        };

        let definition =
            parse_test_definition_str(&content, &path).map_err(|e| SourceError::InvalidDefinition {
                source_name: path.display().to_string(),
                message: format!("{e:#}"),
            })?;
        tracing::debug!(questions = definition.question_count(), "loaded bundled test");
        Ok(definition)
    }

    async fn list(&self) -> anyhow::Result<Vec<TestSummary>> {
        let root = self.root.clone();
        let definitions = tokio::task::spawn_blocking(move || load_test_directory(&root)).await??;
        Ok(definitions.iter().map(TestDefinition::summary).collect())
    }
}
