pub mod compare;
pub mod draft;
pub mod init;
pub mod list;
pub mod score;
pub mod validate;

use anyhow::Result;

use bandcheck_sources::{BandcheckConfig, SourceKind};

/// Pick the source named on the command line, or the configured default.
pub(crate) fn resolve_source_kind(source: Option<&str>, config: &BandcheckConfig) -> Result<SourceKind> {
    match source {
        Some(name) => name.parse().map_err(|e: String| anyhow::anyhow!("{}", e)),
        None => Ok(config.default_source),
    }
}
