//! bandcheck-sources: Test definition sources.
//!
//! Implements the `DefinitionSource` trait for bundled JSON files and the
//! practice backend API, and loads the `bandcheck.toml` configuration.

pub mod api;
pub mod bundled;
pub mod config;
pub mod mock;

pub use api::ApiSource;
pub use bundled::BundledSource;
pub use config::{create_source, load_config, load_config_from, ApiConfig, BandcheckConfig, SourceKind};
pub use mock::MockSource;
