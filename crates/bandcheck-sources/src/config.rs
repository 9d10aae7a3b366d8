//! Configuration loading and source factory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bandcheck_core::traits::DefinitionSource;

use crate::api::ApiSource;
use crate::bundled::BundledSource;

/// Connection settings for the practice backend API.
///
/// Note: Custom Debug impl masks the token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_timeout() -> u64 {
    30
}

/// Which kind of source serves test definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Static JSON files in `tests_dir`.
    #[default]
    Bundled,
    /// The practice backend API.
    Api,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Bundled => write!(f, "bundled"),
            SourceKind::Api => write!(f, "api"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bundled" | "static" | "file" => Ok(SourceKind::Bundled),
            "api" | "http" => Ok(SourceKind::Api),
            other => Err(format!("unknown source: {other}")),
        }
    }
}

/// Top-level bandcheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandcheckConfig {
    /// Directory of bundled test definitions.
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,
    /// Output directory for reports and saved attempts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for draft answer files.
    #[serde(default = "default_drafts_dir")]
    pub drafts_dir: PathBuf,
    /// Source used when none is given on the command line.
    #[serde(default)]
    pub default_source: SourceKind,
    /// Backend API settings.
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("./test-sets")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./bandcheck-results")
}
fn default_drafts_dir() -> PathBuf {
    PathBuf::from("./.bandcheck-drafts")
}

impl Default for BandcheckConfig {
    fn default() -> Self {
        Self {
            tests_dir: default_tests_dir(),
            output_dir: default_output_dir(),
            drafts_dir: default_drafts_dir(),
            default_source: SourceKind::default(),
            api: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_api_config(api: &ApiConfig) -> ApiConfig {
    ApiConfig {
        base_url: resolve_env_vars(&api.base_url),
        token: api
            .token
            .as_ref()
            .map(|t| resolve_env_vars(t))
            .filter(|t| !t.is_empty()),
        timeout_secs: api.timeout_secs,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `bandcheck.toml` in the current directory
/// 2. `~/.config/bandcheck/config.toml`
///
/// Environment variable overrides: `BANDCHECK_API_URL`, `BANDCHECK_API_TOKEN`.
pub fn load_config() -> Result<BandcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BandcheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("bandcheck.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<BandcheckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => BandcheckConfig::default(),
    };

    apply_env_overrides(&mut config);
    config.api = config.api.as_ref().map(resolve_api_config);

    Ok(config)
}

fn apply_env_overrides(config: &mut BandcheckConfig) {
    if let Ok(url) = std::env::var("BANDCHECK_API_URL") {
        let api = config.api.get_or_insert_with(|| ApiConfig {
            base_url: String::new(),
            token: None,
            timeout_secs: default_timeout(),
        });
        api.base_url = url;
    }

    if let Ok(token) = std::env::var("BANDCHECK_API_TOKEN") {
        if let Some(api) = config.api.as_mut() {
            api.token = Some(token);
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bandcheck"))
}

/// Create a definition source of the given kind from the configuration.
pub fn create_source(kind: SourceKind, config: &BandcheckConfig) -> Result<Box<dyn DefinitionSource>> {
    match kind {
        SourceKind::Bundled => Ok(Box::new(BundledSource::new(&config.tests_dir))),
        SourceKind::Api => {
            let api = config.api.as_ref().ok_or_else(|| {
                anyhow::anyhow!(
                    "source 'api' needs an [api] table in bandcheck.toml or BANDCHECK_API_URL"
                )
            })?;
            anyhow::ensure!(!api.base_url.is_empty(), "api.base_url is empty");
            Ok(Box::new(ApiSource::new(api)?))
        }
    }
}
