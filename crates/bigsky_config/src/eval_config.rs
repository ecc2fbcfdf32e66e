use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bigsky_domain::{AliasTable, ToolNameResolver};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Result, RetryConfig};

/// Prefix of environment overrides, e.g. `BIGSKY_EVAL__API__MODEL`
pub const ENV_PREFIX: &str = "BIGSKY_EVAL";

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "bigsky-eval.toml";

/// Fallback variable holding the backend API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Fixture name that resolves to the bundled CSV eval set
pub const DEFAULT_CSV: &str = "default";

const DEFAULT_CONFIG: &str = include_str!("../eval.toml");

#[derive(Debug, Clone, Serialize, Deserialize, Setters, PartialEq)]
#[setters(into)]
pub struct EvalConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    pub paths: PathsConfig,
    /// Extra tool-name aliases merged over the built-in tables
    #[serde(default)]
    pub aliases: AliasTable,
}

#[derive(Debug, Clone, Serialize, Deserialize, Setters, PartialEq)]
#[setters(into)]
pub struct ApiConfig {
    pub base_url: Url,
    #[serde(default)]
    #[setters(strip_option)]
    pub api_key: Option<String>,
    /// Overrides the model recorded in the payload
    #[serde(default)]
    #[setters(strip_option)]
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// `{base_url}/chat/completions`, tolerating a base without trailing slash
    pub fn completions_url(&self) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join("chat/completions")?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Setters, PartialEq)]
#[setters(into)]
pub struct PathsConfig {
    /// Directory of JSON suite fixtures
    pub test_cases_dir: PathBuf,
    /// Directory of captured payloads and CSV eval sets
    pub mocks_dir: PathBuf,
}

impl PathsConfig {
    pub fn fixture(&self, name: &str) -> PathBuf {
        self.test_cases_dir.join(format!("{name}.json"))
    }

    /// Resolves a CSV argument; `default` names the bundled site-design set
    pub fn csv(&self, name: &str) -> PathBuf {
        if name == DEFAULT_CSV {
            self.mocks_dir.join("site-design-evals.csv")
        } else {
            PathBuf::from(name)
        }
    }
}

impl EvalConfig {
    /// Loads the configuration in order of increasing precedence:
    /// 1. Embedded defaults
    /// 2. `path`, or `bigsky-eval.toml` in the working directory when present
    /// 3. Environment variables prefixed with `BIGSKY_EVAL__`, using `__` as
    ///    the nesting separator (`BIGSKY_EVAL__RETRY__MAX_RETRY_ATTEMPTS`)
    ///
    /// A `.env` file is loaded first. When no key is configured,
    /// `OPENAI_API_KEY` is used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            tracing::debug!(path = %dotenv.display(), "Loaded .env");
        }
        let config = Self::from_sources(path, None)?;
        Ok(config.with_fallback_key(std::env::var(API_KEY_VAR).ok()))
    }

    /// Builds the configuration from explicit sources. `env` replaces the
    /// process environment when given.
    pub fn from_sources(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::new(DEFAULT_CONFIG_FILE, config::FileFormat::Toml).required(false),
        };

        let config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn with_fallback_key(mut self, key: Option<String>) -> Self {
        if self.api.api_key.is_none() {
            self.api.api_key = key.filter(|key| !key.trim().is_empty());
        }
        self
    }

    /// Built-in alias tables extended with the configured ones
    pub fn resolver(&self) -> Result<ToolNameResolver> {
        Ok(ToolNameResolver::default().with_aliases(self.aliases.clone())?)
    }
}
