//! Importer configuration: TOML file, then command-line overrides.

use anyhow::{bail, Context, Result};
use oarr_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Admin namespace the importer owns in every record it touches.
pub const DEFAULT_NAMESPACE: &str = "roar2doar";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Registry API root. May be empty for an offline dry run.
    pub store_base_url: String,
    /// Registry API key; required unless `dry_run` is set.
    pub api_key: Option<String>,
    pub namespace: String,
    /// JSON file holding the crosswalked records.
    pub input: Option<PathBuf>,
    /// Resolve and merge, but never write to the registry.
    pub dry_run: bool,
    pub request_timeout_secs: u64,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            store_base_url: String::new(),
            api_key: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            input: None,
            dry_run: false,
            request_timeout_secs: 30,
        }
    }
}

/// Values given on the command line; `None` keeps the file's value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub store_base_url: Option<String>,
    pub api_key: Option<String>,
    pub namespace: Option<String>,
    pub input: Option<PathBuf>,
    pub dry_run: bool,
}

impl ImporterConfig {
    /// Reads a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Loads `path` if given, else defaults, then applies `overrides`.
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.store_base_url {
            self.store_base_url = url;
        }
        if let Some(key) = overrides.api_key {
            self.api_key = Some(key);
        }
        if let Some(namespace) = overrides.namespace {
            self.namespace = namespace;
        }
        if let Some(input) = overrides.input {
            self.input = Some(input);
        }
        self.dry_run |= overrides.dry_run;
    }

    /// Checks the combination of settings is runnable.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            bail!("namespace must not be empty");
        }
        if self.input.is_none() {
            bail!("no input file given");
        }
        if !self.dry_run {
            if self.store_base_url.trim().is_empty() {
                bail!("store_base_url is required unless running a dry run");
            }
            if self.api_key.as_deref().is_none_or(str::is_empty) {
                bail!("api_key is required unless running a dry run");
            }
        }
        Ok(())
    }

    /// Settings for the registry client, if a registry is configured.
    #[must_use]
    pub fn client_config(&self) -> Option<ClientConfig> {
        if self.store_base_url.trim().is_empty() {
            return None;
        }
        Some(ClientConfig {
            base_url: self.store_base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.request_timeout_secs,
        })
    }
}
