//! Backend selection.
//!
//! The protocol layer gets its backend from here as one injected
//! `Arc<dyn Vfs>`. A config file looks like:
//!
//! ```toml
//! backend = "local"   # "local" (default) or "demo"
//! read_only = false   # local only
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use strum::EnumString;
use thiserror::Error;

use crate::backends::{DemoBackend, LocalBackend};
use crate::ops::Vfs;

/// Which backend to serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum BackendKind {
    /// Pass-through to the host filesystem.
    #[default]
    #[serde(alias = "passthrough", alias = "pass-through")]
    #[strum(serialize = "local", serialize = "passthrough", serialize = "pass-through")]
    Local,
    /// Single synthetic directory, no mutation.
    #[strum(serialize = "demo")]
    Demo,
}

impl BackendKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Demo => "demo",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Config loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// VFS configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VfsConfig {
    pub backend: BackendKind,
    /// Reject all mutation on the local backend. The demo backend is
    /// always read-only.
    pub read_only: bool,
}

impl VfsConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build the configured backend.
    pub fn build(&self) -> Arc<dyn Vfs> {
        tracing::info!(backend = %self.backend, read_only = self.read_only, "building VFS backend");
        match self.backend {
            BackendKind::Local => {
                let mut backend = LocalBackend::new();
                backend.set_read_only(self.read_only);
                Arc::new(backend)
            }
            BackendKind::Demo => Arc::new(DemoBackend::new()),
        }
    }
}
