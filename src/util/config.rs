//! Configuration file support for Pain.
//!
//! Pain reads two configuration files:
//! - Global: `~/.pain/config.toml` - User-wide defaults
//! - Project: `.pain/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default vcpkg clone source.
pub const DEFAULT_VCPKG_REPO: &str = "https://github.com/microsoft/vcpkg";

/// Pain configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package manager settings
    pub vcpkg: VcpkgConfig,
}

/// vcpkg settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcpkgConfig {
    /// Location of the shared vcpkg checkout.
    pub root: Option<PathBuf>,

    /// Git URL vcpkg is cloned from.
    pub repo: Option<String>,

    /// Triplet override (e.g., x64-mingw-static).
    pub triplet: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.vcpkg.root.is_some() {
            self.vcpkg.root = other.vcpkg.root;
        }
        if other.vcpkg.repo.is_some() {
            self.vcpkg.repo = other.vcpkg.repo;
        }
        if other.vcpkg.triplet.is_some() {
            self.vcpkg.triplet = other.vcpkg.triplet;
        }
    }

    /// Clone source for vcpkg.
    pub fn vcpkg_repo(&self) -> &str {
        self.vcpkg.repo.as_deref().unwrap_or(DEFAULT_VCPKG_REPO)
    }
}

/// Load merged configuration from global and project paths.
pub fn load_config(global_path: &Path, project_path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(global_path);

    if let Some(project_path) = project_path {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the project config path (.pain/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".pain").join("config.toml")
}
