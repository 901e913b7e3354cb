//! Global context for Pain operations.
//!
//! Provides centralized access to configuration, paths, and environment.
//! Everything the environment contributes is read here once; the rest of
//! the crate receives plain values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::error::PainError;
use crate::core::project::find_project_root;
use crate::util::config::{self, Config};

/// Overrides the Pain home directory.
pub const PAIN_HOME_ENV: &str = "PAIN_HOME";

/// Conventional location of an existing vcpkg checkout.
pub const VCPKG_ROOT_ENV: &str = "VCPKG_ROOT";

/// Conventional triplet override.
pub const VCPKG_TRIPLET_ENV: &str = "VCPKG_DEFAULT_TRIPLET";

/// Global context: working directory, home directory, configuration.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Pain data (~/.pain/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(PAIN_HOME_ENV) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => directories::BaseDirs::new()
                .map(|b| b.home_dir().join(".pain"))
                .unwrap_or_else(|| PathBuf::from(".pain")),
        };

        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with explicit paths.
    pub fn with_paths(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext { cwd, home }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Pain home directory (~/.pain/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Default location of the shared vcpkg checkout.
    pub fn default_vcpkg_root(&self) -> PathBuf {
        self.home.join("vcpkg")
    }

    /// Find the project root starting from cwd and searching upward.
    pub fn find_project_root(&self) -> Result<PathBuf, PainError> {
        find_project_root(&self.cwd)
    }

    /// Load the global config merged with the project config, if any.
    pub fn load_config(&self, project_root: Option<&Path>) -> Config {
        let project_path = project_root.map(config::project_config_path);
        config::load_config(&self.config_path(), project_path.as_deref())
    }

    /// Resolve the vcpkg checkout location.
    pub fn vcpkg_root(&self, config: &Config) -> PathBuf {
        let env_root = std::env::var_os(VCPKG_ROOT_ENV).map(PathBuf::from);
        select_vcpkg_root(
            config.vcpkg.root.as_deref(),
            env_root.as_deref(),
            &self.default_vcpkg_root(),
        )
    }

    /// Resolve the triplet, falling back to the detected one.
    pub fn triplet(&self, config: &Config, detected: String) -> String {
        let env_triplet = std::env::var(VCPKG_TRIPLET_ENV).ok();
        select_triplet(config.vcpkg.triplet.as_deref(), env_triplet.as_deref(), detected)
    }
}

/// vcpkg root precedence: configured > environment (if it exists) > default.
pub fn select_vcpkg_root(configured: Option<&Path>, env: Option<&Path>, default: &Path) -> PathBuf {
    if let Some(root) = configured {
        return root.to_path_buf();
    }
    match env {
        Some(root) if root.is_dir() => root.to_path_buf(),
        Some(root) => {
            tracing::debug!(
                "ignoring {}={}: not a directory",
                VCPKG_ROOT_ENV,
                root.display()
            );
            default.to_path_buf()
        }
        None => default.to_path_buf(),
    }
}

/// Triplet precedence: configured > environment > detected.
pub fn select_triplet(configured: Option<&str>, env: Option<&str>, detected: String) -> String {
    configured
        .or(env)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or(detected)
}
