//! Pain.toml manifest.
//!
//! The manifest is the durable record of a project: its name, the chosen
//! build type and the set of declared libraries. Everything else in the
//! project directory (CMakeLists.txt, build/, vcpkg_installed/) is derived
//! from it and can be regenerated.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::PainError;
use crate::core::registry::{validate_feature_name, validate_library_name};
use crate::util::fs;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Pain.toml";

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").unwrap());

/// Check that a project name can be used as a directory name and a CMake
/// target name.
pub fn validate_project_name(name: &str) -> Result<(), PainError> {
    if PROJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(PainError::InvalidName {
            kind: "project",
            name: name.to_string(),
        })
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildType {
    #[default]
    Debug,
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            _ => Err(format!(
                "invalid build type '{}'; expected 'Debug' or 'Release'",
                s
            )),
        }
    }
}

/// A project's declared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectManifest {
    pub name: String,

    #[serde(default)]
    pub build_type: BuildType,

    /// Canonical library names.
    #[serde(default)]
    dependencies: BTreeSet<String>,

    /// vcpkg features requested per dependency.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    features: BTreeMap<String, BTreeSet<String>>,
}

/// On-disk layout: everything lives under `[project]`.
#[derive(Serialize, Deserialize)]
struct ManifestFile {
    project: ProjectManifest,
}

impl ProjectManifest {
    /// Create an in-memory manifest with no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectManifest {
            name: name.into(),
            build_type: BuildType::default(),
            dependencies: BTreeSet::new(),
            features: BTreeMap::new(),
        }
    }

    /// Path of the manifest inside a project root.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(MANIFEST_NAME)
    }

    /// Create and persist a new manifest in `root`.
    ///
    /// Fails with `AlreadyExists` if `root` already holds a manifest.
    pub fn create(root: &Path, name: impl Into<String>) -> Result<Self> {
        let path = Self::path_in(root);
        if path.exists() {
            return Err(PainError::AlreadyExists { path }.into());
        }

        let manifest = Self::new(name);
        manifest.save(root)?;
        Ok(manifest)
    }

    /// Load the manifest stored in `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);
        if !path.is_file() {
            return Err(PainError::manifest_not_found(root).into());
        }

        let content = fs::read_to_string(&path)?;
        Ok(Self::parse(&content, &path)?)
    }

    /// Parse manifest text. `path` is used for error messages only.
    pub fn parse(content: &str, path: &Path) -> Result<Self, PainError> {
        let file: ManifestFile =
            toml::from_str(content).map_err(|e| PainError::CorruptManifest {
                path: path.to_path_buf(),
                message: e.message().to_string(),
            })?;

        file.project.validate().map_err(|message| PainError::CorruptManifest {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(file.project)
    }

    /// Check every value that ends up in the generated CMakeLists.txt or on
    /// the vcpkg command line.
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("project name is empty".to_string());
        }
        validate_project_name(&self.name).map_err(|e| e.to_string())?;

        for dep in &self.dependencies {
            validate_library_name(dep).map_err(|e| e.to_string())?;
        }
        for (dep, features) in &self.features {
            if !self.dependencies.contains(dep) {
                return Err(format!("features listed for `{}`, which is not a dependency", dep));
            }
            for feature in features {
                validate_feature_name(feature).map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> Result<String> {
        let file = ManifestFile {
            project: self.clone(),
        };
        toml::to_string_pretty(&file).context("failed to serialize Pain.toml")
    }

    /// Persist to `root`, replacing the previous file atomically.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path_in(root);
        fs::write_atomic(&path, &self.to_toml()?)?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Declared dependencies, sorted.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }

    /// Record a canonical library name. Returns false if it was already present.
    pub fn add_dependency(&mut self, name: impl Into<String>) -> bool {
        self.dependencies.insert(name.into())
    }

    /// Drop a library name and its features. Fails with `NotFound` if absent.
    pub fn remove_dependency(&mut self, name: &str) -> Result<(), PainError> {
        if self.dependencies.remove(name) {
            self.features.remove(name);
            Ok(())
        } else {
            Err(PainError::dependency_not_found(name))
        }
    }

    /// Features recorded for a dependency, sorted.
    pub fn features(&self, name: &str) -> Vec<String> {
        self.features
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Record features for a dependency already in the manifest.
    pub fn add_features<I, S>(&mut self, name: &str, features: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        if features.is_empty() || !self.dependencies.contains(name) {
            return;
        }
        self.features
            .entry(name.to_string())
            .or_default()
            .extend(features);
    }

    pub fn set_build_type(&mut self, build_type: BuildType) {
        self.build_type = build_type;
    }
}
