//! Project - a manifest bound to its root directory.
//!
//! Provides every project-scoped path the operations need.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::abi::Os;
use crate::core::error::PainError;
use crate::core::manifest::{ProjectManifest, MANIFEST_NAME};

/// Generated build-configuration file name.
pub const CMAKE_LISTS: &str = "CMakeLists.txt";

/// Directory vcpkg installs project dependencies into.
pub const INSTALL_DIR: &str = "vcpkg_installed";

/// CMake binary directory.
pub const BUILD_DIR: &str = "build";

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    manifest: ProjectManifest,
}

impl Project {
    /// Load the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let manifest = ProjectManifest::load(root)?;
        Ok(Project {
            root: root.to_path_buf(),
            manifest,
        })
    }

    /// Wrap an already loaded manifest.
    pub fn new(root: PathBuf, manifest: ProjectManifest) -> Self {
        Project { root, manifest }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut ProjectManifest {
        &mut self.manifest
    }

    /// Persist the manifest.
    pub fn save(&self) -> Result<()> {
        self.manifest.save(&self.root)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_NAME)
    }

    pub fn cmake_lists_path(&self) -> PathBuf {
        self.root.join(CMAKE_LISTS)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn install_root(&self) -> PathBuf {
        self.root.join(INSTALL_DIR)
    }

    pub fn cmake_cache_path(&self) -> PathBuf {
        self.build_dir().join("CMakeCache.txt")
    }

    /// Places the built executable may end up, in lookup order.
    ///
    /// Single-config generators write straight into `build/`; multi-config
    /// generators (Visual Studio, Xcode) use a per-configuration subdirectory.
    pub fn executable_candidates(&self, os: Os) -> Vec<PathBuf> {
        let exe = format!("{}{}", self.name(), os.exe_suffix());
        let build = self.build_dir();
        let current = self.manifest.build_type.as_str();

        let mut candidates = vec![build.join(&exe), build.join(current).join(&exe)];
        for config in ["Debug", "Release"] {
            let path = build.join(config).join(&exe);
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
        candidates
    }

    /// First existing executable candidate.
    pub fn find_executable(&self, os: Os) -> Result<PathBuf, PainError> {
        self.executable_candidates(os)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| PainError::NotFound {
                kind: "executable",
                name: self.name().to_string(),
            })
    }
}

/// Search `start` and its ancestors for a directory containing `Pain.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, PainError> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_NAME).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| PainError::manifest_not_found(start))
}
