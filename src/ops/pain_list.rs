//! Implementation of `pain list`.

use crate::core::project::Project;
use crate::core::registry::LibraryRegistry;
use crate::sources::vcpkg::{InstallTarget, VcpkgBootstrap};

/// One dependency as reported by `pain list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub install_id: String,
    pub curated: bool,
    /// vcpkg features recorded in the manifest
    pub features: Vec<String>,
    /// Installed port version, when vcpkg metadata is present
    pub version: Option<String>,
}

/// Describe every dependency of `project`, in manifest order.
pub fn list(
    project: &Project,
    registry: &LibraryRegistry,
    vcpkg: &VcpkgBootstrap,
    target: &InstallTarget,
) -> Vec<ListEntry> {
    project
        .manifest()
        .dependencies()
        .map(|name| {
            let recipe = registry.resolve(name);
            let version = match vcpkg.installed_version(&recipe.install_id, target) {
                Ok(version) => version,
                Err(err) => {
                    tracing::warn!("{:#}", err);
                    None
                }
            };
            ListEntry {
                name: name.to_string(),
                install_id: recipe.install_id,
                curated: recipe.curated,
                features: project.manifest().features(name),
                version,
            }
        })
        .collect()
}
