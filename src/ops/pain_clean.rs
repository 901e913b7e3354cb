//! Implementation of `pain clean`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::project::Project;
use crate::util::fs;

/// Remove `build/` and `vcpkg_installed/`.
///
/// Idempotent; returns the directories that existed and were removed.
pub fn clean(project: &Project) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in [project.build_dir(), project.install_root()] {
        if fs::remove_dir_all_if_exists(&dir)? {
            tracing::info!("removed {}", dir.display());
            removed.push(dir);
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::ProjectManifest;
    use tempfile::TempDir;

    #[test]
    fn test_clean_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let project = Project::new(tmp.path().to_path_buf(), ProjectManifest::new("demo"));
        std::fs::create_dir_all(project.build_dir().join("Debug")).unwrap();
        std::fs::create_dir_all(project.install_root().join("x64-linux")).unwrap();
        std::fs::write(tmp.path().join("CMakeLists.txt"), "").unwrap();

        let removed = clean(&project).unwrap();
        assert_eq!(removed, vec![project.build_dir(), project.install_root()]);
        assert!(!project.build_dir().exists());
        assert!(!project.install_root().exists());
        assert!(tmp.path().join("CMakeLists.txt").exists());

        assert!(clean(&project).unwrap().is_empty());
    }
}
