//! Implementation of `pain init`.

use std::path::Path;

use anyhow::Result;

use crate::builder::generator::BuildConfigGenerator;
use crate::core::manifest::{validate_project_name, ProjectManifest};
use crate::core::project::Project;
use crate::util::fs;

const MAIN_CPP: &str = r#"#include <iostream>

int main() {
    std::cout << "Hello, world!" << std::endl;
    return 0;
}
"#;

const GITIGNORE: &str = r#"# Build output
build/
vcpkg_installed/

# Editors
.vscode/
.idea/
.vs/
*.swp

# Binaries
*.exe
*.o
*.obj
"#;

/// Create project `name` under `parent`.
///
/// The manifest is written first so an existing project is rejected before
/// anything else is touched.
pub fn init_project(
    parent: &Path,
    name: &str,
    generator: &BuildConfigGenerator<'_>,
) -> Result<Project> {
    validate_project_name(name)?;

    let root = parent.join(name);
    fs::ensure_dir(&root)?;
    let manifest = ProjectManifest::create(&root, name)?;

    fs::ensure_dir(&root.join("src"))?;
    if !fs::write_if_absent(&root.join("src").join("main.cpp"), MAIN_CPP)? {
        tracing::debug!("keeping existing src/main.cpp");
    }
    fs::write_if_absent(&root.join(".gitignore"), GITIGNORE)?;

    generator.regenerate(&manifest, &root)?;
    tracing::info!("created project `{}` at {}", name, root.display());

    Ok(Project::new(root, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::abi::{CompilerFamily, Os};
    use crate::core::error::PainError;
    use crate::core::manifest::BuildType;
    use crate::core::registry::LibraryRegistry;
    use tempfile::TempDir;

    fn init(parent: &Path, name: &str) -> Result<Project> {
        let registry = LibraryRegistry::builtin();
        let generator =
            BuildConfigGenerator::for_toolchain(&registry, Os::Linux, CompilerFamily::Gcc);
        init_project(parent, name, &generator)
    }

    #[test]
    fn test_init_creates_skeleton() {
        let tmp = TempDir::new().unwrap();
        let project = init(tmp.path(), "demo").unwrap();

        let root = tmp.path().join("demo");
        assert_eq!(project.root(), root);
        assert!(root.join("Pain.toml").is_file());
        assert!(root.join("src/main.cpp").is_file());
        assert!(root.join(".gitignore").is_file());

        let cmake = std::fs::read_to_string(root.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("project(demo LANGUAGES CXX)"));

        let manifest = ProjectManifest::load(&root).unwrap();
        assert_eq!(manifest.dependency_count(), 0);
        assert_eq!(manifest.build_type, BuildType::Debug);
    }

    #[test]
    fn test_init_twice_fails() {
        let tmp = TempDir::new().unwrap();
        init(tmp.path(), "demo").unwrap();

        let err = init(tmp.path(), "demo").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PainError>(),
            Some(PainError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_init_keeps_existing_sources() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("demo").join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("main.cpp"), "int main() { return 3; }\n").unwrap();

        init(tmp.path(), "demo").unwrap();
        assert_eq!(
            std::fs::read_to_string(src.join("main.cpp")).unwrap(),
            "int main() { return 3; }\n"
        );
    }

    #[test]
    fn test_init_rejects_bad_name() {
        let tmp = TempDir::new().unwrap();
        let err = init(tmp.path(), "../escape").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PainError>(),
            Some(PainError::InvalidName { kind: "project", .. })
        ));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
