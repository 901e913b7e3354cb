//! Implementation of `pain add` and `pain remove`.
//!
//! `add` is all-or-nothing: the manifest is only written after vcpkg
//! installed the port. `remove` always updates the manifest; uninstalling
//! the port is best effort.
//!
//! Both accept vcpkg feature syntax (`sfml[audio]`). Recipes and manifest
//! entries are keyed by the base name; features are recorded separately and
//! only reach `vcpkg install`.

use anyhow::Result;

use crate::builder::cmake::clean_stale_build;
use crate::core::error::PainError;
use crate::core::project::Project;
use crate::core::registry::{LibraryRegistry, LibrarySpec};
use crate::ops::session::Session;
use crate::sources::vcpkg::{port_spec, InstalledPaths};
use crate::util::shell::{Shell, Status};

/// What `add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Installed and recorded.
    Added,
    /// Already in the manifest; nothing was installed.
    AlreadyPresent,
}

/// Result of adding a dependency.
#[derive(Debug, Clone)]
pub struct AddResult {
    /// Canonical name recorded in the manifest
    pub name: String,

    /// vcpkg port
    pub install_id: String,

    /// Whether the registry has a curated recipe
    pub curated: bool,

    /// Every feature recorded for the library after this add
    pub features: Vec<String>,

    pub outcome: AddOutcome,

    /// Install locations, when the port was installed
    pub installed: Option<InstalledPaths>,

    /// Triplet of a build directory removed before installing
    pub stale_triplet: Option<String>,
}

/// Result of removing a dependency.
#[derive(Debug, Clone)]
pub struct RemoveResult {
    pub name: String,
    pub install_id: String,

    /// Whether the port was removed from the install root
    pub uninstalled: bool,

    /// Why uninstalling failed, if it did
    pub warning: Option<String>,
}

/// Resolve, install and record a library, then regenerate CMakeLists.txt.
pub fn add_dependency(
    project: &mut Project,
    session: &Session,
    name: &str,
    shell: &Shell,
) -> Result<AddResult> {
    let spec = LibrarySpec::parse(name)?;
    let recipe = session.registry.resolve(&spec.name);
    let recorded = recorded_name(project, &session.registry, &recipe.name);
    let entry = recorded.clone().unwrap_or_else(|| recipe.name.clone());

    let mut features = project.manifest().features(&entry);
    let known = features.len();
    for feature in &spec.features {
        if !features.contains(feature) {
            features.push(feature.clone());
        }
    }
    features.sort();

    if recorded.is_some() && features.len() == known {
        tracing::info!("`{}` is already a dependency", entry);
        session.generator().regenerate(project.manifest(), project.root())?;
        return Ok(AddResult {
            name: entry,
            install_id: recipe.install_id,
            curated: recipe.curated,
            features,
            outcome: AddOutcome::AlreadyPresent,
            installed: None,
            stale_triplet: None,
        });
    }

    let stale_triplet = clean_stale_build(project, &session.triplet)?;
    if let Some(stale) = &stale_triplet {
        shell.warn(format!(
            "removed build directory configured for `{}` (now `{}`)",
            stale, session.triplet
        ));
    }

    session.ensure_vcpkg(shell)?;

    let target = session.install_target(project);
    let spinner = shell.spinner(
        Status::Installing,
        format!("{} ({})", port_spec(&recipe.install_id, &features), target.triplet),
    );
    let installed = session.vcpkg.install(&recipe.install_id, &features, &target)?;
    tracing::debug!("installed `{}` in {}", recipe.install_id, spinner.finish());

    project.manifest_mut().add_dependency(entry.clone());
    project.manifest_mut().add_features(&entry, spec.features);
    project.save()?;
    session.generator().regenerate(project.manifest(), project.root())?;

    Ok(AddResult {
        name: entry,
        install_id: recipe.install_id,
        curated: recipe.curated,
        features,
        outcome: AddOutcome::Added,
        installed: Some(installed),
        stale_triplet,
    })
}

/// Drop a library from the manifest and regenerate CMakeLists.txt.
///
/// Fails with `NotFound` if the library is not a dependency. Entries are
/// matched by canonical name, so a hand-written `SDL` is found by `sdl2`.
pub fn remove_dependency(
    project: &mut Project,
    session: &Session,
    name: &str,
    shell: &Shell,
) -> Result<RemoveResult> {
    let spec = LibrarySpec::parse(name)?;
    let canonical = session.registry.canonical_name(&spec.name);
    let entry = recorded_name(project, &session.registry, &canonical)
        .ok_or_else(|| PainError::dependency_not_found(spec.name.as_str()))?;

    let recipe = session.registry.resolve(&entry);
    let target = session.install_target(project);

    let mut uninstalled = false;
    let mut warning = None;
    if session.vcpkg.is_ready() && session.vcpkg.is_installed(&recipe.install_id, &target) {
        let _spinner = shell.spinner(
            Status::Removing,
            format!("{} ({})", recipe.install_id, target.triplet),
        );
        match session.vcpkg.uninstall(&recipe.install_id, &target) {
            Ok(()) => uninstalled = true,
            Err(err) => {
                tracing::warn!("could not uninstall `{}`: {:#}", recipe.install_id, err);
                warning = Some(describe_failure(&err));
            }
        }
    }

    project.manifest_mut().remove_dependency(&entry)?;
    project.save()?;
    session.generator().regenerate(project.manifest(), project.root())?;

    Ok(RemoveResult {
        name: entry,
        install_id: recipe.install_id,
        uninstalled,
        warning,
    })
}

/// The manifest entry that resolves to `canonical`, as written in Pain.toml.
fn recorded_name(project: &Project, registry: &LibraryRegistry, canonical: &str) -> Option<String> {
    project
        .manifest()
        .dependencies()
        .find(|dep| registry.canonical_name(dep) == canonical)
        .map(str::to_string)
}

fn describe_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PainError>().and_then(PainError::output_tail) {
        Some(tail) => format!("{:#}\n{}", err, tail),
        None => format!("{:#}", err),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::manifest::ProjectManifest;
    use crate::ops::pain_init::init_project;
    use crate::ops::session::tests::fake_session;
    use crate::test_support::vcpkg_calls;
    use tempfile::TempDir;

    fn setup(tmp: &TempDir) -> (Session, Project) {
        let session = fake_session(tmp.path());
        let project = init_project(tmp.path(), "demo", &session.generator()).unwrap();
        (session, project)
    }

    fn cmake_lists(project: &Project) -> String {
        std::fs::read_to_string(project.cmake_lists_path()).unwrap()
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        let shell = Shell::quiet();
        let before = cmake_lists(&project);

        let added = add_dependency(&mut project, &session, "fmt", &shell).unwrap();
        assert_eq!(added.outcome, AddOutcome::Added);
        assert!(added.curated);
        assert!(added.installed.unwrap().share_dir().is_dir());
        assert!(cmake_lists(&project).contains("fmt::fmt"));
        assert!(ProjectManifest::load(project.root()).unwrap().contains("fmt"));

        let removed = remove_dependency(&mut project, &session, "fmt", &shell).unwrap();
        assert!(removed.uninstalled);
        assert_eq!(removed.warning, None);
        assert_eq!(cmake_lists(&project), before);
        assert_eq!(ProjectManifest::load(project.root()).unwrap().dependency_count(), 0);

        assert_eq!(vcpkg_calls(session.vcpkg.root()), ["install fmt", "remove fmt"]);
    }

    #[test]
    fn test_add_twice_installs_once() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        let shell = Shell::quiet();

        add_dependency(&mut project, &session, "fmt", &shell).unwrap();
        let again = add_dependency(&mut project, &session, " FMT ", &shell).unwrap();

        assert_eq!(again.outcome, AddOutcome::AlreadyPresent);
        assert_eq!(project.manifest().dependency_count(), 1);
        assert_eq!(vcpkg_calls(session.vcpkg.root()).len(), 1);
    }

    #[test]
    fn test_failed_install_leaves_manifest_untouched() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        let manifest_before = std::fs::read_to_string(project.manifest_path()).unwrap();
        let cmake_before = cmake_lists(&project);

        let err = add_dependency(&mut project, &session, "broken", &Shell::quiet()).unwrap_err();
        match err.downcast_ref::<PainError>() {
            Some(PainError::Install {
                install_id,
                exit_code,
                output_tail,
            }) => {
                assert_eq!(install_id, "broken");
                assert_eq!(*exit_code, Some(2));
                assert!(output_tail.contains("building broken failed"));
            }
            other => panic!("expected install error, got {:?}", other),
        }

        assert!(!project.manifest().contains("broken"));
        assert_eq!(std::fs::read_to_string(project.manifest_path()).unwrap(), manifest_before);
        assert_eq!(cmake_lists(&project), cmake_before);
    }

    #[test]
    fn test_unknown_library_uses_fallback() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);

        let added =
            add_dependency(&mut project, &session, "totally-unknown-lib", &Shell::quiet()).unwrap();
        assert!(!added.curated);
        assert_eq!(added.install_id, "totally-unknown-lib");
        assert!(project.manifest().contains("totally-unknown-lib"));
        assert!(cmake_lists(&project).contains("find_package(totally-unknown-lib CONFIG QUIET)"));
    }

    #[test]
    fn test_alias_is_recorded_canonically() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);

        let added = add_dependency(&mut project, &session, "SDL", &Shell::quiet()).unwrap();
        assert_eq!(added.name, "sdl2");
        assert!(project.manifest().contains("sdl2"));

        let removed = remove_dependency(&mut project, &session, "sdl", &Shell::quiet()).unwrap();
        assert_eq!(removed.name, "sdl2");
    }

    #[test]
    fn test_remove_missing_dependency() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);

        let err = remove_dependency(&mut project, &session, "fmt", &Shell::quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PainError>(),
            Some(PainError::NotFound { kind: "dependency", .. })
        ));
        assert!(vcpkg_calls(session.vcpkg.root()).is_empty());
    }

    #[test]
    fn test_failed_uninstall_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        let shell = Shell::quiet();

        add_dependency(&mut project, &session, "pinned", &shell).unwrap();
        let removed = remove_dependency(&mut project, &session, "pinned", &shell).unwrap();

        assert!(!removed.uninstalled);
        assert!(removed.warning.unwrap().contains("other installed ports depend on it"));
        assert!(!ProjectManifest::load(project.root()).unwrap().contains("pinned"));
    }

    #[test]
    fn test_stale_build_directory_is_removed() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        std::fs::create_dir_all(project.build_dir()).unwrap();
        std::fs::write(
            project.cmake_cache_path(),
            "VCPKG_TARGET_TRIPLET:STRING=x64-windows\n",
        )
        .unwrap();

        let added = add_dependency(&mut project, &session, "fmt", &Shell::quiet()).unwrap();
        assert_eq!(added.stale_triplet.as_deref(), Some("x64-windows"));
        assert!(!project.build_dir().exists());
    }

    #[test]
    fn test_add_with_features() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        let shell = Shell::quiet();

        let added = add_dependency(&mut project, &session, "SFML[audio]", &shell).unwrap();
        assert_eq!(added.outcome, AddOutcome::Added);
        assert_eq!(added.name, "sfml");
        assert_eq!(added.features, vec!["audio"]);
        assert!(cmake_lists(&project).contains("SFML::Audio"));

        let again = add_dependency(&mut project, &session, "sfml[audio]", &shell).unwrap();
        assert_eq!(again.outcome, AddOutcome::AlreadyPresent);

        let more = add_dependency(&mut project, &session, "sfml[network]", &shell).unwrap();
        assert_eq!(more.outcome, AddOutcome::Added);
        assert_eq!(more.features, vec!["audio", "network"]);

        let manifest = ProjectManifest::load(project.root()).unwrap();
        assert_eq!(manifest.dependencies().collect::<Vec<_>>(), vec!["sfml"]);
        assert_eq!(manifest.features("sfml"), vec!["audio", "network"]);
        assert_eq!(
            vcpkg_calls(session.vcpkg.root()),
            ["install sfml[audio]", "install sfml[audio,network]"]
        );

        let removed = remove_dependency(&mut project, &session, "sfml[audio]", &shell).unwrap();
        assert_eq!(removed.name, "sfml");
        assert!(ProjectManifest::load(project.root()).unwrap().features("sfml").is_empty());
    }

    #[test]
    fn test_remove_hand_written_entry() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);
        project.manifest_mut().add_dependency("SDL");
        project.save().unwrap();
        session.generator().regenerate(project.manifest(), project.root()).unwrap();
        assert!(cmake_lists(&project).contains("SDL2::SDL2"));

        let again = add_dependency(&mut project, &session, "sdl2", &Shell::quiet()).unwrap();
        assert_eq!(again.outcome, AddOutcome::AlreadyPresent);
        assert_eq!(again.name, "SDL");

        let removed = remove_dependency(&mut project, &session, "sdl2", &Shell::quiet()).unwrap();
        assert_eq!(removed.name, "SDL");
        assert_eq!(ProjectManifest::load(project.root()).unwrap().dependency_count(), 0);
        assert!(!cmake_lists(&project).contains("SDL2::SDL2"));
    }

    #[test]
    fn test_invalid_library_name() {
        let tmp = TempDir::new().unwrap();
        let (session, mut project) = setup(&tmp);

        for bad in ["fmt;rm", "sfml[audio", "sfml[Bad Feature]"] {
            let err = add_dependency(&mut project, &session, bad, &Shell::quiet()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<PainError>(),
                Some(PainError::InvalidName { kind: "library", .. })
            ));
        }
        assert!(vcpkg_calls(session.vcpkg.root()).is_empty());
    }
}
