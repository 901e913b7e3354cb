//! Implementation of `pain build`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::cmake::clean_stale_build;
use crate::core::manifest::BuildType;
use crate::core::project::Project;
use crate::ops::session::Session;
use crate::sources::vcpkg::port_spec;
use crate::util::shell::{Shell, Status};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build type to switch to; persisted in the manifest
    pub build_type: Option<BuildType>,
}

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub build_type: BuildType,

    /// Ports installed because they were missing from the install root
    pub installed: Vec<String>,

    /// Triplet of a build directory removed before configuring
    pub stale_triplet: Option<String>,

    /// The produced executable, if it could be located
    pub executable: Option<PathBuf>,
}

/// Regenerate CMakeLists.txt, install missing ports, configure and compile.
pub fn build(
    project: &mut Project,
    session: &Session,
    opts: &BuildOptions,
    shell: &Shell,
) -> Result<BuildResult> {
    if let Some(build_type) = opts.build_type {
        if build_type != project.manifest().build_type {
            project.manifest_mut().set_build_type(build_type);
            project.save()?;
            tracing::info!("build type set to {}", build_type);
        }
    }
    let build_type = project.manifest().build_type;

    let stale_triplet = clean_stale_build(project, &session.triplet)?;
    if let Some(stale) = &stale_triplet {
        shell.warn(format!(
            "removed build directory configured for `{}` (now `{}`)",
            stale, session.triplet
        ));
    }

    session.generator().regenerate(project.manifest(), project.root())?;
    session.ensure_vcpkg(shell)?;

    let target = session.install_target(project);
    let mut installed = Vec::new();
    for name in project.manifest().dependencies() {
        let recipe = session.registry.resolve(name);
        if session.vcpkg.is_installed(&recipe.install_id, &target) {
            continue;
        }
        let features = project.manifest().features(name);
        let _spinner = shell.spinner(
            Status::Installing,
            format!("{} ({})", port_spec(&recipe.install_id, &features), target.triplet),
        );
        session.vcpkg.install(&recipe.install_id, &features, &target)?;
        installed.push(recipe.install_id);
    }

    let cmake = session.cmake_builder(project);

    let spinner = shell.spinner(
        Status::Configuring,
        format!("{} ({}, {})", project.name(), build_type, session.triplet),
    );
    cmake.configure()?;
    drop(spinner);

    let spinner = shell.spinner(Status::Compiling, project.name());
    cmake.compile()?;
    let elapsed = spinner.finish();
    tracing::debug!("compiled `{}` in {}", project.name(), elapsed);

    Ok(BuildResult {
        build_type,
        installed,
        stale_triplet,
        executable: project.find_executable(session.toolchain.os).ok(),
    })
}
