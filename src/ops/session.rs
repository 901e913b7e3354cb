//! Per-invocation environment shared by the project operations.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::cmake::CMakeBuilder;
use crate::builder::generator::BuildConfigGenerator;
use crate::builder::toolchain::{ToolchainDescriptor, ToolchainProbe};
use crate::core::project::Project;
use crate::core::registry::LibraryRegistry;
use crate::sources::vcpkg::{InstallTarget, VcpkgBootstrap};
use crate::util::process;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Registry, host toolchain, vcpkg checkout and triplet for one command.
///
/// Built once from the [`GlobalContext`] and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    pub registry: LibraryRegistry,
    pub toolchain: ToolchainDescriptor,
    pub vcpkg: VcpkgBootstrap,
    pub triplet: String,
    cmake: PathBuf,
}

impl Session {
    pub fn new(
        registry: LibraryRegistry,
        toolchain: ToolchainDescriptor,
        vcpkg: VcpkgBootstrap,
        triplet: impl Into<String>,
    ) -> Self {
        Session {
            registry,
            toolchain,
            vcpkg,
            triplet: triplet.into(),
            cmake: process::find_executable("cmake").unwrap_or_else(|| PathBuf::from("cmake")),
        }
    }

    /// Probe the host and apply configuration for `project_root`.
    pub fn from_context(ctx: &GlobalContext, project_root: Option<&Path>) -> Self {
        let config = ctx.load_config(project_root);
        let toolchain = ToolchainProbe::host().detect();
        let triplet = ctx.triplet(&config, toolchain.triplet());
        let vcpkg = VcpkgBootstrap::new(ctx.vcpkg_root(&config)).with_repo(config.vcpkg_repo());

        tracing::debug!(
            "session: {} {}, triplet {}, vcpkg at {}",
            toolchain.os,
            toolchain.compiler_family,
            triplet,
            vcpkg.root().display()
        );

        Session::new(LibraryRegistry::builtin(), toolchain, vcpkg, triplet)
    }

    /// Use a specific cmake executable.
    pub fn with_cmake(mut self, cmake: impl Into<PathBuf>) -> Self {
        self.cmake = cmake.into();
        self
    }

    pub fn generator(&self) -> BuildConfigGenerator<'_> {
        BuildConfigGenerator::new(&self.registry, &self.toolchain)
    }

    pub fn install_target(&self, project: &Project) -> InstallTarget {
        InstallTarget::new(project.install_root(), self.triplet.clone())
    }

    pub fn cmake_builder(&self, project: &Project) -> CMakeBuilder<'_> {
        CMakeBuilder::new(project, &self.toolchain, &self.vcpkg, &self.triplet)
            .cmake_program(&self.cmake)
    }

    /// Bootstrap the vcpkg checkout on first use.
    pub fn ensure_vcpkg(&self, shell: &Shell) -> Result<()> {
        if self.vcpkg.is_ready() {
            return Ok(());
        }

        let spinner = shell.spinner(
            Status::Bootstrapping,
            format!("vcpkg into {}", self.vcpkg.root().display()),
        );
        self.vcpkg.ensure_ready()?;
        let elapsed = spinner.finish();
        shell.status(Status::Finished, format!("vcpkg bootstrap in {}", elapsed));
        Ok(())
    }
}
