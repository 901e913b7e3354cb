//! CMake configure and compile steps for a project.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::toolchain::ToolchainDescriptor;
use crate::core::error::{output_tail, PainError};
use crate::core::manifest::BuildType;
use crate::core::project::Project;
use crate::sources::vcpkg::VcpkgBootstrap;
use crate::util::fs;
use crate::util::process::ProcessBuilder;

/// Cache entry recording the triplet a build directory was configured with.
const TRIPLET_CACHE_KEY: &str = "VCPKG_TARGET_TRIPLET";

/// CMake driver for one project build.
pub struct CMakeBuilder<'a> {
    cmake: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_root: PathBuf,
    build_type: BuildType,
    triplet: &'a str,
    toolchain: &'a ToolchainDescriptor,
    vcpkg: &'a VcpkgBootstrap,
}

impl<'a> CMakeBuilder<'a> {
    pub fn new(
        project: &Project,
        toolchain: &'a ToolchainDescriptor,
        vcpkg: &'a VcpkgBootstrap,
        triplet: &'a str,
    ) -> Self {
        CMakeBuilder {
            cmake: PathBuf::from("cmake"),
            source_dir: project.root().to_path_buf(),
            build_dir: project.build_dir(),
            install_root: project.install_root(),
            build_type: project.manifest().build_type,
            triplet,
            toolchain,
            vcpkg,
        }
    }

    /// Use a specific cmake executable.
    pub fn cmake_program(mut self, cmake: impl Into<PathBuf>) -> Self {
        self.cmake = cmake.into();
        self
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    fn command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.cmake)
            .envs(self.vcpkg.env(self.triplet))
            .envs(self.toolchain.compiler_env())
            .cwd(&self.source_dir)
    }

    /// The configure invocation.
    pub fn configure_command(&self) -> ProcessBuilder {
        let mut cmd = self
            .command()
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                self.vcpkg.toolchain_file().display()
            ))
            .arg(format!("-D{}={}", TRIPLET_CACHE_KEY, self.triplet))
            .arg(format!("-DVCPKG_HOST_TRIPLET={}", self.triplet))
            .arg(format!("-DVCPKG_INSTALLED_DIR={}", self.install_root.display()))
            .arg("-DVCPKG_MANIFEST_MODE=OFF")
            .arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));

        if let Some(generator) = self.toolchain.generator() {
            cmd = cmd.arg("-G").arg(generator);
        }
        cmd
    }

    /// The compile invocation.
    pub fn compile_command(&self) -> ProcessBuilder {
        self.command()
            .arg("--build")
            .arg(&self.build_dir)
            .arg("--config")
            .arg(self.build_type.as_str())
    }

    /// Run CMake configuration.
    pub fn configure(&self) -> Result<()> {
        fs::ensure_dir(&self.build_dir)?;
        run_stage("configure", self.configure_command())
    }

    /// Run CMake build.
    pub fn compile(&self) -> Result<()> {
        run_stage("compile", self.compile_command())
    }
}

fn run_stage(stage: &'static str, cmd: ProcessBuilder) -> Result<()> {
    let output = cmd
        .exec()
        .context("could not run CMake; run `pain doctor` to check the toolchain")?;

    if !output.status.success() {
        return Err(PainError::Build {
            stage,
            exit_code: output.status.code(),
            output_tail: output_tail(&output.stdout, &output.stderr),
        }
        .into());
    }
    Ok(())
}

/// Triplet recorded in `CMakeCache.txt`, if the build directory has one.
pub fn cached_triplet(cache_path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(cache_path).ok()?;
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        let name = key.split(':').next()?;
        (name == TRIPLET_CACHE_KEY).then(|| value.trim().to_string())
    })
}

/// Remove the build directory if it was configured for another triplet.
///
/// Returns the stale triplet when the directory was removed.
pub fn clean_stale_build(project: &Project, triplet: &str) -> Result<Option<String>> {
    match cached_triplet(&project.cmake_cache_path()) {
        Some(cached) if cached != triplet => {
            fs::remove_dir_all_if_exists(&project.build_dir())?;
            Ok(Some(cached))
        }
        _ => Ok(None),
    }
}
