//! Toolchain detection.

use std::path::PathBuf;

use crate::core::abi::{CompilerFamily, Os};

use super::{ToolchainDescriptor, MINGW_PREFIXED_CC, MINGW_PREFIXED_CXX};

/// Finds executables by name.
pub trait ToolLocator {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Searches `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Compiler candidates in precedence order, per OS.
fn compiler_candidates(os: Os) -> &'static [(&'static str, CompilerFamily)] {
    match os {
        Os::Windows => &[
            ("cl", CompilerFamily::Msvc),
            ("g++", CompilerFamily::MinGw),
            (MINGW_PREFIXED_CXX, CompilerFamily::MinGw),
            ("mingw32-make", CompilerFamily::MinGw),
            ("clang++", CompilerFamily::Clang),
        ],
        Os::Linux => &[("g++", CompilerFamily::Gcc), ("clang++", CompilerFamily::Clang)],
        Os::MacOs => &[("clang++", CompilerFamily::Clang), ("g++", CompilerFamily::Gcc)],
    }
}

/// Inspects the host for compilers and build tools.
///
/// Never fails: missing tools show up as `false` or
/// [`CompilerFamily::Unknown`] in the descriptor.
#[derive(Debug, Clone)]
pub struct ToolchainProbe<L = PathLocator> {
    locator: L,
    os: Os,
    arch: String,
}

impl ToolchainProbe<PathLocator> {
    /// Probe the current host through `PATH`.
    pub fn host() -> Self {
        ToolchainProbe::new(PathLocator, Os::host(), std::env::consts::ARCH)
    }
}

impl<L: ToolLocator> ToolchainProbe<L> {
    pub fn new(locator: L, os: Os, arch: impl Into<String>) -> Self {
        ToolchainProbe {
            locator,
            os,
            arch: arch.into(),
        }
    }

    fn has(&self, name: &str) -> bool {
        self.locator.locate(name).is_some()
    }

    /// Detect the primary compiler family by fixed precedence.
    fn detect_compiler(&self) -> (CompilerFamily, Option<PathBuf>) {
        for (name, family) in compiler_candidates(self.os) {
            if let Some(path) = self.locator.locate(name) {
                tracing::debug!("found `{}` at {}, compiler family {}", name, path.display(), family);

                // mingw32-make alone identifies the family but is not a compiler.
                let compiler_path = if *name == "mingw32-make" { None } else { Some(path) };
                return (*family, compiler_path);
            }
        }

        tracing::debug!("no C++ compiler found for {}", self.os);
        (CompilerFamily::Unknown, None)
    }

    /// Inspect the host.
    pub fn detect(&self) -> ToolchainDescriptor {
        let (compiler_family, compiler_path) = self.detect_compiler();

        ToolchainDescriptor {
            os: self.os,
            arch: self.arch.clone(),
            compiler_family,
            compiler_path,
            has_git: self.has("git"),
            has_cmake: self.has("cmake"),
            has_ninja: self.has("ninja"),
            has_make: self.has("make"),
            has_mingw_make: self.has("mingw32-make"),
            has_prefixed_mingw: self.has(MINGW_PREFIXED_CC),
        }
    }
}
