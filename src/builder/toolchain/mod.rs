//! Host toolchain description.
//!
//! A [`ToolchainDescriptor`] is recomputed on every invocation and never
//! persisted: the compilers on the host can change between runs. It decides
//! the vcpkg triplet, the CMake generator and the compiler environment.
//!
//! Compiler family precedence is fixed per OS:
//! - Windows: MSVC (`cl`) > MinGW (`g++`, `mingw32-make`, prefixed `g++`) > Clang
//! - Linux: GCC > Clang
//! - macOS: Clang > GCC

use std::path::PathBuf;

use crate::core::abi::{infer_triplet, CompilerFamily, Os};

mod detect;

pub use detect::{PathLocator, ToolLocator, ToolchainProbe};

/// Prefixed MinGW-w64 C compiler.
pub const MINGW_PREFIXED_CC: &str = "x86_64-w64-mingw32-gcc";

/// Prefixed MinGW-w64 C++ compiler.
pub const MINGW_PREFIXED_CXX: &str = "x86_64-w64-mingw32-g++";

/// Everything the build steps need to know about the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    pub os: Os,
    /// `std::env::consts::ARCH` spelling.
    pub arch: String,
    pub compiler_family: CompilerFamily,
    /// The compiler executable that decided `compiler_family`.
    pub compiler_path: Option<PathBuf>,
    pub has_git: bool,
    pub has_cmake: bool,
    pub has_ninja: bool,
    pub has_make: bool,
    pub has_mingw_make: bool,
    /// `x86_64-w64-mingw32-gcc` is on the search path.
    pub has_prefixed_mingw: bool,
}

impl ToolchainDescriptor {
    /// The vcpkg triplet matching this host.
    pub fn triplet(&self) -> String {
        infer_triplet(self.os, self.compiler_family, &self.arch)
    }

    /// CMake generator to request, or `None` to let CMake choose.
    pub fn generator(&self) -> Option<&'static str> {
        if self.has_ninja {
            return Some("Ninja");
        }
        match self.os {
            Os::Windows => {
                if self.compiler_family == CompilerFamily::Msvc {
                    Some("NMake Makefiles")
                } else if self.has_mingw_make {
                    Some("MinGW Makefiles")
                } else if self.has_make {
                    Some("Unix Makefiles")
                } else {
                    None
                }
            }
            Os::Linux | Os::MacOs => Some("Unix Makefiles"),
        }
    }

    /// `CC`/`CXX` overrides for the configure step.
    ///
    /// Only MinGW needs them: CMake would otherwise pick up MSVC or a
    /// mismatched compiler on Windows.
    pub fn compiler_env(&self) -> Vec<(&'static str, &'static str)> {
        if self.compiler_family != CompilerFamily::MinGw {
            return Vec::new();
        }
        if self.has_prefixed_mingw {
            vec![("CC", MINGW_PREFIXED_CC), ("CXX", MINGW_PREFIXED_CXX)]
        } else {
            vec![("CC", "gcc"), ("CXX", "g++")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::descriptor;

    #[test]
    fn test_generator_prefers_ninja() {
        let mut desc = descriptor(Os::Windows, CompilerFamily::Msvc);
        desc.has_ninja = true;
        assert_eq!(desc.generator(), Some("Ninja"));
    }

    #[test]
    fn test_generator_windows_fallbacks() {
        let desc = descriptor(Os::Windows, CompilerFamily::Msvc);
        assert_eq!(desc.generator(), Some("NMake Makefiles"));

        let mut desc = descriptor(Os::Windows, CompilerFamily::MinGw);
        desc.has_mingw_make = true;
        assert_eq!(desc.generator(), Some("MinGW Makefiles"));

        let mut desc = descriptor(Os::Windows, CompilerFamily::Clang);
        assert_eq!(desc.generator(), None);
        desc.has_make = true;
        assert_eq!(desc.generator(), Some("Unix Makefiles"));
    }

    #[test]
    fn test_generator_unix() {
        let desc = descriptor(Os::Linux, CompilerFamily::Gcc);
        assert_eq!(desc.generator(), Some("Unix Makefiles"));
    }

    #[test]
    fn test_triplet() {
        assert_eq!(
            descriptor(Os::Windows, CompilerFamily::MinGw).triplet(),
            "x64-mingw-dynamic"
        );
        assert_eq!(descriptor(Os::Linux, CompilerFamily::Gcc).triplet(), "x64-linux");
    }

    #[test]
    fn test_compiler_env() {
        assert!(descriptor(Os::Windows, CompilerFamily::Msvc)
            .compiler_env()
            .is_empty());

        let mut desc = descriptor(Os::Windows, CompilerFamily::MinGw);
        assert_eq!(desc.compiler_env(), vec![("CC", "gcc"), ("CXX", "g++")]);

        desc.has_prefixed_mingw = true;
        assert_eq!(
            desc.compiler_env(),
            vec![("CC", MINGW_PREFIXED_CC), ("CXX", MINGW_PREFIXED_CXX)]
        );
    }
}
