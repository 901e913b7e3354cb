//! Host identity vocabulary.
//!
//! The (OS, compiler family) pair decides which vcpkg triplet is used and
//! which per-toolchain quirks a library recipe contributes.

use std::fmt;

/// Host operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Linux,
    MacOs,
}

impl Os {
    /// Detect the host operating system.
    ///
    /// Unix-likes other than macOS are treated as Linux: they share the
    /// triplet naming and the generator choice.
    pub fn host() -> Self {
        Self::from_consts(std::env::consts::OS)
    }

    fn from_consts(os: &str) -> Self {
        match os {
            "windows" => Os::Windows,
            "macos" => Os::MacOs,
            _ => Os::Linux,
        }
    }

    /// Suffix used for executables on this OS.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Os::Windows => ".exe",
            Os::Linux | Os::MacOs => "",
        }
    }

    /// vcpkg triplet OS component.
    fn triplet_os(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::MacOs => "osx",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::MacOs => "macOS",
        };
        f.write_str(s)
    }
}

/// Compiler family of the primary C++ compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilerFamily {
    Msvc,
    MinGw,
    Gcc,
    Clang,
    Unknown,
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompilerFamily::Msvc => "MSVC",
            CompilerFamily::MinGw => "MinGW",
            CompilerFamily::Gcc => "GCC",
            CompilerFamily::Clang => "Clang",
            CompilerFamily::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Compute the vcpkg triplet for a host.
pub fn infer_triplet(os: Os, family: CompilerFamily, arch: &str) -> String {
    let arch = match arch {
        "x86_64" | "amd64" => "x64",
        "x86" | "i686" | "i386" => "x86",
        "aarch64" | "arm64" => "arm64",
        "arm" => "arm",
        _ => "x64",
    };

    match (os, family) {
        (Os::Windows, CompilerFamily::MinGw) => format!("{}-mingw-dynamic", arch),
        _ => format!("{}-{}", arch, os.triplet_os()),
    }
}
