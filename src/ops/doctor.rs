//! Environment and toolchain health checks.
//!
//! The `doctor` command re-runs toolchain detection and inspects the vcpkg
//! checkout without installing anything.
//!
//! ## Usage
//!
//! ```bash
//! pain doctor           # Quick check
//! pain doctor --verbose # With paths and versions
//! ```
//!
//! ## Checks Performed
//!
//! - Host OS and architecture
//! - Git, CMake and Ninja
//! - C++ compiler family and version
//! - vcpkg checkout
//! - Resolved vcpkg triplet

use std::fmt::Write;
use std::path::PathBuf;

use crate::builder::toolchain::ToolchainDescriptor;
use crate::core::abi::{CompilerFamily, Os};
use crate::sources::vcpkg::VcpkgBootstrap;
use crate::util::process;

/// Health of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    /// Required tool absent
    Missing,
    /// Works, but not as well as it could
    Degraded,
}

impl CheckStatus {
    fn marker(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "[OK]",
            CheckStatus::Missing => "[!!]",
            CheckStatus::Degraded => "[~~]",
        }
    }
}

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    pub status: CheckStatus,

    /// Human-readable status message
    pub detail: String,

    /// What to do about a non-OK status
    pub remediation: Option<String>,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn ok(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok, detail)
    }

    /// Create a check result for a missing requirement.
    pub fn missing(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Missing, detail)
    }

    /// Create a check result for a usable but degraded setup.
    pub fn degraded(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Degraded, detail)
    }

    fn with_status(
        name: impl Into<String>,
        status: CheckStatus,
        detail: impl Into<String>,
    ) -> Self {
        CheckResult {
            name: name.into(),
            status,
            detail: detail.into(),
            remediation: None,
            path: None,
            version: None,
        }
    }

    pub fn remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.path = path;
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }
}

/// All checks of one `doctor` run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticReport {
    pub checks: Vec<CheckResult>,
}

impl DiagnosticReport {
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    /// No required tool is missing.
    pub fn is_healthy(&self) -> bool {
        self.count(CheckStatus::Missing) == 0
    }
}

/// Inspect the toolchain and the vcpkg checkout.
///
/// Read-only: nothing is created, installed or modified.
pub fn diagnose(
    toolchain: &ToolchainDescriptor,
    vcpkg: &VcpkgBootstrap,
    triplet: &str,
) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();

    report.add(CheckResult::ok(
        "Host",
        format!("{} {}", toolchain.os, toolchain.arch),
    ));
    report.add(check_git(toolchain.has_git));
    report.add(check_cmake(toolchain.has_cmake));
    report.add(check_ninja(toolchain));
    report.add(check_compiler(toolchain));
    report.add(check_vcpkg(vcpkg));
    report.add(check_triplet(toolchain, triplet));

    report
}

/// Path and version of a tool found on `PATH`.
fn locate(name: &str) -> (Option<PathBuf>, Option<String>) {
    let path = process::find_executable(name);
    let version = path.as_deref().and_then(process::version_line);
    (path, version)
}

fn check_git(found: bool) -> CheckResult {
    if !found {
        return CheckResult::missing("Git", "git not found")
            .remediation("install Git; it is used to clone vcpkg");
    }
    let (path, version) = locate("git");
    CheckResult::ok("Git", "git is available")
        .with_path(path)
        .with_version(version)
}

fn check_cmake(found: bool) -> CheckResult {
    if !found {
        return CheckResult::missing("CMake", "cmake not found")
            .remediation("install CMake 3.21 or newer and add it to PATH");
    }
    let (path, version) = locate("cmake");
    CheckResult::ok("CMake", "cmake is available")
        .with_path(path)
        .with_version(version)
}

fn check_ninja(toolchain: &ToolchainDescriptor) -> CheckResult {
    if toolchain.has_ninja {
        let (path, version) = locate("ninja");
        return CheckResult::ok("Ninja", "ninja is available")
            .with_path(path)
            .with_version(version);
    }

    let detail = match toolchain.generator() {
        Some(generator) => format!("ninja not found; builds use {}", generator),
        None => "ninja not found; CMake picks its default generator".to_string(),
    };
    CheckResult::degraded("Ninja", detail).remediation("install Ninja for faster builds")
}

fn compiler_remediation(os: Os) -> &'static str {
    match os {
        Os::Windows => "install Visual Studio Build Tools (C++ workload) or MinGW-w64",
        Os::Linux => "install g++ or clang++, e.g. `sudo apt install build-essential`",
        Os::MacOs => "install the command line tools with `xcode-select --install`",
    }
}

fn check_compiler(toolchain: &ToolchainDescriptor) -> CheckResult {
    if toolchain.compiler_family == CompilerFamily::Unknown {
        return CheckResult::missing("C++ Compiler", "no C++ compiler found")
            .remediation(compiler_remediation(toolchain.os));
    }

    let version = match (&toolchain.compiler_path, toolchain.compiler_family) {
        // cl has no --version flag
        (_, CompilerFamily::Msvc) => None,
        (Some(path), _) => process::version_line(path),
        (None, _) => None,
    };

    CheckResult::ok("C++ Compiler", toolchain.compiler_family.to_string())
        .with_path(toolchain.compiler_path.clone())
        .with_version(version)
}

fn check_vcpkg(vcpkg: &VcpkgBootstrap) -> CheckResult {
    if !vcpkg.is_ready() {
        return CheckResult::degraded(
            "vcpkg",
            format!("not found at {}", vcpkg.root().display()),
        )
        .remediation("it is installed automatically by the first `pain add` or `pain build`");
    }

    CheckResult::ok("vcpkg", format!("ready at {}", vcpkg.root().display()))
        .with_path(Some(vcpkg.vcpkg_binary()))
        .with_version(vcpkg.tool_version())
}

fn check_triplet(toolchain: &ToolchainDescriptor, triplet: &str) -> CheckResult {
    if toolchain.compiler_family == CompilerFamily::Unknown {
        return CheckResult::degraded("Triplet", format!("{} (no compiler detected)", triplet))
            .remediation("set `vcpkg.triplet` in config.toml once a compiler is installed");
    }
    CheckResult::ok("Triplet", triplet)
}

/// Render a report for the terminal.
pub fn format_report(report: &DiagnosticReport, verbose: bool) -> String {
    let mut output = String::new();

    writeln!(output, "Pain Doctor").unwrap();
    writeln!(output, "===========\n").unwrap();

    for check in &report.checks {
        writeln!(
            output,
            "  {} {}: {}",
            check.status.marker(),
            check.name,
            check.detail
        )
        .unwrap();

        if let Some(remediation) = &check.remediation {
            writeln!(output, "       help: {}", remediation).unwrap();
        }
        if verbose {
            if let Some(path) = &check.path {
                writeln!(output, "       path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "       version: {}", version).unwrap();
            }
        }
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Summary: {} ok, {} degraded, {} missing",
        report.count(CheckStatus::Ok),
        report.count(CheckStatus::Degraded),
        report.count(CheckStatus::Missing)
    )
    .unwrap();

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::descriptor;
    use tempfile::TempDir;

    fn empty_host() -> ToolchainDescriptor {
        let mut toolchain = descriptor(Os::Linux, CompilerFamily::Unknown);
        toolchain.has_git = false;
        toolchain.has_cmake = false;
        toolchain
    }

    #[test]
    fn test_missing_tools_are_reported() {
        let tmp = TempDir::new().unwrap();
        let vcpkg = VcpkgBootstrap::new(tmp.path().join("vcpkg"));
        let report = diagnose(&empty_host(), &vcpkg, "x64-linux");

        assert!(!report.is_healthy());
        assert_eq!(report.get("Git").unwrap().status, CheckStatus::Missing);
        assert_eq!(report.get("CMake").unwrap().status, CheckStatus::Missing);
        assert_eq!(report.get("C++ Compiler").unwrap().status, CheckStatus::Missing);
        assert_eq!(report.get("Triplet").unwrap().status, CheckStatus::Degraded);
        assert!(report
            .checks
            .iter()
            .filter(|c| c.status != CheckStatus::Ok)
            .all(|c| c.remediation.is_some()));
    }

    #[test]
    fn test_absent_vcpkg_is_degraded_and_untouched() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("vcpkg");
        let report = diagnose(&empty_host(), &VcpkgBootstrap::new(&root), "x64-linux");

        let check = report.get("vcpkg").unwrap();
        assert_eq!(check.status, CheckStatus::Degraded);
        assert!(check.remediation.as_deref().unwrap().contains("automatically"));
        assert!(!root.exists());
    }

    #[test]
    fn test_ninja_fallback_is_noted() {
        let tmp = TempDir::new().unwrap();
        let vcpkg = VcpkgBootstrap::new(tmp.path().join("vcpkg"));
        let mut toolchain = descriptor(Os::Windows, CompilerFamily::MinGw);
        toolchain.has_mingw_make = true;

        let report = diagnose(&toolchain, &vcpkg, "x64-mingw-dynamic");
        let ninja = report.get("Ninja").unwrap();
        assert_eq!(ninja.status, CheckStatus::Degraded);
        assert!(ninja.detail.contains("MinGW Makefiles"));
        assert_eq!(report.get("Triplet").unwrap().detail, "x64-mingw-dynamic");
    }

    #[cfg(unix)]
    #[test]
    fn test_ready_vcpkg() {
        let tmp = TempDir::new().unwrap();
        let vcpkg = VcpkgBootstrap::new(crate::test_support::fake_vcpkg_root(tmp.path()));
        let toolchain = descriptor(Os::Linux, CompilerFamily::Gcc);

        let report = diagnose(&toolchain, &vcpkg, "x64-linux");
        let check = report.get("vcpkg").unwrap();
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.version.as_deref().unwrap().contains("2099-01-01-fake"));
    }

    #[test]
    fn test_format_report() {
        let mut report = DiagnosticReport::default();
        report.add(
            CheckResult::ok("Git", "git is available")
                .with_version(Some("git version 2.45".to_string())),
        );
        report.add(CheckResult::missing("CMake", "cmake not found").remediation("install CMake"));

        let quiet = format_report(&report, false);
        assert!(quiet.contains("[OK] Git: git is available"));
        assert!(quiet.contains("[!!] CMake: cmake not found"));
        assert!(quiet.contains("help: install CMake"));
        assert!(!quiet.contains("git version 2.45"));
        assert!(quiet.contains("Summary: 1 ok, 0 degraded, 1 missing"));

        assert!(format_report(&report, true).contains("version: git version 2.45"));
    }
}
