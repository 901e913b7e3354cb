//! vcpkg checkout management and port installation.
//!
//! One vcpkg checkout is shared by every project. Ports are installed in
//! classic mode into a per-project install root (`<project>/vcpkg_installed`)
//! so projects never see each other's libraries:
//!
//! ```text
//! <project>/vcpkg_installed/<triplet>/
//! ├── include/
//! ├── lib/
//! └── share/<port>/
//!     └── vcpkg.json        # Port metadata (version info)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::FetchOptions;
use serde::Deserialize;

use crate::core::abi::Os;
use crate::core::error::{output_tail, PainError};
use crate::util::config::DEFAULT_VCPKG_REPO;
use crate::util::fs;
use crate::util::process::{self, ProcessBuilder};

/// Metadata from a port's installed vcpkg.json file.
#[derive(Debug, Deserialize)]
struct VcpkgPortInfo {
    #[serde(default)]
    version: Option<String>,
    #[serde(rename = "version-string", default)]
    version_string: Option<String>,
    #[serde(rename = "version-semver", default)]
    version_semver: Option<String>,
    #[serde(rename = "version-date", default)]
    version_date: Option<String>,
    #[serde(rename = "port-version", default)]
    port_version: Option<u32>,
}

impl VcpkgPortInfo {
    /// Version from whichever version field is set, with `#port-version`
    /// appended when non-zero.
    fn display_version(&self) -> Option<String> {
        let version = self
            .version
            .as_deref()
            .or(self.version_semver.as_deref())
            .or(self.version_string.as_deref())
            .or(self.version_date.as_deref())?;

        Some(match self.port_version {
            Some(n) if n > 0 => format!("{}#{}", version, n),
            _ => version.to_string(),
        })
    }
}

/// Where an installed port's files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPaths {
    pub port: String,
    /// `<install-root>/<triplet>`
    pub prefix: PathBuf,
}

impl InstalledPaths {
    pub fn new(install_root: &Path, triplet: &str, port: &str) -> Self {
        InstalledPaths {
            port: port.to_string(),
            prefix: install_root.join(triplet),
        }
    }

    pub fn include_dir(&self) -> PathBuf {
        self.prefix.join("include")
    }

    pub fn share_dir(&self) -> PathBuf {
        self.prefix.join("share").join(&self.port)
    }

    /// The port's installed `vcpkg.json`.
    pub fn metadata_path(&self) -> PathBuf {
        self.share_dir().join("vcpkg.json")
    }
}

/// A project-side install location: install root plus triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub install_root: PathBuf,
    pub triplet: String,
}

impl InstallTarget {
    pub fn new(install_root: impl Into<PathBuf>, triplet: impl Into<String>) -> Self {
        InstallTarget {
            install_root: install_root.into(),
            triplet: triplet.into(),
        }
    }

    pub fn paths(&self, port: &str) -> InstalledPaths {
        InstalledPaths::new(&self.install_root, &self.triplet, port)
    }

    fn root_arg(&self) -> String {
        format!("--x-install-root={}", self.install_root.display())
    }

    /// Directory vcpkg runs in: the project root.
    fn working_dir(&self) -> &Path {
        self.install_root.parent().unwrap_or(&self.install_root)
    }
}

/// The shared vcpkg checkout.
#[derive(Debug, Clone)]
pub struct VcpkgBootstrap {
    root: PathBuf,
    repo: String,
    os: Os,
}

impl VcpkgBootstrap {
    /// A checkout at `root`, cloned from the default repository if absent.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        VcpkgBootstrap {
            root: root.into(),
            repo: DEFAULT_VCPKG_REPO.to_string(),
            os: Os::host(),
        }
    }

    /// Use another clone source.
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = repo.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn vcpkg_binary(&self) -> PathBuf {
        self.root.join(format!("vcpkg{}", self.os.exe_suffix()))
    }

    /// CMake toolchain file shipped with vcpkg.
    pub fn toolchain_file(&self) -> PathBuf {
        self.root
            .join("scripts")
            .join("buildsystems")
            .join("vcpkg.cmake")
    }

    fn bootstrap_script(&self) -> PathBuf {
        match self.os {
            Os::Windows => self.root.join("bootstrap-vcpkg.bat"),
            Os::Linux | Os::MacOs => self.root.join("bootstrap-vcpkg.sh"),
        }
    }

    /// Whether the vcpkg executable exists.
    pub fn is_ready(&self) -> bool {
        self.vcpkg_binary().is_file()
    }

    /// Environment every vcpkg and CMake invocation runs with.
    pub fn env(&self, triplet: &str) -> Vec<(&'static str, String)> {
        vec![
            ("VCPKG_ROOT", self.root.display().to_string()),
            ("VCPKG_DEFAULT_TRIPLET", triplet.to_string()),
            ("VCPKG_DEFAULT_HOST_TRIPLET", triplet.to_string()),
        ]
    }

    /// Clone and bootstrap the checkout if the executable is missing.
    ///
    /// Idempotent. Failures are reported as [`PainError::Bootstrap`] and
    /// never retried.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        if !self.root.exists() {
            self.clone_checkout()?;
        }

        let script = self.bootstrap_script();
        if !script.is_file() {
            return Err(self.bootstrap_error(format!(
                "`{}` is missing; the directory is not a vcpkg checkout",
                script.display()
            )));
        }

        tracing::info!("bootstrapping vcpkg in {}", self.root.display());
        let output = ProcessBuilder::new(&script)
            .arg("-disableMetrics")
            .cwd(&self.root)
            .exec()?;

        if !output.status.success() {
            let tail = output_tail(&output.stdout, &output.stderr);
            return Err(self.bootstrap_error(format!(
                "`{}` failed with {:?}\n{}",
                script.display(),
                output.status.code(),
                tail
            )));
        }

        if !self.is_ready() {
            return Err(self.bootstrap_error(format!(
                "bootstrap finished but `{}` was not produced",
                self.vcpkg_binary().display()
            )));
        }

        Ok(())
    }

    fn clone_checkout(&self) -> Result<()> {
        tracing::info!("cloning {} into {}", self.repo, self.root.display());

        if let Some(parent) = self.root.parent() {
            fs::ensure_dir(parent)?;
        }

        let mut fetch = FetchOptions::new();
        fetch.depth(1);

        match RepoBuilder::new()
            .fetch_options(fetch)
            .clone(&self.repo, &self.root)
        {
            Ok(_) => Ok(()),
            Err(e) => {
                // A half-cloned directory would be mistaken for a checkout next time.
                if let Err(cleanup) = fs::remove_dir_all_if_exists(&self.root) {
                    tracing::warn!("{:#}", cleanup);
                }
                Err(self.bootstrap_error(format!("failed to clone {}: {}", self.repo, e.message())))
            }
        }
    }

    fn bootstrap_error(&self, message: String) -> anyhow::Error {
        PainError::Bootstrap {
            root: self.root.clone(),
            message,
        }
        .into()
    }

    fn vcpkg(&self, target: &InstallTarget) -> ProcessBuilder {
        ProcessBuilder::new(self.vcpkg_binary()).envs(self.env(&target.triplet))
    }

    /// Install one port, with the given features, into the project install
    /// root.
    pub fn install(
        &self,
        install_id: &str,
        features: &[String],
        target: &InstallTarget,
    ) -> Result<InstalledPaths> {
        let output = self
            .vcpkg(target)
            .arg("install")
            .arg(port_spec(install_id, features))
            .args(["--triplet", target.triplet.as_str(), "--host-triplet", target.triplet.as_str()])
            .arg(target.root_arg())
            .cwd(target.working_dir())
            .exec()?;

        if !output.status.success() {
            let mut tail = output_tail(&output.stdout, &output.stderr);
            let hint = diagnose_install_error(&tail);
            if !hint.is_empty() {
                tail.push('\n');
                tail.push_str(hint);
            }
            return Err(PainError::Install {
                install_id: install_id.to_string(),
                exit_code: output.status.code(),
                output_tail: tail,
            }
            .into());
        }

        Ok(target.paths(install_id))
    }

    /// Remove one port from the project install root.
    pub fn uninstall(&self, install_id: &str, target: &InstallTarget) -> Result<()> {
        let output = self
            .vcpkg(target)
            .arg("remove")
            .arg(install_id)
            .args(["--triplet", target.triplet.as_str()])
            .arg(target.root_arg())
            .cwd(target.working_dir())
            .exec()?;

        if !output.status.success() {
            return Err(PainError::Install {
                install_id: install_id.to_string(),
                exit_code: output.status.code(),
                output_tail: output_tail(&output.stdout, &output.stderr),
            }
            .into());
        }
        Ok(())
    }

    /// Whether a port has been installed for this target.
    pub fn is_installed(&self, install_id: &str, target: &InstallTarget) -> bool {
        target.paths(install_id).share_dir().is_dir()
    }

    /// Installed version of a port, read from its metadata.
    pub fn installed_version(
        &self,
        install_id: &str,
        target: &InstallTarget,
    ) -> Result<Option<String>> {
        let path = target.paths(install_id).metadata_path();
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let info: VcpkgPortInfo = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse vcpkg metadata: {}", path.display()))?;
        Ok(info.display_version())
    }

    /// First line of `vcpkg version`, if vcpkg runs.
    pub fn tool_version(&self) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        process::version_line(&self.vcpkg_binary())
    }
}

/// Package spec passed to `vcpkg install`: `sfml` or `sfml[audio,network]`.
pub fn port_spec(install_id: &str, features: &[String]) -> String {
    if features.is_empty() {
        install_id.to_string()
    } else {
        format!("{}[{}]", install_id, features.join(","))
    }
}

/// Hint for common vcpkg install failures.
fn diagnose_install_error(output: &str) -> &'static str {
    if output.contains("could not find a port named") || output.contains("does not exist") {
        return "hint: check the port name with `vcpkg search <name>`";
    }
    if output.contains("triplet") && output.contains("not found") {
        return "hint: check available triplets with `vcpkg help triplet`";
    }
    if output.contains("error: building") || output.contains("CMake Error") {
        return "hint: the port failed to build; missing system packages are a common cause";
    }
    ""
}
