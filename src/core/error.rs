//! Error taxonomy for project and dependency operations.
//!
//! Every variant carries enough context to render a one-line actionable
//! message. Output captured from a failing child process is kept separately
//! in `output_tail` and printed below the message by the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Number of trailing output lines kept from a failed child process.
pub const OUTPUT_TAIL_LINES: usize = 20;

/// Errors surfaced by Pain operations.
#[derive(Debug, Error)]
pub enum PainError {
    #[error("`{}` already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("{kind} `{name}` not found")]
    NotFound { kind: &'static str, name: String },

    #[error("manifest `{}` is corrupt: {message}", path.display())]
    CorruptManifest { path: PathBuf, message: String },

    #[error("failed to set up vcpkg at `{}`: {message}", root.display())]
    Bootstrap { root: PathBuf, message: String },

    #[error("vcpkg failed for `{install_id}` ({})", describe_exit(.exit_code))]
    Install {
        install_id: String,
        exit_code: Option<i32>,
        output_tail: String,
    },

    #[error("build failed during {stage} ({})", describe_exit(.exit_code))]
    Build {
        stage: &'static str,
        exit_code: Option<i32>,
        output_tail: String,
    },

    #[error("program exited with {}", describe_exit(.exit_code))]
    Run { exit_code: Option<i32> },

    #[error("invalid {kind} name `{name}`")]
    InvalidName { kind: &'static str, name: String },
}

impl PainError {
    /// Create a not-found error for a missing manifest.
    pub fn manifest_not_found(dir: &std::path::Path) -> Self {
        PainError::NotFound {
            kind: "manifest",
            name: dir.display().to_string(),
        }
    }

    /// Create a not-found error for a dependency absent from the manifest.
    pub fn dependency_not_found(name: impl Into<String>) -> Self {
        PainError::NotFound {
            kind: "dependency",
            name: name.into(),
        }
    }

    /// Name of the error kind, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PainError::AlreadyExists { .. } => "AlreadyExistsError",
            PainError::NotFound { .. } => "NotFoundError",
            PainError::CorruptManifest { .. } => "CorruptManifestError",
            PainError::Bootstrap { .. } => "BootstrapError",
            PainError::Install { .. } => "InstallError",
            PainError::Build { .. } => "BuildError",
            PainError::Run { .. } => "RunError",
            PainError::InvalidName { .. } => "InvalidNameError",
        }
    }

    /// Process exit status the CLI should use for this error.
    ///
    /// `Run` forwards the child's own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            PainError::Run {
                exit_code: Some(code),
            } if *code != 0 => *code,
            PainError::Build {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Captured child output, if any.
    pub fn output_tail(&self) -> Option<&str> {
        match self {
            PainError::Install { output_tail, .. } | PainError::Build { output_tail, .. }
                if !output_tail.is_empty() =>
            {
                Some(output_tail.as_str())
            }
            _ => None,
        }
    }

    /// A short hint for fixing the problem.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            PainError::AlreadyExists { .. } => {
                Some("choose another name or remove the existing project")
            }
            PainError::NotFound { kind: "executable", .. } => Some("run `pain build` first"),
            PainError::NotFound { kind: "manifest", .. } => {
                Some("run `pain init <name>` to create a project")
            }
            PainError::CorruptManifest { .. } => Some("fix or recreate Pain.toml"),
            PainError::Bootstrap { .. } => {
                Some("check your network connection and run `pain doctor`")
            }
            PainError::NotFound { kind: "dependency", .. } => {
                Some("run `pain list` to see the project's dependencies")
            }
            PainError::Build { .. } => Some("run `pain doctor` to check the toolchain"),
            PainError::InvalidName { kind: "project", .. } => {
                Some("use letters, digits, `_` and `-`, not starting with `-`")
            }
            PainError::InvalidName { kind: "library", .. } => {
                Some("use a vcpkg port name, optionally with features: `sfml[audio,network]`")
            }
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Keep the last [`OUTPUT_TAIL_LINES`] non-empty lines of child output.
///
/// vcpkg reports most failures on stdout, so stdout is used when stderr is
/// empty.
pub fn output_tail(stdout: &[u8], stderr: &[u8]) -> String {
    let text = if stderr.iter().all(u8::is_ascii_whitespace) {
        String::from_utf8_lossy(stdout)
    } else {
        String::from_utf8_lossy(stderr)
    };

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_error_message() {
        let err = PainError::Install {
            install_id: "fmt".to_string(),
            exit_code: Some(2),
            output_tail: "error: port not found".to_string(),
        };
        assert_eq!(err.to_string(), "vcpkg failed for `fmt` (exit code 2)");
        assert_eq!(err.kind(), "InstallError");
        assert_eq!(err.output_tail(), Some("error: port not found"));
    }

    #[test]
    fn test_run_error_forwards_exit_code() {
        let err = PainError::Run { exit_code: Some(42) };
        assert_eq!(err.exit_code(), 42);

        let err = PainError::Run { exit_code: None };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_not_found_help() {
        let err = PainError::NotFound {
            kind: "executable",
            name: "demo".to_string(),
        };
        assert_eq!(err.help(), Some("run `pain build` first"));
        assert_eq!(err.to_string(), "executable `demo` not found");
    }

    #[test]
    fn test_output_tail_prefers_stderr() {
        let tail = output_tail(b"stdout line\n", b"first\n\nsecond\n");
        assert_eq!(tail, "first\nsecond");

        let tail = output_tail(b"only stdout\n", b"  \n");
        assert_eq!(tail, "only stdout");
    }

    #[test]
    fn test_output_tail_truncates() {
        let stderr: String = (0..50).map(|i| format!("line {}\n", i)).collect();
        let tail = output_tail(b"", stderr.as_bytes());
        let lines: Vec<&str> = tail.lines().collect();
        assert_eq!(lines.len(), OUTPUT_TAIL_LINES);
        assert_eq!(lines[0], "line 30");
        assert_eq!(lines[OUTPUT_TAIL_LINES - 1], "line 49");
    }
}
