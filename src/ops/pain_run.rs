//! Implementation of `pain run`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::abi::Os;
use crate::core::error::PainError;
use crate::core::project::Project;
use crate::util::process::ProcessBuilder;

/// Run the built executable with `args`, forwarded verbatim.
///
/// A non-zero exit becomes [`PainError::Run`] carrying the child's code.
pub fn run(project: &Project, os: Os, args: &[String]) -> Result<PathBuf> {
    let exe = project.find_executable(os)?;
    tracing::info!("running {}", exe.display());

    let status = ProcessBuilder::new(&exe)
        .args(args)
        .cwd(project.root())
        .status()?;

    if !status.success() {
        return Err(PainError::Run {
            exit_code: status.code(),
        }
        .into());
    }
    Ok(exe)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::manifest::ProjectManifest;
    use crate::test_support::write_script;
    use tempfile::TempDir;

    fn project_with_exe(tmp: &TempDir, body: &str) -> Project {
        let project = Project::new(tmp.path().to_path_buf(), ProjectManifest::new("demo"));
        write_script(&project.build_dir().join("Debug").join("demo"), body);
        project
    }

    #[test]
    fn test_run_forwards_arguments() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("args.txt");
        let project = project_with_exe(
            &tmp,
            &format!("#!/bin/sh\nprintf '%s|' \"$@\" > '{}'\n", out.display()),
        );

        let args = vec!["--flag".to_string(), "two words".to_string(), "--".to_string()];
        let exe = run(&project, Os::Linux, &args).unwrap();

        assert_eq!(exe, project.build_dir().join("Debug").join("demo"));
        assert_eq!(std::fs::read_to_string(out).unwrap(), "--flag|two words|--|");
    }

    #[test]
    fn test_run_forwards_exit_code() {
        let tmp = TempDir::new().unwrap();
        let project = project_with_exe(&tmp, "#!/bin/sh\nexit 7\n");

        let err = run(&project, Os::Linux, &[]).unwrap_err();
        let err = err.downcast_ref::<PainError>().unwrap();
        assert!(matches!(err, PainError::Run { exit_code: Some(7) }));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_run_without_build() {
        let tmp = TempDir::new().unwrap();
        let project = Project::new(tmp.path().to_path_buf(), ProjectManifest::new("demo"));

        let err = run(&project, Os::Linux, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PainError>(),
            Some(PainError::NotFound { kind: "executable", .. })
        ));
    }
}
