//! Implementation of `pain open`.

use std::path::Path;

use anyhow::{bail, Result};

use crate::core::abi::Os;
use crate::util::process::ProcessBuilder;

/// File browser launcher for an OS.
pub fn opener(os: Os) -> &'static str {
    match os {
        Os::Windows => "explorer",
        Os::MacOs => "open",
        Os::Linux => "xdg-open",
    }
}

/// Open `path` in the host file browser.
///
/// Best effort: callers log the error and carry on.
pub fn open_in_file_browser(path: &Path) -> Result<()> {
    let os = Os::host();
    open_with(Path::new(opener(os)), path, os)
}

fn open_with(program: &Path, path: &Path, os: Os) -> Result<()> {
    let output = ProcessBuilder::new(program).arg(path).exec()?;

    // explorer exits with 1 even when the window opened
    if !output.status.success() && os != Os::Windows {
        bail!("`{}` exited with {}", program.display(), output.status);
    }
    Ok(())
}
