//! `pain clean` command

use anyhow::Result;

use super::current_project;
use crate::cli::CleanArgs;
use crate::GlobalOptions;
use pain::ops::clean;
use pain::util::{GlobalContext, Status};

pub fn execute(_args: CleanArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let project = current_project(&ctx)?;

    let removed = clean(&project)?;
    for dir in &removed {
        shell.status(Status::Removed, dir.display());
    }
    if removed.is_empty() {
        shell.status(Status::Cleaned, "nothing to remove");
    } else {
        shell.status(Status::Cleaned, project.name());
    }
    Ok(())
}
