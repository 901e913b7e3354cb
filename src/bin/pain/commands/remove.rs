//! `pain remove` command

use anyhow::Result;

use super::current_project;
use crate::cli::RemoveArgs;
use crate::GlobalOptions;
use pain::ops::{remove_dependency, Session};
use pain::util::{GlobalContext, Status};

pub fn execute(args: RemoveArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let mut project = current_project(&ctx)?;
    let session = Session::from_context(&ctx, Some(project.root()));

    let result = remove_dependency(&mut project, &session, &args.library, shell)?;

    if let Some(warning) = &result.warning {
        shell.warn(format!(
            "`{}` stays installed in {}: {}",
            result.install_id,
            project.install_root().display(),
            warning
        ));
    }
    shell.status(Status::Removed, &result.name);
    Ok(())
}
