//! `pain run` command

use anyhow::Result;

use super::current_project;
use crate::cli::RunArgs;
use crate::GlobalOptions;
use pain::core::abi::Os;
use pain::ops::run;
use pain::util::{GlobalContext, Status};

pub fn execute(args: RunArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let project = current_project(&ctx)?;

    shell.status(Status::Running, format!("`{}`", project.name()));
    run(&project, Os::host(), &args.args)?;
    Ok(())
}
