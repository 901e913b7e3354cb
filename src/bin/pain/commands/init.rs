//! `pain init` command

use anyhow::Result;

use crate::cli::InitArgs;
use crate::GlobalOptions;
use pain::ops::{init_project, Session};
use pain::util::{GlobalContext, Status};

pub fn execute(args: InitArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let session = Session::from_context(&ctx, None);

    let project = init_project(ctx.cwd(), &args.name, &session.generator())?;

    shell.status(
        Status::Created,
        format!("`{}` at {}", project.name(), project.root().display()),
    );
    shell.note(format!(
        "next: `cd {}`, then `pain add <library>` and `pain build`",
        project.name()
    ));
    Ok(())
}
