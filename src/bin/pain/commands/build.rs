//! `pain build` command

use std::time::Instant;

use anyhow::Result;

use super::current_project;
use crate::cli::BuildArgs;
use crate::GlobalOptions;
use pain::ops::{build, BuildOptions, Session};
use pain::util::shell::format_duration;
use pain::util::{GlobalContext, Status};

pub fn execute(args: BuildArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let start = Instant::now();
    let ctx = GlobalContext::new()?;
    let mut project = current_project(&ctx)?;
    let session = Session::from_context(&ctx, Some(project.root()));

    let opts = BuildOptions {
        build_type: args.build_type,
    };
    let result = build(&mut project, &session, &opts, shell)?;

    for port in &result.installed {
        shell.status(Status::Added, port);
    }
    shell.status(
        Status::Finished,
        format!(
            "{} build of `{}` in {}",
            result.build_type,
            project.name(),
            format_duration(start.elapsed())
        ),
    );
    if let Some(exe) = &result.executable {
        shell.note(exe.display());
    }
    Ok(())
}
