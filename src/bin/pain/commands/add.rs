//! `pain add` command

use anyhow::Result;

use super::current_project;
use crate::cli::AddArgs;
use crate::GlobalOptions;
use pain::ops::{add_dependency, AddOutcome, Session};
use pain::sources::vcpkg::port_spec;
use pain::util::{GlobalContext, Status};

pub fn execute(args: AddArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let mut project = current_project(&ctx)?;
    let session = Session::from_context(&ctx, Some(project.root()));

    let result = add_dependency(&mut project, &session, &args.library, shell)?;

    match result.outcome {
        AddOutcome::Added => {
            shell.status(
                Status::Added,
                format!(
                    "{} ({}, {})",
                    result.name,
                    port_spec(&result.install_id, &result.features),
                    session.triplet
                ),
            );
            if !result.curated {
                shell.note(format!(
                    "no curated recipe for `{}`; it is linked by name",
                    result.name
                ));
            }
        }
        AddOutcome::AlreadyPresent => {
            shell.status(
                Status::Skipped,
                format!("{} (already in dependencies)", result.name),
            );
        }
    }
    Ok(())
}
