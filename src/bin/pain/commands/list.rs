//! `pain list` command

use anyhow::Result;

use super::current_project;
use crate::cli::ListArgs;
use crate::GlobalOptions;
use pain::ops::{list, Session};
use pain::util::GlobalContext;

pub fn execute(args: ListArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let project = current_project(&ctx)?;
    let session = Session::from_context(&ctx, Some(project.root()));

    let entries = list(
        &project,
        &session.registry,
        &session.vcpkg,
        &session.install_target(&project),
    );

    shell.print(format!(
        "{} ({}, {})",
        project.name(),
        project.manifest().build_type,
        session.triplet
    ));
    if entries.is_empty() {
        shell.print("  no dependencies");
    }
    for entry in &entries {
        let version = entry.version.as_deref().unwrap_or("not installed");
        let curated = if entry.curated { "" } else { " (uncurated)" };
        let name = if entry.features.is_empty() {
            entry.name.clone()
        } else {
            format!("{}[{}]", entry.name, entry.features.join(","))
        };
        shell.print(format!("  {:<20} {}{}", name, version, curated));
    }

    if args.available {
        shell.print("\ncurated libraries:");
        for name in session.registry.names() {
            shell.print(format!("  {}", name));
        }
    }
    Ok(())
}
