//! Command implementations

pub mod add;
pub mod build;
pub mod clean;
pub mod doctor;
pub mod init;
pub mod list;
pub mod open;
pub mod remove;
pub mod run;

use anyhow::Result;

use pain::core::project::Project;
use pain::util::GlobalContext;

/// Load the project containing the working directory.
pub fn current_project(ctx: &GlobalContext) -> Result<Project> {
    let root = ctx.find_project_root()?;
    Project::load(&root)
}
