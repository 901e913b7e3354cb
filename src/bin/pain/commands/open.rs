//! `pain open` command

use anyhow::Result;

use crate::cli::OpenArgs;
use crate::GlobalOptions;
use pain::ops::open_in_file_browser;
use pain::util::GlobalContext;

pub fn execute(_args: OpenArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;
    let dir = ctx
        .find_project_root()
        .unwrap_or_else(|_| ctx.cwd().to_path_buf());

    if let Err(e) = open_in_file_browser(&dir) {
        shell.warn(format!("could not open {}: {:#}", dir.display(), e));
    }
    Ok(())
}
