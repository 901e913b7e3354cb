//! `pain doctor` command

use anyhow::Result;

use crate::cli::DoctorArgs;
use crate::GlobalOptions;
use pain::ops::{diagnose, format_report, Session};
use pain::util::GlobalContext;

pub fn execute(_args: DoctorArgs, global_opts: &GlobalOptions) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let project_root = ctx.find_project_root().ok();
    let session = Session::from_context(&ctx, project_root.as_deref());

    let report = diagnose(&session.toolchain, &session.vcpkg, &session.triplet);

    // Diagnostic only: unhealthy reports still exit 0
    global_opts
        .shell
        .print(format_report(&report, global_opts.verbose).trim_end());
    Ok(())
}
