//! High-level operations.
//!
//! This module contains the implementation of Pain commands.

pub mod doctor;
pub mod pain_add;
pub mod pain_build;
pub mod pain_clean;
pub mod pain_init;
pub mod pain_list;
pub mod pain_open;
pub mod pain_run;
pub mod session;

pub use doctor::{diagnose, format_report, CheckResult, CheckStatus, DiagnosticReport};
pub use pain_add::{add_dependency, remove_dependency, AddOutcome, AddResult, RemoveResult};
pub use pain_build::{build, BuildOptions, BuildResult};
pub use pain_clean::clean;
pub use pain_init::init_project;
pub use pain_list::{list, ListEntry};
pub use pain_open::open_in_file_browser;
pub use pain_run::run;
pub use session::Session;
