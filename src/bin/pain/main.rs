//! Pain CLI - C++ project scaffolding with vcpkg and CMake

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use pain::core::error::PainError;
use pain::util::Shell;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "PAIN_LOG";

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let global_opts = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.color),
        verbose: cli.verbose,
    };

    if let Err(e) = run(cli.command, &global_opts) {
        let shell = &global_opts.shell;
        shell.error(format!("{:#}", e));

        let pain_error = e.downcast_ref::<PainError>();
        if let Some(err) = pain_error {
            tracing::debug!("failed with {}", err.kind());
            if let Some(tail) = err.output_tail() {
                eprintln!();
                for line in tail.lines() {
                    eprintln!("  {}", line);
                }
            }
            if let Some(help) = err.help() {
                eprintln!("\nhelp: {}", help);
            }
        }
        std::process::exit(pain_error.map_or(1, PainError::exit_code));
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pain=debug")
        } else {
            EnvFilter::new("pain=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(command: Commands, global_opts: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Init(args) => commands::init::execute(args, global_opts),
        Commands::Add(args) => commands::add::execute(args, global_opts),
        Commands::Remove(args) => commands::remove::execute(args, global_opts),
        Commands::List(args) => commands::list::execute(args, global_opts),
        Commands::Build(args) => commands::build::execute(args, global_opts),
        Commands::Run(args) => commands::run::execute(args, global_opts),
        Commands::Open(args) => commands::open::execute(args, global_opts),
        Commands::Clean(args) => commands::clean::execute(args, global_opts),
        Commands::Doctor(args) => commands::doctor::execute(args, global_opts),
    }
}
