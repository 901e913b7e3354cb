//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

use pain::core::manifest::BuildType;
use pain::util::ColorChoice;

/// Pain - C++ project scaffolding with vcpkg and CMake
#[derive(Parser)]
#[command(name = "pain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project in a new directory
    Init(InitArgs),

    /// Install a library and link it into the project
    Add(AddArgs),

    /// Remove a library from the project
    Remove(RemoveArgs),

    /// List the project's dependencies
    List(ListArgs),

    /// Configure and compile the project
    Build(BuildArgs),

    /// Run the built executable
    Run(RunArgs),

    /// Open the project directory in the file browser
    Open(OpenArgs),

    /// Remove build output and installed libraries
    Clean(CleanArgs),

    /// Check the toolchain and vcpkg setup
    Doctor(DoctorArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name, also the directory created
    pub name: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Library name, optionally with vcpkg features (e.g. fmt, sdl2, sfml[audio])
    pub library: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Library name
    pub library: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Also list the curated libraries
    #[arg(long)]
    pub available: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build type: Debug or Release (persisted in Pain.toml)
    pub build_type: Option<BuildType>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Arguments passed to the program (after `--`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct OpenArgs {}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct DoctorArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["pain", "list", "--quiet", "--color", "never"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pain", "-q", "-v", "list"]).is_err());
    }

    #[test]
    fn test_build_type_is_case_insensitive() {
        let cli = parse(&["pain", "build", "release"]);
        match cli.command {
            Commands::Build(args) => assert_eq!(args.build_type, Some(BuildType::Release)),
            _ => panic!("expected build"),
        }
        assert!(Cli::try_parse_from(["pain", "build", "Fast"]).is_err());
    }

    #[test]
    fn test_run_forwards_everything_after_separator() {
        let cli = parse(&["pain", "run", "--", "--help", "-x", "file.txt"]);
        match cli.command {
            Commands::Run(args) => assert_eq!(args.args, ["--help", "-x", "file.txt"]),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_init_requires_name() {
        assert!(Cli::try_parse_from(["pain", "init"]).is_err());
    }
}
