//! apidiff CLI - Breaking-change detection for compiled module APIs
//!
//! Compares the public surface of two module metadata documents, or of two
//! versions of a package, and suggests the next semantic version.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::package::PackageOptions;
use config::ApiDiffConfig;
use output::OutputFormat;

/// Public API diffing for compiled modules.
///
/// Reduces each module to what other modules can reference, reports every
/// difference as breaking or non-breaking, and suggests the next version.
#[derive(Parser)]
#[command(name = "apidiff")]
#[command(author, version)]
#[command(about = "Breaking-change detection for compiled module APIs")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  apidiff diff Lib-1.0.json Lib-1.1.json        Compare two modules
  apidiff package Lib-1.1.pkg.json --base Lib-1.0.pkg.json
                                                Suggest the next package version
  apidiff facade Lib.json -o Lib.facade.json    Write the public facade")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log errors only; `package` prints just the suggested version
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

/// Facade visibility flags shared by the module commands
#[derive(Args, Debug, Clone, Copy)]
struct FacadeArgs {
    /// Keep internal declarations in the facade
    #[arg(long, conflicts_with = "public_only")]
    keep_internals: bool,

    /// Keep only public declarations, even for modules with friends
    #[arg(long)]
    public_only: bool,
}

impl FacadeArgs {
    fn keep_internals(&self) -> Option<bool> {
        if self.keep_internals {
            Some(true)
        } else if self.public_only {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the public API of two modules
    Diff {
        /// Base module document
        base: PathBuf,

        /// Head module document
        head: PathBuf,

        #[command(flatten)]
        facade: FacadeArgs,
    },

    /// Compare a package with its base version and suggest the next version
    #[command(visible_alias = "pkg")]
    Package {
        /// Package document to check
        package: PathBuf,

        /// Base package document to compare with
        #[arg(long)]
        base: PathBuf,

        /// Print the grouped change report for every framework
        #[arg(long)]
        detailed: bool,

        /// Write an xUnit results file (<id>-changes.xml)
        #[arg(long)]
        xunit: bool,

        /// Directory for the xUnit results file (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Exit with code 2 if the package version is lower than suggested
        #[arg(long)]
        verify_version: bool,
    },

    /// Write the public facade of a module
    Facade {
        /// Module document to reduce
        input: PathBuf,

        /// Output file (default: <stem>.facade.json next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        facade: FacadeArgs,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .apidiffrc.toml
    let config = ApiDiffConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    // Apply color override from config if set
    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(ExitCode::SUCCESS);
        }
    };

    match command {
        Commands::Diff { base, head, facade } => {
            commands::diff::run(
                &base,
                &head,
                facade.keep_internals(),
                cli.verbose,
                &config,
                format,
            )
            .await
        }
        Commands::Package {
            package,
            base,
            detailed,
            xunit,
            output_dir,
            verify_version,
        } => {
            let options = PackageOptions {
                package,
                base,
                detailed,
                xunit,
                output_dir,
                verify_version,
                quiet: cli.quiet,
            };
            commands::package::run(&options, &config, format).await
        }
        Commands::Facade {
            input,
            output,
            facade,
        } => {
            commands::facade::run(
                &input,
                output.as_deref(),
                facade.keep_internals(),
                &config,
                format,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_facade_args() {
        let cli = Cli::parse_from(["apidiff", "diff", "a.json", "b.json", "--public-only"]);
        match cli.command {
            Some(Commands::Diff { facade, .. }) => assert_eq!(facade.keep_internals(), Some(false)),
            _ => panic!("expected diff command"),
        }

        let cli = Cli::parse_from(["apidiff", "facade", "a.json"]);
        match cli.command {
            Some(Commands::Facade { facade, output, .. }) => {
                assert_eq!(facade.keep_internals(), None);
                assert!(output.is_none());
            }
            _ => panic!("expected facade command"),
        }
    }

    #[test]
    fn test_conflicting_facade_flags() {
        let result = Cli::try_parse_from([
            "apidiff",
            "diff",
            "a.json",
            "b.json",
            "--keep-internals",
            "--public-only",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_package_args() {
        let cli = Cli::parse_from([
            "apidiff",
            "-q",
            "package",
            "new.json",
            "--base",
            "old.json",
            "--xunit",
            "--verify-version",
        ]);
        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Package {
                xunit,
                verify_version,
                detailed,
                ..
            }) => {
                assert!(xunit && verify_version && !detailed);
            }
            _ => panic!("expected package command"),
        }
    }
}
