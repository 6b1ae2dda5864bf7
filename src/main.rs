mod commands;
mod config;
mod diagnostics;
mod error;
mod extractor;
mod info;
mod report;
mod resolver;
mod rewriter;
mod scanner;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::report::Format;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "DOCLINKS_LOG";

/// Exit code for errors that stop a command before it finishes.
const EXIT_RUNTIME_ERROR: u8 = 3;

/// Top-level command-line interface.
#[derive(Parser)]
#[command(name = "doclinks", version, about = "Check relative links in markdown documentation")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Log per-document progress.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan markdown files and report broken links
    Check {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Documentation root (defaults to the current directory)
        root: Option<PathBuf>,
    },
    /// Apply the configured `[[replace]]` table to every scanned document
    Fix {
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Documentation root (defaults to the current directory)
        root: Option<PathBuf>,
    },
    /// Output a reference document describing link rules, config, and exit codes
    Info {
        /// Emit JSON instead of markdown
        #[arg(long)]
        json: bool,
        /// Documentation root (defaults to the current directory)
        root: Option<PathBuf>,
    },
    /// List and classify the links of a single markdown file
    Links {
        /// Markdown file to inspect
        file: PathBuf,
    },
    /// Check once, then re-check whenever files under the root change
    Watch {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Documentation root (defaults to the current directory)
        root: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber. `DOCLINKS_LOG` overrides the level
/// picked from `--quiet`/`--verbose`.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| return tracing_subscriber::EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: logging disabled: {e}");
    }
    return;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Check { format, output, root } => {
            commands::check(&commands::root_or_current(root), format, output.as_deref())
        },
        Commands::Fix { dry_run, root } => commands::fix(&commands::root_or_current(root), dry_run),
        Commands::Info { json, root } => {
            info::run(&commands::root_or_current(root), json);
            Ok(ExitCode::SUCCESS)
        },
        Commands::Links { file } => commands::links(&file),
        Commands::Watch { format, root } => watch::run(&commands::root_or_current(root), format),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        },
        Ok(code) => code,
    };
}
