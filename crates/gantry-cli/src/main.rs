//! # Gantry CLI
//!
//! Host binary for the web and console entry points.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Read the environment file.
//! 3. Initialise the tracing subscriber from the flags and the env's log config.
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! `run` and `request` return the exit code of what they dispatched.
//! Otherwise:
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands},
    config::Bootstrap,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod server;

fn main() -> ExitCode {
    // ── 1. Parse arguments ────────────────────────────────────────────────
    // --help / --version arrive as errors that print to stdout (exit 0);
    // real argument-parse failures go to stderr (exit 2).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    // Completions need no application.
    if let Commands::Completions(args) = cli.command {
        return match commands::completions::execute(args) {
            Ok(code) => ExitCode::from(code),
            Err(e) => handle_error(e, cli.global.verbose > 0),
        };
    }

    // ── 2. Read the environment ───────────────────────────────────────────
    let bootstrap = Bootstrap::load(&cli.global.env_file);
    let log_config = bootstrap.as_ref().ok().and_then(|b| b.log_config().ok());

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    let _guard = match init_logging(&cli.global, log_config.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        env_file = %cli.global.env_file.display(),
        "CLI started"
    );

    let verbose = cli.global.verbose > 0;
    let bootstrap = match bootstrap {
        Ok(bootstrap) => bootstrap,
        Err(e) => return handle_error(e, verbose),
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global);

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, &bootstrap, &output) {
        Ok(code) => {
            debug!(code, "Gantry finished");
            ExitCode::from(code)
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, bootstrap: &Bootstrap, output: &OutputManager) -> CliResult<u8> {
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, bootstrap, output),
        Commands::Serve(args) => commands::serve::execute(args, bootstrap, output),
        Commands::Request(args) => commands::request::execute(args, bootstrap, output),
        Commands::Routes => commands::routes::execute(bootstrap, output),
        Commands::Config(cmd) => commands::config::execute(cmd, bootstrap, output),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
///
/// This is the single place where structured errors become human-readable
/// output and OS exit codes.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // Written to stderr so the message shows even when stdout is redirected.
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
