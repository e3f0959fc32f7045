//! `gantry run`: one console invocation.

use crate::{cli::RunArgs, config::Bootstrap, error::CliResult, output::OutputManager};

/// Dispatch `argv` to the console controllers. The outcome's exit code is
/// returned as-is; usage and failure text goes to stderr.
pub fn execute(args: RunArgs, bootstrap: &Bootstrap, output: &OutputManager) -> CliResult<u8> {
    let console = bootstrap.console()?;
    let outcome = console.run(&args.argv);

    output.raw(&outcome.stdout)?;
    if !outcome.stderr.is_empty() {
        eprint!("{}", outcome.stderr);
    }
    Ok(outcome.exit_code.code())
}
