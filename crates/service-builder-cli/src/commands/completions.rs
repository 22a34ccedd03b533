use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::CliError;

const BIN_NAME: &str = "service-builder";

/// Write the completion script for the requested shell to stdout.
pub fn run(args: CompletionsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    write_script(args.shell, &mut stdout);
    stdout
        .flush()
        .map_err(|e| CliError::Other(format!("failed to write completions: {e}")))
}

fn write_script(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
}
