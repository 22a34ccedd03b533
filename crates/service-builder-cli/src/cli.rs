use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

/// Front end for service-builder model definition files.
///
/// Reads `.sb` files describing models, their fields, pagination and REST
/// actions, and reports the parsed structure or the first error in each file.
#[derive(Parser)]
#[command(
    name = "service-builder",
    version,
    about = "Parse and inspect service-builder model definitions",
    after_help = "Use 'service-builder <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: SERVICE_BUILDER_CONFIG]
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "SERVICE_BUILDER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate .sb model files
    Parse(ParseArgs),

    /// Show fields, pagination and effective actions of parsed models
    Inspect(InspectArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Arguments for `service-builder parse`.
#[derive(Args)]
pub struct ParseArgs {
    /// Model files or directories to parse (default: `cli.default_model_dir`)
    pub paths: Vec<PathBuf>,

    /// Show the parsed models as canonical DSL (or the AST with --format json)
    #[arg(long = "print-ast")]
    pub print_ast: bool,

    /// Lex on a separate scanning thread
    #[arg(long = "threaded")]
    pub threaded: bool,
}

/// Arguments for `service-builder inspect`.
#[derive(Args)]
pub struct InspectArgs {
    /// Model files or directories to inspect (default: `cli.default_model_dir`)
    pub paths: Vec<PathBuf>,

    /// Show a specific model (omit for all)
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,
}

/// Arguments for `service-builder completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
