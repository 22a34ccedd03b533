use console::Term;
use service_builder_dsl::ParseError;

use crate::cli::GlobalOpts;
use crate::diagnostic::render_diagnostic;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    fn from_flag(format: &str) -> Self {
        match format {
            "json" => Self::Json,
            "plain" => Self::Plain,
            _ => Self::Human,
        }
    }
}

/// Output context derived from global flags.
///
/// Data goes to stdout; status lines, warnings and errors go to stderr.
pub struct OutputContext {
    pub mode: OutputMode,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    /// Construct from global CLI options.
    pub fn from_global(global: &GlobalOpts) -> Self {
        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode: OutputMode::from_flag(&global.format),
            quiet: global.quiet,
            use_color,
        }
    }

    /// Print a success message to stderr (human mode only, not in quiet mode).
    pub fn success(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        if self.use_color {
            let style = console::Style::new().green().bold();
            eprintln!("{} {}", style.apply_to("ok"), msg);
        } else {
            eprintln!("ok {msg}");
        }
    }

    /// Print a warning to stderr (not in quiet mode).
    pub fn warn(&self, msg: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human if self.use_color => {
                let style = console::Style::new().yellow().bold();
                eprintln!("{} {}", style.apply_to("warning:"), msg);
            }
            OutputMode::Human => eprintln!("warning: {msg}"),
            OutputMode::Json => eprintln!("{}", serde_json::json!({ "warning": msg })),
            OutputMode::Plain => eprintln!("warning\t{msg}"),
        }
    }

    /// Print an error using the appropriate output mode.
    ///
    /// A single-file parse error is rendered with its source excerpt in
    /// human mode.
    pub fn print_error(&self, err: &CliError) {
        if let (OutputMode::Human, CliError::Parse { error, source_text, .. }) = (self.mode, err) {
            self.print_parse_error(error, source_text);
            return;
        }
        match self.mode {
            OutputMode::Human if self.use_color => {
                let style = console::Style::new().red().bold();
                eprintln!("{} {}", style.apply_to("error:"), err);
            }
            OutputMode::Human => eprintln!("error: {err}"),
            OutputMode::Json => eprintln!("{}", err.to_json()),
            OutputMode::Plain => eprintln!("error\t{err}"),
        }
    }

    /// Print a parse error for one source file to stderr.
    ///
    /// Human mode renders a miette report pointing into `source`; plain mode
    /// prints `name<TAB>line<TAB>column<TAB>message`. JSON callers include
    /// the error in their own document instead.
    pub fn print_parse_error(&self, error: &ParseError, source: &str) {
        match self.mode {
            OutputMode::Human => eprintln!("{:?}", render_diagnostic(error, source)),
            OutputMode::Json => eprintln!("{}", parse_error_json(error)),
            OutputMode::Plain => {
                let (line, column) = error
                    .position()
                    .map_or((0, 0), |p| (p.line, p.column));
                eprintln!(
                    "{}\t{line}\t{column}\t{}",
                    error.source_name(),
                    error.error()
                );
            }
        }
    }

    /// Print JSON data to stdout.
    pub fn print_json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    /// Print a status message to stderr (human mode only, not in quiet mode).
    pub fn status(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        eprintln!("{msg}");
    }

    /// Whether to show progress spinners.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.mode == OutputMode::Human && Term::stderr().is_term()
    }
}

/// The JSON shape of a parse error inside a per-file result.
pub fn parse_error_json(error: &ParseError) -> serde_json::Value {
    serde_json::json!({
        "message": error.error().to_string(),
        "line": error.position().map(|p| p.line),
        "column": error.position().map(|p| p.column),
    })
}
