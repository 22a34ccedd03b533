use crate::cli::{GlobalOpts, ParseArgs};
use crate::config::{load_config, resolve_paths, resolve_threaded};
use crate::error::CliError;
use crate::output::{parse_error_json, OutputContext, OutputMode};

use super::{discover_model_files, parse_files};

/// Run the `parse` command: parse model files and report each file's result.
///
/// Every file is parsed even when an earlier one fails; the command fails
/// afterwards if any did.
pub async fn run(
    args: ParseArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = resolve_paths(&config, &args.paths);
    let files = discover_model_files(&paths, &config.cli.file_extension)?;
    let threaded = resolve_threaded(&config, args.threaded);

    let parsed = parse_files(&files, threaded, output).await?;

    let mut total_models = 0usize;
    let mut failed = 0usize;
    let mut results: Vec<serde_json::Value> = Vec::new();

    for file in &parsed {
        let filename = file.name();

        match &file.result {
            Ok(app) => {
                let count = app.len();
                total_models += count;

                match output.mode {
                    OutputMode::Json => {
                        let mut entry = serde_json::json!({
                            "file": filename,
                            "models": count,
                            "error": null,
                        });
                        if args.print_ast {
                            entry["ast"] = serde_json::to_value(app)
                                .map_err(|e| CliError::Other(e.to_string()))?;
                        }
                        results.push(entry);
                    }
                    OutputMode::Human => {
                        output.status(&format!("  {filename} .... {count} models"));
                    }
                    OutputMode::Plain => println!("{filename}\tok\t{count}"),
                }

                if args.print_ast && output.mode != OutputMode::Json {
                    print!("{}", service_builder_dsl::print_all(app));
                }
            }
            Err(error) => {
                failed += 1;
                if output.mode == OutputMode::Json {
                    results.push(serde_json::json!({
                        "file": filename,
                        "models": error.partial().len(),
                        "error": parse_error_json(error),
                    }));
                } else {
                    output.print_parse_error(error, &file.source);
                }
            }
        }
    }

    // Summary
    match output.mode {
        OutputMode::Human => {
            let summary = format!(
                "{total_models} models parsed from {} files, {failed} failed",
                parsed.len()
            );
            if failed > 0 {
                output.warn(&summary);
            } else {
                output.success(&summary);
            }
        }
        OutputMode::Json => {
            output.print_json(&serde_json::json!({
                "files": parsed.len(),
                "models": total_models,
                "failed": failed,
                "results": results,
            }));
        }
        OutputMode::Plain => {
            println!("{}\t{total_models}\t{failed}", parsed.len());
        }
    }

    if failed > 0 {
        Err(CliError::ParseFailed {
            failed,
            total: parsed.len(),
        })
    } else {
        Ok(())
    }
}
