use service_builder_core::types::Model;

use crate::cli::{GlobalOpts, InspectArgs};
use crate::config::{load_config, resolve_paths, resolve_threaded};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `inspect` command: show parsed models with defaults applied.
pub async fn run(
    args: InspectArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = resolve_paths(&config, &args.paths);
    let threaded = resolve_threaded(&config, false);

    let app =
        super::parse_all_models(&paths, &config.cli.file_extension, threaded, output).await?;

    if let Some(ref name) = args.model {
        let model = app
            .model(name)
            .ok_or_else(|| CliError::ModelNotFound { name: name.clone() })?;
        render_model_detail(model, output);
    } else {
        render_model_list(&app.models, output);
    }

    Ok(())
}

fn render_model_list(models: &[Model], output: &OutputContext) {
    match output.mode {
        OutputMode::Human => {
            if models.is_empty() {
                output.status("No models defined.");
                return;
            }
            println!(
                "{:<20} {:<8} {:<12} {:<8}",
                "Model", "Fields", "Pagination", "Actions"
            );
            println!(
                "{:<20} {:<8} {:<12} {:<8}",
                "-----", "------", "----------", "-------"
            );
            for model in models {
                println!(
                    "{:<20} {:<8} {:<12} {:<8}",
                    model.name,
                    model.fields.len(),
                    pagination_label(model),
                    model.effective_actions().enabled().count()
                );
            }
        }
        OutputMode::Json => {
            let json_models: Vec<serde_json::Value> = models.iter().map(model_to_json).collect();
            output.print_json(&serde_json::json!({ "models": json_models }));
        }
        OutputMode::Plain => {
            for model in models {
                println!(
                    "{}\t{}\t{}\t{}",
                    model.name,
                    model.fields.len(),
                    pagination_label(model),
                    action_names(model).join(",")
                );
            }
        }
    }
}

fn render_model_detail(model: &Model, output: &OutputContext) {
    match output.mode {
        OutputMode::Human => {
            println!("Model: {}", model.name);
            println!();
            if model.fields.is_empty() {
                println!("Fields: (none)");
            } else {
                println!("Fields:");
                for field in &model.fields {
                    println!("  {:<16} {}", field.name, field.field_type);
                }
            }
            println!();
            match &model.pagination {
                Some(p) => println!(
                    "Pagination: per_page {}, max_per_page {}",
                    p.per_page, p.max_per_page
                ),
                None => println!("Pagination: (none)"),
            }
            let source = if model.actions.is_some() {
                "declared"
            } else {
                "default"
            };
            let names = action_names(model);
            if names.is_empty() {
                println!("Actions: (none, {source})");
            } else {
                println!("Actions: {} ({source})", names.join(", "));
            }
        }
        OutputMode::Json => output.print_json(&model_to_json(model)),
        OutputMode::Plain => {
            for field in &model.fields {
                println!("{}\t{}", field.name, field.field_type);
            }
        }
    }
}

fn pagination_label(model: &Model) -> String {
    model
        .pagination
        .map_or_else(|| "-".to_string(), |p| format!("{}/{}", p.per_page, p.max_per_page))
}

/// Names of the actions the model exposes once the default policy applies.
fn action_names(model: &Model) -> Vec<&'static str> {
    model
        .effective_actions()
        .enabled()
        .map(|action| action.name())
        .collect()
}

fn model_to_json(model: &Model) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = model
        .fields
        .iter()
        .map(|f| {
            serde_json::json!({
                "name": f.name,
                "type": f.field_type.keyword(),
            })
        })
        .collect();

    serde_json::json!({
        "name": model.name,
        "fields": fields,
        "pagination": model.pagination.map(|p| serde_json::json!({
            "per_page": p.per_page,
            "max_per_page": p.max_per_page,
        })),
        "actions": action_names(model),
        "actions_declared": model.actions.is_some(),
    })
}
