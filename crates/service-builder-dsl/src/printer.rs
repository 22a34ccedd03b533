use service_builder_core::types::{Application, Model};

const INDENT: &str = "    ";

/// Print a single model to DSL text.
///
/// The output uses 4-space indentation and parses back to an equal model.
/// An empty fields list is omitted, pagination always lists both keys, and
/// an actions block is written only when the model has explicit actions.
pub fn print(model: &Model) -> String {
    let mut output = String::new();
    print_model(model, &mut output);
    output
}

/// Print every model of an application, separated by blank lines.
pub fn print_all(app: &Application) -> String {
    let mut output = String::new();
    for (i, model) in app.models.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        print_model(model, &mut output);
    }
    output
}

fn print_model(model: &Model, output: &mut String) {
    output.push_str("model ");
    output.push_str(&model.name);
    output.push_str(" {\n");

    if !model.fields.is_empty() {
        open_block("fields", output);
        for field in &model.fields {
            line(2, &format!("{}: {}", field.name, field.field_type), output);
        }
        close_block(output);
    }

    if let Some(pagination) = &model.pagination {
        open_block("pagination", output);
        line(2, &format!("per_page: {}", pagination.per_page), output);
        line(2, &format!("max_per_page: {}", pagination.max_per_page), output);
        close_block(output);
    }

    if let Some(actions) = &model.actions {
        let names: Vec<_> = actions.enabled().map(|a| a.name()).collect();
        open_block("actions", output);
        line(2, &format!("rest_actions: [{}]", names.join(", ")), output);
        close_block(output);
    }

    output.push_str("}\n");
}

fn open_block(keyword: &str, output: &mut String) {
    line(1, &format!("{keyword} {{"), output);
}

fn close_block(output: &mut String) {
    line(1, "}", output);
}

fn line(depth: usize, text: &str, output: &mut String) {
    for _ in 0..depth {
        output.push_str(INDENT);
    }
    output.push_str(text);
    output.push('\n');
}
