pub mod completions;
pub mod inspect;
pub mod parse;

use std::path::PathBuf;

use service_builder_core::types::Application;
use service_builder_dsl::ParseError;

use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress;

/// One model file after parsing.
pub struct ParsedFile {
    pub path: PathBuf,
    /// The file contents, lossily decoded, for diagnostics.
    pub source: String,
    pub result: Result<Application, ParseError>,
}

impl ParsedFile {
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Discover model files from a list of paths.
///
/// Paths can be files (used directly) or directories (searched recursively
/// for files matching `**/*.<extension>`).
pub fn discover_model_files(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let pattern = format!("{}/**/*.{extension}", path.display());
            let entries = glob::glob(&pattern).map_err(|e| CliError::Other(e.to_string()))?;
            for entry in entries {
                let entry = entry.map_err(|e| CliError::Other(e.to_string()))?;
                files.push(entry);
            }
        } else {
            return Err(CliError::NoModelFiles { path: path.clone() });
        }
    }

    if files.is_empty() {
        let display_path = paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("models/"));
        return Err(CliError::NoModelFiles { path: display_path });
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Read and parse every file, one after another.
///
/// Each parse runs on the blocking pool and is awaited before the next file
/// is read, so at most one file (and, with `threaded`, one scanning thread)
/// is in flight. Results come back in the order of `files`. A parse failure
/// is recorded in its `ParsedFile`; only read failures abort.
pub async fn parse_files(
    files: &[PathBuf],
    threaded: bool,
    output: &OutputContext,
) -> Result<Vec<ParsedFile>, CliError> {
    let bar = output
        .show_progress()
        .then(|| progress::create_file_bar(files.len()));

    let mut parsed = Vec::with_capacity(files.len());
    for file in files {
        let bytes = tokio::fs::read(file).await.map_err(|e| CliError::Io {
            path: file.clone(),
            source: e,
        })?;
        let path = file.clone();
        let file = tokio::task::spawn_blocking(move || parse_bytes(path, bytes, threaded))
            .await
            .map_err(|e| CliError::Other(format!("parser task failed: {e}")))?;
        if let Some(pb) = &bar {
            progress::file_done(pb, &file.name());
        }
        parsed.push(file);
    }

    if let Some(pb) = &bar {
        progress::finish(pb);
    }
    Ok(parsed)
}

fn parse_bytes(path: PathBuf, bytes: Vec<u8>, threaded: bool) -> ParsedFile {
    let name = path.display().to_string();
    let source = String::from_utf8_lossy(&bytes).into_owned();
    tracing::debug!(file = %name, threaded, "parsing");

    let result = if threaded {
        service_builder_dsl::parse_threaded(&name, std::io::Cursor::new(bytes))
    } else {
        service_builder_dsl::parse_reader(&name, bytes.as_slice())
    };

    ParsedFile {
        path,
        source,
        result,
    }
}

/// Parse all files and merge their models in file order.
///
/// Fails on the first file that does not parse.
pub async fn parse_all_models(
    paths: &[PathBuf],
    extension: &str,
    threaded: bool,
    output: &OutputContext,
) -> Result<Application, CliError> {
    let files = discover_model_files(paths, extension)?;
    let mut app = Application::new();

    for file in parse_files(&files, threaded, output).await? {
        match file.result {
            Ok(parsed) => app.models.extend(parsed.models),
            Err(error) => {
                return Err(CliError::Parse {
                    error: Box::new(error),
                    source_text: file.source,
                    file: file.path,
                });
            }
        }
    }

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_model_files_nonexistent_path() {
        let result = discover_model_files(&[PathBuf::from("/nonexistent/path")], "sb");
        assert!(matches!(result, Err(CliError::NoModelFiles { .. })));
    }

    #[test]
    fn discover_model_files_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_model_files(&[dir.path().to_path_buf()], "sb");
        assert!(result.is_err());
    }

    #[test]
    fn discover_model_files_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("blog")).unwrap();
        let nested = dir.path().join("blog/post.sb");
        std::fs::write(&nested, "model Post { }").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a model").unwrap();

        let files = discover_model_files(&[dir.path().to_path_buf()], "sb").unwrap();
        assert_eq!(files, vec![nested]);
    }

    #[test]
    fn discover_model_files_honours_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.model");
        std::fs::write(&path, "model User { }").unwrap();
        std::fs::write(dir.path().join("other.sb"), "model Other { }").unwrap();

        let files = discover_model_files(&[dir.path().to_path_buf()], "model").unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn discover_model_files_accepts_direct_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("direct.txt");
        std::fs::write(&path, "model Direct { }").unwrap();
        let files = discover_model_files(std::slice::from_ref(&path), "sb").unwrap();
        assert_eq!(files[0], path);
    }

    #[test]
    fn discover_model_files_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sb");
        std::fs::write(&path, "model Test { }").unwrap();
        let files = discover_model_files(&[path.clone(), path.clone()], "sb").unwrap();
        assert_eq!(files.len(), 1);
    }

    fn quiet_output() -> OutputContext {
        OutputContext {
            mode: crate::output::OutputMode::Human,
            quiet: true,
            use_color: false,
        }
    }

    #[tokio::test]
    async fn parse_files_keeps_the_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for name in ["Charlie", "Alpha", "Bravo"] {
            let path = dir.path().join(format!("{name}.sb"));
            std::fs::write(&path, format!("model {name} {{ fields {{ id: int }} }}")).unwrap();
            files.push(path);
        }

        for threaded in [false, true] {
            let parsed = parse_files(&files, threaded, &quiet_output()).await.unwrap();
            let paths: Vec<_> = parsed.iter().map(|f| f.path.clone()).collect();
            assert_eq!(paths, files);
            let names: Vec<_> = parsed
                .iter()
                .map(|f| f.result.as_ref().unwrap().models[0].name.clone())
                .collect();
            assert_eq!(names, vec!["Charlie", "Alpha", "Bravo"]);
        }
    }

    #[tokio::test]
    async fn parse_files_records_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.sb");
        let good = dir.path().join("good.sb");
        std::fs::write(&bad, "model Bad { fields { x } }").unwrap();
        std::fs::write(&good, "model Good { }").unwrap();

        let parsed = parse_files(&[bad, good], false, &quiet_output())
            .await
            .unwrap();
        assert!(parsed[0].result.is_err());
        assert_eq!(parsed[1].result.as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn parse_files_stops_on_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.sb");
        let result = parse_files(&[missing], false, &quiet_output()).await;
        assert!(matches!(result, Err(CliError::Io { .. })));
    }

    #[test]
    fn parse_bytes_inline_and_threaded_agree() {
        let bytes = b"model User { fields { name: string } }".to_vec();
        let inline = parse_bytes(PathBuf::from("u.sb"), bytes.clone(), false);
        let threaded = parse_bytes(PathBuf::from("u.sb"), bytes, true);
        assert_eq!(inline.result, threaded.result);
        assert_eq!(inline.result.unwrap().len(), 1);
    }

    #[test]
    fn parse_bytes_keeps_source_for_invalid_utf8() {
        let parsed = parse_bytes(PathBuf::from("bad.sb"), b"model \xFF".to_vec(), false);
        assert!(parsed.result.is_err());
        assert!(parsed.source.starts_with("model "));
    }
}
