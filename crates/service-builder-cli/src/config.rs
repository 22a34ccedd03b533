use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// CLI configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub cli: CliSettings,
    #[serde(default)]
    pub parser: ParserSettings,
}

/// Where model files live and what they are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_model_dir")]
    pub default_model_dir: String,
    /// Extension of model files, without the leading dot.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_model_dir: default_model_dir(),
            file_extension: default_file_extension(),
        }
    }
}

/// Parser settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserSettings {
    /// Lex on a separate scanning thread.
    #[serde(default)]
    pub threaded: bool,
}

fn default_model_dir() -> String {
    "models/".to_string()
}

fn default_file_extension() -> String {
    "sb".to_string()
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit)
/// 2. `SERVICE_BUILDER_CONFIG` env var
/// 3. `./service-builder.toml` (project-local)
/// 4. `$XDG_CONFIG_HOME/service-builder/config.toml`
/// 5. `~/.config/service-builder/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    if let Ok(env_path) = std::env::var("SERVICE_BUILDER_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    let local = PathBuf::from("service-builder.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("service-builder/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/service-builder/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    tracing::debug!(path = %path.display(), "loading config");
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

/// The paths to read: the ones given on the command line, or the configured
/// model directory when none are given.
pub fn resolve_paths(config: &CliConfig, paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(&config.cli.default_model_dir)]
    } else {
        paths.to_vec()
    }
}

/// Whether to lex on a scanning thread. The flag can only turn it on.
pub fn resolve_threaded(config: &CliConfig, flag: bool) -> bool {
    flag || config.parser.threaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CliConfig::default();
        assert_eq!(config.cli.default_model_dir, "models/");
        assert_eq!(config.cli.file_extension, "sb");
        assert!(!config.parser.threaded);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
[parser]
threaded = true
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert!(config.parser.threaded);
        // Defaults for missing sections
        assert_eq!(config.cli.default_model_dir, "models/");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[cli]
default_model_dir = "src/models/"
file_extension = "model"

[parser]
threaded = false
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cli.default_model_dir, "src/models/");
        assert_eq!(config.cli.file_extension, "model");
        assert!(!config.parser.threaded);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[cli\ndefault_model_dir = 1").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[cli]\ndefault_model_dir = \"defs/\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cli.default_model_dir, "defs/");
    }

    #[test]
    fn load_config_from_explicit_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }

    #[test]
    fn resolve_paths_prefers_arguments() {
        let config = CliConfig::default();
        let given = vec![PathBuf::from("a.sb")];
        assert_eq!(resolve_paths(&config, &given), given);
        assert_eq!(resolve_paths(&config, &[]), vec![PathBuf::from("models/")]);
    }

    #[test]
    fn resolve_threaded_flag_or_config() {
        let mut config = CliConfig::default();
        assert!(!resolve_threaded(&config, false));
        assert!(resolve_threaded(&config, true));
        config.parser.threaded = true;
        assert!(resolve_threaded(&config, false));
    }
}
