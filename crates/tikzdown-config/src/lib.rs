//! Configuration management for tikzdown.
//!
//! Parses `tikzdown.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section and
//! field is optional.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `tikz.command`
//! - `on_change.command`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the compiler command line.
    pub tikz_command: Option<String>,
    /// Override the compiler timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override the markup watcher's directory.
    pub watch_dir: Option<PathBuf>,
    /// Override the generic watcher's watched directory.
    pub on_change_dir: Option<PathBuf>,
    /// Override the generic watcher's working directory.
    pub on_change_cwd: Option<PathBuf>,
    /// Override the generic watcher's extensions.
    pub on_change_extensions: Option<Vec<String>>,
    /// Override the generic watcher's command line.
    pub on_change_command: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tikzdown.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Diagram compiler configuration.
    pub tikz: TikzConfig,
    /// Markup watcher configuration.
    pub watch: WatchConfig,
    /// Generic watcher configuration.
    pub on_change: OnChangeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Diagram compiler configuration.
///
/// Unset fields keep the compiler's built-in defaults (`mk4ht xhmlatex job`,
/// the `pgfsys-tex4ht.def` driver and the `tikz` package).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TikzConfig {
    /// Compiler command line, run in the job directory.
    pub command: Option<String>,
    /// PGF system driver file.
    pub driver: Option<String>,
    /// Packages loaded by the job preamble.
    pub packages: Option<Vec<String>>,
    /// Kill the compiler after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
}

impl TikzConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Markup watcher configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directory watched recursively.
    pub dir: PathBuf,
    /// Suffixes of files converted on change.
    pub extensions: Vec<String>,
    /// Extension of converted documents.
    pub output_extension: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            extensions: vec![".md".to_owned(), ".markdown".to_owned()],
            output_extension: ".html".to_owned(),
        }
    }
}

/// Generic watcher configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OnChangeConfig {
    /// Directory watched recursively.
    pub dir: PathBuf,
    /// Working directory of the command.
    pub cwd: PathBuf,
    /// Suffixes of files that trigger the command.
    pub extensions: Vec<String>,
    /// Command line to run.
    pub command: String,
}

impl Default for OnChangeConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            cwd: PathBuf::from("."),
            extensions: Vec::new(),
            command: String::new(),
        }
    }
}

impl OnChangeConfig {
    /// Validate the fields a generic watcher needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.command, "on_change.command")?;
        require_extensions(&self.extensions, "on_change.extensions")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`tikz.command`").
        field: String,
        /// Error message (e.g., "${`TEXBIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require at least one extension, each starting with a dot.
fn require_extensions(extensions: &[String], field: &str) -> Result<(), ConfigError> {
    if extensions.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must list at least one extension"
        )));
    }
    if let Some(bad) = extensions.iter().find(|ext| !ext.starts_with('.')) {
        return Err(ConfigError::Validation(format!(
            "{field} entry \"{bad}\" must start with '.'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tikzdown.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(command) = &settings.tikz_command {
            self.tikz.command = Some(command.clone());
        }
        if let Some(timeout) = settings.timeout_secs {
            self.tikz.timeout_secs = Some(timeout);
        }
        if let Some(dir) = &settings.watch_dir {
            self.watch.dir.clone_from(dir);
        }
        if let Some(dir) = &settings.on_change_dir {
            self.on_change.dir.clone_from(dir);
        }
        if let Some(cwd) = &settings.on_change_cwd {
            self.on_change.cwd.clone_from(cwd);
        }
        if let Some(extensions) = &settings.on_change_extensions {
            self.on_change.extensions.clone_from(extensions);
        }
        if let Some(command) = &settings.on_change_command {
            self.on_change.command.clone_from(command);
        }
    }

    /// Get validated generic watcher configuration.
    ///
    /// The `[on_change]` section is optional in general but its fields are
    /// required once a generic watcher is started.
    pub fn require_on_change(&self) -> Result<&OnChangeConfig, ConfigError> {
        self.on_change.validate()?;
        Ok(&self.on_change)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[on_change]` section is checked separately by
    /// [`require_on_change`](Self::require_on_change).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_tikz()?;
        self.validate_watch()?;
        Ok(())
    }

    fn validate_tikz(&self) -> Result<(), ConfigError> {
        if let Some(command) = &self.tikz.command {
            require_non_empty(command, "tikz.command")?;
        }
        if let Some(driver) = &self.tikz.driver {
            require_non_empty(driver, "tikz.driver")?;
        }

        if self.tikz.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "tikz.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_watch(&self) -> Result<(), ConfigError> {
        require_extensions(&self.watch.extensions, "watch.extensions")?;
        if !self.watch.output_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "watch.output_extension must start with '.'".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(command) = &self.tikz.command {
            self.tikz.command = Some(expand::expand_env(command, "tikz.command")?);
        }
        self.on_change.command = expand::expand_env(&self.on_change.command, "on_change.command")?;
        Ok(())
    }

    /// Resolve relative directories against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.watch.dir = config_dir.join(&self.watch.dir);
        self.on_change.dir = config_dir.join(&self.on_change.dir);
        self.on_change.cwd = config_dir.join(&self.on_change.cwd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.tikz.command.is_none());
        assert!(config.tikz.driver.is_none());
        assert!(config.tikz.packages.is_none());
        assert_eq!(config.tikz.timeout(), None);
        assert_eq!(config.watch.dir, PathBuf::from("."));
        assert_eq!(config.watch.extensions, vec![".md", ".markdown"]);
        assert_eq!(config.watch.output_extension, ".html");
        assert_eq!(config.on_change.dir, PathBuf::from("."));
        assert_eq!(config.on_change.cwd, PathBuf::from("."));
        assert!(config.on_change.command.is_empty());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.tikz.command.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_tikz_config() {
        let toml = r#"
[tikz]
command = "htlatex job"
packages = ["tikz", "pgfplots"]
timeout_secs = 30
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.tikz.command.as_deref(), Some("htlatex job"));
        assert!(config.tikz.driver.is_none());
        assert_eq!(
            config.tikz.packages,
            Some(vec!["tikz".to_owned(), "pgfplots".to_owned()])
        );
        assert_eq!(config.tikz.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_on_change_config() {
        let toml = r#"
[on_change]
cwd = "paper"
extensions = [".tex", ".sty"]
command = "make pdf"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // The watched directory is independent of the command's cwd
        assert_eq!(config.on_change.dir, PathBuf::from("."));
        assert_eq!(config.on_change.cwd, PathBuf::from("paper"));
        assert_eq!(config.on_change.extensions, vec![".tex", ".sty"]);
        assert_eq!(config.on_change.command, "make pdf");
        assert!(config.require_on_change().is_ok());
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[tikz]\ntimeout_secs = \"soon\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[watch]
dir = "docs"

[on_change]
dir = "src"
cwd = "/abs/paper"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.watch.dir, PathBuf::from("/project/docs"));
        assert_eq!(config.on_change.dir, PathBuf::from("/project/src"));
        // Absolute paths are kept
        assert_eq!(config.on_change.cwd, PathBuf::from("/abs/paper"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let settings = CliSettings {
            tikz_command: Some("htlatex job".to_owned()),
            timeout_secs: Some(10),
            watch_dir: Some(PathBuf::from("site")),
            on_change_dir: Some(PathBuf::from("src")),
            on_change_cwd: Some(PathBuf::from("paper")),
            on_change_extensions: Some(vec![".tex".to_owned()]),
            on_change_command: Some("make".to_owned()),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.tikz.command.as_deref(), Some("htlatex job"));
        assert_eq!(config.tikz.timeout_secs, Some(10));
        assert_eq!(config.watch.dir, PathBuf::from("site"));
        assert_eq!(config.on_change.dir, PathBuf::from("src"));
        assert_eq!(config.on_change.cwd, PathBuf::from("paper"));
        assert_eq!(config.on_change.extensions, vec![".tex"]);
        assert_eq!(config.on_change.command, "make");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();

        config.apply_cli_settings(&CliSettings::default());

        assert!(config.tikz.command.is_none());
        assert_eq!(config.watch.dir, PathBuf::from("."));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TIKZDOWN_TEST_TARGET", "pdf");
        }
        let toml = r#"
[tikz]
command = "${TIKZDOWN_TEST_TEX:-mk4ht} xhmlatex job"

[on_change]
command = "make ${TIKZDOWN_TEST_TARGET}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.tikz.command.as_deref(), Some("mk4ht xhmlatex job"));
        assert_eq!(config.on_change.command, "make pdf");
        unsafe {
            std::env::remove_var("TIKZDOWN_TEST_TARGET");
        }
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(result: Result<(), ConfigError>, expected: &[&str]) {
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_validate_empty_command() {
        let mut config = Config::default();
        config.tikz.command = Some("  ".to_owned());

        assert_validation_error(config.validate(), &["tikz.command", "empty"]);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.tikz.timeout_secs = Some(0);

        assert_validation_error(config.validate(), &["tikz.timeout_secs"]);
    }

    #[test]
    fn test_validate_watch_extensions() {
        let mut config = Config::default();
        config.watch.extensions = Vec::new();
        assert_validation_error(config.validate(), &["watch.extensions", "at least one"]);

        config.watch.extensions = vec!["md".to_owned()];
        assert_validation_error(config.validate(), &["watch.extensions", "\"md\""]);
    }

    #[test]
    fn test_validate_output_extension() {
        let mut config = Config::default();
        config.watch.output_extension = "html".to_owned();

        assert_validation_error(config.validate(), &["watch.output_extension"]);
    }

    #[test]
    fn test_require_on_change_missing_section() {
        let config = Config::default();

        let err = config.require_on_change().unwrap_err();
        assert!(err.to_string().contains("on_change.command"));
    }

    #[test]
    fn test_require_on_change_bad_extension() {
        let mut config = Config::default();
        config.on_change.command = "make".to_owned();
        config.on_change.extensions = vec![".tex".to_owned(), "sty".to_owned()];

        let err = config.require_on_change().unwrap_err();
        assert!(err.to_string().contains("\"sty\""));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("tikzdown.toml");

        let err = Config::load(Some(missing.as_path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_load_from_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikzdown.toml");
        std::fs::write(
            &path,
            "[tikz]\ncommand = \"htlatex job\"\n\n[watch]\ndir = \"docs\"\n",
        )
        .unwrap();
        let settings = CliSettings {
            timeout_secs: Some(5),
            ..CliSettings::default()
        };

        let config = Config::load(Some(path.as_path()), Some(&settings)).unwrap();

        assert_eq!(config.tikz.command.as_deref(), Some("htlatex job"));
        assert_eq!(config.tikz.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.watch.dir, dir.path().join("docs"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_rejects_invalid_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tikzdown.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            timeout_secs: Some(0),
            ..CliSettings::default()
        };

        assert!(matches!(
            Config::load(Some(path.as_path()), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }
}
