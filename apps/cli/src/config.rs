//! CLI configuration
//!
//! Layered, lowest precedence first: built-in defaults, `medicat.toml` in the
//! working directory (or the file given with `--config`), then `MEDICAT__*`
//! environment variables (e.g. `MEDICAT__SOURCE__BASE_URL`). A `.env` file is
//! loaded into the environment beforehand when present.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Http,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Web root serving `api/medicaments.json` and `api/stats.json`.
    pub base_url: String,
    /// Local directory with the same layout, for `kind = "file"`.
    pub data_dir: PathBuf,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration, reading `path` instead of `medicat.toml` if given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .set_default("source.kind", "http")?
            .set_default("source.base_url", "http://localhost:5173/")?
            .set_default("source.data_dir", "public")?
            .set_default("source.timeout_seconds", 30)?
            .set_default("logging.level", "warn")?
            .set_default("logging.json", false)?;

        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("medicat").required(false)),
        };

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix("MEDICAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.kind == SourceKind::Http && self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url must not be empty".into()));
        }
        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "source.timeout_seconds must be greater than zero".into(),
            ));
        }
        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medicat.toml");
        fs::write(
            &path,
            r#"
                [source]
                kind = "file"
                data_dir = "/srv/medicaments"

                [logging]
                level = "debug"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.data_dir, PathBuf::from("/srv/medicaments"));
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        config.validate().unwrap();
    }

    #[test]
    fn validation_rejects_unknown_level_and_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medicat.toml");
        fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        fs::write(&path, "[source]\ntimeout_seconds = 0\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
