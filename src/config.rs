//! Configuration handling.
//!
//! Every setting has a built-in default, so the program runs with no configuration at all. An
//! optional JSON file can override the defaults, and command line flags (or their environment
//! variables) override the file.

use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Where the sales document is downloaded from unless configured otherwise.
pub const DEFAULT_SOURCE_URL: &str =
    "https://storage.googleapis.com/backupdatadev/ejercicio/ventas.json";

/// Reports are written to the working directory unless configured otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// The resolved configuration of a run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    source_url: Url,
    output_dir: PathBuf,
}

impl Config {
    pub fn new(source_url: &str, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let source_url = Url::parse(source_url)
            .with_context(|| format!("Invalid source URL '{source_url}'"))?;
        Ok(Self {
            source_url,
            output_dir: output_dir.into(),
        })
    }

    /// Resolves the configuration. Values are taken from, in order of precedence:
    /// - `url` and `output_dir` (command line flags or their environment variables)
    /// - the JSON file at `config_file`, when given
    /// - the built-in defaults
    ///
    /// # Errors
    /// - The config file cannot be read or parsed.
    /// - The resulting source URL is not a valid URL.
    pub async fn load(
        config_file: Option<&Path>,
        url: Option<&str>,
        output_dir: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_file {
            Some(path) => ConfigFile::load(path).await?,
            None => ConfigFile::default(),
        };

        let source_url = url
            .or(file.source_url.as_deref())
            .unwrap_or(DEFAULT_SOURCE_URL);
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Self::new(source_url, output_dir)
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Represents the serialization format of the optional configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "source_url": "https://storage.googleapis.com/backupdatadev/ejercicio/ventas.json",
///   "output_dir": "reports"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// URL of the JSON sales document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,

    /// Directory the report files are written to, relative to the working directory or absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_dir: Option<PathBuf>,
}

impl ConfigFile {
    async fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path)
            .await
            .with_context(|| format!("Unable to load config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_defaults() {
        let config = Config::load(None, None, None).await.unwrap();
        assert_eq!(config, Config::new(DEFAULT_SOURCE_URL, ".").unwrap());
        assert_eq!(config.source_url().as_str(), DEFAULT_SOURCE_URL);
        assert_eq!(config.output_dir(), Path::new("."));
    }

    #[tokio::test]
    async fn test_config_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        utils::write(
            &path,
            r#"{"source_url": "http://localhost:8080/sales.json", "output_dir": "out"}"#,
        )
        .await
        .unwrap();

        let config = Config::load(Some(&path), None, None).await.unwrap();
        assert_eq!(
            config.source_url().as_str(),
            "http://localhost:8080/sales.json"
        );
        assert_eq!(config.output_dir(), Path::new("out"));
    }

    #[tokio::test]
    async fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        utils::write(&path, r#"{"source_url": "http://localhost:8080/sales.json"}"#)
            .await
            .unwrap();

        let config = Config::load(
            Some(&path),
            Some("http://example.com/other.json"),
            Some(Path::new("elsewhere")),
        )
        .await
        .unwrap();
        assert_eq!(config.source_url().as_str(), "http://example.com/other.json");
        assert_eq!(config.output_dir(), Path::new("elsewhere"));
    }

    #[tokio::test]
    async fn test_config_file_unknown_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        utils::write(&path, r#"{"source": "x"}"#).await.unwrap();
        assert!(Config::load(Some(&path), None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        let err = Config::load(Some(&path), None, None).await.unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn test_invalid_url() {
        let err = Config::new("not a url", ".").unwrap_err();
        assert!(err.to_string().contains("Invalid source URL"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
