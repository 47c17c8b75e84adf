//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.phtrends.toml` files.

use crate::catalog::DEFAULT_ENDPOINT;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".phtrends.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Catalog API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Listing settings.
    #[serde(default)]
    pub listing: ListingConfig,

    /// Tag view settings.
    #[serde(default)]
    pub tags: TagsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report file written when `--output` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Catalog API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// API token. `--token` and `PRODUCT_HUNT_TOKEN` take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
            token: None,
        }
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Listing limit growth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Products fetched on first load.
    #[serde(default = "default_initial_limit")]
    pub initial_limit: u32,

    /// Products added by each "fetch more".
    #[serde(default = "default_step")]
    pub step: u32,

    /// Largest limit ever requested.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            initial_limit: default_initial_limit(),
            step: default_step(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_initial_limit() -> u32 {
    5
}

fn default_step() -> u32 {
    5
}

fn default_max_limit() -> u32 {
    100
}

/// Tag frequency view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Tags shown when `--top` is not given.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Upper bound accepted for `--top`.
    #[serde(default = "default_max_top")]
    pub max_top: usize,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            max_top: default_max_top(),
        }
    }
}

fn default_top() -> usize {
    10
}

fn default_max_top() -> usize {
    20
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.phtrends.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings. Only values
    /// the user actually provided are applied.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref endpoint) = args.endpoint {
            self.api.endpoint = endpoint.clone();
        }

        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(ref token) = args.token {
            self.api.token = Some(token.clone());
        }

        if let Some(top) = args.top {
            self.tags.top = top;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check values that can only be judged once file and CLI are merged.
    pub fn validate(&self, args: &crate::cli::Args) -> Result<()> {
        if self.listing.initial_limit == 0 || self.listing.step == 0 || self.listing.max_limit == 0
        {
            bail!("listing.initial_limit, listing.step and listing.max_limit must be at least 1");
        }

        if self.api.timeout_seconds == 0 {
            bail!("api.timeout_seconds must be at least 1");
        }

        if !self.api.endpoint.starts_with("http://") && !self.api.endpoint.starts_with("https://")
        {
            bail!("API endpoint must start with 'http://' or 'https://'");
        }

        if let Some(limit) = args.limit {
            if limit > self.listing.max_limit {
                bail!(
                    "Limit {} exceeds the maximum of {} products",
                    limit,
                    self.listing.max_limit
                );
            }
        }

        if self.tags.top == 0 {
            bail!("tags.top must be at least 1");
        }

        if self.tags.top > self.tags.max_top {
            bail!(
                "Top {} exceeds the maximum of {} tags",
                self.tags.top,
                self.tags.max_top
            );
        }

        Ok(())
    }

    /// Returns the log level once file and CLI settings are merged.
    ///
    /// `--quiet` wins over `verbose = true` in the config file.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if args.quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The credential to pass to the fetcher, if any was configured.
    pub fn credential(&self) -> Option<&str> {
        self.api.token.as_deref()
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.listing.initial_limit, 5);
        assert_eq!(config.listing.step, 5);
        assert_eq!(config.listing.max_limit, 100);
        assert_eq!(config.tags.top, 10);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "trends.md"
verbose = true

[api]
timeout_seconds = 10
token = "from-file"

[listing]
max_limit = 50
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output.as_deref(), Some("trends.md"));
        assert!(config.general.verbose);
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.credential(), Some("from-file"));
        assert_eq!(config.listing.initial_limit, 5);
        assert_eq!(config.listing.max_limit, 50);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE)).unwrap();
        writeln!(file, "[tags]\ntop = 15").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.tags.top, 15);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[listing]\nstep = \"five\"").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_merge_cli_takes_precedence() {
        let mut config: Config = toml::from_str("[api]\ntoken = \"from-file\"").unwrap();
        let mut args = make_args();
        args.token = Some("from-cli".to_string());
        args.timeout = Some(5);
        args.top = Some(3);

        config.merge_with_args(&args);
        assert_eq!(config.credential(), Some("from-cli"));
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.tags.top, 3);
    }

    #[test]
    fn test_log_level_follows_file_and_flags() {
        let config = Config::default();
        assert_eq!(config.log_level(&make_args()), tracing::Level::INFO);

        let mut config: Config = toml::from_str("[general]\nverbose = true").unwrap();
        assert_eq!(config.log_level(&make_args()), tracing::Level::DEBUG);

        let mut args = make_args();
        args.quiet = true;
        config.merge_with_args(&args);
        assert_eq!(config.log_level(&args), tracing::Level::ERROR);

        let mut config = Config::default();
        let mut args = make_args();
        args.verbose = true;
        config.merge_with_args(&args);
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);
    }

    #[test]
    fn test_merge_keeps_file_values_without_flags() {
        let mut config: Config = toml::from_str("[api]\ntoken = \"from-file\"").unwrap();
        config.merge_with_args(&make_args());
        assert_eq!(config.credential(), Some("from-file"));
    }

    #[test]
    fn test_validate_limits() {
        let config = Config::default();
        let mut args = make_args();
        assert!(config.validate(&args).is_ok());

        args.limit = Some(101);
        assert!(config.validate(&args).is_err());

        let mut config = Config::default();
        config.tags.top = 21;
        assert!(config.validate(&make_args()).is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = Config::default();
        config.api.endpoint = "ftp://example.com".to_string();
        assert!(config.validate(&make_args()).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.api.token = Some("super-secret".to_string());
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[listing]"));
        assert!(toml_str.contains("[tags]"));
        assert!(!toml_str.contains("token"));
    }
}
