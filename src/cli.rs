//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// phtrends - Product Hunt trends analyzer
///
/// Fetches the top-voted Product Hunt launches and shows them as a
/// listing or as a ranking of their most common tags.
///
/// Examples:
///   phtrends --token $TOKEN
///   phtrends --limit 50 --view tags --top 15
///   phtrends --interactive
///   phtrends --view tags --format json --output tags.json
///   phtrends --init-config
#[derive(Parser, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Which view to produce
    #[arg(long, value_enum, default_value = "list")]
    pub view: View,

    /// Number of top-voted products to fetch
    ///
    /// Defaults to listing.initial_limit from the config (5).
    #[arg(short, long, value_name = "COUNT")]
    pub limit: Option<u32>,

    /// Number of tags to show in the tags view
    ///
    /// Defaults to tags.top from the config (10).
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Product Hunt API token
    #[arg(long, env = "PRODUCT_HUNT_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Catalog GraphQL endpoint URL
    #[arg(long, env = "PHTRENDS_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .phtrends.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Keep the listing open and fetch more products on Enter
    #[arg(long)]
    pub interactive: bool,

    /// Generate a default .phtrends.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Analytical view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum View {
    /// Ranked product listing (default)
    #[default]
    List,
    /// Tag frequency ranking
    Tags,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

// The token is left out so arguments can be logged.
impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("view", &self.view)
            .field("limit", &self.limit)
            .field("top", &self.top)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("format", &self.format)
            .field("output", &self.output)
            .field("config", &self.config)
            .field("interactive", &self.interactive)
            .finish()
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.limit == Some(0) {
            return Err("Limit must be at least 1".to_string());
        }

        if self.top == Some(0) {
            return Err("Top must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.interactive && self.view != View::List {
            return Err("--interactive is only available with --view list".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            view: View::List,
            limit: None,
            top: None,
            token: None,
            endpoint: None,
            timeout: None,
            format: OutputFormat::Markdown,
            output: None,
            config: None,
            verbose: false,
            quiet: false,
            interactive: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "phtrends", "--view", "tags", "-l", "40", "-n", "7", "--format", "json",
        ])
        .unwrap();

        assert_eq!(args.view, View::Tags);
        assert_eq!(args.limit, Some(40));
        assert_eq!(args.top, Some(7));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.limit = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.top = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_endpoint() {
        let mut args = make_args();
        args.endpoint = Some("api.producthunt.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.interactive = true;
        args.view = View::Tags;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut args = make_args();
        args.token = Some("super-secret".to_string());
        assert!(!format!("{:?}", args).contains("super-secret"));
    }
}
