//! phtrends - Product Hunt trends analyzer
//!
//! A CLI tool that fetches the top-voted Product Hunt launches and shows
//! them either as a listing or as a tag frequency ranking.
//!
//! Exit codes:
//!   0 - Success (including an empty result when the API gave no data)
//!   1 - Runtime error (invalid arguments, config, report writing, etc.)

mod analysis;
mod catalog;
mod cli;
mod config;
mod listing;
mod models;
mod report;

use anyhow::{Context, Result};
use catalog::{Fetcher, HttpTransport, Transport};
use chrono::Utc;
use cli::{Args, OutputFormat, View};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use listing::{LimitSchedule, Session};
use models::{ListingReport, Record, ReportMetadata, TagReport};
use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is needed before logging so `verbose` in the file applies
    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.log_level(&args));

    info!("phtrends v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    if let Err(e) = run(args, config) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .phtrends.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Set PRODUCT_HUNT_TOKEN or add `token` under [api] to authenticate.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Run the selected view.
fn run(args: Args, config: Config) -> Result<()> {
    config.validate(&args)?;

    if config.credential().is_none() {
        warn!("No API token configured; set PRODUCT_HUNT_TOKEN or pass --token");
    }

    let transport = HttpTransport::new(config.api.timeout_seconds)?;
    let fetcher = Fetcher::new(transport, config.api.endpoint.clone());

    let schedule = LimitSchedule::from(&config.listing);
    let credential = config.credential();
    let show_progress = !args.quiet;
    let fetch = |limit: NonZeroU32| fetch_with_progress(&fetcher, limit, credential, show_progress);

    let mut session = match args.limit.and_then(NonZeroU32::new) {
        Some(start) => Session::starting_at(schedule, start, fetch),
        None => Session::new(schedule, fetch),
    };

    let output = args
        .output
        .clone()
        .or_else(|| config.general.output.as_ref().map(PathBuf::from));

    match args.view {
        View::List => run_listing(&args, fetcher.endpoint(), &mut session, output),
        View::Tags => run_tags(
            &args,
            fetcher.endpoint(),
            config.tags.top,
            &mut session,
            output,
        ),
    }
}

/// Render the listing, and in interactive mode keep growing it on demand.
fn run_listing<F>(
    args: &Args,
    endpoint: &str,
    session: &mut Session<F>,
    output: Option<PathBuf>,
) -> Result<()>
where
    F: FnMut(NonZeroU32) -> Vec<Record>,
{
    loop {
        let products = session.current();
        let report = ListingReport {
            metadata: report_metadata(endpoint, session.limit(), products.len()),
            products,
            can_fetch_more: !session.is_exhausted(),
        };

        let content = match args.format {
            OutputFormat::Json => report::generate_json_report(&report)?,
            OutputFormat::Markdown => report::generate_listing_markdown(&report),
        };
        emit(&content, output.as_deref(), args.quiet)?;

        if !args.interactive {
            return Ok(());
        }

        // The report already says the cap was reached
        if session.is_exhausted() {
            return Ok(());
        }

        match prompt_next_action()? {
            Action::FetchMore => {
                session.fetch_more();
            }
            Action::Refresh => session.refresh(),
            Action::Quit => return Ok(()),
        }
    }
}

/// Render the tag frequency ranking.
fn run_tags<F>(
    args: &Args,
    endpoint: &str,
    top: usize,
    session: &mut Session<F>,
    output: Option<PathBuf>,
) -> Result<()>
where
    F: FnMut(NonZeroU32) -> Vec<Record>,
{
    let products = session.current();
    let table = analysis::top_tags(&products, top);
    let distinct = analysis::distinct_tag_count(&products);

    if table.is_empty() {
        warn!(products = products.len(), "No tags found to analyze");
    } else {
        info!(
            distinct_tags = distinct,
            shown = table.len(),
            "Tag frequencies computed"
        );
    }

    let report = TagReport::new(
        report_metadata(endpoint, session.limit(), products.len()),
        distinct,
        top,
        &table,
    );

    let content = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_tags_markdown(&report),
    };
    emit(&content, output.as_deref(), args.quiet)
}

fn report_metadata(endpoint: &str, limit: NonZeroU32, received: usize) -> ReportMetadata {
    ReportMetadata {
        generated_at: Utc::now(),
        endpoint: endpoint.to_string(),
        limit: limit.get(),
        products_received: received,
    }
}

/// Fetch with a spinner on stderr while the request is in flight.
fn fetch_with_progress<T: Transport>(
    fetcher: &Fetcher<T>,
    limit: NonZeroU32,
    credential: Option<&str>,
    show_progress: bool,
) -> Vec<Record> {
    if !show_progress {
        return fetcher.fetch(limit, credential);
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching top {} products...", limit));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let records = fetcher.fetch(limit, credential);

    spinner.finish_and_clear();
    records
}

/// Write the report to a file, or print it.
fn emit(content: &str, output: Option<&std::path::Path>, quiet: bool) -> Result<()> {
    match output {
        Some(path) => {
            report::write_report(content, path)?;
            if !quiet {
                println!("✅ Report saved to: {}", path.display());
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// What the user wants after an interactive listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    FetchMore,
    Refresh,
    Quit,
}

impl Action {
    fn from_input(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "" | "m" | "more" => Action::FetchMore,
            "r" | "refresh" => Action::Refresh,
            _ => Action::Quit,
        }
    }
}

fn prompt_next_action() -> Result<Action> {
    print!("\n[Enter] fetch more products  [r] refresh  [q] quit: ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    // EOF
    if read == 0 {
        return Ok(Action::Quit);
    }

    Ok(Action::from_input(&line))
}

/// Where the configuration came from, logged once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    Unreadable(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
            ConfigSource::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    let (mut config, source) = match args.config {
        // Try explicit config path
        Some(ref config_path) => (
            Config::load(config_path)?,
            ConfigSource::Explicit(config_path.clone()),
        ),
        // Try default location
        None => match Config::load_default() {
            Ok(Some(config)) => (config, ConfigSource::DefaultFile),
            Ok(None) => (Config::default(), ConfigSource::Defaults),
            Err(e) => (Config::default(), ConfigSource::Unreadable(e)),
        },
    };

    config.merge_with_args(args);
    Ok((config, source))
}
