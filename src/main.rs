//! clonetrack - GitHub clone traffic tracker
//!
//! GitHub only reports the last two weeks of clone traffic. This CLI
//! collects that window on every run, merges it into a JSON history and
//! renders charts plus a markdown summary from the accumulated data.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Missing credentials, missing data file, or a fatal I/O error

mod analysis;
mod cli;
mod collector;
mod config;
mod github;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::Local;
use cli::Args;
use config::{Config, Credentials, DEFAULT_CONFIG_FILE};
use github::{ApiConfig, GithubClient};
use models::Store;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
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

    // Initialize logging
    init_logging(&args);

    info!("clonetrack v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .clonetrack.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize file locations, API settings and chart sizes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the selected phases in order.
async fn run(args: Args) -> Result<()> {
    let Some(command) = args.command else {
        return Ok(());
    };

    // Credentials are checked before touching any file or the network.
    let credentials = if command.collects() {
        match Credentials::from_args(&args) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let collected = match credentials {
        Some(credentials) => Some(run_collect(&config, credentials, args.quiet).await?),
        None => None,
    };

    if command.visualizes() {
        let store = match collected {
            Some(store) => store,
            None => match Store::open_existing(&config.storage.data_file) {
                Ok(store) => store,
                Err(e) => {
                    eprintln!("❌ Error: {}", e);
                    std::process::exit(1);
                }
            },
        };
        run_visualize(&config, store)?;
    }

    Ok(())
}

/// Collect the current clone window for every repository and persist it.
async fn run_collect(config: &Config, credentials: Credentials, quiet: bool) -> Result<Store> {
    println!("🚀 Starting GitHub clone statistics collection...");
    println!("📅 Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("👤 User: {}\n", credentials.username);

    let client = GithubClient::new(ApiConfig {
        api_url: config.api.base_url.clone(),
        token: credentials.token,
        username: credentials.username,
        per_page: config.api.per_page,
        max_pages: config.api.max_pages,
        timeout_seconds: config.api.timeout_seconds,
    })?;

    let data_file = &config.storage.data_file;
    let mut store = Store::load(data_file)?;

    let summary = collector::collect(&client, &mut store, !quiet).await;

    store.save(data_file)?;
    info!("Saved clone data to {}", data_file.display());

    println!("\n✅ Data collection complete!");
    println!("📁 Data saved to: {}", data_file.display());

    let (with_data, listed) = summary.with_clone_data();
    println!("\n📊 Summary:");
    println!("   Repositories with clone data: {}/{}", with_data, listed);
    println!("   Repositories fetched this run: {}", summary.repositories_fetched);
    if summary.repositories_skipped > 0 {
        println!("   Repositories skipped: {}", summary.repositories_skipped);
    }
    println!("   Days updated this run: {}", summary.days_changed);
    println!("   Days tracked: {}", summary.store.days_tracked);
    println!(
        "   Total clones (cumulative): {}",
        report::generator::format_thousands(summary.store.total_clones)
    );

    Ok(store)
}

/// Render charts and the markdown summary from `store`.
fn run_visualize(config: &Config, mut store: Store) -> Result<()> {
    println!("\n🎨 Generating clone statistics visualizations...\n");

    analysis::recompute_cumulative(&mut store);

    let output_dir = &config.storage.output_dir;
    let outcome = report::generate_reports(&store, output_dir, &config.report)?;

    if !outcome.skipped.is_empty() {
        debug!("Skipped for lack of data: {}", outcome.skipped.join(", "));
    }
    if !outcome.failed.is_empty() {
        warn!("{} output(s) failed: {}", outcome.failed.len(), outcome.failed.join(", "));
        println!("⚠️  Failed to generate: {}", outcome.failed.join(", "));
    }

    println!(
        "\n✅ Wrote {} file(s) to {}",
        outcome.written.len(),
        output_dir.display()
    );
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
