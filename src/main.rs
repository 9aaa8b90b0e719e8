//! poi-crawl main entry point
//!
//! This is the command-line interface for the score-guided POI crawler.

use clap::Parser;
use poi_crawl::config::{load_config_with_hash, Config};
use poi_crawl::crawler::crawl;
use poi_crawl::output::{
    generate_markdown_summary, generate_summary, load_statistics, print_statistics,
};
use poi_crawl::storage::{open_storage, CrawlStore};
use poi_crawl::url::base_host;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// poi-crawl: a score-guided POI crawler
///
/// poi-crawl lets a browsing agent visit one website link by link, always
/// picking the link most likely to lead to points of interest. Progress is
/// saved after every page, so a crawl can be split over many runs.
#[derive(Parser, Debug)]
#[command(name = "poi-crawl")]
#[command(version)]
#[command(about = "A score-guided POI crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the task name from the configuration
    #[arg(long, value_name = "NAME")]
    task: Option<String>,

    /// Override the number of links visited in this run
    #[arg(long, value_name = "N")]
    max_links: Option<usize>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Generate markdown summary from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(task) = cli.task {
        config.task.name = task;
    }
    if let Some(max_links) = cli.max_links {
        if max_links == 0 {
            return Err("--max-links must be at least 1".into());
        }
        config.crawler.max_links_to_scrape = max_links;
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_crawl(&config)?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("poi_crawl=info,warn"),
            1 => EnvFilter::new("poi_crawl=debug,info"),
            2 => EnvFilter::new("poi_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== poi-crawl Dry Run ===\n");

    println!("Task:");
    println!("  Name: {}", config.task.name);
    println!("  Base URL: {}", config.task.base_url);
    println!("  Restricted to host: {}", base_host(&config.task.base_url)?);

    println!("\nCrawler Configuration:");
    println!("  Max links per run: {}", config.crawler.max_links_to_scrape);
    match config.crawler.min_scraping_score {
        Some(min) => println!("  Min scraping score: {}", min),
        None => println!("  Min scraping score: none"),
    }
    println!("  Homepage seed score: {}", config.crawler.seed_score);

    println!("\nAgent:");
    println!("  Scrape endpoint: {}", config.agent.scrape_endpoint);
    println!("  Validate endpoint: {}", config.agent.validate_endpoint);
    println!("  Timeout: {}s", config.agent.timeout_secs);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);
    println!("  Score decimals: {}", config.output.score_decimals);

    println!("\n✓ Configuration is valid");

    let db_path = Path::new(&config.output.database_path);
    if db_path.exists() {
        let store = open_storage(db_path)?;
        match store.get_task(&config.task.name)? {
            Some(task) => println!(
                "✓ Would resume task '{}' ({}, {} POIs stored)",
                task.name,
                task.status.to_db_string(),
                store.count_pois(task.id)?
            ),
            None => println!("✓ Would start new task '{}'", config.task.name),
        }
    } else {
        println!("✓ Would create database and start task '{}'", config.task.name);
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let store = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Exporting Crawl Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let store = open_storage(Path::new(&config.output.database_path))?;

    tracing::info!("Loading task '{}' from database...", config.task.name);
    let site = match store.get_task(&config.task.name)? {
        Some(task) => store.load_task_state(task.id)?,
        None => None,
    };
    let summary = generate_summary(
        &store,
        &config.task.name,
        site.as_ref(),
        config.output.score_decimals,
    )?;

    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} as task '{}' (up to {} links this run)",
        config.task.base_url,
        config.task.name,
        config.crawler.max_links_to_scrape
    );

    let store = open_storage(Path::new(&config.output.database_path))?;

    let (store, outcome, site) = match crawl(config, store) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let poi_count: usize = outcome.pois.values().map(Vec::len).sum();
    if outcome.completed {
        tracing::info!(
            "Crawl completed: {} links visited this run, {} POIs stored",
            outcome.links_visited,
            poi_count
        );
    } else {
        tracing::info!(
            "Crawl paused: {} links visited this run, {} POIs stored, run again to resume",
            outcome.links_visited,
            poi_count
        );
    }

    let summary = generate_summary(
        &store,
        &config.task.name,
        Some(&site),
        config.output.score_decimals,
    )?;
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    Ok(())
}
