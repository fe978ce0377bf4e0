//! Surface-Scout main entry point
//!
//! This is the command-line interface for the Surface-Scout site classifier.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use surface_scout::config::{load_config_with_hash, validate_discovery_config, Config};
use surface_scout::eval::{eval_options, load_seed, run_eval, write_eval_report};
use surface_scout::output::write_reports;
use surface_scout::{discover, DiscoveryOptions, HttpRenderer};
use tracing_subscriber::EnvFilter;

/// Surface-Scout: site discovery and classification for QA planning
///
/// Surface-Scout crawls the pages reachable from a start URL, classifies
/// each page and its interactive elements, and decides what kind of product
/// surface the site is.
#[derive(Parser, Debug)]
#[command(name = "surface-scout")]
#[command(version)]
#[command(about = "Discovers and classifies the surface of a web application", long_about = None)]
struct Cli {
    /// Start URL (http or https)
    #[arg(value_name = "URL", required_unless_present_any = ["eval", "dry_run"])]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Maximum number of pages to visit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Maximum link depth from the start URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Per-navigation timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write the discovery result as JSON to this path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Write sitemap, menu and quality reports into this directory
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Run the evaluation harness over a JSON seed list instead
    #[arg(long, value_name = "SEED", conflicts_with = "url")]
    eval: Option<PathBuf>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&cli, &config);
    } else if let Some(seed) = &cli.eval {
        handle_eval(seed, &cli, &config).await?;
    } else if let Some(url) = &cli.url {
        handle_discover(url, &cli, config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("surface_scout=info,warn"),
            1 => EnvFilter::new("surface_scout=debug,info"),
            2 => EnvFilter::new("surface_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.discovery.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.discovery.max_depth = max_depth;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.discovery.navigation_timeout_ms = timeout_ms;
    }
    if let Some(dir) = &cli.report_dir {
        config.output.report_dir = Some(dir.clone());
    }

    validate_discovery_config(&config.discovery).context("Invalid discovery options")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(cli: &Cli, config: &Config) {
    println!("=== Surface-Scout Dry Run ===\n");

    println!("Discovery:");
    println!("  Max pages: {}", config.discovery.max_pages);
    println!("  Max depth: {}", config.discovery.max_depth);
    println!(
        "  Navigation timeout: {}ms",
        config.discovery.navigation_timeout_ms
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nOutput:");
    match &config.output.report_dir {
        Some(dir) => println!("  Report directory: {}", dir.display()),
        None => println!("  Report directory: (none)"),
    }
    if let Some(path) = &cli.output {
        println!("  Result JSON: {}", path.display());
    }

    println!("\n✓ Configuration is valid");
    match (&cli.url, &cli.eval) {
        (Some(url), _) => println!("✓ Would start discovery at {}", url),
        (None, Some(seed)) => println!("✓ Would evaluate seed list {}", seed.display()),
        (None, None) => {}
    }
}

/// Handles the --eval mode: runs discovery over a labelled seed list
async fn handle_eval(seed_path: &Path, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let seed = load_seed(seed_path)?;
    tracing::info!(
        "Evaluating {} of {} seed sites (policy: {})",
        seed.sample_size.min(seed.sites.len()),
        seed.sites.len(),
        seed.policy
    );

    let mut renderer = HttpRenderer::new(&config.user_agent)?;
    let options = eval_options(config.discovery.navigation_timeout());
    let report = run_eval(&mut renderer, &seed, &options).await;

    let output = match (&cli.output, &config.output.report_dir) {
        (Some(path), _) => path.clone(),
        (None, Some(dir)) => dir.join("discovery_eval.json"),
        (None, None) => PathBuf::from("out/report/discovery_eval.json"),
    };
    write_eval_report(&output, &report)?;

    println!(
        "{}",
        serde_json::json!({
            "ok": true,
            "output": output.display().to_string(),
            "serviceTypeAccuracy": report.service_type_accuracy,
        })
    );
    Ok(())
}

/// Handles the main discovery operation
async fn handle_discover(url: &str, cli: &Cli, config: Config) -> anyhow::Result<()> {
    let options = DiscoveryOptions::from(&config.discovery);
    let mut renderer = HttpRenderer::new(&config.user_agent)?;

    let result = discover(&mut renderer, url, &options)
        .await
        .with_context(|| format!("Discovery of {} failed", url))?;

    if let Some(dir) = &config.output.report_dir {
        let analysis_id = result.started_at.format("%Y%m%d%H%M%S").to_string();
        let paths = write_reports(dir, &analysis_id, &result)?;
        tracing::info!("Summary written to {}", paths.summary.display());
    }

    let json = serde_json::to_string_pretty(&result)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Result written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
