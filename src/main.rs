//! Artifact Scout main entry point
//!
//! This is the command-line interface for the must-gather archive locator.

use anyhow::{bail, Context};
use artifact_scout::archive::{build_archive_client, verify_archive};
use artifact_scout::config::{load_config_with_hash, DiscoveryConfig};
use artifact_scout::progress::TracingSink;
use artifact_scout::{select, Scout, Selection};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Artifact Scout: find must-gather archives behind a CI job URL
///
/// Accepts a direct archive link, a job-summary page or a bucket listing
/// page, walks the job's artifacts directory and prints the storage URLs
/// of the archives it finds.
#[derive(Parser, Debug)]
#[command(name = "artifact-scout")]
#[command(version)]
#[command(about = "Find must-gather archives behind a CI job URL", long_about = None)]
struct Cli {
    /// Job, listing or archive URL to start from
    #[arg(value_name = "URL", required_unless_present = "dry_run")]
    url: Option<String>,

    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Choose among several archives by 1-based position
    #[arg(long, value_name = "N")]
    pick: Option<usize>,

    /// Check that the selected archive is downloadable and non-empty
    #[arg(long)]
    verify: bool,

    /// Validate and print the configuration without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            DiscoveryConfig::default()
        }
    };

    if cli.dry_run {
        artifact_scout::config::validate(&config)?;
        print_config(&config);
        return Ok(());
    }

    let Some(url) = cli.url.as_deref() else {
        bail!("a URL is required");
    };

    handle_discovery(config, url, cli.pick, cli.verify).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("artifact_scout=info,warn"),
            1 => EnvFilter::new("artifact_scout=debug,info"),
            2 => EnvFilter::new("artifact_scout=trace,debug"),
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

/// Handles the --dry-run mode
fn print_config(config: &DiscoveryConfig) {
    println!("=== Artifact Scout Configuration ===\n");

    println!("Crawl:");
    println!("  Target files: {:?}", config.crawl.target_filenames);
    println!("  Archive suffixes: {:?}", config.crawl.archive_suffixes);
    println!("  Artifacts directory: {}", config.crawl.artifacts_dir_name);
    println!("  Summary link texts: {:?}", config.crawl.summary_link_texts);
    println!("  Ignored fragments: {:?}", config.crawl.ignored_path_fragments);
    println!("  Always descend: {:?}", config.crawl.descend_override_names);
    println!("  Max depth: {}", config.crawl.max_depth);

    println!("\nTranslation:");
    println!(
        "  {}{} -> {}",
        config.translation.frontend_prefix,
        config.translation.browse_path_segment,
        config.translation.storage_prefix
    );

    println!("\nHTTP:");
    println!("  Fetch timeout: {}ms", config.http.fetch_timeout_ms);
    println!("  User agent: {}", config.http.user_agent);

    println!("\n✓ Configuration is valid");
}

/// Runs discovery and prints the outcome
async fn handle_discovery(
    config: DiscoveryConfig,
    url: &str,
    pick: Option<usize>,
    verify: bool,
) -> anyhow::Result<()> {
    let scout = Scout::new(config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping discovery");
            on_interrupt.cancel();
        }
    });

    let result = scout
        .discover_with_cancel(url, &TracingSink, cancel)
        .await
        .with_context(|| format!("discovery failed for {}", url))?;

    let chosen = match (select(url, result)?, pick) {
        (Selection::Single(archive), None) => archive,
        (selection, Some(n)) => match selection.pick(n) {
            Some(archive) => archive.to_string(),
            None => bail!(
                "--pick {} is out of range, {} archive(s) found",
                n,
                selection.candidates().len()
            ),
        },
        (Selection::Multiple(archives), None) => {
            println!("Found {} archives:", archives.len());
            for (idx, archive) in archives.iter().enumerate() {
                println!("  {}. {}", idx + 1, archive);
            }
            println!("\nRe-run with --pick N to choose one.");
            return Ok(());
        }
    };

    if verify {
        let client = build_archive_client(&scout.config().http)?;
        let info = verify_archive(&client, &chosen).await?;
        tracing::info!("Verified {} ({} bytes)", info.url, info.content_length);
    }

    println!("{}", chosen);

    Ok(())
}
