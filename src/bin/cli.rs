//! Jira Harvester CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::Parser;
use jira_harvester::{
    error::Result,
    models::Config,
    pipeline::{self, HarvestOptions},
};

/// jira-harvester - Jira Issue Corpus Harvester
#[derive(Parser, Debug)]
#[command(
    name = "jira-harvester",
    version,
    about = "Harvests Jira project issues into JSONL corpus files"
)]
struct Cli {
    /// Project keys to harvest, e.g. HADOOP SPARK KAFKA
    #[arg(short, long, required = true, num_args = 1..)]
    projects: Vec<String>,

    /// Output JSONL file path prefix
    #[arg(short, long, default_value = "output/jira_issues")]
    output: String,

    /// Checkpoint file path
    #[arg(short, long, default_value = "output/jira_checkpoint.json")]
    checkpoint: PathBuf,

    /// Results per page (overrides the config file)
    #[arg(short = 'm', long)]
    page_size: Option<u32>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Jira harvester starting...");

    let mut config = Config::load_or_default(&cli.config);
    if let Some(page_size) = cli.page_size {
        config.crawler.page_size = page_size;
    }
    config.validate()?;

    log::info!(
        "Harvesting {} project(s) from {}",
        cli.projects.len(),
        config.crawler.search_url
    );

    let options = HarvestOptions {
        projects: cli.projects,
        output_prefix: cli.output,
        checkpoint_path: cli.checkpoint,
    };

    pipeline::run_harvest(&config, &options).await?;

    log::info!("Done!");

    Ok(())
}
