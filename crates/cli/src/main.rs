use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use model::{AppConfig, DEFAULT_CONFIG_FILE, WorkResult};
use pipeline::FilterRegistry;
use server::{
    CycleReport, HarvestOrchestrator, InProcessLauncher, ProcessLauncher, build_pipeline,
    run_site_worker, summarize,
};
use sources::SiteContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Harvester - giveaway site auto-entry bot
#[derive(Parser)]
#[command(name = "harvester")]
#[command(about = "Enters giveaways on configured sites and reports wins", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest every enabled site each cycle until interrupted
    Run {
        /// Run workers inside this process instead of child processes
        #[arg(long)]
        in_process: bool,
    },

    /// Run a single cycle and print the summary
    Once {
        /// Only harvest this site
        #[arg(long)]
        site: Option<String>,
    },

    /// Run one site worker and print its result as a JSON line
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        site: String,
    },

    /// Validate the configuration and show each site's filter chain
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: a worker's stdout carries only its result line
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Worker { site } => handle_worker(&cli.config, &site),
        Commands::Run { in_process } => {
            let config = load_config(&cli.config)?;
            handle_run(config, &cli.config, in_process, cli.debug).await
        }
        Commands::Once { site } => {
            let config = load_config(&cli.config)?;
            handle_once(config, site.as_deref()).await
        }
        Commands::Check => {
            let config = load_config(&cli.config)?;
            handle_check(&config)
        }
    }
}

fn load_config(path: &Path) -> Result<Arc<AppConfig>> {
    let config = AppConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(Arc::new(config))
}

/// Handle the 'worker' command.
///
/// Always prints exactly one result line, even when the configuration
/// cannot be loaded, so the parent sees the real cause.
fn handle_worker(config_path: &Path, site: &str) -> Result<()> {
    let result = match load_config(config_path) {
        Ok(config) => run_site_worker(&config, site),
        Err(e) => WorkResult::error(format!("{:#}", e)),
    };
    println!("{}", result.to_line()?);
    Ok(())
}

/// Handle the 'run' command
async fn handle_run(
    config: Arc<AppConfig>,
    config_path: &Path,
    in_process: bool,
    debug: bool,
) -> Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    info!(
        "Harvesting {} site(s) every {}s",
        config.enabled_sites().count(),
        config.cycle_sleep_secs
    );

    if in_process {
        let launcher = InProcessLauncher::new(Arc::clone(&config));
        HarvestOrchestrator::new(config, launcher)?.run(shutdown).await
    } else {
        let launcher = ProcessLauncher::current_exe(config_path)?.with_debug(debug);
        HarvestOrchestrator::new(config, launcher)?.run(shutdown).await
    }
}

/// Handle the 'once' command
async fn handle_once(config: Arc<AppConfig>, site: Option<&str>) -> Result<()> {
    let launcher = InProcessLauncher::new(Arc::clone(&config));
    let orchestrator = HarvestOrchestrator::new(config, launcher)?;
    let report = orchestrator.run_once(site).await?;
    print_report(&report);
    Ok(())
}

/// Handle the 'check' command
fn handle_check(config: &AppConfig) -> Result<()> {
    server::validate_chains(config)?;
    let registry = FilterRegistry::with_defaults();

    println!("{}", "Sites:".bold().blue());
    for site in &config.sites {
        let ctx = SiteContext::from_config(config, &site.name)?;
        let status = if site.enable {
            "enabled".green()
        } else {
            "disabled".yellow()
        };
        println!("{} {} ({})", "•".green(), site.name.bold(), status);

        match build_pipeline(&ctx, &registry) {
            Ok((chain, pipeline)) => {
                println!("    chain:       {}", chain);
                println!("    client-side: {}", pipeline.names().join(", "));
            }
            Err(e) if e.is_filter_config() => println!("    {} {}", "invalid chain:".red(), e),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Helper function to print one cycle's results
fn print_report(report: &CycleReport) {
    print!("{}", "Harvest results:\n".bold().blue());
    for (site, result) in report {
        let mark = if result.is_ok() { "✓".green() } else { "✗".red() };
        let time = result.timestamp().format("%H:%M:%S").to_string();
        for line in summarize(site, result) {
            println!("{} [{}] {}", mark, time.dimmed(), line);
        }
    }
}
