use std::time::Duration;
use tokio::time;
use clap::Parser;

use setkit_keeper::{create_example_config, Keeper, KeeperConfig};

#[derive(Parser, Debug)]
#[command(name = "setkit-keeper")]
#[command(about = "SetKit rebalancing auction watcher")]
struct Args {
    /// Path to keeper configuration file
    #[arg(short, long, default_value = "keeper.toml")]
    config: String,

    /// Poll interval in seconds (defaults to the configured interval)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Dry run mode - quote but don't write bid quotes
    #[arg(long)]
    dry_run: bool,

    /// Write an example configuration file and exit
    #[arg(long)]
    init: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if args.verbose { "debug" } else { "info" })
    ).init();

    if args.init {
        create_example_config(&args.config)?;
        log::info!("Wrote example configuration to {}", args.config);
        return Ok(());
    }

    log::info!("Starting SetKit Keeper");

    // Load configuration
    let config = KeeperConfig::load(&args.config)?;
    let interval = args.interval.unwrap_or(config.default_poll_interval);

    log::info!("Loaded configuration for {} auctions", config.auctions.len());
    log::info!("Poll interval: {}s", interval);

    if args.dry_run {
        log::warn!("Running in DRY RUN mode - no bid quotes will be written");
    }

    let mut keeper = Keeper::new(config, args.dry_run)?;
    log::info!("Keeper initialized successfully");

    // Start main poll loop
    let mut interval_timer = time::interval(Duration::from_secs(interval.max(1)));
    let mut iteration = 0u64;

    loop {
        interval_timer.tick().await;
        iteration += 1;

        log::debug!("Starting keeper iteration {}", iteration);

        match keeper.poll_all_auctions().await {
            Ok(alerts) => {
                if alerts > 0 {
                    log::info!("Iteration {}: {} auctions at or above their alert price", iteration, alerts);
                } else {
                    log::debug!("Iteration {}: No auctions at their alert price", iteration);
                }
            }
            Err(e) => {
                log::error!("Error in keeper iteration {}: {}", iteration, e);
                // Continue running even if individual iterations fail
            }
        }

        // Basic health metrics every 100 iterations
        if iteration % 100 == 0 {
            log::info!("Keeper health check - iteration {}", iteration);
            if let Err(e) = keeper.health_check().await {
                log::warn!("Health check warning: {}", e);
            }
        }
    }
}
