use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use statistics::cli::Cli;
use statistics::scheduler::{dataset_writers, Backfill, CatchUpDriver, PoolsLoop};
use statistics::services::{PoolInfoUpdater, StatusService};
use statistics::{ConfigManager, Database, DatasetKind, DayClock};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::from_default_env()
        .add_directive("statistics=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!(
        "version: {}, config file path: {}",
        env!("CARGO_PKG_VERSION"),
        cli.config.display()
    );

    // Malformed backfill arguments abort before anything touches the store
    let selection = cli.backfill_selection()?;
    let options = cli.options();

    let config_manager = ConfigManager::new(cli.config.to_string_lossy().into_owned()).await?;
    let config = config_manager.get_current_config();
    let clock = DayClock::from_config(&config.chain)?;
    info!(
        "Chain timing: {}s slots, {} slots per epoch, {} epochs per day",
        clock.seconds_per_slot(),
        clock.slots_per_epoch(),
        clock.epochs_per_day()
    );

    let database = Arc::new(Database::new(&config.database.path).await?);
    let writers = dataset_writers(&options, database.clone(), clock);

    if writers.is_empty() {
        let flags: Vec<String> = DatasetKind::ALL
            .iter()
            .map(|kind| format!("--{}", kind.flag()))
            .collect();
        warn!(
            "None of {} is set, no day-indexed dataset will be exported",
            flags.join(", ")
        );
    }

    if let Some(selection) = selection {
        let result = Backfill::new(database.clone(), writers).run(selection).await;
        database.close().await;

        for outcome in result? {
            info!(
                "Backfilled {} for days {:?}: {} exported, {} failed",
                outcome.kind,
                selection.days(),
                outcome.succeeded().len(),
                outcome.failed.len()
            );
        }
        return Ok(());
    }

    let status = Arc::new(StatusService::from_config(&config.status, database.clone())?);
    let cancel = CancellationToken::new();
    let mut tasks = Vec::with_capacity(2);

    let driver = CatchUpDriver::new(
        database.clone(),
        clock,
        writers,
        status.clone(),
        config.statistics.poll_interval(),
    );
    tasks.push(tokio::spawn(driver.run(cancel.child_token())));

    if options.pools_disabled {
        info!("Pool info updater disabled");
    } else {
        let pools = PoolsLoop::new(
            Arc::new(PoolInfoUpdater::new(database.clone())),
            status.clone(),
            config.statistics.pools_interval(),
        );
        tasks.push(tokio::spawn(pools.run(cancel.child_token())));
    }

    info!(
        "Background tasks started (instance {})",
        status.identity().instance_id
    );

    wait_for_shutdown().await?;
    info!("exiting...");

    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            error!("Background task ended abnormally: {}", e);
        }
    }

    database.close().await;
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
