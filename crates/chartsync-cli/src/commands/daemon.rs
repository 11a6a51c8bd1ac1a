use std::time::Duration;

use chartsync_config::{Config, PathManager};
use color_eyre::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::commands::run;
use crate::output::{Output, OutputFormat};

/// Foreground scheduler: re-runs the full pipeline on a cron schedule.
/// Each firing reloads config and credentials from disk, so token
/// refreshes persisted by an earlier run are picked up.
pub async fn run_daemon(
    schedule_override: Option<String>,
    no_startup_run: bool,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();
    paths.ensure_directories().map_err(|e| {
        color_eyre::eyre::eyre!("Failed to create chartsync directories: {}", e)
    })?;

    let config = Config::load_from_file(&paths.config_file()).map_err(|e| {
        color_eyre::eyre::eyre!(
            "Failed to load config from {}: {}",
            paths.config_file().display(),
            e
        )
    })?;

    let scheduler_config = config.scheduler.clone().unwrap_or_default();
    let schedule = schedule_override.unwrap_or_else(|| scheduler_config.schedule.clone());
    let run_on_startup = !no_startup_run && scheduler_config.run_on_startup;
    drop(config);

    output.info(format!(
        "Daemon started (schedule '{}'), logging to {}",
        schedule,
        paths.daemon_log_file().display()
    ));

    if run_on_startup {
        info!(operation = "daemon_startup", "Running initial pass on startup");
        run_scheduled().await;
    }

    let mut scheduler = JobScheduler::new()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create scheduler: {}", e))?;

    let job = Job::new_async(schedule.as_str(), |_uuid, _lock| {
        Box::pin(async {
            run_scheduled().await;
        })
    })
    .map_err(|e| color_eyre::eyre::eyre!("Invalid schedule '{}': {}", schedule, e))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to add scheduled job: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to start scheduler: {}", e))?;

    info!(
        operation = "daemon_started",
        schedule, "Scheduler started successfully"
    );

    // The scheduler runs on background tasks; keep the process alive.
    loop {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }
}

async fn run_scheduled() {
    info!(operation = "scheduled_run_start", "Starting scheduled run");
    // Diagnostics for scheduled runs go to the log stream only.
    let quiet_output = Output::new(OutputFormat::Human, true);
    match run::run_once(false, &quiet_output).await {
        Ok(()) => {
            info!(operation = "scheduled_run_complete", "Scheduled run finished");
        }
        Err(e) => {
            error!(
                operation = "scheduled_run_error",
                error = %e,
                "Scheduled run failed"
            );
        }
    }
}
