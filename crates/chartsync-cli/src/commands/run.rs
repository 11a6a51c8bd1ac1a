use std::time::Duration;

use chartsync_core::{Orchestrator, RetryPolicy, RunSummary, ScrapedTask};
use chartsync_models::RankedItem;
use chartsync_sources::{HttpChartClient, TraktCatalog};
use color_eyre::Result;
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use crate::commands::{build_accounts, load_context, persist_tokens};
use crate::output::{Output, OutputFormat};

pub async fn run_once(print_lists: bool, output: &Output) -> Result<()> {
    tracing::debug!("Run command started");

    let mut ctx = load_context()?;
    let mut accounts = build_accounts(&ctx.config, &ctx.cred_store)?;

    let timeout = Duration::from_secs(ctx.config.request.timeout_secs);
    let catalog = TraktCatalog::new(timeout)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create catalog client: {}", e))?;
    let charts = HttpChartClient::new(timeout)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create chart client: {}", e))?;
    let policy = RetryPolicy::from(&ctx.config.request);

    let orchestrator = Orchestrator::new(&catalog, &charts, policy);
    let tasks = ctx.config.tasks();

    let spinner = make_spinner(output);
    if let Some(spinner) = &spinner {
        spinner.set_message("Scraping charts...");
    }

    let scraped = orchestrator.scrape(&tasks).await;

    if print_lists {
        if let Some(spinner) = &spinner {
            spinner.suspend(|| render_charts(&scraped, output));
        } else {
            render_charts(&scraped, output);
        }
    }

    if let Some(spinner) = &spinner {
        spinner.set_message("Resolving titles and updating lists...");
    }

    let result = orchestrator.sync(scraped, &mut accounts).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    // Tokens refreshed during validation must survive even a failed run.
    persist_tokens(&mut ctx.cred_store, &accounts)?;

    let summary = result.map_err(|e| color_eyre::eyre::eyre!(e))?;
    report_summary(&summary, output);

    Ok(())
}

fn make_spinner(output: &Output) -> Option<ProgressBar> {
    if output.format() != OutputFormat::Human || output.is_quiet() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

fn render_charts(scraped: &[ScrapedTask], output: &Output) {
    for scraped_task in scraped {
        output.println(format!("\n{}", scraped_task.task.id));
        if scraped_task.fetch_failed {
            output.warn("  fetch failed");
            continue;
        }
        output.println(chart_table(&scraped_task.items).to_string());
    }
}

fn chart_table(items: &[RankedItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Title", "Slug"]);
    for item in items {
        table.add_row(vec![
            item.rank.to_string(),
            item.title.clone(),
            item.slug.clone(),
        ]);
    }
    table
}

fn report_summary(summary: &RunSummary, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            if !summary.failed_tasks.is_empty() {
                output.warn(format!(
                    "Failed extractions: {}",
                    summary.failed_tasks.join(", ")
                ));
            }
            if summary.write_failures > 0 {
                output.warn(format!(
                    "{} list update(s) abandoned after retries",
                    summary.write_failures
                ));
            }
            output.success(format!(
                "Run complete: {}/{} charts extracted, {} lists updated, {} skipped in {:?} ({:.1}% success rate)",
                summary.successful_extractions,
                summary.total_tasks,
                summary.lists_updated,
                summary.lists_skipped,
                summary.duration,
                summary.success_rate(),
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json_result = json!({
                "success": true,
                "summary": summary,
                "success_rate": summary.success_rate(),
                "duration_seconds": summary.duration.as_secs_f64(),
            });
            output.json(&json_result);
        }
    }
}
