use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chartsync_models::{AccountName, AccountSet, ChartTask, DesiredSet, RankedItem};
use chartsync_sources::{extract_ranked, Catalog, ChartFetcher};
use serde::Serialize;
use tracing::{error, info};

use crate::accounts::{validate_account, TokenValidation};
use crate::reconcile::{reconcile, ReconcileOutcome};
use crate::resolve::resolve;
use crate::retry::{self, RetryPolicy};

/// One task's scrape result, held between the scrape and sync phases so
/// the caller can render the charts before any remote write happens.
#[derive(Debug, Clone)]
pub struct ScrapedTask {
    pub task: ChartTask,
    pub items: Vec<RankedItem>,
    pub fetch_failed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total_tasks: usize,
    /// Tasks that produced at least one ranked item.
    pub successful_extractions: usize,
    pub failed_tasks: Vec<String>,
    pub lists_updated: usize,
    pub lists_skipped: usize,
    pub write_failures: usize,
    #[serde(skip)]
    pub duration: std::time::Duration,
}

impl RunSummary {
    pub fn failed_extractions(&self) -> usize {
        self.failed_tasks.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        self.successful_extractions as f64 / self.total_tasks as f64 * 100.0
    }
}

/// Drives one run end to end: scrape every chart, validate credentials,
/// ensure the lists exist, then resolve and reconcile each list in turn.
/// Everything is sequential; the only state shared between steps is the
/// account set, whose tokens must be validated before the first write.
pub struct Orchestrator<'a> {
    catalog: &'a dyn Catalog,
    charts: &'a dyn ChartFetcher,
    policy: RetryPolicy,
}

impl<'a> Orchestrator<'a> {
    pub fn new(catalog: &'a dyn Catalog, charts: &'a dyn ChartFetcher, policy: RetryPolicy) -> Self {
        Self {
            catalog,
            charts,
            policy,
        }
    }

    pub async fn run(&self, tasks: &[ChartTask], accounts: &mut AccountSet) -> Result<RunSummary> {
        let scraped = self.scrape(tasks).await;
        self.sync(scraped, accounts).await
    }

    /// Fetch and extract every chart section. A failed fetch yields an
    /// empty item list and marks the task failed; it never aborts the run.
    pub async fn scrape(&self, tasks: &[ChartTask]) -> Vec<ScrapedTask> {
        let mut scraped = Vec::with_capacity(tasks.len());
        for task in tasks {
            match self.charts.fetch(&task.url).await {
                Ok(html) => {
                    let items = extract_ranked(&html, &task.section);
                    info!(task = task.id, items = items.len(), "Scraped chart");
                    scraped.push(ScrapedTask {
                        task: task.clone(),
                        items,
                        fetch_failed: false,
                    });
                }
                Err(e) => {
                    error!(task = task.id, error = %e, "Chart fetch failed");
                    scraped.push(ScrapedTask {
                        task: task.clone(),
                        items: Vec::new(),
                        fetch_failed: true,
                    });
                }
            }
        }
        scraped
    }

    /// Resolve and reconcile previously scraped tasks. Credential
    /// validation happens first; a failed account aborts before any list
    /// is touched.
    pub async fn sync(
        &self,
        scraped: Vec<ScrapedTask>,
        accounts: &mut AccountSet,
    ) -> Result<RunSummary> {
        let started = std::time::Instant::now();
        self.validate_accounts(accounts).await?;

        let tasks: Vec<&ChartTask> = scraped.iter().map(|s| &s.task).collect();
        self.ensure_lists(&tasks, accounts).await;

        let mut summary = RunSummary {
            total_tasks: scraped.len(),
            ..RunSummary::default()
        };

        for scraped_task in &scraped {
            let task = &scraped_task.task;
            if scraped_task.fetch_failed {
                summary.failed_tasks.push(task.id.clone());
            } else if !scraped_task.items.is_empty() {
                summary.successful_extractions += 1;
            }

            let account = accounts.get(task.account);
            let mut desired = DesiredSet::new();
            for item in &scraped_task.items {
                if let Some(entry) = resolve(self.catalog, account, item, task.scope).await {
                    desired.push(entry);
                }
            }
            info!(
                task = task.id,
                resolved = desired.len(),
                of = scraped_task.items.len(),
                "Resolved chart entries"
            );

            match reconcile(self.catalog, account, &task.list.slug, &desired, &self.policy).await {
                ReconcileOutcome::Updated => summary.lists_updated += 1,
                ReconcileOutcome::Skipped => summary.lists_skipped += 1,
                ReconcileOutcome::Failed => summary.write_failures += 1,
            }
        }

        summary.duration = started.elapsed();
        info!(
            total_tasks = summary.total_tasks,
            successful_extractions = summary.successful_extractions,
            failed_extractions = summary.failed_extractions(),
            lists_updated = summary.lists_updated,
            lists_skipped = summary.lists_skipped,
            write_failures = summary.write_failures,
            success_rate = format!("{:.1}%", summary.success_rate()),
            "Run complete"
        );

        Ok(summary)
    }

    async fn validate_accounts(&self, accounts: &mut AccountSet) -> Result<()> {
        let mut failed = Vec::new();
        for account in accounts.iter_mut() {
            if validate_account(self.catalog, account).await == TokenValidation::Failed {
                failed.push(account.name.to_string());
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "credential validation failed for account(s): {}",
                failed.join(", ")
            ))
        }
    }

    /// Create-if-missing for every task's list, matched by slug against
    /// the owning account's list collection. A list that cannot be created
    /// surfaces later as that list's write failure.
    async fn ensure_lists(&self, tasks: &[&ChartTask], accounts: &AccountSet) {
        for name in AccountName::ALL {
            let account_tasks: Vec<&&ChartTask> =
                tasks.iter().filter(|t| t.account == name).collect();
            if account_tasks.is_empty() {
                continue;
            }

            let account = accounts.get(name);
            let existing: HashSet<String> = match self.catalog.user_lists(account).await {
                Ok(lists) => lists.into_iter().map(|l| l.slug).collect(),
                Err(e) => {
                    error!(account = %name, error = %e, "Could not fetch list collection");
                    continue;
                }
            };

            for task in account_tasks {
                if existing.contains(&task.list.slug) {
                    continue;
                }
                info!(list = task.list.slug, account = %name, "Creating missing list");
                let label = format!("create list {}", task.list.slug);
                let catalog = self.catalog;
                let list = &task.list;
                let outcome = retry::execute(&self.policy, &label, move || async move {
                    catalog.create_list(account, list).await
                })
                .await;
                if !outcome.succeeded() {
                    error!(list = task.list.slug, "Failed to create list");
                }
            }
        }
    }
}
