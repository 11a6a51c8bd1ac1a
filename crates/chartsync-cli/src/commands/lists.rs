use std::collections::HashSet;
use std::time::Duration;

use chartsync_models::AccountName;
use chartsync_sources::{Catalog, TraktCatalog};
use color_eyre::Result;
use comfy_table::Table;
use serde_json::json;

use crate::commands::{build_accounts, load_context};
use crate::output::{Output, OutputFormat};

/// Show every configured list and whether it currently exists remotely.
pub async fn show_lists(output: &Output) -> Result<()> {
    let ctx = load_context()?;
    let accounts = build_accounts(&ctx.config, &ctx.cred_store)?;
    let catalog = TraktCatalog::new(Duration::from_secs(ctx.config.request.timeout_secs))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create catalog client: {}", e))?;

    let tasks = ctx.config.tasks();
    let mut rows = Vec::new();

    for name in AccountName::ALL {
        let account_tasks: Vec<_> = tasks.iter().filter(|t| t.account == name).collect();
        if account_tasks.is_empty() {
            continue;
        }

        let account = accounts.get(name);
        let remote: HashSet<String> = catalog
            .user_lists(account)
            .await
            .map_err(|e| {
                color_eyre::eyre::eyre!("Failed to fetch lists for account '{}': {}", name, e)
            })?
            .into_iter()
            .map(|l| l.slug)
            .collect();

        for task in account_tasks {
            rows.push((
                task.id.clone(),
                name.to_string(),
                task.list.slug.clone(),
                remote.contains(&task.list.slug),
            ));
        }
    }

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.set_header(vec!["Task", "Account", "List slug", "Remote"]);
            for (task, account, slug, present) in &rows {
                table.add_row(vec![
                    task.clone(),
                    account.clone(),
                    slug.clone(),
                    if *present { "yes" } else { "missing" }.to_string(),
                ]);
            }
            output.println(table.to_string());
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let lists: Vec<_> = rows
                .iter()
                .map(|(task, account, slug, present)| {
                    json!({
                        "task": task,
                        "account": account,
                        "slug": slug,
                        "remote": present,
                    })
                })
                .collect();
            output.json(&json!({ "lists": lists }));
        }
    }

    Ok(())
}

/// Delete a remote list by slug on the given account.
pub async fn delete_list(account_name: &str, slug: &str, output: &Output) -> Result<()> {
    let name: AccountName = account_name
        .parse()
        .map_err(|e: String| color_eyre::eyre::eyre!(e))?;

    let ctx = load_context()?;
    let accounts = build_accounts(&ctx.config, &ctx.cred_store)?;
    let catalog = TraktCatalog::new(Duration::from_secs(ctx.config.request.timeout_secs))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create catalog client: {}", e))?;

    catalog
        .delete_list(accounts.get(name), slug)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to delete list '{}': {}", slug, e))?;

    output.success(format!("Deleted list '{}' on account '{}'", slug, name));
    Ok(())
}
