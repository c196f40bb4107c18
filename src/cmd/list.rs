//! `afn list`: one page of the browse or moderation listing.

use anyhow::Result;
use serde_json::json;

use afn::afn_config::AfnConfig;
use afn::moderation::{HttpModerationClient, ListMode, RequestListView};
use afn::ui::{ActivitySpinner, render_table};

pub struct ListOptions {
    pub moderation: bool,
    pub mine: bool,
    pub search: Option<String>,
    pub page: u64,
    pub page_size: Option<u32>,
    pub oldest_first: bool,
}

pub async fn cmd_list(config: &AfnConfig, options: &ListOptions, json: bool) -> Result<()> {
    let client = HttpModerationClient::from_config(config)?;
    let base = client.endpoints().base().clone();
    let mode = if options.moderation {
        ListMode::Moderation
    } else {
        ListMode::Browse
    };
    let page_size = options.page_size.unwrap_or_else(|| config.page_size()).max(1);

    let mut view = RequestListView::new(client, mode, base, page_size)
        .with_date_format(config.date_format())
        .only_own_requests(options.mine)
        .oldest_first(options.oldest_first)
        .with_search(options.search.clone().unwrap_or_default());
    view.set_page(options.page);

    let spinner = ActivitySpinner::start("Fetching requests...");
    let result = view.refresh().await.map(|t| t.clone());
    spinner.clear();
    let table = result?;

    if json {
        let rows: Vec<_> = table
            .rows
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "status": r.status,
                    "submission_date": r.submission_date,
                    "forge_type": r.forge_type,
                    "forge_url": r.forge_url,
                    "link": r.link,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "records_total": table.records_total,
                "records_filtered": table.records_filtered,
                "rows": rows,
            }))?
        );
    } else {
        print!("{}", render_table(&table, mode, page_size));
    }
    Ok(())
}
