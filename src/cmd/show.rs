//! `afn show <id>`

use anyhow::{Result, bail};
use serde_json::json;

use afn::afn_config::AfnConfig;
use afn::moderation::{DashboardState, HttpModerationClient, RequestDashboard};
use afn::ui::{ActivitySpinner, render_dashboard};

/// Build a dashboard for `id` backed by the configured server.
pub(crate) async fn open_dashboard(
    config: &AfnConfig,
    id: i64,
) -> Result<RequestDashboard<HttpModerationClient>> {
    let client = HttpModerationClient::from_config(config)?;
    let mut dashboard = RequestDashboard::new(client, id);
    dashboard.sync_transitions().await?;

    let spinner = ActivitySpinner::start(format!("Loading request {}...", id));
    match dashboard.load().await {
        DashboardState::Loaded(_) => spinner.clear(),
        _ => spinner.failure("Load failed"),
    }
    Ok(dashboard)
}

/// JSON document describing the dashboard.
pub(crate) fn dashboard_json(dashboard: &RequestDashboard<HttpModerationClient>) -> serde_json::Value {
    match dashboard.view() {
        Some(view) => json!({
            "request": view.request,
            "history": view.history,
            "next_statuses": view.options.iter().map(|o| o.status).collect::<Vec<_>>(),
        }),
        None => json!({ "request": null }),
    }
}

pub async fn cmd_show(config: &AfnConfig, id: i64, json: bool) -> Result<()> {
    let dashboard = open_dashboard(config, id).await?;

    if let DashboardState::LoadError(message) = dashboard.state() {
        bail!("{}", message);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard_json(&dashboard))?);
    } else {
        print!(
            "{}",
            render_dashboard(id, dashboard.state(), dashboard.indicator(), config.date_format())
        );
    }
    Ok(())
}
