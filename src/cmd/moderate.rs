//! `afn moderate <id>`: pick a new status and submit it.

use anyhow::{Context, Result, bail};
use dialoguer::{Select, theme::ColorfulTheme};

use afn::RequestStatus;
use afn::afn_config::AfnConfig;
use afn::moderation::{DashboardState, Decision, DecisionOption};
use afn::ui::{ActivitySpinner, render_dashboard};

use super::show::{dashboard_json, open_dashboard};

fn prompt_status(options: &[DecisionOption]) -> Result<RequestStatus> {
    if !console::Term::stdout().is_term() {
        bail!("--status is required when not running in a terminal");
    }
    let items: Vec<String> = options
        .iter()
        .map(|o| format!("{} ({})", o.label, o.status))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("New status")
        .items(&items)
        .default(0)
        .interact()
        .context("No status selected")?;
    Ok(options[selection].status)
}

pub async fn cmd_moderate(
    config: &AfnConfig,
    id: i64,
    status: Option<&str>,
    comment: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut dashboard = open_dashboard(config, id).await?;
    if let DashboardState::LoadError(message) = dashboard.state() {
        bail!("{}", message);
    }

    let options = dashboard.decision_options().to_vec();
    if options.is_empty() {
        bail!(
            "Request {} is {}; no further decision possible",
            id,
            dashboard
                .view()
                .map(|v| v.status_label())
                .unwrap_or("not loaded")
        );
    }

    let new_status = match status {
        Some(name) => name.parse::<RequestStatus>()?,
        None => prompt_status(&options)?,
    };
    let mut decision = Decision::new(new_status);
    if let Some(comment) = comment {
        decision = decision.with_comment(comment);
    }

    let spinner = ActivitySpinner::start(format!("Submitting {}...", new_status));
    let result = dashboard.submit_decision(decision).await;
    match &result {
        Ok(()) => spinner.clear(),
        Err(e) => spinner.failure(&e.user_message()),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard_json(&dashboard))?);
    } else {
        print!(
            "{}",
            render_dashboard(id, dashboard.state(), dashboard.indicator(), config.date_format())
        );
    }
    result?;
    Ok(())
}
