//! `afn create`: submit a new add-forge request.

use anyhow::{Result, bail};
use serde_json::json;

use afn::NewForgeRequest;
use afn::afn_config::AfnConfig;
use afn::moderation::{HttpModerationClient, submit_request};
use afn::ui::{ActivitySpinner, render_feedback};

pub async fn cmd_create(config: &AfnConfig, request: &NewForgeRequest, json: bool) -> Result<()> {
    let client = HttpModerationClient::from_config(config)?;

    let spinner = ActivitySpinner::start("Submitting request...");
    let feedback = submit_request(&client, request).await;
    spinner.clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "success": feedback.is_success(),
                "message": feedback.message,
                "request": feedback.created,
            }))?
        );
    } else {
        println!("{}", render_feedback(&feedback));
    }

    if !feedback.is_success() {
        bail!("{}", feedback.message);
    }
    Ok(())
}
