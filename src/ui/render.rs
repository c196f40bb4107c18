//! Plain-text rendering of dashboards, listings and the transition table.
//!
//! Every function returns a `String`; callers decide where it is printed.
//! Output only depends on its inputs, so rendering the same state twice
//! yields the same text.

use std::fmt::Write as _;

use afn_common::{RequestStatus, TransitionTable};
use console::{Alignment, Style, StyledObject, measure_text_width, pad_str, style};

use super::icons::{ARROW, CHECK, CONTACT, CROSS, FORGE, HISTORY};
use crate::moderation::format::format_date;
use crate::moderation::{
    Badge, DashboardState, FormFeedback, Indicator, ListMode, RequestTable, RequestView,
};

fn status_style(status: RequestStatus) -> Style {
    let base = Style::new();
    match status {
        RequestStatus::Pending | RequestStatus::WaitingForFeedback => base.yellow(),
        RequestStatus::FeedbackToHandle => base.magenta(),
        RequestStatus::Accepted | RequestStatus::Scheduled | RequestStatus::FirstListingDone => {
            base.cyan()
        }
        RequestStatus::FirstOriginLoaded => base.green(),
        RequestStatus::Rejected | RequestStatus::Denied => base.red(),
        RequestStatus::Suspended => base.dim(),
    }
}

/// Status label, colored by how far along the workflow it is.
pub fn status_badge(status: RequestStatus) -> StyledObject<&'static str> {
    status_style(status).apply_to(status.label())
}

/// Render the dashboard of a single request.
pub fn render_dashboard(
    request_id: i64,
    state: &DashboardState,
    indicator: Option<&Indicator>,
    date_format: &str,
) -> String {
    let mut out = String::new();
    match state {
        DashboardState::Idle => {
            let _ = writeln!(out, "Request {} not loaded yet", request_id);
        }
        DashboardState::Loading => {
            let _ = writeln!(out, "Loading request {}...", request_id);
        }
        DashboardState::LoadError(message) => {
            let _ = writeln!(out, "{}{}", CROSS, style(message).red());
        }
        DashboardState::Loaded(view) => render_view(&mut out, view, date_format, true),
        DashboardState::Submitting(view) => {
            render_view(&mut out, view, date_format, false);
            let _ = writeln!(out, "{}", style("Submitting decision...").dim());
        }
    }

    match indicator {
        Some(Indicator::SubmitSuccess(status)) => {
            let _ = writeln!(
                out,
                "{}{}",
                CHECK,
                style(format!("Status changed to {}", status.label())).green()
            );
        }
        Some(Indicator::SubmitError(message)) => {
            let _ = writeln!(out, "{}{}", CROSS, style(message).red());
        }
        None => {}
    }
    out
}

fn render_view(out: &mut String, view: &RequestView, date_format: &str, with_options: bool) {
    let request = &view.request;
    let _ = writeln!(
        out,
        "{} {}",
        style(format!("Add-forge request #{}", request.id)).bold(),
        status_badge(request.status)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "{}{}", FORGE, style("Forge").bold());
    field(out, "Type", &request.forge_type);
    field(out, "URL", &request.forge_url);
    field(out, "Submitted", &format_date(&request.submission_date, date_format));
    if let Some(submitter) = &request.submitter_name {
        field(out, "Submitter", submitter);
    }
    if let Some(modified) = &request.last_modified_date {
        field(out, "Last modified", &format_date(modified, date_format));
    }
    if let Some(moderator) = &request.last_moderator {
        field(out, "Last moderator", moderator);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}{}", CONTACT, style("Contact").bold());
    field(out, "Name", &request.forge_contact_name);
    field(out, "Email", &request.forge_contact_email);
    field(
        out,
        "Comment",
        request.forge_contact_comment.as_deref().unwrap_or("-"),
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "{}{}", HISTORY, style("History").bold());
    if view.history.is_empty() {
        let _ = writeln!(out, "  {}", style("No history").dim());
    }
    for event in &view.history {
        let _ = write!(
            out,
            "  {} {} ({})",
            format_date(&event.date, date_format),
            event.actor,
            event.actor_role.label()
        );
        if let Some(status) = event.new_status {
            let _ = write!(out, " {}{}", ARROW, status_badge(status));
        }
        let _ = writeln!(out);
        if !event.text.trim().is_empty() {
            for line in event.text.lines() {
                let _ = writeln!(out, "      {}", line);
            }
        }
    }

    if with_options {
        let _ = writeln!(out);
        if view.options.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                style("No further decision possible for this request").dim()
            );
        } else {
            let _ = writeln!(out, "{}", style("Possible decisions").bold());
            for option in &view.options {
                let _ = writeln!(out, "  - {} ({})", option.label, option.status);
            }
        }
    }
}

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(
        out,
        "  {} {}",
        style(pad_str(&format!("{}:", name), 16, Alignment::Left, None)).dim(),
        value
    );
}

/// Render one page of a listing as an aligned table.
pub fn render_table(table: &RequestTable, mode: ListMode, page_size: u32) -> String {
    let mut out = String::new();
    if table.is_empty() {
        let _ = writeln!(out, "{}", style("No add-forge request found").dim());
        let _ = writeln!(out, "0 of {} requests", table.records_total);
        return out;
    }

    let headers = mode.columns();
    let rows: Vec<Vec<String>> = table.rows.iter().map(|r| r.cells(mode)).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| measure_text_width(&r[i]))
                .chain(std::iter::once(measure_text_width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad_str(h, *w, Alignment::Left, None).into_owned())
        .collect();
    let _ = writeln!(out, "{}", style(header_line.join("  ").trim_end()).bold());

    for (row, cells) in table.rows.iter().zip(&rows) {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = pad_str(cell, *w, Alignment::Left, None).into_owned();
                if headers[i] == "Status" {
                    status_style(row.status).apply_to(padded).to_string()
                } else {
                    padded
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }

    let first = table.start.saturating_add(1);
    let last = table.start.saturating_add(table.rows.len() as u64);
    let _ = write!(
        out,
        "{}-{} of {} requests (page {}/{})",
        first,
        last,
        table.records_filtered,
        table.page_number(page_size),
        table.page_count(page_size).max(1)
    );
    if table.records_filtered != table.records_total {
        let _ = write!(out, ", filtered from {}", table.records_total);
    }
    let _ = writeln!(out);
    out
}

/// Render the transition table, or the entry of a single status.
pub fn render_transitions(table: &TransitionTable, only: Option<RequestStatus>) -> String {
    let mut out = String::new();
    for (status, nexts) in table.iter() {
        if only.is_some_and(|s| s != status) {
            continue;
        }
        let next = if nexts.is_empty() {
            "(terminal)".to_string()
        } else {
            nexts
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            out,
            "{} {} {}",
            pad_str(status.as_str(), 20, Alignment::Left, None),
            ARROW,
            next
        );
    }
    out
}

/// Render the outcome of a form submission.
pub fn render_feedback(feedback: &FormFeedback) -> String {
    match feedback.badge {
        Badge::Success => {
            let mut line = format!("{}{}", CHECK, style(&feedback.message).green());
            if let Some(created) = &feedback.created {
                let _ = write!(line, " (request #{})", created.id);
            }
            line
        }
        Badge::Error => format!("{}{}", CROSS, style(&feedback.message).red()),
    }
}
