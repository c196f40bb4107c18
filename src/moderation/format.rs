//! Pure display helpers shared by the dashboard and the list views.

use std::fmt::Write as _;

use afn_common::RequestStatus;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;

/// Label shown for a status.
pub fn status_label(status: RequestStatus) -> &'static str {
    status.label()
}

/// Whether chrono understands every specifier of `format`.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render a timestamp with a chrono format string, in UTC.
///
/// Falls back to RFC 3339 when `format` cannot be rendered.
pub fn format_date(date: &DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    if is_valid_date_format(format) && write!(out, "{}", date.format(format)).is_ok() {
        return out;
    }
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Same as [`format_date`], with a dash for missing values.
pub fn format_optional_date(date: Option<&DateTime<Utc>>, format: &str) -> String {
    date.map(|d| format_date(d, format))
        .unwrap_or_else(|| "-".to_string())
}

/// Host part of a forge URL, or the URL itself when it cannot be parsed.
pub fn forge_domain(forge_url: &str) -> String {
    Url::parse(forge_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| forge_url.to_string())
}

/// Public page of a request.
pub fn request_link(base: &Url, id: i64) -> String {
    join_or_raw(base, &format!("/add-forge/request/{}/", id))
}

/// Moderation dashboard of a request.
pub fn moderation_link(base: &Url, id: i64) -> String {
    join_or_raw(base, &format!("/admin/add-forge/request/{}/", id))
}

fn join_or_raw(base: &Url, path: &str) -> String {
    base.join(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{}{}", base.as_str().trim_end_matches('/'), path))
}
