//! Browse and moderation listings of add-forge requests.
//!
//! [`RequestListView`] owns both its query state and the last table it
//! rendered. Pages are fetched from the server-side paginated endpoint; each
//! fetch increments the DataTables `draw` counter, and a response carrying
//! another draw number is dropped as stale.

use afn_common::{DataTablesPage, ForgeAddRequest, RequestStatus};
use reqwest::Url;

use super::client::{DataTablesQuery, ModerationApi, SortDirection};
use super::format::{
    forge_domain, format_date, format_optional_date, moderation_link, request_link,
};
use crate::errors::{AfnError, Result};

/// Which listing is shown; moderators see more columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    #[default]
    Browse,
    Moderation,
}

impl ListMode {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Browse => &["Submission date", "Forge type", "Forge URL", "Status"],
            Self::Moderation => &[
                "ID",
                "Submission date",
                "Forge type",
                "Forge URL",
                "Contact email",
                "Status",
                "Last modified",
                "Last moderator",
            ],
        }
    }
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: i64,
    pub status: RequestStatus,
    pub submission_date: String,
    pub forge_type: String,
    pub forge_url: String,
    pub forge_domain: String,
    pub status_label: &'static str,
    pub link: String,
    pub contact_email: String,
    pub last_modified: String,
    pub last_moderator: String,
}

impl ListRow {
    pub fn from_request(
        request: &ForgeAddRequest,
        mode: ListMode,
        base: &Url,
        date_format: &str,
    ) -> Self {
        let link = match mode {
            ListMode::Browse => request_link(base, request.id),
            ListMode::Moderation => moderation_link(base, request.id),
        };
        Self {
            id: request.id,
            status: request.status,
            submission_date: format_date(&request.submission_date, date_format),
            forge_type: request.forge_type.clone(),
            forge_url: request.forge_url.clone(),
            forge_domain: forge_domain(&request.forge_url),
            status_label: request.status.label(),
            link,
            contact_email: request.forge_contact_email.clone(),
            last_modified: format_optional_date(request.last_modified_date.as_ref(), date_format),
            last_moderator: request
                .last_moderator
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Cell values in the column order of `mode`.
    pub fn cells(&self, mode: ListMode) -> Vec<String> {
        match mode {
            ListMode::Browse => vec![
                self.submission_date.clone(),
                self.forge_type.clone(),
                self.forge_url.clone(),
                self.status_label.to_string(),
            ],
            ListMode::Moderation => vec![
                self.id.to_string(),
                self.submission_date.clone(),
                self.forge_type.clone(),
                self.forge_url.clone(),
                self.contact_email.clone(),
                self.status_label.to_string(),
                self.last_modified.clone(),
                self.last_moderator.clone(),
            ],
        }
    }
}

/// A rendered page of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestTable {
    pub rows: Vec<ListRow>,
    pub records_total: u64,
    pub records_filtered: u64,
    /// Offset of the first row
    pub start: u64,
}

impl RequestTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based page number for a given page size.
    pub fn page_number(&self, page_size: u32) -> u64 {
        self.start / u64::from(page_size.max(1)) + 1
    }

    /// Number of pages the filtered records span.
    pub fn page_count(&self, page_size: u32) -> u64 {
        self.records_filtered.div_ceil(u64::from(page_size.max(1)))
    }
}

pub struct RequestListView<A> {
    api: A,
    mode: ListMode,
    base: Url,
    date_format: String,
    query: DataTablesQuery,
    table: Option<RequestTable>,
}

impl<A: ModerationApi> RequestListView<A> {
    pub fn new(api: A, mode: ListMode, base: Url, page_size: u32) -> Self {
        Self {
            api,
            mode,
            base,
            date_format: "%Y-%m-%d %H:%M".to_string(),
            query: DataTablesQuery::new(page_size.max(1)),
            table: None,
        }
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Restrict the listing to the caller's own requests.
    pub fn only_own_requests(mut self, only: bool) -> Self {
        self.query.user_requests_only = only;
        self
    }

    /// Initial search term; unlike [`search`](Self::search) it keeps the page.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.query.search = term.into();
        self
    }

    /// Order by submission date, oldest first instead of newest first.
    pub fn oldest_first(mut self, oldest: bool) -> Self {
        self.query.order_dir = if oldest {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        self
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn query(&self) -> &DataTablesQuery {
        &self.query
    }

    pub fn table(&self) -> Option<&RequestTable> {
        self.table.as_ref()
    }

    /// Jump to a 1-based page without fetching.
    pub fn set_page(&mut self, page: u64) {
        self.query.start = page
            .saturating_sub(1)
            .saturating_mul(u64::from(self.query.length));
    }

    /// Fetch the current page and replace the table.
    pub async fn refresh(&mut self) -> Result<&RequestTable> {
        self.query.draw += 1;
        let page = self.api.list_requests(&self.query).await?;
        self.apply(page)
    }

    fn apply(&mut self, page: DataTablesPage<ForgeAddRequest>) -> Result<&RequestTable> {
        if page.draw != self.query.draw {
            tracing::warn!(
                expected = self.query.draw,
                got = page.draw,
                "Dropping stale list response"
            );
            return Err(AfnError::Decode(format!(
                "stale listing: expected draw {}, got {}",
                self.query.draw, page.draw
            )));
        }

        let rows = page
            .data
            .iter()
            .map(|r| ListRow::from_request(r, self.mode, &self.base, &self.date_format))
            .collect();
        tracing::debug!(
            total = page.records_total,
            filtered = page.records_filtered,
            "List page loaded"
        );
        Ok(&*self.table.insert(RequestTable {
            rows,
            records_total: page.records_total,
            records_filtered: page.records_filtered,
            start: self.query.start,
        }))
    }

    /// Apply a search term, back to the first page.
    pub async fn search(&mut self, term: impl Into<String>) -> Result<&RequestTable> {
        self.query.search = term.into();
        self.query.start = 0;
        self.refresh().await
    }

    /// Move to the next page if there is one.
    pub async fn next_page(&mut self) -> Result<&RequestTable> {
        let filtered = self.table.as_ref().map(|t| t.records_filtered).unwrap_or(0);
        let next = self.query.start + u64::from(self.query.length);
        if next < filtered {
            self.query.start = next;
        }
        self.refresh().await
    }

    /// Move to the previous page, stopping at the first.
    pub async fn previous_page(&mut self) -> Result<&RequestTable> {
        self.query.start = self
            .query
            .start
            .saturating_sub(u64::from(self.query.length));
        self.refresh().await
    }
}
