//! Backend access for the moderation workflow.
//!
//! [`ModerationApi`] is the seam between the controllers and the network so
//! that dashboard and list logic can be driven by an in-memory backend in
//! tests. [`HttpModerationClient`] is the production implementation.

use std::collections::HashMap;

use afn_common::{
    DataTablesPage, ForgeAddRequest, NewForgeRequest, RequestDetail, StatusUpdate,
    TransitionTable,
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, Url};

use crate::afn_config::{AfnConfig, Endpoints};
use crate::errors::{AfnError, Result};

/// Header carrying the CSRF token on state-changing calls.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Sort direction of a DataTables column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query sent to the server-side paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTablesQuery {
    /// Sequence number echoed back by the server
    pub draw: u64,
    /// Offset of the first record
    pub start: u64,
    pub length: u32,
    pub search: String,
    pub order_column: u32,
    pub order_dir: SortDirection,
    /// Restrict to requests submitted by the authenticated user
    pub user_requests_only: bool,
}

impl DataTablesQuery {
    pub fn new(length: u32) -> Self {
        Self {
            draw: 0,
            start: 0,
            length,
            search: String::new(),
            order_column: 0,
            order_dir: SortDirection::default(),
            user_requests_only: false,
        }
    }

    /// Query-string pairs, named after the DataTables protocol.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("draw", self.draw.to_string()),
            ("start", self.start.to_string()),
            ("length", self.length.to_string()),
            ("search[value]", self.search.clone()),
            ("order[0][column]", self.order_column.to_string()),
            ("order[0][dir]", self.order_dir.as_str().to_string()),
        ];
        if self.user_requests_only {
            params.push(("user_requests_only", "1".to_string()));
        }
        params
    }
}

/// Operations the moderation UI needs from the backend.
#[async_trait]
pub trait ModerationApi: Send + Sync {
    /// Fetch a request together with its history.
    async fn get_request(&self, id: i64) -> Result<RequestDetail>;

    /// Move a request to a new status.
    async fn update_status(&self, id: i64, update: &StatusUpdate) -> Result<()>;

    /// Submit a new add-forge request.
    async fn create_request(&self, request: &NewForgeRequest) -> Result<ForgeAddRequest>;

    /// Fetch one page of requests.
    async fn list_requests(&self, query: &DataTablesQuery)
    -> Result<DataTablesPage<ForgeAddRequest>>;

    /// Transition table published by the server, if any.
    async fn transition_table(&self) -> Result<Option<TransitionTable>> {
        Ok(None)
    }
}

/// Production client backed by `reqwest`.
#[derive(Clone)]
pub struct HttpModerationClient {
    client: reqwest::Client,
    endpoints: Endpoints,
    api_token: Option<String>,
    csrf_token: Option<String>,
}

impl HttpModerationClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
            api_token: None,
            csrf_token: None,
        }
    }

    /// Build a client from the effective configuration.
    pub fn from_config(config: &AfnConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("afn/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(AfnError::Transport)?;

        Ok(Self {
            client,
            endpoints: config.endpoints()?,
            api_token: config.api_token(),
            csrf_token: config.csrf_token(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) if !token.is_empty() => {
                req.header(AUTHORIZATION, format!("Bearer {}", token))
            }
            _ => req,
        }
    }

    fn with_csrf(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => req.header(CSRF_HEADER, token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, url: &Url) -> Result<Response> {
        let response = self.authorize(req).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "HTTP request failed");
            AfnError::Transport(e)
        })?;

        let status = response.status();
        tracing::info!(url = %url, status = status.as_u16(), "HTTP request completed");
        if status.is_success() {
            return Ok(response);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Could not read error body");
                String::new()
            }
        };
        Err(AfnError::from_status(
            status.as_u16(),
            content_type.as_deref(),
            &body,
        ))
    }
}

#[async_trait]
impl ModerationApi for HttpModerationClient {
    #[tracing::instrument(skip(self))]
    async fn get_request(&self, id: i64) -> Result<RequestDetail> {
        let url = self.endpoints.request_get(id)?;
        tracing::debug!(url = %url, "Fetching add-forge request");
        let response = self.send(self.client.get(url.clone()), &url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[tracing::instrument(skip(self, update), fields(new_status = %update.new_status))]
    async fn update_status(&self, id: i64, update: &StatusUpdate) -> Result<()> {
        let url = self.endpoints.request_update(id)?;
        tracing::debug!(url = %url, "Submitting status change");
        let req = self.with_csrf(self.client.post(url.clone()).form(update));
        self.send(req, &url).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, request), fields(forge_url = %request.forge_url))]
    async fn create_request(&self, request: &NewForgeRequest) -> Result<ForgeAddRequest> {
        let url = self.endpoints.request_create()?;
        tracing::debug!(url = %url, "Submitting add-forge request");
        let req = self.with_csrf(self.client.post(url.clone()).form(request));
        let response = self.send(req, &url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[tracing::instrument(skip(self, query), fields(draw = query.draw, start = query.start))]
    async fn list_requests(
        &self,
        query: &DataTablesQuery,
    ) -> Result<DataTablesPage<ForgeAddRequest>> {
        let url = self.endpoints.list_datatables()?;
        tracing::debug!(url = %url, "Fetching request list");
        let req = self.client.get(url.clone()).query(&query.to_params());
        let response = self.send(req, &url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn transition_table(&self) -> Result<Option<TransitionTable>> {
        let Some(url) = self.endpoints.transitions() else {
            return Ok(None);
        };
        let url = url?;
        tracing::debug!(url = %url, "Fetching transition table");
        let response = self.send(self.client.get(url.clone()), &url).await?;
        let body = response.text().await?;
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(&body)?;
        Ok(Some(TransitionTable::from_server(raw)?))
    }
}
