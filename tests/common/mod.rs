//! In-process fake of the add-forge-now HTTP endpoints.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::json;

use afn::{
    ActorRole, DataTablesPage, ForgeAddRequest, HistoryEvent, NewForgeRequest, RequestDetail,
    RequestStatus, StatusUpdate,
};

pub const CSRF_TOKEN: &str = "csrf-test-token";
pub const API_TOKEN: &str = "api-test-token";
pub const TRANSITIONS_PATH: &str = "/api/1/add-forge/transitions/";

#[derive(Default)]
pub struct Backend {
    pub requests: BTreeMap<i64, RequestDetail>,
    /// Value of the CSRF header of every POST, in order
    pub csrf_seen: Vec<Option<String>>,
    /// Value of the Authorization header of every call, in order
    pub authorization_seen: Vec<Option<String>>,
    pub get_calls: usize,
    /// Table served on the transitions route; 404 when unset
    pub transitions: Option<HashMap<String, Vec<String>>>,
    /// Answer the next update with a 500 and this plain-text body
    pub fail_next_update: Option<String>,
}

pub type Shared = Arc<Mutex<Backend>>;

pub fn request(id: i64, status: RequestStatus) -> ForgeAddRequest {
    ForgeAddRequest {
        id,
        status,
        forge_type: "gitlab".to_string(),
        forge_url: format!("https://gitlab{}.example.org/", id),
        forge_contact_name: "Ada".to_string(),
        forge_contact_email: "ada@example.org".to_string(),
        forge_contact_comment: None,
        submitter_name: Some("submitter".to_string()),
        submission_date: Utc.with_ymd_and_hms(2022, 4, 1, 10, 0, 0).unwrap(),
        last_modified_date: None,
        last_moderator: None,
    }
}

pub fn backend_with(requests: &[(i64, RequestStatus)]) -> Shared {
    let mut backend = Backend::default();
    for (id, status) in requests {
        backend.requests.insert(
            *id,
            RequestDetail {
                request: request(*id, *status),
                history: Vec::new(),
            },
        );
    }
    Arc::new(Mutex::new(backend))
}

/// The builtin table with `status` narrowed to `next`.
pub fn narrowed_table(status: RequestStatus, next: &[RequestStatus]) -> HashMap<String, Vec<String>> {
    RequestStatus::ALL
        .iter()
        .map(|s| {
            let nexts = if *s == status { next } else { s.next_statuses() };
            (s.to_string(), nexts.iter().map(|n| n.to_string()).collect())
        })
        .collect()
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn csrf(headers: &HeaderMap) -> Option<String> {
    header(headers, "X-CSRFToken")
}

fn record_authorization(backend: &mut Backend, headers: &HeaderMap) {
    backend
        .authorization_seen
        .push(header(headers, "Authorization"));
}

async fn get_transitions(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut backend = state.lock().unwrap();
    record_authorization(&mut backend, &headers);
    match &backend.transitions {
        Some(table) => Json(table.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_request(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut backend = state.lock().unwrap();
    record_authorization(&mut backend, &headers);
    backend.get_calls += 1;
    match backend.requests.get(&id) {
        Some(detail) => Json(detail.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "reason": format!("Request {} not found", id) })),
        )
            .into_response(),
    }
}

async fn update_request(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(update): Form<StatusUpdate>,
) -> Response {
    let mut backend = state.lock().unwrap();
    record_authorization(&mut backend, &headers);
    backend.csrf_seen.push(csrf(&headers));
    if let Some(body) = backend.fail_next_update.take() {
        return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    }
    let Some(detail) = backend.requests.get_mut(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !detail.request.status.next_statuses().contains(&update.new_status) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "reason": "Illegal status transition" })),
        )
            .into_response();
    }
    detail.request.status = update.new_status;
    detail.request.last_moderator = Some("moderator".to_string());
    let event_id = detail.history.len() as i64 + 1;
    detail.history.push(HistoryEvent {
        id: event_id,
        date: Utc.with_ymd_and_hms(2022, 4, 2, 9, 0, 0).unwrap(),
        actor: "moderator".to_string(),
        actor_role: ActorRole::Moderator,
        text: update.comment.unwrap_or_default(),
        new_status: Some(update.new_status),
    });
    Json(detail.request.clone()).into_response()
}

async fn create_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(new): Form<NewForgeRequest>,
) -> Response {
    let mut backend = state.lock().unwrap();
    record_authorization(&mut backend, &headers);
    backend.csrf_seen.push(csrf(&headers));
    if backend
        .requests
        .values()
        .any(|d| d.request.forge_url == new.forge_url)
    {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "reason": "A request for this forge already exists." })),
        )
            .into_response();
    }
    let id = backend.requests.keys().next_back().copied().unwrap_or(0) + 1;
    let mut created = request(id, RequestStatus::Pending);
    created.forge_type = new.forge_type;
    created.forge_url = new.forge_url;
    created.forge_contact_name = new.forge_contact_name;
    created.forge_contact_email = new.forge_contact_email;
    created.forge_contact_comment = new.forge_contact_comment;
    backend.requests.insert(
        id,
        RequestDetail {
            request: created.clone(),
            history: Vec::new(),
        },
    );
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn list_requests(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Json<DataTablesPage<ForgeAddRequest>> {
    let mut backend = state.lock().unwrap();
    record_authorization(&mut backend, &headers);
    let param = |name: &str| params.get(name).and_then(|v| v.parse::<u64>().ok());
    let draw = param("draw").unwrap_or(0);
    let start = param("start").unwrap_or(0) as usize;
    let length = param("length").unwrap_or(10) as usize;
    let search = params.get("search[value]").cloned().unwrap_or_default();

    let matching: Vec<ForgeAddRequest> = backend
        .requests
        .values()
        .map(|d| d.request.clone())
        .filter(|r| r.forge_url.contains(&search))
        .collect();
    Json(DataTablesPage {
        records_total: backend.requests.len() as u64,
        records_filtered: matching.len() as u64,
        data: matching.into_iter().skip(start).take(length).collect(),
        draw,
    })
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/1/add-forge/request/{id}/get/", get(get_request))
        .route("/api/1/add-forge/request/{id}/update/", post(update_request))
        .route("/api/1/add-forge/request/create/", post(create_request))
        .route("/add-forge/request/list/datatables/", get(list_requests))
        .route(TRANSITIONS_PATH, get(get_transitions))
        .with_state(state)
}

/// Serve the fake backend on an ephemeral port; returns its base URL.
pub async fn spawn(state: Shared) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Same as [`spawn`], on a dedicated runtime thread for synchronous tests.
pub fn spawn_blocking(state: Shared) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            tx.send(spawn(state).await).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}
