//! In-memory backend for controller tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use afn_common::{
    ActorRole, DataTablesPage, ForgeAddRequest, HistoryEvent, NewForgeRequest, RequestDetail,
    RequestStatus, StatusUpdate, TransitionTable,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use super::client::{DataTablesQuery, ModerationApi};
use crate::errors::{AfnError, Result};

/// Build a request fixture in the given status.
pub fn sample_request(id: i64, status: RequestStatus) -> ForgeAddRequest {
    ForgeAddRequest {
        id,
        status,
        forge_type: "gitlab".into(),
        forge_url: format!("https://gitlab{}.example.org/", id),
        forge_contact_name: "Ada".into(),
        forge_contact_email: "ada@example.org".into(),
        forge_contact_comment: Some("self-hosted".into()),
        submitter_name: Some("ada".into()),
        submission_date: Utc.with_ymd_and_hms(2022, 4, 1, 10, 0, 0).unwrap(),
        last_modified_date: None,
        last_moderator: None,
    }
}

#[derive(Default)]
struct State {
    requests: BTreeMap<i64, RequestDetail>,
    get_failures: VecDeque<AfnError>,
    update_failures: VecDeque<AfnError>,
    transitions: Option<TransitionTable>,
    updates: Vec<(i64, StatusUpdate)>,
}

/// Mock backend that applies updates to its in-memory store.
#[derive(Clone, Default)]
pub struct MockModerationApi {
    state: Arc<Mutex<State>>,
    get_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl MockModerationApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(self, request: ForgeAddRequest) -> Self {
        let history = vec![HistoryEvent {
            id: 1,
            date: request.submission_date,
            actor: "ada".into(),
            actor_role: ActorRole::Submitter,
            text: String::new(),
            new_status: Some(RequestStatus::Pending),
        }];
        self.state
            .lock()
            .unwrap()
            .requests
            .insert(request.id, RequestDetail { request, history });
        self
    }

    pub fn with_transitions(self, table: TransitionTable) -> Self {
        self.state.lock().unwrap().transitions = Some(table);
        self
    }

    /// Make the next `get_request` fail with `err`.
    pub fn fail_next_get(&self, err: AfnError) {
        self.state.lock().unwrap().get_failures.push_back(err);
    }

    /// Make the next `update_status` fail with `err`.
    pub fn fail_next_update(&self, err: AfnError) {
        self.state.lock().unwrap().update_failures.push_back(err);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<(i64, StatusUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn status_of(&self, id: i64) -> Option<RequestStatus> {
        self.state
            .lock()
            .unwrap()
            .requests
            .get(&id)
            .map(|d| d.request.status)
    }
}

fn not_found(id: i64) -> AfnError {
    AfnError::from_status(
        404,
        Some("application/json"),
        &format!(r#"{{"reason": "Request {} not found"}}"#, id),
    )
}

#[async_trait]
impl ModerationApi for MockModerationApi {
    async fn get_request(&self, id: i64) -> Result<RequestDetail> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.get_failures.pop_front() {
            return Err(err);
        }
        state.requests.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn update_status(&self, id: i64, update: &StatusUpdate) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.update_failures.pop_front() {
            return Err(err);
        }
        state.updates.push((id, update.clone()));
        let detail = state.requests.get_mut(&id).ok_or_else(|| not_found(id))?;
        let date = Utc.with_ymd_and_hms(2022, 5, 1, 12, 0, 0).unwrap();
        detail.request.status = update.new_status;
        detail.request.last_moderator = Some("moderator".into());
        detail.request.last_modified_date = Some(date);
        let next_id = detail.history.len() as i64 + 1;
        detail.history.push(HistoryEvent {
            id: next_id,
            date,
            actor: "moderator".into(),
            actor_role: ActorRole::Moderator,
            text: update.comment.clone().unwrap_or_default(),
            new_status: Some(update.new_status),
        });
        Ok(())
    }

    async fn create_request(&self, request: &NewForgeRequest) -> Result<ForgeAddRequest> {
        let mut state = self.state.lock().unwrap();
        if state
            .requests
            .values()
            .any(|d| d.request.forge_url == request.forge_url)
        {
            return Err(AfnError::from_status(
                409,
                Some("application/json"),
                r#"{"reason": "A request for this forge already exists."}"#,
            ));
        }
        let id = state.requests.keys().next_back().copied().unwrap_or(0) + 1;
        let created = ForgeAddRequest {
            forge_type: request.forge_type.clone(),
            forge_url: request.forge_url.clone(),
            forge_contact_name: request.forge_contact_name.clone(),
            forge_contact_email: request.forge_contact_email.clone(),
            forge_contact_comment: request.forge_contact_comment.clone(),
            ..sample_request(id, RequestStatus::Pending)
        };
        state.requests.insert(
            id,
            RequestDetail {
                request: created.clone(),
                history: Vec::new(),
            },
        );
        Ok(created)
    }

    async fn list_requests(
        &self,
        query: &DataTablesQuery,
    ) -> Result<DataTablesPage<ForgeAddRequest>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        let filtered: Vec<ForgeAddRequest> = state
            .requests
            .values()
            .map(|d| d.request.clone())
            .filter(|r| query.search.is_empty() || r.forge_url.contains(&query.search))
            .collect();
        let records_filtered = filtered.len() as u64;
        let data = filtered
            .into_iter()
            .skip(query.start as usize)
            .take(query.length as usize)
            .collect();
        Ok(DataTablesPage {
            data,
            records_total: state.requests.len() as u64,
            records_filtered,
            draw: query.draw,
        })
    }

    async fn transition_table(&self) -> Result<Option<TransitionTable>> {
        Ok(self.state.lock().unwrap().transitions.clone())
    }
}
