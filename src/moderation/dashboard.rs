//! Moderation dashboard of a single add-forge request.
//!
//! The controller owns everything the page needs: the API client, the
//! transition table, and the rendering state. It is created per request and
//! dropped when the user moves on.
//!
//! Rendering states:
//!
//! ```text
//! Idle ──> Loading ──> Loaded ──> Submitting ──> SubmitSuccess ──> Loading
//!             │          ▲             │
//!             v          └─ SubmitError ◄┘
//!         LoadError
//! ```
//!
//! Submissions are never applied optimistically: the view only changes after
//! the server confirmed the decision and the request was fetched again.

use std::mem;

use afn_common::{
    ForgeAddRequest, HistoryEvent, RequestDetail, RequestStatus, StatusUpdate, TransitionTable,
};

use super::client::ModerationApi;
use crate::errors::{AfnError, Result};

/// One entry of the decision control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOption {
    pub status: RequestStatus,
    pub label: &'static str,
}

/// Everything rendered for a loaded request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    pub request: ForgeAddRequest,
    pub history: Vec<HistoryEvent>,
    /// Statuses the moderator may pick, in table order
    pub options: Vec<DecisionOption>,
}

impl RequestView {
    pub fn new(detail: RequestDetail, transitions: &TransitionTable) -> Self {
        let options = transitions
            .next_for(detail.request.status)
            .iter()
            .map(|status| DecisionOption {
                status: *status,
                label: status.label(),
            })
            .collect();
        Self {
            request: detail.request,
            history: detail.history,
            options,
        }
    }

    pub fn status_label(&self) -> &'static str {
        self.request.status.label()
    }

    pub fn offers(&self, status: RequestStatus) -> bool {
        self.options.iter().any(|o| o.status == status)
    }
}

/// Rendering state of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Idle,
    Loading,
    Loaded(RequestView),
    LoadError(String),
    /// A decision is in flight; the previous view stays visible
    Submitting(RequestView),
}

impl DashboardState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::LoadError(_) => "load_error",
            Self::Submitting(_) => "submitting",
        }
    }
}

/// Outcome of the last submission, shown next to the decision control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indicator {
    SubmitSuccess(RequestStatus),
    SubmitError(String),
}

/// A moderator decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub new_status: RequestStatus,
    pub comment: Option<String>,
}

impl Decision {
    pub fn new(new_status: RequestStatus) -> Self {
        Self {
            new_status,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = Some(comment).filter(|c| !c.trim().is_empty());
        self
    }
}

pub struct RequestDashboard<A> {
    api: A,
    transitions: TransitionTable,
    request_id: i64,
    state: DashboardState,
    indicator: Option<Indicator>,
}

impl<A: ModerationApi> RequestDashboard<A> {
    /// Dashboard using the compiled transition table.
    pub fn new(api: A, request_id: i64) -> Self {
        Self {
            api,
            transitions: TransitionTable::builtin(),
            request_id,
            state: DashboardState::Idle,
            indicator: None,
        }
    }

    /// Adopt the server's transition table when it publishes one.
    pub async fn sync_transitions(&mut self) -> Result<()> {
        if let Some(table) = self.api.transition_table().await? {
            tracing::debug!("Using server-supplied transition table");
            self.transitions = table;
        }
        Ok(())
    }

    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn indicator(&self) -> Option<&Indicator> {
        self.indicator.as_ref()
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// The visible request, while loaded or submitting.
    pub fn view(&self) -> Option<&RequestView> {
        match &self.state {
            DashboardState::Loaded(view) | DashboardState::Submitting(view) => Some(view),
            _ => None,
        }
    }

    /// Options of the decision control; empty unless a request is loaded.
    pub fn decision_options(&self) -> &[DecisionOption] {
        match &self.state {
            DashboardState::Loaded(view) => &view.options,
            _ => &[],
        }
    }

    /// Fetch the request and its history, replacing the current view.
    ///
    /// Safe to call repeatedly; a failed load can be retried by calling it
    /// again.
    pub async fn load(&mut self) -> &DashboardState {
        self.state = DashboardState::Loading;
        let id = self.request_id;

        self.state = match self.api.get_request(id).await {
            Ok(detail) if detail.request.id != id => {
                tracing::warn!(request_id = id, got = detail.request.id, "Server returned another request");
                DashboardState::LoadError(format!(
                    "Error while fetching add-forge-now request {}: server returned request {}",
                    id, detail.request.id
                ))
            }
            Ok(detail) => {
                tracing::info!(
                    request_id = id,
                    status = %detail.request.status,
                    history_len = detail.history.len(),
                    "Request loaded"
                );
                DashboardState::Loaded(RequestView::new(detail, &self.transitions))
            }
            Err(e) => {
                tracing::warn!(request_id = id, error = %e, "Failed to load request");
                DashboardState::LoadError(format!(
                    "Error while fetching add-forge-now request {}: {}",
                    id,
                    e.user_message()
                ))
            }
        };
        &self.state
    }

    /// Submit a decision, then reload once the server confirmed it.
    ///
    /// Only statuses offered by the decision control are accepted; anything
    /// else is refused before any network call. On failure the previous view
    /// is restored and the error indicator set.
    pub async fn submit_decision(&mut self, decision: Decision) -> Result<()> {
        let view = match mem::replace(&mut self.state, DashboardState::Idle) {
            DashboardState::Loaded(view) => view,
            other => {
                self.state = other;
                return Err(AfnError::NotLoaded);
            }
        };

        let from = view.request.status;
        if !view.offers(decision.new_status) {
            self.state = DashboardState::Loaded(view);
            return Err(AfnError::IllegalTransition {
                from,
                to: decision.new_status,
            });
        }

        let update = StatusUpdate {
            new_status: decision.new_status,
            comment: decision.comment,
        };
        self.state = DashboardState::Submitting(view);
        let result = self.api.update_status(self.request_id, &update).await;

        match result {
            Ok(()) => {
                tracing::info!(
                    request_id = self.request_id,
                    from = %from,
                    to = %update.new_status,
                    "Status change accepted"
                );
                self.indicator = Some(Indicator::SubmitSuccess(update.new_status));
                self.load().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(request_id = self.request_id, error = %e, "Status change refused");
                if let DashboardState::Submitting(view) =
                    mem::replace(&mut self.state, DashboardState::Idle)
                {
                    self.state = DashboardState::Loaded(view);
                }
                self.indicator = Some(Indicator::SubmitError(format!(
                    "Could not update the request status: {}",
                    e.user_message()
                )));
                Err(e)
            }
        }
    }
}
