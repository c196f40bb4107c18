//! Typed error hierarchy for the add-forge-now client.
//!
//! `AfnError` covers the three failure families the UI has to surface:
//! - transport failures (connection refused, timeouts, non-2xx statuses)
//! - validation conflicts reported by the server (duplicate submissions)
//! - workflow violations detected client-side (unknown or illegal statuses)

use afn_common::{RequestStatus, TransitionTableError, UnknownStatus};
use thiserror::Error;

/// Message extracted from an error response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Message taken from a JSON body; shown verbatim.
    Json(String),
    /// Raw text body; shown behind a generic prefix.
    Text(String),
    Empty,
}

/// JSON fields the backend uses to carry an error message, in lookup order.
const MESSAGE_FIELDS: &[&str] = &["reason", "error", "detail", "message"];

impl ServerMessage {
    /// Classify a response body using its content type.
    pub fn from_body(content_type: Option<&str>, body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            return Self::Empty;
        }

        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if is_json && let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            let message = MESSAGE_FIELDS
                .iter()
                .find_map(|field| value.get(field).and_then(|v| v.as_str()))
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            return Self::Json(message);
        }

        Self::Text(body.to_string())
    }

    /// Text to show the user.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Json(msg) => Some(msg.clone()),
            Self::Text(text) => Some(format!("Error: {}", text)),
            Self::Empty => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AfnError {
    #[error("Could not reach the server: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Server returned HTTP {status}")]
    Http { status: u16, body: ServerMessage },

    #[error("Server reported a conflict")]
    Conflict { body: ServerMessage },

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),

    #[error("Invalid transition table: {0}")]
    InvalidTransitionTable(#[from] TransitionTableError),

    #[error("Cannot move a request from {from} to {to}")]
    IllegalTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("No request is loaded")]
    NotLoaded,

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = AfnError> = std::result::Result<T, E>;

impl AfnError {
    /// Build the error matching a non-2xx response.
    pub fn from_status(status: u16, content_type: Option<&str>, body: &str) -> Self {
        let body = ServerMessage::from_body(content_type, body);
        if status == 409 {
            Self::Conflict { body }
        } else {
            Self::Http { status, body }
        }
    }

    /// Whether the server rejected the call as a duplicate.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Inline message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { body, .. } | Self::Conflict { body } => {
                body.display().unwrap_or_else(|| self.to_string())
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AfnError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

impl From<serde_json::Error> for AfnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
