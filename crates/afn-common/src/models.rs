use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::RequestStatus;

/// A request asking the archive to start crawling a forge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeAddRequest {
    pub id: i64,
    pub status: RequestStatus,
    pub forge_type: String,
    pub forge_url: String,
    pub forge_contact_name: String,
    pub forge_contact_email: String,
    #[serde(default)]
    pub forge_contact_comment: Option<String>,
    #[serde(default)]
    pub submitter_name: Option<String>,
    pub submission_date: DateTime<Utc>,
    #[serde(default)]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_moderator: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Submitter,
    Moderator,
    ForgeAdmin,
    Email,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitter => "SUBMITTER",
            Self::Moderator => "MODERATOR",
            Self::ForgeAdmin => "FORGE_ADMIN",
            Self::Email => "EMAIL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitter => "Submitter",
            Self::Moderator => "Moderator",
            Self::ForgeAdmin => "Forge admin",
            Self::Email => "Email",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMITTER" => Ok(Self::Submitter),
            "MODERATOR" => Ok(Self::Moderator),
            "FORGE_ADMIN" => Ok(Self::ForgeAdmin),
            "EMAIL" => Ok(Self::Email),
            _ => Err(format!("Invalid actor role: {}", s)),
        }
    }
}

/// One entry of a request's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub actor: String,
    pub actor_role: ActorRole,
    #[serde(default)]
    pub text: String,
    /// Set when the event moved the request to a new status.
    #[serde(default)]
    pub new_status: Option<RequestStatus>,
}

/// Payload of the request-get endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDetail {
    pub request: ForgeAddRequest,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
}

/// Server-side paginated listing, following the DataTables JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTablesPage<T> {
    pub data: Vec<T>,
    pub records_total: u64,
    pub records_filtered: u64,
    pub draw: u64,
}

impl<T> DataTablesPage<T> {
    pub fn empty(draw: u64) -> Self {
        Self {
            data: Vec::new(),
            records_total: 0,
            records_filtered: 0,
            draw,
        }
    }
}

/// Fields submitted when proposing a new forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForgeRequest {
    pub forge_type: String,
    pub forge_url: String,
    pub forge_contact_name: String,
    pub forge_contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub forge_contact_comment: Option<String>,
    #[serde(default)]
    pub submitter_forward_username: bool,
}

/// A moderator decision: move the request to `new_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub new_status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
}
