//! Request status workflow.
//!
//! Every add-forge request moves through a fixed set of statuses. The
//! allowed moves are encoded once, in [`RequestStatus::next_statuses`], as an
//! exhaustive `match` so that adding a status without deciding its successors
//! fails to compile.
//!
//! ```text
//! PENDING ──> WAITING_FOR_FEEDBACK ⇄ FEEDBACK_TO_HANDLE ──> ACCEPTED ──> SCHEDULED
//!                                                                       ├──> FIRST_LISTING_DONE ──┐
//!                                                                       └──> FIRST_ORIGIN_LOADED <┘
//! PENDING, FEEDBACK_TO_HANDLE ──> REJECTED | SUSPENDED
//! SUSPENDED ──> PENDING
//! ```
//!
//! A server may ship its own copy of the table; [`TransitionTable::from_server`]
//! accepts it only when it is total and names known statuses exclusively.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of an add-forge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum RequestStatus {
    Pending,
    WaitingForFeedback,
    FeedbackToHandle,
    Accepted,
    Scheduled,
    FirstListingDone,
    FirstOriginLoaded,
    Rejected,
    Suspended,
    Denied,
}

/// A status name that is not part of the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown request status '{0}'")]
pub struct UnknownStatus(pub String);

impl RequestStatus {
    /// All statuses, in workflow order.
    pub const ALL: [RequestStatus; 10] = [
        Self::Pending,
        Self::WaitingForFeedback,
        Self::FeedbackToHandle,
        Self::Accepted,
        Self::Scheduled,
        Self::FirstListingDone,
        Self::FirstOriginLoaded,
        Self::Rejected,
        Self::Suspended,
        Self::Denied,
    ];

    /// Wire name, as sent and received by the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::WaitingForFeedback => "WAITING_FOR_FEEDBACK",
            Self::FeedbackToHandle => "FEEDBACK_TO_HANDLE",
            Self::Accepted => "ACCEPTED",
            Self::Scheduled => "SCHEDULED",
            Self::FirstListingDone => "FIRST_LISTING_DONE",
            Self::FirstOriginLoaded => "FIRST_ORIGIN_LOADED",
            Self::Rejected => "REJECTED",
            Self::Suspended => "SUSPENDED",
            Self::Denied => "DENIED",
        }
    }

    /// Human-readable label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::WaitingForFeedback => "Waiting for feedback",
            Self::FeedbackToHandle => "Feedback to handle",
            Self::Accepted => "Accepted",
            Self::Scheduled => "Scheduled",
            Self::FirstListingDone => "First listing done",
            Self::FirstOriginLoaded => "First origin loaded",
            Self::Rejected => "Rejected",
            Self::Suspended => "Suspended",
            Self::Denied => "Denied",
        }
    }

    /// Statuses a moderator may move a request into next, in display order.
    pub fn next_statuses(&self) -> &'static [RequestStatus] {
        use RequestStatus::*;
        match self {
            Pending => &[WaitingForFeedback, Rejected, Suspended],
            WaitingForFeedback => &[FeedbackToHandle],
            FeedbackToHandle => &[WaitingForFeedback, Accepted, Rejected, Suspended],
            Accepted => &[Scheduled],
            Scheduled => &[FirstListingDone, FirstOriginLoaded],
            FirstListingDone => &[FirstOriginLoaded],
            FirstOriginLoaded => &[],
            Rejected => &[],
            Suspended => &[Pending],
            Denied => &[],
        }
    }

    /// A terminal status has no successor.
    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors raised while accepting a server-supplied transition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionTableError {
    #[error("transition table has no entry for status {0}")]
    MissingEntry(RequestStatus),

    #[error("transition table references {0}")]
    Unknown(#[from] UnknownStatus),

    #[error("transition table lists {next} twice after {from}")]
    Duplicate {
        from: RequestStatus,
        next: RequestStatus,
    },
}

/// Read-only mapping from a status to the statuses allowed after it.
///
/// Built once per page (or process) and shared by every render; it is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    entries: BTreeMap<RequestStatus, Vec<RequestStatus>>,
}

impl TransitionTable {
    /// The table compiled into the client.
    pub fn builtin() -> Self {
        let entries = RequestStatus::ALL
            .iter()
            .map(|status| (*status, status.next_statuses().to_vec()))
            .collect();
        Self { entries }
    }

    /// Accept a table published by the server, keyed by wire names.
    ///
    /// The table must cover every status; unknown names and repeated
    /// successors are rejected.
    pub fn from_server(raw: HashMap<String, Vec<String>>) -> Result<Self, TransitionTableError> {
        let mut entries = BTreeMap::new();
        for (from, nexts) in raw {
            let from: RequestStatus = from.parse()?;
            let mut parsed: Vec<RequestStatus> = Vec::with_capacity(nexts.len());
            for next in nexts {
                let next: RequestStatus = next.parse()?;
                if parsed.contains(&next) {
                    return Err(TransitionTableError::Duplicate { from, next });
                }
                parsed.push(next);
            }
            entries.insert(from, parsed);
        }

        if let Some(missing) = RequestStatus::ALL
            .iter()
            .find(|status| !entries.contains_key(status))
        {
            return Err(TransitionTableError::MissingEntry(*missing));
        }

        Ok(Self { entries })
    }

    /// Allowed successors of `status`. Empty for terminal statuses.
    pub fn next_for(&self, status: RequestStatus) -> &[RequestStatus] {
        // Both constructors guarantee totality.
        self.entries
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Lookup by wire name; an unknown name is an error, not an empty set.
    pub fn next_for_name(&self, name: &str) -> Result<&[RequestStatus], UnknownStatus> {
        let status: RequestStatus = name.parse()?;
        Ok(self.next_for(status))
    }

    /// Whether moving from `from` to `to` is allowed.
    pub fn allows(&self, from: RequestStatus, to: RequestStatus) -> bool {
        self.next_for(from).contains(&to)
    }

    /// Iterate over every `(status, successors)` pair in workflow order.
    pub fn iter(&self) -> impl Iterator<Item = (RequestStatus, &[RequestStatus])> {
        self.entries
            .iter()
            .map(|(status, nexts)| (*status, nexts.as_slice()))
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
