//! Client and terminal front-end for the add-forge-now moderation workflow.
//!
//! | Module        | Responsibility                                          |
//! |---------------|---------------------------------------------------------|
//! | `afn_config`  | `afn.toml` loading, env/CLI overrides, endpoint URLs    |
//! | `errors`      | `AfnError` and server error message extraction          |
//! | `moderation`  | API client, dashboard controller, listings, submission |
//! | `ui`          | Terminal rendering, icons and spinners                  |
//!
//! Request statuses, the transition table and the wire models live in the
//! `afn-common` crate and are re-exported here.

pub mod afn_config;
pub mod errors;
pub mod moderation;
pub mod ui;

pub use afn_common::{
    ActorRole, DataTablesPage, ForgeAddRequest, HistoryEvent, NewForgeRequest, RequestDetail,
    RequestStatus, StatusUpdate, TransitionTable, TransitionTableError, UnknownStatus,
};
pub use errors::{AfnError, Result};
