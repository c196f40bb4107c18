//! Shared domain types for the add-forge-now moderation workflow.
//!
//! | Module   | Contents                                                   |
//! |----------|------------------------------------------------------------|
//! | `status` | `RequestStatus`, labels, `TransitionTable`                 |
//! | `models` | `ForgeAddRequest`, `HistoryEvent`, DataTables page, forms  |

pub mod models;
pub mod status;

pub use models::{
    ActorRole, DataTablesPage, ForgeAddRequest, HistoryEvent, NewForgeRequest, RequestDetail,
    StatusUpdate,
};
pub use status::{RequestStatus, TransitionTable, TransitionTableError, UnknownStatus};
