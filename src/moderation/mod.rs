//! Add-forge-now moderation workflow.
//!
//! ## Module Map
//!
//! ```text
//! ┌───────────┐        ┌──────────────────────────────────────────────┐
//! │  cmd/*    │ ─────> │ dashboard.rs  (RequestDashboard, one request)│
//! │ (CLI)     │        │ list.rs       (RequestListView, paginated)   │
//! └───────────┘        │ create.rs     (submission form)              │
//!                      │        │                                     │
//!                      │        │ ModerationApi                       │
//!                      │        v                                     │
//!                      │ client.rs     (HttpModerationClient, reqwest)│
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! | Module      | Responsibility                                        |
//! |-------------|-------------------------------------------------------|
//! | `client`    | `ModerationApi` trait + HTTP implementation           |
//! | `dashboard` | Load / decide / reload cycle of a single request      |
//! | `list`      | Browse and moderation listings (DataTables contract)  |
//! | `create`    | Client-side validation and submission of new requests |
//! | `format`    | Pure display helpers (dates, domains, links)          |

pub mod client;
pub mod create;
pub mod dashboard;
pub mod format;
pub mod list;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{DataTablesQuery, HttpModerationClient, ModerationApi, SortDirection};
pub use create::{Badge, FormFeedback, submit_request};
pub use dashboard::{Decision, DecisionOption, DashboardState, Indicator, RequestDashboard, RequestView};
pub use list::{ListMode, ListRow, RequestListView, RequestTable};
