//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module        | Commands handled                                   |
//! |---------------|----------------------------------------------------|
//! | `show`        | `Show`                                             |
//! | `moderate`    | `Moderate`                                         |
//! | `create`      | `Create`                                           |
//! | `list`        | `List`                                             |
//! | `transitions` | `Transitions`                                      |
//! | `config`      | `Config`                                           |

pub mod config;
pub mod create;
pub mod list;
pub mod moderate;
pub mod show;
pub mod transitions;

pub use config::cmd_config;
pub use create::cmd_create;
pub use list::{ListOptions, cmd_list};
pub use moderate::cmd_moderate;
pub use show::cmd_show;
pub use transitions::cmd_transitions;
