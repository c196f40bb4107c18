pub mod icons;
pub mod render;
pub mod spinner;

pub use render::{render_dashboard, render_feedback, render_table, render_transitions, status_badge};
pub use spinner::ActivitySpinner;
