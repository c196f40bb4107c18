use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::icons::CROSS;

/// Spinner shown while a call to the backend is in flight.
///
/// Hidden when stderr is not a terminal, so scripted use and tests see no
/// animation frames.
pub struct ActivitySpinner {
    bar: ProgressBar,
}

impl ActivitySpinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = if console::Term::stderr().is_term() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("spinner template is a valid static string");
        bar.set_style(spinner_style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn failure(self, message: &str) {
        self.bar
            .finish_with_message(format!("{}{}", CROSS, style(message).red()));
    }

    /// Remove the spinner without leaving a line behind.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}
