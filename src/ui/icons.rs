//! Shared terminal icons.
//!
//! Each icon falls back to a plain-text marker when the terminal cannot
//! render emoji.

use console::Emoji;

// Submission indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");

// Request fields
pub static FORGE: Emoji<'_, '_> = Emoji("🏭 ", "");
pub static CONTACT: Emoji<'_, '_> = Emoji("📇 ", "");
pub static HISTORY: Emoji<'_, '_> = Emoji("🕓 ", "");
pub static ARROW: Emoji<'_, '_> = Emoji("➜ ", "->");
