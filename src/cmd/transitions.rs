//! `afn transitions`: print the compiled transition table.

use anyhow::Result;
use serde_json::json;

use afn::ui::render_transitions;
use afn::{RequestStatus, TransitionTable};

pub fn cmd_transitions(status: Option<&str>, json: bool) -> Result<()> {
    let table = TransitionTable::builtin();
    let only = status.map(str::parse::<RequestStatus>).transpose()?;

    if json {
        let entries: serde_json::Map<String, serde_json::Value> = table
            .iter()
            .filter(|(from, _)| only.is_none_or(|s| s == *from))
            .map(|(from, next)| (from.as_str().to_string(), json!(next)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_transitions(&table, only));
    }
    Ok(())
}
