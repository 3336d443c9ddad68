//! Human-readable log report.

use std::io::{self, Write};

use crate::visits::model::UNKNOWN;
use crate::visits::VisitLogEntry;

/// User agents longer than this are cut in the report.
pub const USER_AGENT_DISPLAY_CHARS: usize = 60;

/// Write the report for `entries` to `out`.
pub fn render_report<W: Write>(out: &mut W, entries: &[VisitLogEntry]) -> io::Result<()> {
    writeln!(out, "\n📝 Found {} visitor log entries:\n", entries.len())?;
    for entry in entries {
        let ip = entry.ip.as_deref().unwrap_or(UNKNOWN);
        let ts = entry.timestamp.as_deref().unwrap_or(UNKNOWN);
        let ua = entry.user_agent.as_deref().unwrap_or(UNKNOWN);
        writeln!(out, "📍 {} @ {}\n    {}\n", ip, ts, truncate_chars(ua, USER_AGENT_DISPLAY_CHARS))?;
    }
    Ok(())
}

/// The first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
