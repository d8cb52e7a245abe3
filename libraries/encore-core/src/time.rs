//! Track length text helpers
//!
//! Upstream catalogs describe lengths as clock text (`"4:05"`, `"1:02:33"`).

use std::time::Duration;

const UNITS: [u64; 3] = [1, 60, 3600];

/// Parse `"s"`, `"m:ss"` or `"h:mm:ss"` into a duration
///
/// Returns `None` for more than three fields or any non-numeric field.
pub fn parse_length_text(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() > UNITS.len() {
        return None;
    }

    let mut secs = 0u64;
    for (part, unit) in parts.iter().rev().zip(UNITS) {
        let n: u64 = part.parse().ok()?;
        secs = secs.checked_add(n.checked_mul(unit)?)?;
    }

    Some(Duration::from_secs(secs))
}

/// Render a duration as `m:ss`, or `h:mm:ss` past one hour
pub fn format_length(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
