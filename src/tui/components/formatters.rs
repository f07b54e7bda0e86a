// Text formatters
//
// Shared formatting for list rows: display-width truncation and relative
// timestamps.

use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to `max` terminal columns, ending with "…" when cut
pub fn truncate(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Compact age: "now", "5m", "3h", "2d", then the date
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    match secs {
        0..=59 => "now".to_string(),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86_399 => format!("{}h", secs / 3600),
        86_400..=604_799 => format!("{}d", secs / 86_400),
        _ => at.format("%Y-%m-%d").to_string(),
    }
}

/// "♥ 4" / "♡ 3"
pub fn like_badge(count: u32, liked: bool) -> String {
    format!("{} {}", if liked { "♥" } else { "♡" }, count)
}
