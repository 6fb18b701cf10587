use chrono::{DateTime, Datelike, Utc};

/// Renders a timestamp for API output, e.g. `Oct 17th, 2026 at 02:15 PM`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let day = timestamp.day();
    format!(
        "{} {}{}, {} at {}",
        timestamp.format("%b"),
        day,
        ordinal_suffix(day),
        timestamp.year(),
        timestamp.format("%I:%M %p"),
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
