//! Size and progress text

const KB: i64 = 1_000;
const MB: i64 = 1_000_000;
const GB: i64 = 1_000_000_000;

/// Human readable size; zero or negative means unknown
pub fn format_size(size_bytes: i64) -> String {
    match size_bytes {
        s if s <= 0 => "Unknown".to_string(),
        s if s >= GB => format!("{:.1} GB", s as f64 / GB as f64),
        s if s >= MB => format!("{:.1} MB", s as f64 / MB as f64),
        s if s >= KB => format!("{:.1} KB", s as f64 / KB as f64),
        s => format!("{} B", s),
    }
}

/// Status text for a progress event
pub fn progress_status(received: i64, total: i64) -> String {
    if total <= 0 {
        return "In Progress".to_string();
    }
    let percent = i128::from(received.max(0)) * 100 / i128::from(total);
    format!("In Progress ({}%)", percent)
}
