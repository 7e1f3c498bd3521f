//! Engagement math shared by the read-tracking, engagement, and dashboard handlers

/// floor(100 * completed / total), 0 when there is nothing to count.
pub fn completion_percent(completed: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed * 100 / total) as u32
}

/// Render accumulated read time as minutes: "2.0 mins", "2.55 mins".
///
/// Rounded to two decimals, then trailing zeros are trimmed down to one
/// decimal place. Zero or negative time renders as "NA" (never opened).
pub fn format_duration_mins(read_time_seconds: i64) -> String {
    if read_time_seconds <= 0 {
        return "NA".to_string();
    }

    let mins = read_time_seconds as f64 / 60.0;
    let mut rendered = format!("{:.2}", mins);

    if rendered.ends_with('0') {
        rendered.pop();
    }

    format!("{} mins", rendered)
}

/// Derive the engagement state label for one member.
pub fn engagement_state(is_completed: bool, read_time_seconds: i64) -> &'static str {
    if is_completed {
        "Completed"
    } else if read_time_seconds > 0 {
        "In Progress"
    } else {
        "Pending"
    }
}
