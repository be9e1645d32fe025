//! Time utilities

use std::time::Duration;

/// Format elapsed seconds as a human-readable string
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0s".to_string();
    }

    if seconds < 60.0 {
        return format!("{:.2}s", seconds);
    }

    let whole_minutes = (seconds / 60.0).floor();
    let remaining = seconds - whole_minutes * 60.0;
    let hours = (whole_minutes / 60.0).floor() as u64;
    let minutes = whole_minutes as u64 % 60;

    if hours > 0 {
        format!("{}h {}m {:.2}s", hours, minutes, remaining)
    } else {
        format!("{}m {:.2}s", minutes, remaining)
    }
}

/// Format a duration as a human-readable string
pub fn format_duration(duration: Duration) -> String {
    format_seconds(duration.as_secs_f64())
}
