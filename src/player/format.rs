use std::time::Duration;

/// Format a `Duration` as `M:SS` (minutes are not padded).
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Fraction of `total` covered by `elapsed`, clamped to `[0, 1]`.
pub fn progress_ratio(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}
