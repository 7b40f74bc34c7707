use chrono::{DateTime, TimeDelta, Utc};

pub const NOT_AVAILABLE: &str = "N/A";

/// Signed `"Hh Mm"` distance from `now` to `target`, e.g. `"2h 5m"` ahead or
/// `"-1h 23m"` behind. Hours and minutes are truncated toward zero; seconds
/// are dropped. A missing target renders as `"N/A"`.
pub fn format_relative(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(target) = target else {
        return NOT_AVAILABLE.to_string();
    };

    let delta = target.signed_duration_since(now);
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let secs = delta.num_seconds().unsigned_abs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{sign}{hours}h {minutes}m")
}
