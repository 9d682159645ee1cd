//! Human-readable durations and distances.

const METERS_PER_MILE: f64 = 1609.34;

fn plural(n: u64, unit: &str) -> String {
    if n > 1 {
        format!("{} {}s", n, unit)
    } else {
        format!("{} {}", n, unit)
    }
}

/// Format seconds as hours and minutes.
///
/// Seconds are only shown for spans under a minute.
///
/// ```
/// use atlas::travel::format_duration;
///
/// assert_eq!(format_duration(Some(3900)), "1 hour 5 mins");
/// assert_eq!(format_duration(Some(7200)), "2 hours");
/// assert_eq!(format_duration(Some(45)), "45 secs");
/// assert_eq!(format_duration(None), "N/A");
/// ```
pub fn format_duration(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return "N/A".to_string();
    };
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "min"));
    }
    if parts.is_empty() {
        return plural(secs, "sec");
    }
    parts.join(" ")
}

/// Format meters as kilometers and miles.
///
/// ```
/// use atlas::travel::format_distance;
///
/// assert_eq!(format_distance(Some(10_200)), "10.2 km / 6.3 miles");
/// assert_eq!(format_distance(None), "N/A");
/// ```
pub fn format_distance(meters: Option<u64>) -> String {
    match meters {
        Some(m) => {
            let m = m as f64;
            format!("{:.1} km / {:.1} miles", m / 1000.0, m / METERS_PER_MILE)
        }
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_edges() {
        assert_eq!(format_duration(Some(0)), "0 sec");
        assert_eq!(format_duration(Some(1)), "1 sec");
        assert_eq!(format_duration(Some(60)), "1 min");
        assert_eq!(format_duration(Some(3600)), "1 hour");
        assert_eq!(format_duration(Some(3605)), "1 hour");
        assert_eq!(format_duration(Some(9000)), "2 hours 30 mins");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Some(0)), "0.0 km / 0.0 miles");
        assert_eq!(format_distance(Some(1609)), "1.6 km / 1.0 miles");
    }
}
