use chrono::{DateTime, Local, NaiveDateTime};

pub const TITLE_DISPLAY_MAX: usize = 26;

/// `yyyy-MM-dd HH:mm:ss`. Timestamps with an offset are shown in local time,
/// naive ones as-is. Unparsable input is returned untouched.
pub fn format_date_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    const OUT: &str = "%Y-%m-%d %H:%M:%S";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    raw.to_string()
}

/// Thousands collapse to `k` (floored): 999 → "999", 12345 → "12k".
/// Anything below 1000, negatives included, prints as-is.
pub fn format_count(n: i64) -> String {
    if n >= 1000 {
        format!("{}k", n / 1000)
    } else {
        n.to_string()
    }
}

/// Titles longer than 26 characters get cut and suffixed with `...`.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= TITLE_DISPLAY_MAX {
        return title.to_string();
    }
    let mut out: String = title.chars().take(TITLE_DISPLAY_MAX).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1k");
        assert_eq!(format_count(12345), "12k");
        assert_eq!(format_count(100000), "100k");
        assert_eq!(format_count(-3), "-3");
    }

    #[test]
    fn titles() {
        let t30 = "abcdefghijklmnopqrstuvwxyz0123";
        assert_eq!(t30.len(), 30);
        assert_eq!(truncate_title(t30), "abcdefghijklmnopqrstuvwxyz...");
        let t26 = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(truncate_title(t26), t26);
        // multi-byte titles are cut on characters, not bytes
        let kr = "가".repeat(27);
        assert_eq!(truncate_title(&kr), format!("{}...", "가".repeat(26)));
    }

    #[test]
    fn dates() {
        assert_eq!(format_date_time(None), "");
        assert_eq!(format_date_time(Some("")), "");
        assert_eq!(format_date_time(Some("2024-03-05T07:08:09")), "2024-03-05 07:08:09");
        assert_eq!(format_date_time(Some("2024-03-05T07:08:09.123456")), "2024-03-05 07:08:09");
        assert_eq!(format_date_time(Some("yesterday")), "yesterday");
    }
}
