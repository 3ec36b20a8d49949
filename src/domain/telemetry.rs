// Telemetry record primitives shared by rover and greenhouse readings
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A reading that belongs to one tracked entity and carries its own timestamp.
pub trait TimestampedRecord {
    /// Logical identifier of the rover or plant this reading describes
    fn entity_id(&self) -> &str;

    /// Timestamp exactly as it was stored in the feed
    fn raw_timestamp(&self) -> &str;

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.raw_timestamp())
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a feed timestamp. Zone-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(time.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}
