use time::OffsetDateTime;
use time_tz::{Offset, TimeZone, Tz};

/// Get the timezone named `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// Convert `date_time` to the wall clock time in `timezone` at that instant.
///
/// Uses the offset in effect at `date_time`, so daylight saving changes
/// between then and now do not shift the result.
pub fn to_local_time(date_time: OffsetDateTime, timezone: &Tz) -> OffsetDateTime {
    date_time.to_offset(timezone.get_offset_utc(&date_time).to_utc())
}
