use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod tests {
    use super::get_local_offset;

    #[test]
    fn resolves_canonical_timezone_names() {
        assert!(get_local_offset("America/Detroit").is_some());
        assert!(get_local_offset("Etc/UTC").is_some());
    }

    #[test]
    fn rejects_unknown_timezone_names() {
        assert!(get_local_offset("Not/AZone").is_none());
    }
}
