//! Timestamp formats the banks validate server-side.

use chrono::{DateTime, Local, SecondsFormat, TimeDelta, Utc};
use chrono_tz::Tz;

/// BNI `qr_expired` layout: local wall time without offset.
const LOCAL_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// RFC 3339 with second precision for `X-TIMESTAMP`, rendered in `tz`
/// (process local time when `None`). A zero offset is written as `Z`.
#[must_use]
pub fn snap_timestamp(now: DateTime<Utc>, tz: Option<Tz>) -> String {
    match tz {
        Some(tz) => now
            .with_timezone(&tz)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        None => now
            .with_timezone(&Local)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// `YYYY-MM-DDTHH:MM:SS` for the instant `after` past `now`, in `tz`
/// (process local time when `None`). `None` if that instant is out of range.
#[must_use]
pub fn local_expiry(now: DateTime<Utc>, after: TimeDelta, tz: Option<Tz>) -> Option<String> {
    let at = now.checked_add_signed(after)?;
    Some(match tz {
        Some(tz) => at.with_timezone(&tz).format(LOCAL_LAYOUT).to_string(),
        None => at.with_timezone(&Local).format(LOCAL_LAYOUT).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 23, 8, 1, 28).unwrap()
    }

    #[test]
    fn test_snap_timestamp_jakarta() {
        assert_eq!(
            snap_timestamp(instant(), Some(chrono_tz::Asia::Jakarta)),
            "2022-06-23T15:01:28+07:00"
        );
    }

    #[test]
    fn test_snap_timestamp_utc_uses_z() {
        assert_eq!(
            snap_timestamp(instant(), Some(chrono_tz::UTC)),
            "2022-06-23T08:01:28Z"
        );
    }

    #[test]
    fn test_snap_timestamp_local_parses_back() {
        let ts = snap_timestamp(instant(), None);
        let parsed = DateTime::parse_from_rfc3339(&ts).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), instant());
    }

    #[test]
    fn test_local_expiry_layout() {
        assert_eq!(
            local_expiry(
                instant(),
                TimeDelta::hours(1),
                Some(chrono_tz::Asia::Jakarta)
            )
            .as_deref(),
            Some("2022-06-23T16:01:28")
        );
    }

    #[test]
    fn test_local_expiry_out_of_range() {
        assert_eq!(local_expiry(instant(), TimeDelta::MAX, None), None);
        assert_eq!(
            local_expiry(instant(), TimeDelta::MIN, Some(chrono_tz::UTC)),
            None
        );
    }
}
