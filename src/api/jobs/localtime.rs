use chrono::{DateTime, Duration, Utc};

/// Offset between UTC and the deployment's local wall clock, in whole hours.
/// Constant year-round; no daylight-saving adjustment, so local-day bucketing
/// drifts by an hour during daylight-saving periods. Kept as-is to match the
/// interpretation of already-stored instants.
pub const LOCAL_OFFSET_HOURS: i64 = 12;

/// Shift an instant by a fixed whole-hour offset.
pub fn shift_by_fixed_offset(instant: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    instant + Duration::hours(hours)
}

/// Calendar-day key (`YYYY-MM-DD`) of an instant in the fixed local offset.
/// Used only for day-counting; a missing date yields `None` and the record
/// is skipped.
pub fn local_day_key(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|d| {
        shift_by_fixed_offset(d, LOCAL_OFFSET_HOURS)
            .format("%Y-%m-%d")
            .to_string()
    })
}

/// Reinterpret a client-supplied instant (a local wall-clock reading labelled
/// as UTC) as the true UTC instant for storage.
pub fn wall_clock_to_utc(instant: DateTime<Utc>) -> DateTime<Utc> {
    shift_by_fixed_offset(instant, -LOCAL_OFFSET_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn day_key_uses_shifted_calendar_date() {
        // 23:00 UTC shifts to 11:00 the next local day.
        let key = local_day_key(Some(utc(2024, 1, 15, 23, 0, 0)));
        assert_eq!(key.as_deref(), Some("2024-01-16"));
    }

    #[test]
    fn instants_straddling_local_midnight_land_in_different_days() {
        // One millisecond apart across 12:00 UTC = local midnight.
        let before = utc(2024, 3, 9, 11, 59, 59) + Duration::milliseconds(999);
        let after = before + Duration::milliseconds(1);

        assert_eq!(local_day_key(Some(before)).as_deref(), Some("2024-03-09"));
        assert_eq!(local_day_key(Some(after)).as_deref(), Some("2024-03-10"));
    }

    #[test]
    fn instants_twenty_hours_apart_can_share_a_day() {
        // 12:30 UTC and 08:30 UTC the next day both shift into the same
        // local day (00:30 and 20:30).
        let a = utc(2024, 3, 9, 12, 30, 0);
        let b = utc(2024, 3, 10, 8, 30, 0);

        assert_eq!(local_day_key(Some(a)), local_day_key(Some(b)));
    }

    #[test]
    fn missing_date_is_skipped() {
        assert_eq!(local_day_key(None), None);
    }

    #[test]
    fn wall_clock_shift_round_trips() {
        let stored = wall_clock_to_utc(utc(2024, 6, 1, 9, 0, 0));

        assert_eq!(stored, utc(2024, 5, 31, 21, 0, 0));
        assert_eq!(
            shift_by_fixed_offset(stored, LOCAL_OFFSET_HOURS),
            utc(2024, 6, 1, 9, 0, 0)
        );
    }

    #[test]
    fn shift_preserves_durations() {
        let start = utc(2024, 6, 1, 9, 0, 0);
        let end = utc(2024, 6, 1, 17, 30, 0);

        assert_eq!(
            wall_clock_to_utc(end) - wall_clock_to_utc(start),
            end - start
        );
    }
}
