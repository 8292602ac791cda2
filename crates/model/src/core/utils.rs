use chrono::{DateTime, SubsecRound, TimeZone};

/// Drops the sub-second part of a timestamp, keeping its offset.
///
/// Watermark comparisons happen at whole-second precision on both engines:
/// the target may store fewer fractional digits than the source.
pub fn truncate_to_second<Tz: TimeZone>(ts: &DateTime<Tz>) -> DateTime<Tz> {
    ts.clone().trunc_subsecs(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};

    #[test]
    fn test_truncate_drops_fraction() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 4).unwrap()
            + chrono::Duration::milliseconds(999);
        let truncated = truncate_to_second(&ts);
        assert_eq!(truncated.nanosecond(), 0);
        assert_eq!(truncated.second(), 4);
    }

    #[test]
    fn test_truncate_keeps_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = offset
            .with_ymd_and_hms(2024, 6, 30, 23, 59, 59)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let truncated = truncate_to_second(&ts);
        assert_eq!(truncated.offset(), &offset);
        assert_eq!(truncated.second(), 59);
        assert_eq!(truncated.nanosecond(), 0);
    }
}
