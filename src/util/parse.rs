use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::DbErr;

use crate::error::meeting::MeetingError;

/// Parses a Discord id column read from the database.
///
/// # Arguments
/// - `field` - Column name, used in the error message
/// - `value` - Stored string value
///
/// # Returns
/// - `Ok(u64)` - Parsed id
/// - `Err(DbErr::Custom)` - The stored value is not a valid u64
pub fn parse_stored_id(field: &str, value: &str) -> Result<u64, DbErr> {
    value
        .parse::<u64>()
        .map_err(|e| DbErr::Custom(format!("Failed to parse {}: {}", field, e)))
}

/// Parses a meeting start time typed as `DD.MM-HH:MM`.
///
/// The time is read in the configured offset. The current year is assumed; when that
/// moment has already passed the meeting is placed in the next year.
///
/// # Arguments
/// - `input` - Text typed by the user
/// - `now` - Current time
/// - `offset` - Offset the user's wall clock is in
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Start time in UTC
/// - `Err(MeetingError::InvalidStartTime)` - Malformed input or a date that does not exist
pub fn parse_start_time(
    input: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, MeetingError> {
    let invalid = || MeetingError::InvalidStartTime(input.to_string());
    let trimmed = input.trim();

    let (date, time) = trimmed.split_once('-').ok_or_else(invalid)?;
    let (day, month) = date.split_once('.').ok_or_else(invalid)?;
    let day = day.trim().parse::<u32>().map_err(|_| invalid())?;
    let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| invalid())?;

    let local_now = now.with_timezone(&offset);

    for year in [local_now.year(), local_now.year() + 1] {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let Some(start) = offset.from_local_datetime(&date.and_time(time)).single() else {
            continue;
        };
        let start = start.with_timezone(&Utc);
        if start >= now {
            return Ok(start);
        }
    }

    Err(invalid())
}

/// Parses a fireteam size typed into a form.
pub fn parse_fireteam_size(input: &str) -> Result<i32, MeetingError> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| MeetingError::InvalidSize(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moscow() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    /// Tests parsing a start time later in the current year.
    ///
    /// Expected: 20:30 at +03:00 becomes 17:30 UTC the same day
    #[test]
    fn parses_start_time_in_offset() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let start = parse_start_time("15.03-20:30", now, moscow()).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 15, 17, 30, 0).unwrap());
    }

    /// Tests that dates already passed roll into the next year.
    ///
    /// Expected: January date typed in December lands in the following January
    #[test]
    fn rolls_past_dates_into_next_year() {
        let now = Utc.with_ymd_and_hms(2025, 12, 30, 12, 0, 0).unwrap();
        let start = parse_start_time("02.01-10:00", now, moscow()).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 2, 7, 0, 0).unwrap());
    }

    /// Tests malformed start times.
    ///
    /// Expected: Err(InvalidStartTime) for every malformed input
    #[test]
    fn rejects_malformed_start_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        for input in ["", "15.03", "15-20:30", "32.01-10:00", "15.03-25:00", "a.b-10:00"] {
            assert_eq!(
                parse_start_time(input, now, moscow()),
                Err(MeetingError::InvalidStartTime(input.to_string()))
            );
        }
    }

    /// Tests parsing fireteam sizes.
    ///
    /// Expected: Ok for numbers with whitespace, Err(InvalidSize) otherwise
    #[test]
    fn parses_fireteam_size() {
        assert_eq!(parse_fireteam_size(" 4 "), Ok(4));
        assert_eq!(
            parse_fireteam_size("four"),
            Err(MeetingError::InvalidSize("four".to_string()))
        );
    }

    /// Tests parsing stored Discord ids.
    ///
    /// Expected: Ok for numeric strings, Err naming the column otherwise
    #[test]
    fn parses_stored_ids() {
        assert_eq!(parse_stored_id("author_id", "123").unwrap(), 123);
        assert!(matches!(
            parse_stored_id("author_id", "x1"),
            Err(DbErr::Custom(message)) if message.starts_with("Failed to parse author_id")
        ));
    }
}
