use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// True when `date` is a real `YYYY-MM-DD` calendar day strictly before `today`.
pub fn check_date_format(date: &str, today: NaiveDate) -> bool {
    parse_quote_date(date).is_some_and(|parsed| parsed < today)
}

/// Strict `YYYY-MM-DD`: zero-padded fields only.
pub fn parse_quote_date(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Daily prices are published the day after a trading session, so refreshes run
/// Tuesday through Saturday.
pub fn can_refresh_on(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Sun | Weekday::Mon)
}

pub fn previous_day(today: NaiveDate) -> String {
    (today - Duration::days(1)).format(DATE_FORMAT).to_string()
}

/// `can_refresh_on` for a calendar date.
pub fn can_refresh_date(today: NaiveDate) -> bool {
    can_refresh_on(today.weekday())
}
