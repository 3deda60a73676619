use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::error::ValidationError;

/// Parses a due date relative to `today`.
///
/// Accepts `YYYY-MM-DD`, `today`/`tod`, `tomorrow`/`tom`, `eow` (coming Sunday),
/// `eom`, `+Nd`/`+Nw`/`+Nm` and weekday names (`fri`, `2:fri` for the one after).
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    let invalid = || ValidationError::InvalidDate(input.to_string());

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }

    let lower = input.to_lowercase();
    match lower.as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return Ok(today + Duration::days(1)),
        "eow" => {
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday()) % 7;
            return Ok(today + Duration::days(days_to_sunday as i64));
        }
        "eom" => {
            let first = today.with_day(1).ok_or_else(invalid)?;
            let next_month = first.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
            return Ok(next_month - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix('+') {
        let unit_start = match rest.char_indices().last() {
            Some((i, _)) if i > 0 => i,
            _ => return Err(invalid()),
        };
        let (num_str, unit) = rest.split_at(unit_start);
        let count: u32 = num_str.parse().map_err(|_| invalid())?;
        return match unit {
            "d" => today
                .checked_add_signed(Duration::days(count as i64))
                .ok_or_else(invalid),
            "w" => today
                .checked_add_signed(Duration::weeks(count as i64))
                .ok_or_else(invalid),
            // Clamps to the last day of shorter months (Jan 31 + 1m = Feb 28/29).
            "m" => today.checked_add_months(Months::new(count)).ok_or_else(invalid),
            _ => Err(invalid()),
        };
    }

    if let Some((count, day_str)) = parse_weekday_token(&lower) {
        if let Some(target) = parse_weekday_str(day_str) {
            if count < 1 {
                return Err(invalid());
            }
            let mut days_needed = target.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 2 is the occurrence after the next one.
            return (count - 1)
                .checked_mul(7)
                .and_then(|extra| extra.checked_add(days_needed))
                .and_then(Duration::try_days)
                .and_then(|delta| today.checked_add_signed(delta))
                .ok_or_else(invalid);
        }
    }

    Err(invalid())
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|c| (c, day)),
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Option<Weekday> {
    match s {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-01-31 is a Wednesday.
    const TODAY: (i32, u32, u32) = (2024, 1, 31);

    fn parse(input: &str) -> Result<NaiveDate, ValidationError> {
        parse_due_date(input, ymd(TODAY.0, TODAY.1, TODAY.2))
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse("2024-01-01"), Ok(ymd(2024, 1, 1)));
        assert_eq!(parse(" 2025-12-31 "), Ok(ymd(2025, 12, 31)));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse("today"), Ok(ymd(2024, 1, 31)));
        assert_eq!(parse("TOM"), Ok(ymd(2024, 2, 1)));
        assert_eq!(parse("eow"), Ok(ymd(2024, 2, 4)));
        assert_eq!(parse("eom"), Ok(ymd(2024, 1, 31)));
    }

    #[test]
    fn test_relative() {
        assert_eq!(parse("+3d"), Ok(ymd(2024, 2, 3)));
        assert_eq!(parse("+2w"), Ok(ymd(2024, 2, 14)));
        assert_eq!(parse("+1m"), Ok(ymd(2024, 2, 29)));
        assert!(parse("+d").is_err());
        assert!(parse("+3y").is_err());
        assert!(parse("+3é").is_err());
        assert!(parse("+4000000000d").is_err());
    }

    #[test]
    fn test_weekdays() {
        assert_eq!(parse("fri"), Ok(ymd(2024, 2, 2)));
        assert_eq!(parse("2:fri"), Ok(ymd(2024, 2, 9)));
        // Same weekday as today means next week.
        assert_eq!(parse("wednesday"), Ok(ymd(2024, 2, 7)));
        assert!(parse("0:fri").is_err());
        assert!(parse("9999999999999:fri").is_err());
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("x:fri"), None);
    }

    #[test]
    fn test_garbage() {
        assert_eq!(
            parse("someday"),
            Err(ValidationError::InvalidDate("someday".to_string()))
        );
        assert!(parse("2024-13-01").is_err());
    }
}
