//! Parsing of dates and times typed on the command line.

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, NaiveTime};
use moments_core::window::first_of_month;

/// "today", "tomorrow", "yesterday" or YYYY-MM-DD.
pub fn parse_day(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        _ => NaiveDate::parse_from_str(&input, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Could not parse day: \"{}\" (use YYYY-MM-DD)", input)),
    }
}

/// YYYY-MM, or a full date, as the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(first_of_month(date));
    }

    NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Could not parse month: \"{}\" (use YYYY-MM)", input))
}

/// HH:MM in 24-hour form; a bare hour like "9" means 09:00.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();

    if let Ok(time) = NaiveTime::parse_from_str(input, "%H:%M") {
        return Ok(time);
    }

    if let Ok(hour) = input.parse::<u32>()
        && let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0)
    {
        return Ok(time);
    }

    bail!("Could not parse time: \"{}\" (use HH:MM)", input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn relative_and_iso_days() {
        let today = date(2025, 2, 28);

        assert_eq!(parse_day("today", today).unwrap(), today);
        assert_eq!(parse_day("Tomorrow", today).unwrap(), date(2025, 3, 1));
        assert_eq!(parse_day("yesterday", today).unwrap(), date(2025, 2, 27));
        assert_eq!(parse_day("2025-12-24", today).unwrap(), date(2025, 12, 24));
        assert!(parse_day("next friday", today).is_err());
    }

    #[test]
    fn months_resolve_to_their_first_day() {
        assert_eq!(parse_month("2025-03").unwrap(), date(2025, 3, 1));
        assert_eq!(parse_month("2025-03-17").unwrap(), date(2025, 3, 1));
        assert!(parse_month("March").is_err());
    }

    #[test]
    fn times() {
        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_time("18").unwrap(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert!(parse_time("25").is_err());
        assert!(parse_time("noonish").is_err());
    }
}
