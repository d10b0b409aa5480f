//! Next preventive-maintenance date rules
//!
//! The PM form offers fixed intervals ("1bulan", "2bulan", "3bulan", one to
//! three months counted as 30-day blocks) or an explicit date.

use chrono::{Duration, NaiveDate};

/// Date format used by every date input in the UI
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Interval choice submitted with a PM job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPmOption {
    Months(u8),
    ExplicitDate,
}

impl NextPmOption {
    /// Parse the `next_pm_option` form value. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1bulan" => Some(NextPmOption::Months(1)),
            "2bulan" => Some(NextPmOption::Months(2)),
            "3bulan" => Some(NextPmOption::Months(3)),
            "date" => Some(NextPmOption::ExplicitDate),
            _ => None,
        }
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Resolve the next PM date for a job done on `job_date`.
///
/// A non-empty option takes precedence: an interval is added to the job
/// date, `date` uses `explicit`, and an unknown option clears the schedule.
/// Without an option the explicit date is used as given.
pub fn resolve_next_pm(
    job_date: NaiveDate,
    option: Option<&str>,
    explicit: Option<NaiveDate>,
) -> Option<NaiveDate> {
    match option.map(str::trim).filter(|o| !o.is_empty()) {
        Some(raw) => match NextPmOption::parse(raw)? {
            NextPmOption::Months(n) => Some(job_date + Duration::days(30 * i64::from(n))),
            NextPmOption::ExplicitDate => explicit,
        },
        None => explicit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_interval_options_add_thirty_day_blocks() {
        let d = date("2024-01-15");
        assert_eq!(resolve_next_pm(d, Some("1bulan"), None), Some(date("2024-02-14")));
        assert_eq!(resolve_next_pm(d, Some("2bulan"), None), Some(date("2024-03-15")));
        assert_eq!(resolve_next_pm(d, Some("3bulan"), None), Some(date("2024-04-14")));
    }

    #[test]
    fn test_option_takes_precedence_over_explicit_date() {
        let d = date("2024-01-15");
        let explicit = Some(date("2024-12-01"));
        assert_eq!(
            resolve_next_pm(d, Some("1bulan"), explicit),
            Some(date("2024-02-14"))
        );
        assert_eq!(resolve_next_pm(d, Some("date"), explicit), explicit);
    }

    #[test]
    fn test_unknown_option_clears_schedule() {
        let d = date("2024-01-15");
        assert_eq!(resolve_next_pm(d, Some("6bulan"), Some(date("2024-12-01"))), None);
        assert_eq!(resolve_next_pm(d, Some("date"), None), None);
    }

    #[test]
    fn test_blank_option_falls_back_to_explicit_date() {
        let d = date("2024-01-15");
        assert_eq!(resolve_next_pm(d, Some("  "), Some(date("2024-05-01"))), Some(date("2024-05-01")));
        assert_eq!(resolve_next_pm(d, None, None), None);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("15/01/2024").is_none());
        assert!(parse_date("").is_none());
        assert_eq!(parse_date(" 2024-01-15 "), Some(date("2024-01-15")));
    }
}
