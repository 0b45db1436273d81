//! Shared utility functions for WFC crates.

/// Date utility functions
pub mod dates {
    use chrono::{Months, NaiveDate, NaiveDateTime};

    /// Canonical date format used on the wire and in the UI: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Datetime format echoed back by the prediction service.
    pub const ECHO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Parse either a plain date or an echoed "YYYY-MM-DDTHH:MM:SS" datetime,
    /// keeping only the calendar date.
    pub fn parse_date_lenient(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Ok(date);
        }
        // Fractional seconds are occasionally present; chrono's %.f handles them.
        let datetime = NaiveDateTime::parse_from_str(trimmed, ECHO_DATETIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))?;
        Ok(datetime.date())
    }

    /// Number of days in the given month (1-based).
    pub fn days_in_month(year: i32, month: u32) -> u32 {
        let first = match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(date) => date,
            None => return 0,
        };
        match first.checked_add_months(Months::new(1)) {
            Some(next) => (next - first).num_days() as u32,
            // December of chrono's last representable year
            None => 31,
        }
    }

    /// Range of target dates the prediction service accepts relative to
    /// `today`: one year behind through three months ahead.
    ///
    /// The service enforces this itself; the bounds are only used as hints
    /// for date inputs.
    pub fn supported_bounds(today: &NaiveDate) -> (NaiveDate, NaiveDate) {
        let min = *today - chrono::Duration::days(365);
        let max = *today + chrono::Duration::days(90);
        (min, max)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_days_in_month() {
            assert_eq!(days_in_month(2024, 2), 29);
            assert_eq!(days_in_month(2023, 2), 28);
            assert_eq!(days_in_month(2024, 4), 30);
            assert_eq!(days_in_month(2024, 12), 31);
            assert_eq!(days_in_month(2024, 13), 0);
        }

        #[test]
        fn test_parse_date_lenient() {
            let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
            assert_eq!(parse_date_lenient("2024-05-01").unwrap(), expected);
            assert_eq!(parse_date_lenient("2024-05-01T00:00:00").unwrap(), expected);
            assert_eq!(parse_date_lenient("2024-05-01T00:00:00.000").unwrap(), expected);
            assert!(parse_date_lenient("2024-02-30").is_err());
            assert!(parse_date_lenient("May 1st").is_err());
        }

        #[test]
        fn test_supported_bounds() {
            let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            let (min, max) = supported_bounds(&today);
            assert_eq!(min, NaiveDate::from_ymd_opt(2023, 6, 2).unwrap());
            assert_eq!(max, NaiveDate::from_ymd_opt(2024, 8, 30).unwrap());
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }
    }
}
