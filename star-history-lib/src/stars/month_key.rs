use chrono::{DateTime, Datelike, Utc};
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A calendar month, formatted as `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, returning `None` if `month` is not in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a UTC timestamp falls in.
    #[must_use]
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let invalid = || format!("invalid month '{s}': expected 'YYYY-MM'");

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = year.parse::<i32>().map_err(|e| format!("{}: {e}", invalid()))?;
        let month = month.parse::<u32>().map_err(|e| format!("{}: {e}", invalid()))?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_of_timestamp() {
        assert_eq!(MonthKey::of(&ts("2025-03-15T10:00:00Z")).to_string(), "2025-03");
        assert_eq!(MonthKey::of(&ts("2025-12-31T23:59:59Z")).to_string(), "2025-12");
    }

    #[test]
    fn test_of_timestamp_uses_utc() {
        // 23:30 on the last day of March at UTC-2 is already April in UTC
        assert_eq!(MonthKey::of(&ts("2025-03-31T23:30:00-02:00")).to_string(), "2025-04");
    }

    #[test]
    fn test_parse_roundtrip() {
        let key: MonthKey = "2024-07".parse().unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 7);
        assert_eq!(key.to_string(), "2024-07");
    }

    #[test]
    fn test_parse_rejects_bad_month() {
        let _ = "2024-13".parse::<MonthKey>().unwrap_err();
        let _ = "2024-00".parse::<MonthKey>().unwrap_err();
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        for input in ["2024", "2024-7", "24-07", "2024-07-01", "abcd-ef", "", "2024/07"] {
            assert!(input.parse::<MonthKey>().is_err(), "'{input}' should not parse");
        }
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys: Vec<MonthKey> = ["2025-01", "2024-12", "2025-10", "2025-02"].iter().map(|s| s.parse().unwrap()).collect();
        keys.sort();
        let sorted: Vec<_> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, ["2024-12", "2025-01", "2025-02", "2025-10"]);
    }

    #[test]
    fn test_new_validates_month() {
        assert!(MonthKey::new(2025, 0).is_none());
        assert!(MonthKey::new(2025, 12).is_some());
    }
}
