use chrono::NaiveDate;

/// Date formats seen on invoices and transaction records, tried in order:
/// ISO (`2024-03-15`), US slash (`03/15/2024`), compact alphabetic
/// (`15-MAR-24`).
const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%y"];

/// Normalize a date string to a calendar date.
///
/// Unparseable input yields `None`, never an error; the matcher proceeds
/// with a degraded signal.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso() {
        assert_eq!(parse_date("2024-03-15"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_us_slash() {
        assert_eq!(parse_date("03/15/2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("12/01/2025"), Some(ymd(2025, 12, 1)));
    }

    #[test]
    fn test_compact_alphabetic() {
        assert_eq!(parse_date("15-MAR-24"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("01-Jan-26"), Some(ymd(2026, 1, 1)));
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse_date("  2024-03-15 "), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("13/45/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }
}
