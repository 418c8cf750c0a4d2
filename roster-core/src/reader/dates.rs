//! Date coercion for roster cells

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Date layouts accepted in text cells, tried in order.
///
/// `%Y` accepts short years, so two-digit layouts come first and parsed years
/// outside `VALID_YEARS` are rejected.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d, %Y",
];

const VALID_YEARS: std::ops::RangeInclusive<i32> = 1900..=9999;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Last serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Convert an Excel serial number (1900 date system) to a date
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL + 0.999_999).contains(&serial) {
        return None;
    }
    let days = serial.floor() as u64;
    // Excel counts a non-existent 1900-02-29, so early serials use a shifted epoch
    let epoch = if days < 61 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_days(Days::new(days))
}

/// Parse a date typed as text, allowing a trailing time part
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(text, fmt).ok()?;
        (VALID_YEARS.contains(&date.year()) && is_time_suffix(rest)).then_some(date)
    })
}

/// Parse an ISO 8601 date or datetime as produced for ODS date cells
pub fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Render a datetime, dropping a midnight time
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn is_time_suffix(rest: &str) -> bool {
    if rest.is_empty() {
        return true;
    }
    let Some(time) = rest
        .strip_prefix('T')
        .or_else(|| rest.starts_with(char::is_whitespace).then(|| rest.trim_start()))
    else {
        return false;
    };
    TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(time.trim_end(), fmt).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(from_excel_serial(1.0), Some(ymd(1900, 1, 1)));
        assert_eq!(from_excel_serial(61.0), Some(ymd(1900, 3, 1)));
        assert_eq!(from_excel_serial(45292.0), Some(ymd(2024, 1, 1)));
        // Time fraction is ignored
        assert_eq!(from_excel_serial(45292.75), Some(ymd(2024, 1, 1)));
        assert_eq!(from_excel_serial(0.0), None);
        assert_eq!(from_excel_serial(-3.0), None);
        assert_eq!(from_excel_serial(f64::NAN), None);
        assert_eq!(from_excel_serial(3_000_000.0), None);
    }

    #[test]
    fn test_parse_date_text_layouts() {
        let expected = ymd(2024, 3, 4);
        for text in [
            "2024-03-04",
            "2024/03/04",
            "03/04/2024",
            "3/4/2024",
            "3/4/24",
            "04-Mar-2024",
            "4 Mar 2024",
            "4 March 2024",
            "March 4, 2024",
            " 2024-03-04 ",
        ] {
            assert_eq!(parse_date_text(text), Some(expected), "text {:?}", text);
        }
    }

    #[test]
    fn test_parse_date_text_with_time() {
        let expected = ymd(2024, 3, 4);
        assert_eq!(parse_date_text("2024-03-04 00:00:00"), Some(expected));
        assert_eq!(parse_date_text("2024-03-04T08:30"), Some(expected));
        assert_eq!(parse_date_text("2024-03-04 lunch"), None);
    }

    #[test]
    fn test_parse_date_text_rejects_noise() {
        for text in ["", "TOTAL", "Week 12", "2024-13-01", "31/31/2024"] {
            assert_eq!(parse_date_text(text), None, "text {:?}", text);
        }
    }

    #[test]
    fn test_iso_and_format() {
        let dt = parse_iso_datetime("2024-03-04T00:00:00").unwrap();
        assert_eq!(format_datetime(&dt), "2024-03-04");
        let dt = parse_iso_datetime("2024-03-04T06:15:00").unwrap();
        assert_eq!(format_datetime(&dt), "2024-03-04 06:15:00");
        assert!(parse_iso_datetime("2024-03-04").is_some());
        assert!(parse_iso_datetime("not a date").is_none());
    }
}
