use chrono::{NaiveDate, NaiveDateTime};

/// Date formats accepted for `data_ocorrencia`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an occurrence date. Accepts ISO dates, ISO datetimes (time is
/// dropped) and Brazilian DD/MM/YYYY. Returns None for empty or unparseable
/// strings.
pub fn parse_data(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parse a resolution time in days. Accepts a comma decimal separator
/// ("3,5" → 3.5). Negative or non-finite values are rejected.
pub fn parse_tempo(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_iso() {
        let d = parse_data("2024-01-15").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_data_iso_datetime() {
        let d = parse_data("2024-01-15 08:30:00").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_data_brazilian() {
        let d = parse_data("15/01/2024").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_data_empty_or_invalid() {
        assert!(parse_data("").is_none());
        assert!(parse_data("   ").is_none());
        assert!(parse_data("not-a-date").is_none());
        assert!(parse_data("2024-13-01").is_none());
    }

    #[test]
    fn test_parse_tempo_basic() {
        assert_eq!(parse_tempo("3"), Some(3.0));
        assert_eq!(parse_tempo("3.5"), Some(3.5));
        assert_eq!(parse_tempo(" 7 "), Some(7.0));
    }

    #[test]
    fn test_parse_tempo_comma_decimal() {
        assert_eq!(parse_tempo("3,5"), Some(3.5));
    }

    #[test]
    fn test_parse_tempo_zero_is_valid() {
        assert_eq!(parse_tempo("0"), Some(0.0));
    }

    #[test]
    fn test_parse_tempo_rejects_negative_and_garbage() {
        assert!(parse_tempo("-1").is_none());
        assert!(parse_tempo("").is_none());
        assert!(parse_tempo("abc").is_none());
        assert!(parse_tempo("NaN").is_none());
        assert!(parse_tempo("inf").is_none());
    }
}
