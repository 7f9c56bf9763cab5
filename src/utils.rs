use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use url::Url;

use crate::core::object::ObjectExt;

/// Iterates a field that may hold a single value or an array of values.
///
/// `null` yields nothing; an array yields its elements; anything else yields itself.
pub fn one_or_many(value: &Value) -> impl Iterator<Item = &Value> {
    let items: &[Value] = match value {
        Value::Null => &[],
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };
    items.iter()
}

/// The first element of an array, or the value itself if it is not an array.
pub fn first_of(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// The value as a string, taking the first element when it is an array of strings.
///
/// Used for multi-language names and for `type` fields that may be a term or a list of terms.
pub fn first_string(value: &Value) -> Option<&str> {
    first_of(value).and_then(Value::as_str)
}

/// Resolves a field that may be given by reference (an IRI string) or inline (an object with an
/// `id`), returning the IRI in both cases.
///
/// Arrays resolve to their first element.
pub fn resolve_ref_or_inline(value: &Value) -> Option<&str> {
    match first_of(value)? {
        Value::String(iri) => Some(iri.as_str()),
        Value::Object(object) => object.str_field("id"),
        _ => None,
    }
}

const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a badge date.
///
/// Accepts RFC 3339 and the looser ISO 8601 forms seen in the wild: seconds may be left out,
/// the offset may be written `+0000` or `+00`, and a space may separate date and time. A
/// date-time without offset is read as UTC and a bare date as UTC midnight.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc));
    }

    let with_offset = OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok());
    if let Some(date_time) = with_offset {
        return Some(date_time.with_timezone(&Utc));
    }

    let naive = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());
    if let Some(date_time) = naive {
        return Some(date_time.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| date_time.and_utc())
}

/// Parses a date held in a JSON value, which must be a string.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_date)
}

/// Whether the string parses as an absolute URL.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Renders a JSON value for inclusion in a message, without quoting strings.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn one_or_many_shapes() {
        assert_eq!(one_or_many(&json!([1, 2])).count(), 2);
        assert_eq!(one_or_many(&json!({ "a": 1 })).count(), 1);
        assert_eq!(one_or_many(&Value::Null).count(), 0);
    }

    #[test]
    fn ref_or_inline() {
        assert_eq!(resolve_ref_or_inline(&json!("https://x/img.png")), Some("https://x/img.png"));
        assert_eq!(
            resolve_ref_or_inline(&json!({ "id": "https://x/img.png", "type": "Image" })),
            Some("https://x/img.png")
        );
        assert_eq!(resolve_ref_or_inline(&json!(["https://a", "https://b"])), Some("https://a"));
        assert_eq!(resolve_ref_or_inline(&json!({ "type": "Image" })), None);
        assert_eq!(resolve_ref_or_inline(&json!(42)), None);
    }

    #[test]
    fn first_string_of_language_map() {
        assert_eq!(first_string(&json!(["Badge", "Abzeichen"])), Some("Badge"));
        assert_eq!(first_string(&json!("Badge")), Some("Badge"));
        assert_eq!(first_string(&json!([])), None);
    }

    #[test]
    fn dates() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_date("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_date("2024-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_date("2024-01-02T03:04:05"), Some(expected));
        assert_eq!(
            parse_date("2024-01-02"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date_value(&json!(20240102)), None);
    }

    #[test]
    fn loose_date_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        for text in [
            "2024-01-15T09:30Z",
            "2024-01-15T09:30:00+0000",
            "2024-01-15T10:30:00+01",
            "2024-01-15 09:30:00",
            "2024-01-15 09:30:00Z",
            "2024-01-15T09:30",
            "2024-01-15T09:30:00.000",
        ] {
            assert_eq!(parse_date(text), Some(expected), "{text}");
        }
        assert_eq!(parse_date("2024-01-15T09"), None);
        assert_eq!(parse_date("15/01/2024"), None);
    }

    #[test]
    fn urls() {
        assert!(is_valid_url("https://example.org/issuer"));
        assert!(is_valid_url("urn:uuid:0f9a3c52-6e3c-4b59-9d6f-5b0a4e1f2c3d"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("/relative/path"));
    }
}
