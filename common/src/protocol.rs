use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Route accepting multipart uploads
pub const UPLOAD_PATH: &str = "/media/upload";
/// Route returning the current media listing
pub const LISTING_PATH: &str = "/media";
/// Prefix under which stored files are served raw
pub const MEDIA_PREFIX: &str = "/media";
/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// DOM marker of the grid container
pub const GRID_SELECTOR: &str = ".media-grid";
/// DOM selector for upload inputs
pub const FILE_INPUT_SELECTOR: &str = "input[type=\"file\"]";

/// Characters that cannot appear raw inside one URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Address of the raw file behind a listing entry, filename percent-encoded
pub fn media_url(filename: &str) -> String {
    format!("{}/{}", MEDIA_PREFIX, utf8_percent_encode(filename, PATH_SEGMENT))
}

/// Upload time as reported by the server.
///
/// The serialization is server-defined, so both the textual form
/// (RFC 3339 / ISO-8601) and epoch milliseconds are accepted, the same
/// two shapes a browser `Date` constructor understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    EpochMillis(f64),
}

impl Timestamp {
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Timestamp::Text(value.to_rfc3339())
    }

    /// Parse into a UTC instant, `None` if the value is not a recognizable date
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::EpochMillis(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                DateTime::from_timestamp_millis(ms.trunc() as i64)
            }
            Timestamp::Text(text) => parse_text_timestamp(text.trim()),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Text(text) => write!(f, "{}", text),
            Timestamp::EpochMillis(ms) => write!(f, "{}", ms),
        }
    }
}

fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-less date-times (e.g. Python's isoformat()) are local time,
    // the same reading a browser `Date` gives them
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    // Date-only forms are UTC midnight, again matching `Date`
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One uploaded file as reported by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub filename: String,
    pub size: u64,
    pub uploaded_at: Timestamp,
}

/// Body returned by the upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
}

/// Error body returned by the server on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing is not a JSON array (got {0})")]
    NotAnArray(&'static str),
}

/// Listing entries that passed boundary validation, in received order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub items: Vec<MediaItem>,
    /// Number of entries dropped as malformed
    pub rejected: usize,
}

/// Validate a raw listing response against the `MediaItem` shape.
///
/// Malformed entries are skipped rather than rendered; the order of the
/// accepted ones is preserved.
pub fn decode_listing(value: serde_json::Value) -> Result<Listing, ListingError> {
    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        other => return Err(ListingError::NotAnArray(json_kind(&other))),
    };

    let mut listing = Listing::default();
    for entry in entries {
        match serde_json::from_value::<MediaItem>(entry) {
            Ok(item) if !item.filename.is_empty() => listing.items.push(item),
            _ => listing.rejected += 1,
        }
    }
    Ok(listing)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_url() {
        assert_eq!(media_url("a.png"), "/media/a.png");
        assert_eq!(media_url("my photo.jpg"), "/media/my%20photo.jpg");
    }

    #[test]
    fn test_media_url_encodes_reserved_characters() {
        assert_eq!(media_url("a#1.png"), "/media/a%231.png");
        assert_eq!(media_url("what?.png"), "/media/what%3F.png");
        assert_eq!(media_url("100%.png"), "/media/100%25.png");
        assert_eq!(media_url("caf\u{e9}.png"), "/media/caf%C3%A9.png");
    }

    #[test]
    fn test_media_item_accepts_text_and_numeric_timestamps() {
        let text: MediaItem = serde_json::from_value(json!({
            "filename": "a.png",
            "size": 2048,
            "uploaded_at": "2024-03-01T12:30:00Z"
        }))
        .unwrap();
        assert_eq!(text.uploaded_at, Timestamp::Text("2024-03-01T12:30:00Z".into()));

        let numeric: MediaItem = serde_json::from_value(json!({
            "filename": "b.png",
            "size": 0,
            "uploaded_at": 1709296200000u64
        }))
        .unwrap();
        assert_eq!(numeric.uploaded_at, Timestamp::EpochMillis(1709296200000.0));
        assert_eq!(text.uploaded_at.to_datetime(), numeric.uploaded_at.to_datetime());
    }

    #[test]
    fn test_timestamp_parses_offsetless_iso() {
        let ts = Timestamp::Text("2024-03-01T12:30:00.123456".into());
        let dt = ts.to_datetime().unwrap();
        let naive = NaiveDateTime::parse_from_str("2024-03-01T12:30:00.123456", "%Y-%m-%dT%H:%M:%S%.f")
            .unwrap();
        let expected = Local.from_local_datetime(&naive).earliest().unwrap();
        assert_eq!(dt, expected.with_timezone(&Utc));
        assert_eq!(dt.with_timezone(&Local).naive_local(), naive);

        let date_only = Timestamp::Text("2024-03-01".into());
        assert_eq!(
            date_only.to_datetime().unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );

        assert!(Timestamp::Text("yesterday".into()).to_datetime().is_none());
        assert!(Timestamp::EpochMillis(f64::NAN).to_datetime().is_none());
    }

    #[test]
    fn test_decode_listing_empty() {
        let listing = decode_listing(json!([])).unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.rejected, 0);
    }

    #[test]
    fn test_decode_listing_rejects_malformed_entries() {
        let listing = decode_listing(json!([
            {"filename": "a.png", "size": 10, "uploaded_at": "2024-01-01T00:00:00Z"},
            {"filename": "neg.png", "size": -1, "uploaded_at": "2024-01-01T00:00:00Z"},
            {"filename": "", "size": 1, "uploaded_at": "2024-01-01T00:00:00Z"},
            {"size": 1, "uploaded_at": "2024-01-01T00:00:00Z"},
            "not-an-object",
            {"filename": "b.png", "size": 20, "uploaded_at": 0}
        ]))
        .unwrap();

        let names: Vec<_> = listing.items.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(listing.rejected, 4);
    }

    #[test]
    fn test_decode_listing_requires_array() {
        let err = decode_listing(json!({"detail": "Not Found"})).unwrap_err();
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn test_upload_response_serialization() {
        let json = serde_json::to_string(&UploadResponse { filename: "x.jpg".into() }).unwrap();
        assert_eq!(json, r#"{"filename":"x.jpg"}"#);
    }
}
