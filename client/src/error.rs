use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure of an upload or listing request.
///
/// Both variants are handled identically by the page: logged and swallowed.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("network error: {0}")]
    Network(String),

    #[error("could not parse response: {0}")]
    Decode(String),
}

/// Best-effort text of a thrown JS value (string, or an Error's `message`)
pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &"message".into())
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

impl From<JsValue> for MediaError {
    fn from(value: JsValue) -> Self {
        MediaError::Network(js_message(&value))
    }
}

impl From<serde_json::Error> for MediaError {
    fn from(error: serde_json::Error) -> Self {
        MediaError::Decode(error.to_string())
    }
}

impl From<common::ListingError> for MediaError {
    fn from(error: common::ListingError) -> Self {
        MediaError::Decode(error.to_string())
    }
}

impl From<MediaError> for JsValue {
    fn from(error: MediaError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
