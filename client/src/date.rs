use common::Timestamp;

const INVALID_DATE: &str = "Invalid Date";

/// Render an upload time in the host's locale-aware short form.
///
/// In the browser this is `Date.prototype.toLocaleString()`. Never empty:
/// unparseable input renders as "Invalid Date", like the host does.
#[cfg(target_arch = "wasm32")]
pub fn format_date(value: &Timestamp) -> String {
    use wasm_bindgen::JsValue;

    let input = match value {
        Timestamp::Text(text) => JsValue::from_str(text),
        Timestamp::EpochMillis(ms) => JsValue::from_f64(*ms),
    };
    let date = js_sys::Date::new(&input);
    let rendered: String = date
        .to_locale_string("default", &JsValue::UNDEFINED)
        .into();

    if rendered.is_empty() {
        INVALID_DATE.to_string()
    } else {
        rendered
    }
}

/// Render an upload time in the local time zone.
///
/// Outside the browser there is no host locale service, so a fixed
/// short form is used.
#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(value: &Timestamp) -> String {
    match value.to_datetime() {
        Some(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}
