/// Unit labels, base 1024. Nothing beyond GB is defined; larger values clamp to GB.
const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const BASE: u64 = 1024;

/// Format a byte count as a human-readable string ("0 Bytes", "1.5 KB", "2 MB")
///
/// The largest unit whose scaled value is at least 1 is chosen and the value
/// is rounded to at most two decimals, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let index = unit_index(bytes);
    let scaled = bytes as f64 / BASE.pow(index as u32) as f64;
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[index])
}

/// Index into `UNITS` for a non-zero byte count
fn unit_index(bytes: u64) -> usize {
    let mut index = 0;
    let mut threshold = BASE;
    while index + 1 < UNITS.len() && bytes >= threshold {
        index += 1;
        threshold = threshold.saturating_mul(BASE);
    }
    index
}
