use common::{format_file_size, media_url, MediaItem, Timestamp};

/// Build the grid markup, one `media-item` block per entry in received order.
///
/// The date formatter is passed in so the markup can be produced without a
/// browser. An empty listing yields an empty string.
pub fn render_grid<F>(items: &[MediaItem], format_date: F) -> String
where
    F: Fn(&Timestamp) -> String,
{
    items
        .iter()
        .map(|item| render_item(item, &format_date))
        .collect()
}

fn render_item<F>(item: &MediaItem, format_date: &F) -> String
where
    F: Fn(&Timestamp) -> String,
{
    let name = escape_html(&item.filename);
    format!(
        concat!(
            "<div class=\"media-item\">",
            "<div class=\"media-preview\"><img src=\"{src}\" alt=\"{name}\"></div>",
            "<div class=\"media-info\">",
            "<p>{name}</p>",
            "<p>{size}</p>",
            "<p>{date}</p>",
            "</div>",
            "</div>"
        ),
        src = escape_html(&media_url(&item.filename)),
        name = name,
        size = format_file_size(item.size),
        date = escape_html(&format_date(&item.uploaded_at)),
    )
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
