use common::decode_listing;

use crate::api::MediaApi;
use crate::date::format_date;
use crate::error::MediaError;
use crate::render::render_grid;

/// Element the grid is rendered into. Contents are only ever replaced whole.
pub trait GridContainer {
    fn replace_contents(&self, html: &str);
}

impl GridContainer for web_sys::Element {
    fn replace_contents(&self, html: &str) {
        self.set_inner_html(html);
    }
}

/// Fetch the listing and replace the container's contents with it.
///
/// Returns the number of rendered items. On error the container is untouched.
pub async fn refresh<A, C>(api: &A, container: &C) -> Result<usize, MediaError>
where
    A: MediaApi + ?Sized,
    C: GridContainer + ?Sized,
{
    let raw = api.list().await?;
    let listing = decode_listing(raw)?;

    if listing.rejected > 0 {
        log::warn!("Skipped {} malformed media entries", listing.rejected);
    }

    container.replace_contents(&render_grid(&listing.items, format_date));
    Ok(listing.items.len())
}

/// `refresh`, with failures logged and swallowed
pub async fn load_grid<A, C>(api: &A, container: &C) -> Option<usize>
where
    A: MediaApi + ?Sized,
    C: GridContainer + ?Sized,
{
    match refresh(api, container).await {
        Ok(count) => {
            log::debug!("Rendered {} media items", count);
            Some(count)
        }
        Err(e) => {
            log::error!("Error loading media: {}", e);
            None
        }
    }
}
