use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod api;
pub mod date;
pub mod error;
pub mod grid;
pub mod lifecycle;
pub mod page;
pub mod render;
pub mod uploader;

#[cfg(test)]
mod test_support;

pub use page::MediaPage;

thread_local! {
    static PAGE: RefCell<Option<MediaPage>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("Media page client loaded");

    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once(boot);
        if let Err(e) = document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        ) {
            log::error!("Failed to wait for DOMContentLoaded: {:?}", e);
        }
        on_ready.forget();
    } else {
        boot();
    }
}

/// Attach a page controller to the parsed document
fn boot() {
    match MediaPage::from_document() {
        Ok(mut page) => {
            page.init();
            PAGE.with(|slot| *slot.borrow_mut() = Some(page));
        }
        Err(e) => log::error!("Media page setup failed: {:?}", e),
    }
}

/// Tear down the controller created at startup
#[wasm_bindgen]
pub fn shutdown() {
    PAGE.with(|slot| {
        if let Some(mut page) = slot.borrow_mut().take() {
            page.teardown();
        }
    });
}
