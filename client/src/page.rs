use std::cell::Cell;
use std::rc::Rc;

use common::{FILE_INPUT_SELECTOR, GRID_SELECTOR};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::api::{HttpMediaApi, MediaApi, UploadRequest};
use crate::error::js_message;
use crate::grid::{load_grid, GridContainer};
use crate::lifecycle::{ChangeSource, Lifecycle};
use crate::uploader::{handle_upload, UploadOutcome};

/// The media page controller.
///
/// Holds the grid container and the upload inputs it was given; nothing is
/// looked up globally after construction. `init` loads the grid once and
/// wires the inputs, `teardown` unwires them. Inputs added to the document
/// later are not picked up.
#[wasm_bindgen]
pub struct MediaPage {
    shared: Rc<PageShared>,
    lifecycle: Lifecycle<HtmlInputElement>,
}

struct PageShared {
    api: HttpMediaApi,
    container: Option<Element>,
    refresh_after_upload: Cell<bool>,
}

#[wasm_bindgen]
impl MediaPage {
    /// Build a page over explicit elements. Non-input entries of `inputs` are ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Option<Element>, inputs: js_sys::Array) -> Result<MediaPage, JsValue> {
        let inputs = inputs
            .iter()
            .filter_map(|value| value.dyn_into::<HtmlInputElement>().ok())
            .collect();
        let api = HttpMediaApi::from_window()?;
        Ok(Self::with_parts(api, container, inputs))
    }

    /// Build a page over the current document's `.media-grid` and file inputs
    #[wasm_bindgen(js_name = fromDocument)]
    pub fn from_document() -> Result<MediaPage, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document")?;

        let container = document.query_selector(GRID_SELECTOR)?;
        let inputs = file_inputs(&document)?;
        let api = HttpMediaApi::from_window()?;

        Ok(Self::with_parts(api, container, inputs))
    }

    /// Reload the grid after each successful upload (off by default)
    #[wasm_bindgen(js_name = setRefreshAfterUpload)]
    pub fn set_refresh_after_upload(&self, enabled: bool) {
        self.shared.refresh_after_upload.set(enabled);
    }

    pub fn init(&mut self) {
        let loader = self.shared.clone();
        let uploader = self.shared.clone();

        let started = self.lifecycle.init(
            self.shared.container.as_ref(),
            |container: &Element| {
                let container = container.clone();
                spawn_local(async move {
                    load_grid(&loader.api, &container).await;
                });
            },
            move || {
                Closure::wrap(Box::new(move |event: Event| {
                    let request = selected_file(&event);
                    let shared = uploader.clone();
                    spawn_local(async move {
                        upload_and_maybe_refresh(
                            &shared.api,
                            shared.container.as_ref(),
                            shared.refresh_after_upload.get(),
                            request,
                        )
                        .await;
                    });
                }) as Box<dyn FnMut(_)>)
            },
        );

        if started {
            log::info!(
                "Media page initialized ({} upload inputs, grid {})",
                self.lifecycle.inputs().len(),
                if self.shared.container.is_some() { "present" } else { "absent" }
            );
        }
    }

    pub fn teardown(&mut self) {
        if self.lifecycle.teardown() {
            log::info!("Media page torn down");
        }
    }
}

impl MediaPage {
    pub fn with_parts(
        api: HttpMediaApi,
        container: Option<Element>,
        inputs: Vec<HtmlInputElement>,
    ) -> Self {
        Self {
            shared: Rc::new(PageShared {
                api,
                container,
                refresh_after_upload: Cell::new(false),
            }),
            lifecycle: Lifecycle::new(inputs),
        }
    }
}

impl ChangeSource for HtmlInputElement {
    type Handler = Closure<dyn FnMut(Event)>;

    fn attach(&self, handler: &Self::Handler) -> Result<(), String> {
        self.add_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
            .map_err(|e| js_message(&e))
    }

    fn detach(&self, handler: &Self::Handler) -> Result<(), String> {
        self.remove_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
            .map_err(|e| js_message(&e))
    }
}

impl Drop for MediaPage {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn file_inputs(document: &Document) -> Result<Vec<HtmlInputElement>, JsValue> {
    let nodes = document.query_selector_all(FILE_INPUT_SELECTOR)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect())
}

/// First file of the input that fired the event, if any
fn selected_file(event: &Event) -> Option<UploadRequest<web_sys::File>> {
    let input: HtmlInputElement = event.target()?.dyn_into().ok()?;
    let file = input.files()?.get(0)?;
    Some(UploadRequest {
        file_name: file.name(),
        file,
    })
}

/// Run one upload; on success optionally reload the grid
pub async fn upload_and_maybe_refresh<A, C>(
    api: &A,
    container: Option<&C>,
    refresh: bool,
    request: Option<UploadRequest<A::File>>,
) -> UploadOutcome
where
    A: MediaApi + ?Sized,
    C: GridContainer + ?Sized,
{
    let outcome = handle_upload(api, request).await;
    if let (UploadOutcome::Uploaded(_), true, Some(container)) = (&outcome, refresh, container) {
        load_grid(api, container).await;
    }
    outcome
}
