//! In-memory stand-ins for the network, the DOM and the console, for native tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use serde_json::{json, Value};

use crate::api::{MediaApi, UploadRequest};
use crate::error::MediaError;
use crate::grid::GridContainer;
use crate::lifecycle::ChangeSource;

pub struct FakeApi {
    listing: Option<Value>,
    list_calls: Cell<usize>,
    uploads: RefCell<Vec<String>>,
}

impl FakeApi {
    /// Uploads succeed, `list` returns `listing`
    pub fn listing(listing: Value) -> Self {
        Self {
            listing: Some(listing),
            list_calls: Cell::new(0),
            uploads: RefCell::new(Vec::new()),
        }
    }

    /// Every request fails at the network level
    pub fn failing() -> Self {
        Self {
            listing: None,
            list_calls: Cell::new(0),
            uploads: RefCell::new(Vec::new()),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.borrow().len()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads.borrow().clone()
    }
}

impl MediaApi for FakeApi {
    type File = Vec<u8>;

    async fn upload(&self, request: &UploadRequest<Vec<u8>>) -> Result<Value, MediaError> {
        self.uploads.borrow_mut().push(request.file_name.clone());
        match self.listing {
            Some(_) => Ok(json!({ "filename": request.file_name })),
            None => Err(MediaError::Network("connection refused".into())),
        }
    }

    async fn list(&self) -> Result<Value, MediaError> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.listing
            .clone()
            .ok_or_else(|| MediaError::Network("connection refused".into()))
    }
}

#[derive(Default)]
pub struct FakeContainer {
    html: RefCell<String>,
    replacements: Cell<usize>,
}

impl FakeContainer {
    pub fn with_contents(html: &str) -> Self {
        Self {
            html: RefCell::new(html.to_string()),
            replacements: Cell::new(0),
        }
    }

    pub fn contents(&self) -> String {
        self.html.borrow().clone()
    }

    pub fn replacements(&self) -> usize {
        self.replacements.get()
    }
}

impl GridContainer for FakeContainer {
    fn replace_contents(&self, html: &str) {
        *self.html.borrow_mut() = html.to_string();
        self.replacements.set(self.replacements.get() + 1);
    }
}

/// Upload input; clones share the same listener list
#[derive(Clone, Default)]
pub struct FakeInput {
    listeners: Rc<RefCell<Vec<u32>>>,
    broken: bool,
}

impl FakeInput {
    /// Rejects every attach and detach
    pub fn broken() -> Self {
        Self {
            listeners: Rc::default(),
            broken: true,
        }
    }

    pub fn listeners(&self) -> Vec<u32> {
        self.listeners.borrow().clone()
    }
}

impl ChangeSource for FakeInput {
    type Handler = u32;

    fn attach(&self, handler: &u32) -> Result<(), String> {
        if self.broken {
            return Err("node detached".into());
        }
        self.listeners.borrow_mut().push(*handler);
        Ok(())
    }

    fn detach(&self, handler: &u32) -> Result<(), String> {
        if self.broken {
            return Err("node detached".into());
        }
        self.listeners.borrow_mut().retain(|h| h != handler);
        Ok(())
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT_LOGGER: Once = Once::new();

/// Records emitted on the current test thread since `capture_logs` was called
pub struct LogCapture;

impl LogCapture {
    fn at(&self, level: log::Level) -> Vec<String> {
        CAPTURED.with(|c| {
            c.borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, msg)| msg.clone())
                .collect()
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(log::Level::Error)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(log::Level::Warn)
    }
}

pub fn capture_logs() -> LogCapture {
    INIT_LOGGER.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
    LogCapture
}
