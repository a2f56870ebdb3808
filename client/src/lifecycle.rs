/// An element the page's change handler can be attached to
pub trait ChangeSource {
    type Handler;

    fn attach(&self, handler: &Self::Handler) -> Result<(), String>;
    fn detach(&self, handler: &Self::Handler) -> Result<(), String>;
}

/// Init/teardown bookkeeping for one page: a fixed set of inputs sharing one
/// handler, which exists only while the page is initialized.
pub struct Lifecycle<S: ChangeSource> {
    inputs: Vec<S>,
    handler: Option<S::Handler>,
}

impl<S: ChangeSource> Lifecycle<S> {
    pub fn new(inputs: Vec<S>) -> Self {
        Self {
            inputs,
            handler: None,
        }
    }

    pub fn inputs(&self) -> &[S] {
        &self.inputs
    }

    pub fn is_active(&self) -> bool {
        self.handler.is_some()
    }

    /// Start the grid load if there is a container, then attach one handler to
    /// every input. Returns false, doing nothing, if already initialized.
    pub fn init<C, L, H>(&mut self, container: Option<&C>, load: L, make_handler: H) -> bool
    where
        C: ?Sized,
        L: FnOnce(&C),
        H: FnOnce() -> S::Handler,
    {
        if self.handler.is_some() {
            log::warn!("Media page already initialized");
            return false;
        }

        if let Some(container) = container {
            load(container);
        }

        let handler = make_handler();
        for input in &self.inputs {
            if let Err(e) = input.attach(&handler) {
                log::warn!("Failed to attach upload handler: {}", e);
            }
        }
        self.handler = Some(handler);
        true
    }

    /// Detach the handler from every input and drop it. Returns false if not initialized.
    pub fn teardown(&mut self) -> bool {
        let Some(handler) = self.handler.take() else {
            return false;
        };
        for input in &self.inputs {
            if let Err(e) = input.detach(&handler) {
                log::warn!("Failed to detach upload handler: {}", e);
            }
        }
        true
    }
}
