//! In-memory dialog host that records every call made on its elements

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::host::{CloseCallback, DialogElement, DialogHost};
use crate::error::DialogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    ShowModal,
    Close,
    AddListener(usize),
    RemoveListener(usize),
}

#[derive(Default)]
struct Log {
    calls: Vec<Call>,
    listeners: Vec<(usize, CloseCallback)>,
    next_listener: usize,
}

#[derive(Clone)]
pub struct RecordingElement {
    supports_modal: bool,
    fail_show: bool,
    log: Rc<RefCell<Log>>,
}

impl RecordingElement {
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().calls.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.log.borrow().listeners.len()
    }

    /// Simulate the user pressing Escape.
    pub fn cancel(&self) {
        let callbacks: Vec<CloseCallback> = self
            .log
            .borrow()
            .listeners
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl DialogElement for RecordingElement {
    type Listener = usize;

    fn supports_show_modal(&self) -> bool {
        self.supports_modal
    }

    fn show_modal(&self) -> Result<(), DialogError> {
        self.log.borrow_mut().calls.push(Call::ShowModal);
        if self.fail_show {
            return Err(DialogError::ShowModal("InvalidStateError".into()));
        }
        Ok(())
    }

    fn close(&self) {
        self.log.borrow_mut().calls.push(Call::Close);
    }

    fn add_cancel_listener(&self, callback: CloseCallback) -> usize {
        let mut log = self.log.borrow_mut();
        let id = log.next_listener;
        log.next_listener += 1;
        log.listeners.push((id, callback));
        log.calls.push(Call::AddListener(id));
        id
    }

    fn remove_cancel_listener(&self, listener: usize) {
        let mut log = self.log.borrow_mut();
        log.listeners.retain(|(id, _)| *id != listener);
        log.calls.push(Call::RemoveListener(listener));
    }
}

#[derive(Clone)]
pub struct RecordingHost {
    supports_modal: bool,
    fail_show: bool,
    probes: Rc<Cell<usize>>,
    log: Rc<RefCell<Log>>,
}

impl RecordingHost {
    pub fn native() -> Self {
        Self::with_support(true)
    }

    pub fn legacy() -> Self {
        Self::with_support(false)
    }

    pub fn failing_show_modal() -> Self {
        Self {
            fail_show: true,
            ..Self::native()
        }
    }

    fn with_support(supports_modal: bool) -> Self {
        Self {
            supports_modal,
            fail_show: false,
            probes: Rc::new(Cell::new(0)),
            log: Rc::new(RefCell::new(Log::default())),
        }
    }

    /// The element the dialog would be rendered as.
    pub fn element(&self) -> RecordingElement {
        RecordingElement {
            supports_modal: self.supports_modal,
            fail_show: self.fail_show,
            log: Rc::clone(&self.log),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.get()
    }
}

impl DialogHost for RecordingHost {
    type Element = RecordingElement;

    fn create_dialog(&self) -> Option<RecordingElement> {
        self.probes.set(self.probes.get() + 1);
        Some(self.element())
    }
}
