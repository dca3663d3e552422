//! The presentation surface a modal dialog renders into
//!
//! A host can create dialog-capable elements; an element can be opened
//! modally, closed, and observed for the platform cancel gesture (Escape).
//! The browser implementation lives in `modal::web`; tests use an in-memory
//! recording host.

use std::rc::Rc;

use crate::error::DialogError;

/// Invoked when the user dismisses the dialog
pub type CloseCallback = Rc<dyn Fn()>;

pub trait DialogElement: Clone {
    /// Handle returned on registration, needed to unregister
    type Listener;

    /// Whether this element offers a "show as modal" operation.
    fn supports_show_modal(&self) -> bool;

    fn show_modal(&self) -> Result<(), DialogError>;

    fn close(&self);

    fn add_cancel_listener(&self, callback: CloseCallback) -> Self::Listener;

    fn remove_cancel_listener(&self, listener: Self::Listener);
}

pub trait DialogHost {
    type Element: DialogElement;

    /// Create a detached dialog element, or `None` if the host cannot.
    fn create_dialog(&self) -> Option<Self::Element>;
}

/// A registered cancel listener. Dropping it unregisters the listener.
pub struct CancelSubscription<E: DialogElement> {
    element: E,
    callback: CloseCallback,
    listener: Option<E::Listener>,
}

impl<E: DialogElement> CancelSubscription<E> {
    pub fn new(element: &E, callback: CloseCallback) -> Self {
        let listener = element.add_cancel_listener(Rc::clone(&callback));
        Self {
            element: element.clone(),
            callback,
            listener: Some(listener),
        }
    }

    /// True if this subscription was made for the same callback instance.
    pub fn is_for(&self, callback: &CloseCallback) -> bool {
        Rc::ptr_eq(&self.callback, callback)
    }
}

impl<E: DialogElement> Drop for CancelSubscription<E> {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.element.remove_cancel_listener(listener);
        }
    }
}
