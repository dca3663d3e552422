//! Native `<dialog>` strategy

use super::host::{CancelSubscription, CloseCallback, DialogElement};

/// Drives a native dialog element from the `closed` prop.
///
/// Until an element is bound every sync is a no-op; the pending state is
/// applied as soon as [`NativeDialog::bind`] is called.
pub struct NativeDialog<E: DialogElement> {
    element: Option<E>,
    /// Last `closed` value pushed to the element, whether or not it took
    applied_closed: Option<bool>,
    open: bool,
    subscription: Option<CancelSubscription<E>>,
}

impl<E: DialogElement> NativeDialog<E> {
    pub fn new() -> Self {
        Self {
            element: None,
            applied_closed: None,
            open: false,
            subscription: None,
        }
    }

    /// Attach the rendered element. Any listener on a previous element is released.
    pub fn bind(&mut self, element: E) {
        self.subscription = None;
        self.applied_closed = None;
        self.open = false;
        self.element = Some(element);
    }

    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// True once `showModal` has succeeded and the dialog has not been closed since.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn sync(&mut self, closed: bool, on_close: &CloseCallback) {
        self.sync_open_state(closed);
        self.sync_cancel_listener(on_close);
    }

    fn sync_open_state(&mut self, closed: bool) {
        if self.applied_closed == Some(closed) {
            return;
        }
        let Some(element) = &self.element else {
            return;
        };

        if closed {
            element.close();
            self.open = false;
        } else {
            match element.show_modal() {
                Ok(()) => self.open = true,
                // Not retried until `closed` changes again.
                Err(e) => tracing::warn!("Failed to open native dialog: {}", e),
            }
        }
        self.applied_closed = Some(closed);
    }

    fn sync_cancel_listener(&mut self, on_close: &CloseCallback) {
        if self
            .subscription
            .as_ref()
            .is_some_and(|subscription| subscription.is_for(on_close))
        {
            return;
        }

        // Release the old listener before registering the new one.
        self.subscription = None;
        if let Some(element) = &self.element {
            tracing::debug!("Registering dialog cancel listener");
            self.subscription = Some(CancelSubscription::new(element, on_close.clone()));
        }
    }
}

impl<E: DialogElement> Default for NativeDialog<E> {
    fn default() -> Self {
        Self::new()
    }
}
