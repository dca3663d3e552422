//! Fallback overlay for hosts without native modal dialogs
//!
//! A plain full-viewport layered container whose visibility is a class
//! toggle. There is no native cancel event, so no listener is attached.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackDialog {
    hidden: bool,
}

impl FallbackDialog {
    pub fn new(closed: bool) -> Self {
        Self { hidden: closed }
    }

    pub fn sync(&mut self, closed: bool) {
        self.hidden = closed;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}
