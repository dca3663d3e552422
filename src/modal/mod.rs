//! Modal dialog presentation
//!
//! [`ModalDialog`] shows its children in a full-viewport overlay. When the
//! host supports native modal dialogs it drives a `<dialog>` element with
//! `showModal()`/`close()` and listens for the cancel gesture; otherwise it
//! renders a layered container that is hidden with a class.
//!
//! The capability probe runs once per instance and again only when the host
//! is replaced with [`ModalDialog::set_host`].
//!
//! Lifecycle:
//!
//! ```text
//! new(host, props)        probe host, pick strategy
//!   render()              describe the DOM to commit
//!   bind_element(el)      hand over the committed <dialog>; effects run
//!   update(props)         re-run effects whose inputs changed
//! drop                    cancel listener released
//! ```

mod fallback;
mod host;
mod native;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

pub use fallback::FallbackDialog;
pub use host::{CancelSubscription, CloseCallback, DialogElement, DialogHost};
pub use native::NativeDialog;

use crate::config::ModalConfig;

/// Check whether the host supports native modal dialogs by creating a
/// throwaway dialog element and looking for its "show as modal" operation.
pub fn is_modal_dialog_supported<H: DialogHost>(host: &H) -> bool {
    host.create_dialog()
        .is_some_and(|dialog| dialog.supports_show_modal())
}

/// Properties supplied by the parent on every render
#[derive(Clone)]
pub struct DialogProps<C> {
    pub closed: bool,
    pub children: C,
    pub on_close: CloseCallback,
    /// Rendered as `data-testid`
    pub test_id: Option<String>,
}

impl<C> DialogProps<C> {
    pub fn new(closed: bool, children: C, on_close: CloseCallback) -> Self {
        Self {
            closed,
            children,
            on_close,
            test_id: None,
        }
    }

    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }
}

/// The strategy chosen by the capability probe
pub enum DialogStrategy<E: DialogElement> {
    Native(NativeDialog<E>),
    Fallback(FallbackDialog),
}

impl<E: DialogElement> DialogStrategy<E> {
    pub fn select<H: DialogHost<Element = E>>(host: &H, closed: bool) -> Self {
        if is_modal_dialog_supported(host) {
            tracing::debug!("Using native modal dialog");
            DialogStrategy::Native(NativeDialog::new())
        } else {
            tracing::debug!("Native modal dialog unsupported, using fallback overlay");
            DialogStrategy::Fallback(FallbackDialog::new(closed))
        }
    }
}

/// What the host should commit for the current render
#[derive(Debug, PartialEq)]
pub enum DialogView<'a, C> {
    /// `<dialog class=.. data-testid=..>{children}</dialog>`
    Native {
        class: &'a str,
        test_id: Option<&'a str>,
        children: &'a C,
    },
    /// `<div class=.. data-testid=..><div class=..>{children}</div></div>`
    Fallback {
        class: String,
        hidden: bool,
        test_id: Option<&'a str>,
        content_class: &'a str,
        children: &'a C,
    },
}

pub struct ModalDialog<H: DialogHost, C> {
    host: H,
    config: ModalConfig,
    strategy: DialogStrategy<H::Element>,
    props: DialogProps<C>,
}

impl<H: DialogHost, C> ModalDialog<H, C> {
    pub fn new(host: H, props: DialogProps<C>) -> Self {
        Self::with_config(host, ModalConfig::default(), props)
    }

    pub fn with_config(host: H, config: ModalConfig, props: DialogProps<C>) -> Self {
        let strategy = DialogStrategy::select(&host, props.closed);
        let mut dialog = Self {
            host,
            config,
            strategy,
            props,
        };
        dialog.sync();
        dialog
    }

    /// Re-render with new props.
    pub fn update(&mut self, props: DialogProps<C>) {
        self.props = props;
        self.sync();
    }

    /// Provide the committed `<dialog>` element to the native strategy.
    pub fn bind_element(&mut self, element: H::Element) {
        match &mut self.strategy {
            DialogStrategy::Native(native) => {
                native.bind(element);
                self.sync();
            }
            DialogStrategy::Fallback(_) => {
                tracing::debug!("Fallback dialog has no native element to bind");
            }
        }
    }

    /// Swap the probing target. The capability check runs again and the
    /// previous strategy, with any listener it held, is dropped.
    pub fn set_host(&mut self, host: H) {
        self.host = host;
        self.strategy = DialogStrategy::select(&self.host, self.props.closed);
        self.sync();
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn props(&self) -> &DialogProps<C> {
        &self.props
    }

    pub fn strategy(&self) -> &DialogStrategy<H::Element> {
        &self.strategy
    }

    pub fn is_native(&self) -> bool {
        matches!(self.strategy, DialogStrategy::Native(_))
    }

    /// Whether the overlay is currently visible to the user.
    pub fn is_shown(&self) -> bool {
        match &self.strategy {
            DialogStrategy::Native(native) => native.is_open(),
            DialogStrategy::Fallback(fallback) => !fallback.is_hidden(),
        }
    }

    pub fn render(&self) -> DialogView<'_, C> {
        let test_id = self.props.test_id.as_deref();
        match &self.strategy {
            DialogStrategy::Native(_) => DialogView::Native {
                class: &self.config.native_class,
                test_id,
                children: &self.props.children,
            },
            DialogStrategy::Fallback(fallback) => DialogView::Fallback {
                class: self.config.fallback_classes(fallback.is_hidden()),
                hidden: fallback.is_hidden(),
                test_id,
                content_class: &self.config.fallback_content_class,
                children: &self.props.children,
            },
        }
    }

    fn sync(&mut self) {
        let closed = self.props.closed;
        match &mut self.strategy {
            DialogStrategy::Native(native) => native.sync(closed, &self.props.on_close),
            DialogStrategy::Fallback(fallback) => fallback.sync(closed),
        }
    }
}

/// Wrap a closure as a [`CloseCallback`].
pub fn close_callback(f: impl Fn() + 'static) -> CloseCallback {
    Rc::new(f)
}
