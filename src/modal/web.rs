//! Browser implementation of the dialog host, plus a JS-facing wrapper
//!
//! Only compiled for `wasm32`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlDialogElement, Node};

use super::{close_callback, CloseCallback, DialogElement, DialogHost, DialogProps, DialogView, ModalDialog};
use crate::config::ModalConfig;
use crate::error::DialogError;

fn dom_error(e: JsValue) -> DialogError {
    DialogError::Dom(format!("{:?}", e))
}

/// Dialog host backed by a `web_sys::Document`
#[derive(Clone)]
pub struct WebDialogHost {
    document: Document,
}

impl WebDialogHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Host for the current window's document, if there is one.
    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    fn create(&self, tag: &str) -> Result<Element, DialogError> {
        self.document
            .create_element(tag)
            .map_err(|_| DialogError::CreateElement(tag.to_string()))
    }

    /// Build the DOM for `view` and append it to `parent`. Returns the
    /// outermost element (the `<dialog>` in the native case).
    pub fn commit(&self, parent: &Element, view: &DialogView<'_, Node>) -> Result<Element, DialogError> {
        let outer = match view {
            DialogView::Native {
                class,
                test_id,
                children,
            } => {
                let dialog = self.create("dialog")?;
                dialog.set_class_name(class);
                set_test_id(&dialog, *test_id)?;
                dialog.append_child(children).map_err(dom_error)?;
                dialog
            }
            DialogView::Fallback {
                class,
                test_id,
                content_class,
                children,
                ..
            } => {
                let container = self.create("div")?;
                container.set_class_name(class);
                set_test_id(&container, *test_id)?;
                let content = self.create("div")?;
                content.set_class_name(content_class);
                content.append_child(children).map_err(dom_error)?;
                container.append_child(&content).map_err(dom_error)?;
                container
            }
        };
        parent.append_child(&outer).map_err(dom_error)?;
        Ok(outer)
    }

    /// Bring an already committed element in line with a new render.
    pub fn refresh(&self, outer: &Element, view: &DialogView<'_, Node>) {
        if let DialogView::Fallback { class, .. } = view {
            outer.set_class_name(class);
        }
    }
}

fn set_test_id(element: &Element, test_id: Option<&str>) -> Result<(), DialogError> {
    match test_id {
        Some(id) => element.set_attribute("data-testid", id).map_err(dom_error),
        None => Ok(()),
    }
}

impl DialogHost for WebDialogHost {
    type Element = WebDialogElement;

    fn create_dialog(&self) -> Option<WebDialogElement> {
        self.document
            .create_element("dialog")
            .ok()
            .map(WebDialogElement::new)
    }
}

/// A `<dialog>` element. Browsers without dialog support hand back a plain
/// `HTMLUnknownElement`, so `showModal` is looked up rather than assumed.
#[derive(Clone)]
pub struct WebDialogElement {
    element: Element,
}

impl WebDialogElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    fn dialog(&self) -> &HtmlDialogElement {
        self.element.unchecked_ref::<HtmlDialogElement>()
    }
}

/// Keeps the JS closure alive while it is registered
pub struct WebCancelListener {
    closure: Closure<dyn FnMut(Event)>,
}

impl DialogElement for WebDialogElement {
    type Listener = WebCancelListener;

    fn supports_show_modal(&self) -> bool {
        js_sys::Reflect::get(&self.element, &JsValue::from_str("showModal"))
            .map(|value| value.is_function())
            .unwrap_or(false)
    }

    fn show_modal(&self) -> Result<(), DialogError> {
        if !self.supports_show_modal() {
            return Err(DialogError::Unsupported);
        }
        self.dialog()
            .show_modal()
            .map_err(|e| DialogError::ShowModal(format!("{:?}", e)))
    }

    fn close(&self) {
        if self.supports_show_modal() {
            self.dialog().close();
        }
    }

    fn add_cancel_listener(&self, callback: CloseCallback) -> WebCancelListener {
        let closure = Closure::wrap(Box::new(move |_event: Event| callback()) as Box<dyn FnMut(Event)>);
        if let Err(e) = self
            .element
            .add_event_listener_with_callback("cancel", closure.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to add dialog cancel listener: {:?}", e);
        }
        WebCancelListener { closure }
    }

    fn remove_cancel_listener(&self, listener: WebCancelListener) {
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback("cancel", listener.closure.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to remove dialog cancel listener: {:?}", e);
        }
    }
}

/// Adapt a JS function into a [`CloseCallback`]. Exceptions are logged.
pub fn js_close_callback(on_close: js_sys::Function) -> CloseCallback {
    close_callback(move || {
        if let Err(e) = on_close.call0(&JsValue::NULL) {
            tracing::warn!("Dialog close callback threw: {:?}", e);
        }
    })
}

/// Modal dialog exposed to JavaScript
#[wasm_bindgen]
pub struct WebModalDialog {
    host: WebDialogHost,
    dialog: ModalDialog<WebDialogHost, Node>,
    outer: Element,
}

#[wasm_bindgen]
impl WebModalDialog {
    /// Render `content` into `parent` as a modal overlay.
    /// `config` is an optional partial `ModalConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        parent: &Element,
        content: Node,
        closed: bool,
        on_close: js_sys::Function,
        test_id: Option<String>,
        config: JsValue,
    ) -> Result<WebModalDialog, JsValue> {
        let host = WebDialogHost::from_window()
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let config = ModalConfig::from_js(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let props = DialogProps {
            closed,
            children: content,
            on_close: js_close_callback(on_close),
            test_id,
        };
        let mut dialog = ModalDialog::with_config(host.clone(), config, props);
        let outer = host
            .commit(parent, &dialog.render())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if dialog.is_native() {
            dialog.bind_element(WebDialogElement::new(outer.clone()));
        }

        Ok(Self {
            host,
            dialog,
            outer,
        })
    }

    #[wasm_bindgen(js_name = "setClosed")]
    pub fn set_closed(&mut self, closed: bool) {
        let mut props = self.dialog.props().clone();
        props.closed = closed;
        self.rerender(props);
    }

    /// Replace the close callback; the cancel listener is re-registered.
    #[wasm_bindgen(js_name = "setOnClose")]
    pub fn set_on_close(&mut self, on_close: js_sys::Function) {
        let mut props = self.dialog.props().clone();
        props.on_close = js_close_callback(on_close);
        self.rerender(props);
    }

    #[wasm_bindgen(js_name = "isNative")]
    pub fn is_native(&self) -> bool {
        self.dialog.is_native()
    }

    #[wasm_bindgen(js_name = "isShown")]
    pub fn is_shown(&self) -> bool {
        self.dialog.is_shown()
    }

    /// The outermost element that was inserted into the page.
    #[wasm_bindgen(getter)]
    pub fn element(&self) -> Element {
        self.outer.clone()
    }

    /// Remove the overlay from the page and release its listener.
    pub fn destroy(self) {
        self.outer.remove();
    }
}

impl WebModalDialog {
    pub fn dialog(&self) -> &ModalDialog<WebDialogHost, Node> {
        &self.dialog
    }

    fn rerender(&mut self, props: DialogProps<Node>) {
        self.dialog.update(props);
        self.host.refresh(&self.outer, &self.dialog.render());
    }
}
