//! Browser tests for the web-sys dialog host.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use reader_segments::modal::web::{WebDialogElement, WebDialogHost};
use reader_segments::modal::{close_callback, is_modal_dialog_supported, DialogElement, DialogProps, ModalDialog};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, Event, Node};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn content() -> Node {
    let p = document().create_element("p").unwrap();
    p.set_text_content(Some("Share this annotation"));
    p.unchecked_into()
}

#[wasm_bindgen_test]
fn probe_detects_native_dialog() {
    let host = WebDialogHost::new(document());
    assert!(is_modal_dialog_supported(&host));
}

#[wasm_bindgen_test]
fn native_dialog_opens_closes_and_cancels() {
    let host = WebDialogHost::new(document());
    let root: Element = document().document_element().unwrap();
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    let on_close = close_callback(move || inner.set(inner.get() + 1));

    let mut dialog = ModalDialog::new(
        host.clone(),
        DialogProps::new(false, content(), on_close).with_test_id("web-dialog"),
    );
    let outer = host.commit(&root, &dialog.render()).unwrap();
    assert_eq!(outer.tag_name().to_lowercase(), "dialog");
    assert_eq!(outer.get_attribute("data-testid").as_deref(), Some("web-dialog"));

    dialog.bind_element(WebDialogElement::new(outer.clone()));
    assert!(outer.has_attribute("open"));

    outer.dispatch_event(&Event::new("cancel").unwrap()).unwrap();
    assert_eq!(count.get(), 1);

    let mut props = dialog.props().clone();
    props.closed = true;
    dialog.update(props);
    assert!(!outer.has_attribute("open"));

    drop(dialog);
    outer.dispatch_event(&Event::new("cancel").unwrap()).unwrap();
    assert_eq!(count.get(), 1);
    outer.remove();
}

#[wasm_bindgen_test]
fn element_without_show_modal_is_unsupported() {
    let div = WebDialogElement::new(document().create_element("div").unwrap());
    assert!(!div.supports_show_modal());
}
