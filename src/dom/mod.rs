/// Browser side of the content script
///
/// Everything that touches `web_sys` lives under here. The state machines in
/// the crate root only see it through the `Host` and `Layout` traits.

pub mod detect;
pub mod expander;
pub mod host;
pub mod layout;
pub mod listener;
pub mod resize;
pub mod runtime;
pub mod store;
pub mod view;

use crate::config::selectors::HIDDEN_ATTRIBUTE;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn current_url() -> String {
    window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
    query(document, selector)?.dyn_into().ok()
}

pub fn query_within(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok().flatten()
}

pub fn set_hidden(element: &Element, hidden: bool) {
    let _ = if hidden {
        element.set_attribute(HIDDEN_ATTRIBUTE, "")
    } else {
        element.remove_attribute(HIDDEN_ATTRIBUTE)
    };
}

pub fn viewport_size(window: &Window) -> Option<(f64, f64)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Describe a thrown JS value for logs.
pub fn describe(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
