/// The two detection tiers as browser handles

use crate::config::selectors::{COMMENTS_ID, HIDDEN_ATTRIBUTE};
use crate::host::Cancel;
use crate::readiness::{CommentsSnapshot, markup_len};
use gloo_timers::callback::Interval;
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit};

pub fn comments_snapshot(document: &Document) -> CommentsSnapshot {
    match document.get_element_by_id(COMMENTS_ID) {
        Some(comments) => CommentsSnapshot {
            present: true,
            hidden: comments.has_attribute(HIDDEN_ATTRIBUTE),
            content_len: markup_len(&comments.inner_html()),
        },
        None => CommentsSnapshot::missing(),
    }
}

/// Tier 1: a mutation observer filtered to one attribute.
pub struct AttributeWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl AttributeWatch {
    pub fn observe(target: &Element, attribute: &str, mut on_change: Box<dyn FnMut()>) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |_records: Array, _observer: MutationObserver| on_change(),
        );
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;

        let options = MutationObserverInit::new();
        options.set_attributes(true);
        options.set_attribute_filter(&Array::of1(&JsValue::from_str(attribute)));
        observer.observe_with_options(target, &options).ok()?;

        Some(AttributeWatch {
            observer,
            _callback: callback,
        })
    }
}

impl Cancel for AttributeWatch {
    fn cancel(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for AttributeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Tier 2: a repeating timer.
pub struct PollTimer(Option<Interval>);

impl PollTimer {
    pub fn start(interval_ms: u32, mut on_tick: Box<dyn FnMut()>) -> Self {
        PollTimer(Some(Interval::new(interval_ms, move || on_tick())))
    }
}

impl Cancel for PollTimer {
    fn cancel(&mut self) {
        // Dropping an Interval clears it.
        self.0.take();
    }
}
