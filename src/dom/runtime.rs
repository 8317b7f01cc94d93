/// Content-script wiring: page events and runtime messages into the navigator

use crate::config::Config;
use crate::config::selectors::{NAVIGATE_FINISH_EVENT, TOGGLE_BUTTON_ID};
use crate::dom::host::DomHost;
use crate::dom::{self, current_url};
use crate::messages::InboundMessage;
use crate::navigation::{self, Navigator, SharedNavigator};
use js_sys::Function;
use log::{debug, warn};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_message_listener(callback: &Function) -> Result<(), JsValue>;
}

fn on_document_event(document: &Document, event: &str, mut handler: impl FnMut() + 'static) {
    let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler());
    let _ = document.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
    // Lives as long as the page.
    callback.forget();
}

fn click_toggle(document: &Document) {
    let Some(button) = document
        .get_element_by_id(TOGGLE_BUTTON_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        debug!("toggle requested before the sidebar control exists");
        return;
    };
    button.click();
}

fn listen_for_messages(document: Document, shared: SharedNavigator<DomHost>) {
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
        let parsed = serde_wasm_bindgen::from_value::<Value>(message)
            .ok()
            .and_then(InboundMessage::parse);
        match parsed {
            Some(InboundMessage::ToggleSidebar) => click_toggle(&document),
            Some(InboundMessage::Activate) => navigation::kick(&shared, &current_url()),
            None => {}
        }
    });
    if let Err(e) = add_message_listener(callback.as_ref().unchecked_ref()) {
        warn!("runtime messages unavailable: {}", dom::describe(&e));
    }
    callback.forget();
}

/// Hook the navigator up to the page. Runs once per content-script load.
pub fn install(config: Config) {
    let Some(window) = dom::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let host = DomHost::new(window, document.clone(), config);
    let shared = Navigator::new(host, config.detection).into_shared();

    {
        let shared = shared.clone();
        on_document_event(&document, NAVIGATE_FINISH_EVENT, move || {
            navigation::navigate(&shared, &current_url())
        });
    }

    if document.ready_state() == "loading" {
        let shared = shared.clone();
        on_document_event(&document, "DOMContentLoaded", move || {
            navigation::navigate(&shared, &current_url())
        });
    } else {
        navigation::navigate(&shared, &current_url());
    }

    listen_for_messages(document, shared);
    debug!("content script installed");
}
