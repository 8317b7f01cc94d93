/// Sidesy - YouTube comments in the sidebar
/// Built with Rust + WASM + Yew

pub mod activation;
pub mod anchor;
pub mod announcement;
pub mod config;
pub mod dom;
pub mod error;
pub mod expander;
pub mod host;
pub mod messages;
pub mod navigation;
pub mod readiness;
pub mod storage;
pub mod ui;
pub mod view;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Entry point called by the content-script loader
#[wasm_bindgen]
pub fn start_content_script() {
    dom::runtime::install(config::Config::default());
}
