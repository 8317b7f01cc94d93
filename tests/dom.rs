#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use sidesy::config::selectors::*;
use sidesy::config::{Config, DetectionConfig, ExpanderConfig};
use sidesy::dom::detect::comments_snapshot;
use sidesy::dom::expander;
use sidesy::dom::host::DomHost;
use sidesy::dom::listener::Listener;
use sidesy::dom::resize::{ResizeEvent, ResizeHandle};
use sidesy::navigation::{Navigator, SharedNavigator, navigate};
use sidesy::readiness::ReadinessDetector;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent, MouseEventInit};

const WATCH: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const HOME: &str = "https://www.youtube.com/";

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Mount `html` in a fresh container; the caller removes it when done.
fn fixture(html: &str) -> Element {
    let document = document();
    let container = document.create_element("div").unwrap();
    container.set_inner_html(html);
    document.body().unwrap().append_child(&container).unwrap();
    container
}

fn html_element(parent: &Element, selector: &str) -> HtmlElement {
    parent
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap()
}

fn comment(text_height_px: u32) -> String {
    format!(
        r#"<div id="expander" class="style-scope ytd-comment-view-model" collapsed>
             <div id="content">
               <span id="content-text" style="display:block;line-height:20px;height:{}px"></span>
             </div>
             <button id="more" class="more-button"></button>
             <button id="less" class="less-button"></button>
           </div>"#,
        text_height_px
    )
}

#[wasm_bindgen_test]
fn test_snapshot_without_comments() {
    assert!(document().get_element_by_id(COMMENTS_ID).is_none());

    let snapshot = comments_snapshot(&document());

    assert!(!snapshot.present);
    assert_eq!(snapshot.content_len, 0);
}

#[wasm_bindgen_test]
fn test_snapshot_reads_hidden_and_length() {
    let container = fixture(r#"<div id="comments" hidden><p>loading</p></div>"#);

    let snapshot = comments_snapshot(&document());
    assert!(snapshot.present);
    assert!(snapshot.hidden);
    assert_eq!(snapshot.content_len, "<p>loading</p>".len());

    container.remove();
}

#[wasm_bindgen_test]
fn test_snapshot_counts_characters_not_bytes() {
    let container = fixture(&format!(r#"<div id="comments">{}</div>"#, "é".repeat(50)));
    let detector = ReadinessDetector::new(&DetectionConfig::default());

    let snapshot = comments_snapshot(&document());
    assert_eq!(snapshot.content_len, 50);
    assert!(!detector.is_ready(&snapshot));

    container.remove();
}

#[wasm_bindgen_test]
fn test_expand_shows_read_more_on_long_comments() {
    let container = fixture(&format!(r#"<div id="comments">{}{}</div>"#, comment(120), comment(40)));
    let comments = container.query_selector("#comments").unwrap().unwrap();
    let window = web_sys::window().unwrap();

    expander::expand(&window, &comments, &ExpanderConfig::default());

    let blocks = comments.query_selector_all(COMMENT_EXPANDER).unwrap();
    let long: Element = blocks.item(0).unwrap().dyn_into().unwrap();
    let short: Element = blocks.item(1).unwrap().dyn_into().unwrap();

    assert!(!html_element(&long, READ_MORE).has_attribute("hidden"));
    assert!(html_element(&long, SHOW_LESS).has_attribute("hidden"));
    assert!(html_element(&short, READ_MORE).has_attribute("hidden"));
    assert!(html_element(&short, SHOW_LESS).has_attribute("hidden"));

    container.remove();
}

#[wasm_bindgen_test]
fn test_read_more_and_show_less_clicks() {
    let container = fixture(&format!(r#"<div id="comments">{}</div>"#, comment(120)));
    let comments = container.query_selector("#comments").unwrap().unwrap();
    let _listener = Listener::new(&comments, "click", |event: Event| expander::handle_click(&event));
    let block = comments.query_selector(COMMENT_EXPANDER).unwrap().unwrap();
    let more = html_element(&block, READ_MORE);
    let less = html_element(&block, SHOW_LESS);

    more.click();
    assert!(more.has_attribute("hidden"));
    assert!(!less.has_attribute("hidden"));
    assert!(!block.has_attribute(COLLAPSED_ATTRIBUTE));

    less.click();
    assert!(!more.has_attribute("hidden"));
    assert!(less.has_attribute("hidden"));
    assert!(block.has_attribute(COLLAPSED_ATTRIBUTE));

    container.remove();
}

#[wasm_bindgen_test]
fn test_resize_drag_reports_pointer_width() {
    let container = fixture(r#"<div id="panel" style="width:400px;height:200px"></div>"#);
    let panel = html_element(&container, "#panel");
    let events: Rc<RefCell<Vec<ResizeEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let events = events.clone();
        Rc::new(move |event: ResizeEvent| events.borrow_mut().push(event))
    };
    let document = document();
    let body = document.body().unwrap();

    let handle = ResizeHandle::install(&document, &panel, sink).unwrap();
    let grip = html_element(&panel, &format!(".{}", RESIZE_HANDLE_CLASS));

    grip.dispatch_event(&Event::new("mousedown").unwrap()).unwrap();
    assert!(handle.is_dragging());
    assert!(body.class_list().contains(RESIZING_BODY_CLASS));
    assert!(grip.class_list().contains(DRAGGING_CLASS));

    let init = MouseEventInit::new();
    init.set_client_x(100);
    let pointer = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap();
    document.dispatch_event(&pointer).unwrap();
    document.dispatch_event(&Event::new("mouseup").unwrap()).unwrap();

    let right = panel.get_bounding_client_rect().right();
    assert_eq!(
        *events.borrow(),
        vec![ResizeEvent::Drag(right - 100.0), ResizeEvent::Release]
    );
    assert!(!handle.is_dragging());
    assert!(!body.class_list().contains(RESIZING_BODY_CLASS));

    drop(handle);
    assert!(panel.query_selector(&format!(".{}", RESIZE_HANDLE_CLASS)).unwrap().is_none());

    container.remove();
}

/// A watch page with 30 tall comment threads rendered inline.
fn watch_page() -> Element {
    let threads: String = (0..30)
        .map(|i| format!("<ytd-comment-thread-renderer>comment number {}</ytd-comment-thread-renderer>", i))
        .collect();
    fixture(&format!(
        r#"<style>
             ytd-comment-thread-renderer {{ display: block; height: 100px; }}
             #comments.popout {{ display: block; height: 300px; overflow-y: auto; }}
           </style>
           <div id="primary"><div id="below"><div id="comments">{}</div></div></div>
           <div id="secondary" style="width: 400px"><div id="secondary-inner"></div></div>"#,
        threads
    ))
}

fn navigator() -> SharedNavigator<DomHost> {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let config = Config::default();
    Navigator::new(DomHost::new(window, document, config), config.detection).into_shared()
}

fn count(selector: &str) -> u32 {
    document().query_selector_all(selector).unwrap().length()
}

fn comments() -> HtmlElement {
    document().get_element_by_id(COMMENTS_ID).unwrap().dyn_into().unwrap()
}

fn parent_id(element: &Element) -> String {
    element.parent_element().unwrap().id()
}

/// Enough for the store read, the layout switch and the next animation frame.
async fn settle() {
    TimeoutFuture::new(100).await;
}

#[wasm_bindgen_test]
async fn test_toggle_twice_then_teardown() {
    let container = watch_page();
    let nav = navigator();
    let handle_selector = format!(".{}", RESIZE_HANDLE_CLASS);
    let header_selector = format!(".{}", HEADER_CLASS);

    navigate(&nav, WATCH);
    settle().await;

    // No stored placement: the sidebar is the default.
    let comments = comments();
    assert_eq!(parent_id(&comments), "secondary-inner");
    assert_eq!(count(&header_selector), 1);
    assert_eq!(count(&handle_selector), 1);
    assert!(comments.class_list().contains(SIDEBAR_CLASS));

    let button = html_element(&comments, &format!("#{}", TOGGLE_BUTTON_ID));
    button.click();
    settle().await;
    assert_eq!(parent_id(&comments), "below");
    assert_eq!(count(&handle_selector), 0);
    assert!(!comments.class_list().contains(SIDEBAR_CLASS));

    button.click();
    settle().await;
    assert_eq!(parent_id(&comments), "secondary-inner");
    assert_eq!(count(&header_selector), 1);
    assert_eq!(count(&handle_selector), 1);

    navigate(&nav, HOME);
    assert_eq!(count(&header_selector), 0);
    assert_eq!(count(&handle_selector), 0);
    for class in [SIDEBAR_CLASS, DARK_CLASS, LIGHT_CLASS, CONTROL_CLASS] {
        assert!(!comments.class_list().contains(class), "{} left behind", class);
    }
    assert!(!comments.has_attribute(MODE_ATTRIBUTE));

    // The detached button no longer drives anything.
    button.click();
    settle().await;
    assert_eq!(parent_id(&comments), "secondary-inner");
    assert!(!comments.class_list().contains(SIDEBAR_CLASS));

    container.remove();
}

#[wasm_bindgen_test]
async fn test_new_epoch_injects_one_header() {
    let container = watch_page();
    let nav = navigator();
    let header_selector = format!(".{}", HEADER_CLASS);

    navigate(&nav, WATCH);
    settle().await;
    navigate(&nav, "https://www.youtube.com/watch?v=9bZkp7q19f0");
    settle().await;

    assert_eq!(count(&header_selector), 1);
    assert_eq!(count(&format!("#{}", TOGGLE_BUTTON_ID)), 1);

    navigate(&nav, HOME);
    container.remove();
}

#[wasm_bindgen_test]
async fn test_inline_to_sidebar_keeps_reading_position() {
    let container = watch_page();
    let nav = navigator();
    let window = web_sys::window().unwrap();
    let document = document();

    navigate(&nav, WATCH);
    settle().await;
    let comments = comments();
    let button = html_element(&comments, &format!("#{}", TOGGLE_BUTTON_ID));
    button.click();
    settle().await;
    assert_eq!(parent_id(&comments), "below");

    // Scroll deep into the inline list and find the thread under the first sample point.
    window.scroll_to_with_x_and_y(0.0, 1050.0);
    let width = window.inner_width().unwrap().as_f64().unwrap();
    let height = window.inner_height().unwrap().as_f64().unwrap();
    let thread = document
        .element_from_point((width / 2.0) as f32, (height / 12.0) as f32)
        .unwrap()
        .closest(COMMENT_THREAD)
        .unwrap()
        .unwrap();
    let offset = thread.get_bounding_client_rect().top();

    button.click();
    settle().await;

    assert_eq!(parent_id(&comments), "secondary-inner");
    assert_eq!(window.scroll_y().unwrap(), 0.0);
    let region_top = comments.get_bounding_client_rect().top().max(0.0);
    let drift = thread.get_bounding_client_rect().top() - region_top - offset;
    assert!(drift.abs() < 1.0, "anchor drifted by {}px", drift);
    assert!(comments.scroll_top() > 0);

    navigate(&nav, HOME);
    container.remove();
}

#[wasm_bindgen_test]
async fn test_dragging_the_handle_resizes_the_panel() {
    let container = watch_page();
    let nav = navigator();
    let document = document();

    navigate(&nav, WATCH);
    settle().await;
    let panel = html_element(&container, "#secondary");
    let grip = html_element(&panel, &format!(".{}", RESIZE_HANDLE_CLASS));
    assert_eq!(panel.style().get_property_value("width").unwrap(), "426px");

    grip.dispatch_event(&Event::new("mousedown").unwrap()).unwrap();
    let init = MouseEventInit::new();
    init.set_client_x(-2000);
    let pointer = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap();
    document.dispatch_event(&pointer).unwrap();
    document.dispatch_event(&Event::new("mouseup").unwrap()).unwrap();

    // Clamped to the widest allowed sidebar.
    assert_eq!(panel.style().get_property_value("width").unwrap(), "700px");
    assert_eq!(panel.style().get_property_value("max-width").unwrap(), "700px");

    navigate(&nav, HOME);
    assert_eq!(panel.style().get_property_value("width").unwrap(), "");
    container.remove();
}
