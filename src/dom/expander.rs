/// Read-more controls on rendered comments

use crate::config::ExpanderConfig;
use crate::config::selectors::*;
use crate::dom::{query_within, set_hidden};
use crate::expander::{ExpanderClick, ExpanderControls, controls_for, line_count, parse_line_height};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, Window};

fn apply(container: &Element, controls: ExpanderControls) {
    if let Some(more) = query_within(container, READ_MORE) {
        set_hidden(&more, !controls.more_visible);
    }
    if let Some(less) = query_within(container, SHOW_LESS) {
        set_hidden(&less, !controls.less_visible);
    }
    let _ = if controls.collapsed {
        container.set_attribute(COLLAPSED_ATTRIBUTE, "")
    } else {
        container.remove_attribute(COLLAPSED_ATTRIBUTE)
    };
}

fn line_height(window: &Window, first: Option<&Element>, config: &ExpanderConfig) -> f64 {
    first
        .and_then(|container| query_within(container, COMMENT_TEXT))
        .and_then(|text| window.get_computed_style(&text).ok().flatten())
        .and_then(|style| style.get_property_value("line-height").ok())
        .map(|value| parse_line_height(&value, config))
        .unwrap_or(config.fallback_line_height_px)
}

fn text_height(container: &Element) -> f64 {
    query_within(container, COMMENT_TEXT)
        .and_then(|text| text.dyn_into::<HtmlElement>().ok())
        .map(|text| text.offset_height() as f64)
        .unwrap_or(0.0)
}

/// Show "read more" on every rendered comment taller than the line budget.
pub fn expand(window: &Window, comments: &Element, config: &ExpanderConfig) {
    let Ok(found) = comments.query_selector_all(COMMENT_EXPANDER) else {
        return;
    };
    let containers: Vec<Element> = (0..found.length())
        .filter_map(|i| found.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect();

    let line_height = line_height(window, containers.first(), config);
    for container in &containers {
        let lines = line_count(text_height(container), line_height);
        apply(container, controls_for(lines, config));
    }
}

/// Delegated click handler for the comments region.
pub fn handle_click(event: &Event) {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    let class_list = target.class_list();
    let classes: Vec<String> = (0..class_list.length())
        .filter_map(|i| class_list.item(i))
        .collect();
    let Some(click) = ExpanderClick::from_classes(classes.iter().map(String::as_str)) else {
        return;
    };
    if let Some(container) = target.closest(COMMENT_EXPANDER).ok().flatten() {
        apply(&container, click.controls());
    }
}
