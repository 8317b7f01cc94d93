/// Projection of the view state onto the host page

use crate::anchor::{self, ScrollAnchor, Viewport};
use crate::config::Config;
use crate::config::selectors::*;
use crate::dom::resize::{ResizeHandle, ResizeSink};
use crate::dom::{self, expander, viewport_size};
use crate::view::{Layout, ViewMode, is_theater_title};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, Node, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

/// Host-page nodes a view needs. Only the comments region and its two homes
/// are required; the rest are skipped when missing.
#[derive(Clone)]
pub struct PageElements {
    pub comments: HtmlElement,
    pub inline_slot: Element,
    pub side_panel_inner: Element,
    pub side_panel: Option<HtmlElement>,
    pub primary: Option<Element>,
    pub player: Option<HtmlElement>,
    pub theater_toggle: Option<HtmlElement>,
    pub dark: bool,
}

impl PageElements {
    pub fn locate(document: &Document) -> Option<Self> {
        let comments = document.get_element_by_id(COMMENTS_ID)?.dyn_into().ok()?;
        Some(PageElements {
            comments,
            inline_slot: dom::query(document, INLINE_SLOT)?,
            side_panel_inner: dom::query(document, SIDE_PANEL_INNER)?,
            side_panel: dom::query_html(document, SIDE_PANEL),
            primary: dom::query(document, PRIMARY),
            player: dom::query_html(document, PLAYER),
            theater_toggle: dom::query_html(document, THEATER_TOGGLE),
            dark: dom::query(document, PAGE).is_some_and(|page| page.has_attribute(DARK_ATTRIBUTE)),
        })
    }

    pub fn theater_active(&self) -> bool {
        self.theater_toggle
            .as_ref()
            .and_then(|toggle| toggle.get_attribute(THEATER_TITLE_ATTRIBUTE))
            .is_some_and(|title| is_theater_title(&title))
    }
}

pub struct PageLayout {
    window: Window,
    document: Document,
    elements: PageElements,
    toggle_button: HtmlElement,
    config: Config,
    resize_handle: RefCell<Option<ResizeHandle>>,
    on_resize: ResizeSink,
}

impl PageLayout {
    pub fn new(
        window: Window,
        document: Document,
        elements: PageElements,
        toggle_button: HtmlElement,
        config: Config,
        on_resize: ResizeSink,
    ) -> Self {
        PageLayout {
            window,
            document,
            elements,
            toggle_button,
            config,
            resize_handle: RefCell::new(None),
            on_resize,
        }
    }

    fn install_resize_handle(&self) {
        let Some(panel) = &self.elements.side_panel else {
            return;
        };
        let mut slot = self.resize_handle.borrow_mut();
        if slot.is_none() {
            *slot = ResizeHandle::install(&self.document, panel, self.on_resize.clone());
        }
    }

    fn remove_resize_handle(&self) {
        self.resize_handle.borrow_mut().take();
    }

    fn reset_width(&self) {
        if let Some(panel) = &self.elements.side_panel {
            let style = panel.style();
            for property in ["width", "min-width", "max-width"] {
                let _ = style.remove_property(property);
            }
        }
        if let Some(primary) = &self.elements.primary {
            let _ = primary.class_list().remove_1(CUSTOM_WIDTH_CLASS);
        }
    }

    fn match_player_height(&self) {
        let Some(player) = self.elements.player.clone() else {
            return;
        };
        let comments = self.elements.comments.clone();
        // The player settles its size after the panel reflows.
        Timeout::new(0, move || {
            let height = player.offset_height();
            if height > 0 {
                let _ = comments.style().set_property("height", &format!("{}px", height));
            }
        })
        .forget();
    }

    /// Undo everything activation and the sidebar added, leaving the comments
    /// wherever they currently are.
    pub fn teardown(&self) {
        self.remove_resize_handle();
        self.reset_width();
        let comments = &self.elements.comments;
        let _ = comments.style().remove_property("height");
        let _ = comments.remove_attribute(MODE_ATTRIBUTE);
        let classes = comments.class_list();
        let _ = classes.remove_4(SIDEBAR_CLASS, DARK_CLASS, LIGHT_CLASS, CONTROL_CLASS);
        if let Some(header) = self.toggle_button.parent_element() {
            header.remove();
        }
    }
}

fn viewport_for(window: &Window, comments: &HtmlElement, mode: ViewMode) -> Option<Viewport> {
    let (width, height) = viewport_size(window)?;
    match mode {
        ViewMode::Inline => Some(Viewport {
            top: 0.0,
            height,
            center_x: width / 2.0,
        }),
        ViewMode::Sidebar => {
            let rect = comments.get_bounding_client_rect();
            let top = rect.top().max(0.0);
            Some(Viewport {
                top,
                height: rect.bottom().min(height) - top,
                center_x: rect.left() + rect.width() / 2.0,
            })
        }
    }
}

fn smooth_scroll_into_view(element: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

fn restore_scroll(
    window: &Window,
    document: &Document,
    comments: &HtmlElement,
    anchor: Option<ScrollAnchor<Element>>,
    mode: ViewMode,
) {
    let Some(anchor) = anchor.filter(|a| a.element.is_connected()) else {
        // Nothing to hold on to; land somewhere sensible instead.
        match mode {
            ViewMode::Inline => smooth_scroll_into_view(comments),
            ViewMode::Sidebar => {
                comments.set_scroll_top(0);
                if let Some(page) = document.document_element() {
                    smooth_scroll_into_view(&page);
                }
            }
        }
        return;
    };
    if mode == ViewMode::Sidebar {
        // The region now sits at the top of the page; measure it there.
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
    let Some(viewport) = viewport_for(window, comments, mode) else {
        return;
    };

    let delta = anchor.correction(anchor.element.get_bounding_client_rect().top(), viewport.top);
    if delta.abs() < 0.5 {
        return;
    }
    match mode {
        ViewMode::Inline => window.scroll_by_with_x_and_y(0.0, delta),
        ViewMode::Sidebar => comments.set_scroll_top(comments.scroll_top() + delta.round() as i32),
    }
}

fn toggle_icon(mode: ViewMode, dark: bool) -> String {
    // Arrow points to where the comments will go next.
    let path = match mode {
        ViewMode::Inline => "M12.75 15l3-3m0 0l-3-3m3 3h-7.5M21 12a9 9 0 11-18 0 9 9 0 0118 0z",
        ViewMode::Sidebar => "M11.25 9l-3 3m0 0l3 3m-3-3h7.5M21 12a9 9 0 11-18 0 9 9 0 0118 0z",
    };
    let stroke = if dark { "stroke-light" } else { "stroke-dark" };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor" class="comments-icon {stroke}"><path stroke-linecap="round" stroke-linejoin="round" d="{path}" /></svg>"#
    )
}

impl Layout for PageLayout {
    type Anchor = ScrollAnchor<Element>;

    fn capture_anchor(&self, mode: ViewMode) -> Option<ScrollAnchor<Element>> {
        let comments = &self.elements.comments;
        let viewport = viewport_for(&self.window, comments, mode)?;
        anchor::sample(&viewport, self.config.anchor.probe_count, |x, y| {
            let hit = self.document.element_from_point(x as f32, y as f32)?;
            let thread = hit.closest(COMMENT_THREAD).ok().flatten()?;
            let node: &Node = &thread;
            if !comments.contains(Some(node)) {
                return None;
            }
            let top = thread.get_bounding_client_rect().top();
            Some((thread, top))
        })
    }

    fn restore_anchor(&self, anchor: Option<ScrollAnchor<Element>>, mode: ViewMode) {
        let window = self.window.clone();
        let document = self.document.clone();
        let comments = self.elements.comments.clone();
        let settle = Closure::once_into_js(move || {
            restore_scroll(&window, &document, &comments, anchor, mode);
        });
        let _ = self.window.request_animation_frame(settle.unchecked_ref());
    }

    fn exit_theater(&self) {
        if let Some(toggle) = &self.elements.theater_toggle {
            toggle.click();
        }
    }

    fn dock_sidebar(&self, width_px: u32) {
        let comments = &self.elements.comments;
        let theme = if self.elements.dark { DARK_CLASS } else { LIGHT_CLASS };
        let _ = comments.class_list().add_2(SIDEBAR_CLASS, theme);
        let _ = self.elements.side_panel_inner.prepend_with_node_1(comments);

        self.apply_width(width_px);
        self.install_resize_handle();
        self.match_player_height();
    }

    fn dock_inline(&self) {
        self.remove_resize_handle();
        self.reset_width();

        let comments = &self.elements.comments;
        let _ = comments.class_list().remove_3(SIDEBAR_CLASS, DARK_CLASS, LIGHT_CLASS);
        let _ = comments.style().remove_property("height");
        let _ = self.elements.inline_slot.append_with_node_1(comments);
    }

    fn apply_width(&self, width_px: u32) {
        let Some(panel) = &self.elements.side_panel else {
            return;
        };
        let style = panel.style();
        let width = format!("{}px", width_px);
        for property in ["width", "min-width", "max-width"] {
            let _ = style.set_property(property, &width);
        }
        if let Some(primary) = &self.elements.primary {
            let _ = primary.class_list().add_1(CUSTOM_WIDTH_CLASS);
        }
    }

    fn render_mode(&self, mode: ViewMode) {
        self.toggle_button
            .set_inner_html(&toggle_icon(mode, self.elements.dark));
        let label = match mode {
            ViewMode::Inline => "Move comments to the sidebar",
            ViewMode::Sidebar => "Move comments below the video",
        };
        let _ = self.toggle_button.set_attribute("aria-label", label);
        let _ = self.toggle_button.set_attribute("title", label);
        let _ = self.elements.comments.set_attribute(MODE_ATTRIBUTE, mode.as_str());
    }

    fn expand_comments(&self) {
        expander::expand(&self.window, &self.elements.comments, &self.config.expander);
    }
}
