/// One activation's view: the state machine, its page projection and the
/// listeners that drive it.

use crate::config::{Config, SidebarConfig};
use crate::config::selectors::*;
use crate::dom::expander;
use crate::dom::layout::{PageElements, PageLayout};
use crate::dom::listener::Listener;
use crate::dom::resize::{ResizeEvent, ResizeSink};
use crate::dom::store::ChromeStore;
use crate::navigation::EpochId;
use crate::storage::{load_view_settings, save_placement, save_sidebar_width};
use crate::view::{Layout, Transition, ViewMode, ViewStateManager, project};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlElement, Window};

pub type SharedView = Rc<RefCell<ActiveView>>;

pub struct ActiveView {
    epoch: EpochId,
    manager: ViewStateManager,
    layout: PageLayout,
    store: ChromeStore,
    sidebar: SidebarConfig,
    listeners: Vec<Listener>,
    live: bool,
}

/// Reuse the header button if an earlier activation left one behind.
fn toggle_button(document: &Document, comments: &HtmlElement) -> Option<HtmlElement> {
    if let Some(existing) = document.get_element_by_id(TOGGLE_BUTTON_ID) {
        return existing.dyn_into().ok();
    }
    let header = document.create_element("header").ok()?;
    let _ = header.class_list().add_1(HEADER_CLASS);
    let button: HtmlElement = document.create_element("button").ok()?.dyn_into().ok()?;
    button.set_id(TOGGLE_BUTTON_ID);
    let _ = button.class_list().add_1(TOGGLE_BUTTON_CLASS);
    header.append_with_node_1(&button).ok()?;
    comments.prepend_with_node_1(&header).ok()?;
    Some(button)
}

fn with_view(weak: &Weak<RefCell<ActiveView>>, f: impl FnOnce(&SharedView)) {
    if let Some(view) = weak.upgrade() {
        f(&view);
    }
}

/// Insert the header and bind listeners. The view starts without a mode
/// until `restore` has read the stored settings.
pub fn mount(window: Window, document: Document, config: Config, epoch: EpochId) -> Option<SharedView> {
    let elements = PageElements::locate(&document)?;
    let button = toggle_button(&document, &elements.comments)?;
    let _ = elements.comments.class_list().add_1(CONTROL_CLASS);
    let theater_active = elements.theater_active();

    let view = Rc::new_cyclic(|weak: &Weak<RefCell<ActiveView>>| {
        let resize_sink: ResizeSink = {
            let weak = weak.clone();
            Rc::new(move |event: ResizeEvent| with_view(&weak, |view| on_resize(view, event)))
        };

        let mut listeners = Vec::new();
        {
            let weak = weak.clone();
            listeners.push(Listener::new(&button, "click", move |_event: Event| {
                with_view(&weak, toggle)
            }));
        }
        if let Some(theater) = &elements.theater_toggle {
            let weak = weak.clone();
            listeners.push(Listener::new(theater, "click", move |_event: Event| {
                with_view(&weak, theater_clicked)
            }));
        }
        listeners.push(Listener::new(&elements.comments, "click", |event: Event| {
            expander::handle_click(&event)
        }));

        let layout = PageLayout::new(window, document, elements, button, config, resize_sink);
        RefCell::new(ActiveView {
            epoch,
            manager: ViewStateManager::new(config.sidebar, theater_active),
            layout,
            store: ChromeStore,
            sidebar: config.sidebar,
            listeners,
            live: true,
        })
    });
    Some(view)
}

/// Load the stored placement and width, then enter that mode.
pub fn restore(view: &SharedView) {
    let (store, sidebar) = {
        let active = view.borrow();
        (active.store, active.sidebar)
    };
    let weak = Rc::downgrade(view);
    spawn_local(async move {
        let settings = load_view_settings(&store, &sidebar).await;
        let Some(view) = weak.upgrade() else {
            return;
        };
        let Ok(mut active) = view.try_borrow_mut() else {
            return;
        };
        if !active.live {
            return;
        }
        let transition = active.manager.restore(settings);
        project(&active.layout, &transition);
        debug!(
            "{}: restored {} at {}px",
            active.epoch,
            transition.to.as_str(),
            transition.width_px
        );
    });
}

fn toggle(view: &SharedView) {
    let Ok(mut active) = view.try_borrow_mut() else {
        return;
    };
    if !active.live {
        return;
    }
    let Some(transition) = active.manager.toggle() else {
        return;
    };
    project(&active.layout, &transition);
    active.persist(&transition);
}

fn theater_clicked(view: &SharedView) {
    // Our own exit_theater click lands here while the view is borrowed.
    let Ok(mut active) = view.try_borrow_mut() else {
        return;
    };
    if !active.live {
        return;
    }
    if let Some(transition) = active.manager.theater_toggled() {
        project(&active.layout, &transition);
        active.persist(&transition);
    }
}

fn on_resize(view: &SharedView, event: ResizeEvent) {
    let Ok(mut active) = view.try_borrow_mut() else {
        return;
    };
    if !active.live {
        return;
    }
    match event {
        ResizeEvent::Drag(raw_width_px) => {
            if let Some(width_px) = active.manager.resize(raw_width_px) {
                active.layout.apply_width(width_px);
            }
        }
        ResizeEvent::Release => {
            if active.manager.mode() != Some(ViewMode::Sidebar) {
                return;
            }
            let width_px = active.manager.width_px();
            let store = active.store;
            spawn_local(async move {
                if let Err(e) = save_sidebar_width(&store, width_px).await {
                    warn!("sidebar width not saved: {}", e);
                }
            });
        }
    }
}

impl ActiveView {
    fn persist(&self, transition: &Transition) {
        let Some(placement) = transition.placement_to_persist() else {
            return;
        };
        let store = self.store;
        spawn_local(async move {
            if let Err(e) = save_placement(&store, placement).await {
                warn!("placement not saved: {}", e);
            }
        });
    }

    /// Detach listeners and remove what activation added. Later callbacks
    /// and pending store reads see `live == false` and do nothing.
    pub fn dismantle(&mut self) {
        self.live = false;
        self.listeners.clear();
        self.layout.teardown();
        debug!("{}: view dismantled", self.epoch);
    }
}
