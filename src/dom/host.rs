/// `Host` for a real YouTube page

use crate::announcement::{self, Announcement, CATALOG};
use crate::config::Config;
use crate::config::selectors::*;
use crate::dom::detect::{self, AttributeWatch, PollTimer};
use crate::dom::store::ChromeStore;
use crate::dom::view::{self, SharedView};
use crate::dom::{current_url, query};
use crate::host::Host;
use crate::navigation::{EpochId, is_watch_page};
use crate::readiness::CommentsSnapshot;
use crate::ui::banner::{AnnouncementBanner, AnnouncementBannerProps};
use gloo_timers::callback::Timeout;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use yew::{AppHandle, Callback, Renderer};
use web_sys::{Document, Element, Window};

struct Banner {
    root: Element,
    app: AppHandle<AnnouncementBanner>,
}

impl Banner {
    fn remove(self) {
        self.app.destroy();
        self.root.remove();
    }
}

type BannerSlot = Rc<RefCell<Option<Banner>>>;

pub struct DomHost {
    window: Window,
    document: Document,
    config: Config,
    store: ChromeStore,
    banner: BannerSlot,
}

impl DomHost {
    pub fn new(window: Window, document: Document, config: Config) -> Self {
        DomHost {
            window,
            document,
            config,
            store: ChromeStore,
            banner: Rc::new(RefCell::new(None)),
        }
    }

    fn check_announcement(&self) {
        let store = self.store;
        let document = self.document.clone();
        let exit_ms = self.config.announcement.exit_animation_ms;
        let slot = self.banner.clone();
        spawn_local(async move {
            let displayed = slot.borrow().is_some();
            let Some(announcement) = announcement::pending_announcement(&store, CATALOG, displayed).await else {
                return;
            };
            // The reader may have moved on while the store answered.
            if !is_watch_page(&current_url()) || slot.borrow().is_some() {
                return;
            }
            show_banner(&slot, &document, store, announcement, exit_ms);
        });
    }

    fn remove_banner(&self) {
        let banner = self.banner.borrow_mut().take();
        if let Some(banner) = banner {
            banner.remove();
        }
    }
}

fn show_banner(slot: &BannerSlot, document: &Document, store: ChromeStore, announcement: Announcement, exit_ms: u32) {
    let Some(panel) = query(document, SIDE_PANEL_INNER) else {
        return;
    };
    let Ok(root) = document.create_element("div") else {
        return;
    };
    root.set_id(ANNOUNCEMENT_ID);
    if panel.prepend_with_node_1(&root).is_err() {
        return;
    }

    let Announcement { version, items } = announcement;
    let on_dismiss = {
        let slot = Rc::downgrade(slot);
        let root = root.clone();
        Callback::from(move |()| {
            let version = version.clone();
            spawn_local(async move {
                if let Err(e) = announcement::dismiss(&store, &version).await {
                    warn!("announcement {} not marked seen: {}", version, e);
                }
            });
            let slot = slot.clone();
            let root = root.clone();
            Timeout::new(exit_ms, move || remove_if_current(&slot, &root)).forget();
        })
    };

    let props = AnnouncementBannerProps { items, on_dismiss };
    let app = Renderer::<AnnouncementBanner>::with_root_and_props(root.clone(), props).render();
    *slot.borrow_mut() = Some(Banner { root, app });
    debug!("announcement banner shown");
}

/// Remove the banner mounted at `root`, unless it has already been replaced.
fn remove_if_current(slot: &Weak<RefCell<Option<Banner>>>, root: &Element) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let banner = {
        let mut current = slot.borrow_mut();
        match current.as_ref() {
            Some(banner) if banner.root == *root => current.take(),
            _ => None,
        }
    };
    if let Some(banner) = banner {
        banner.remove();
    }
}

impl Host for DomHost {
    type Watch = AttributeWatch;
    type Poll = PollTimer;
    type Augmentation = SharedView;

    fn comments(&self) -> CommentsSnapshot {
        detect::comments_snapshot(&self.document)
    }

    fn watch_hidden(&self, on_change: Box<dyn FnMut()>) -> Option<AttributeWatch> {
        let comments = self.document.get_element_by_id(COMMENTS_ID)?;
        AttributeWatch::observe(&comments, HIDDEN_ATTRIBUTE, on_change)
    }

    fn start_poll(&self, interval_ms: u32, on_tick: Box<dyn FnMut()>) -> PollTimer {
        PollTimer::start(interval_ms, on_tick)
    }

    fn activate(&self, epoch: EpochId) -> Option<SharedView> {
        let Some(active) = view::mount(self.window.clone(), self.document.clone(), self.config, epoch) else {
            warn!("{}: comments ready but page layout incomplete", epoch);
            return None;
        };
        view::restore(&active);
        self.check_announcement();
        Some(active)
    }

    fn clear(&self, augmentation: SharedView) {
        match augmentation.try_borrow_mut() {
            Ok(mut active) => active.dismantle(),
            Err(_) => warn!("view busy during teardown; left in place"),
        };
    }

    fn leave_target_page(&self) {
        self.remove_banner();
    }
}
