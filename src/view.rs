/// Inline / sidebar state machine
///
/// The manager owns the current mode; the page is only ever a projection of
/// it. Every transition comes back as a `Transition` value which `project`
/// plays onto a `Layout`.

use crate::config::SidebarConfig;
use crate::storage::{Placement, ViewSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Inline,
    Sidebar,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Inline => ViewMode::Sidebar,
            ViewMode::Sidebar => ViewMode::Inline,
        }
    }

    pub fn placement(self) -> Placement {
        match self {
            ViewMode::Inline => Placement::Default,
            ViewMode::Sidebar => Placement::Sidebar,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Inline => "inline",
            ViewMode::Sidebar => "sidebar",
        }
    }
}

impl From<Placement> for ViewMode {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Default => ViewMode::Inline,
            Placement::Sidebar => ViewMode::Sidebar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub sidebar_width_px: u32,
    pub theater_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Restoring the persisted mode on activation.
    Restore,
    Toggle,
    /// Theater mode pushed the comments out of the sidebar.
    Theater,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<ViewMode>,
    pub to: ViewMode,
    pub trigger: Trigger,
    pub exit_theater: bool,
    pub width_px: u32,
}

impl Transition {
    /// Restores land without scroll-anchor work.
    pub fn preserves_scroll(&self) -> bool {
        self.from.is_some()
    }

    /// The placement to write back, if this transition changed it.
    pub fn placement_to_persist(&self) -> Option<Placement> {
        match self.trigger {
            Trigger::Restore => None,
            Trigger::Toggle | Trigger::Theater => Some(self.to.placement()),
        }
    }
}

/// View-state machine for one activation.
#[derive(Debug, Clone)]
pub struct ViewStateManager {
    sidebar: SidebarConfig,
    mode: Option<ViewMode>,
    width_px: u32,
    theater_active: bool,
}

impl ViewStateManager {
    pub fn new(sidebar: SidebarConfig, theater_active: bool) -> Self {
        ViewStateManager {
            width_px: sidebar.default_width_px,
            sidebar,
            mode: None,
            theater_active,
        }
    }

    /// `None` until the persisted settings have been restored.
    pub fn state(&self) -> Option<ViewState> {
        self.mode.map(|mode| ViewState {
            mode,
            sidebar_width_px: self.width_px,
            theater_active: self.theater_active,
        })
    }

    pub fn mode(&self) -> Option<ViewMode> {
        self.mode
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn restore(&mut self, settings: ViewSettings) -> Transition {
        self.width_px = self.sidebar.clamp(settings.width_px as f64);
        self.enter(settings.placement.into(), Trigger::Restore)
    }

    /// Flip the mode. Ignored until the initial restore has happened.
    pub fn toggle(&mut self) -> Option<Transition> {
        let current = self.mode?;
        Some(self.enter(current.toggled(), Trigger::Toggle))
    }

    /// The page's theater control was clicked.
    pub fn theater_toggled(&mut self) -> Option<Transition> {
        self.theater_active = !self.theater_active;
        if self.theater_active && self.mode == Some(ViewMode::Sidebar) {
            Some(self.enter(ViewMode::Inline, Trigger::Theater))
        } else {
            None
        }
    }

    /// Live width during a drag. Only meaningful in the sidebar.
    pub fn resize(&mut self, raw_width_px: f64) -> Option<u32> {
        if self.mode != Some(ViewMode::Sidebar) {
            return None;
        }
        self.width_px = self.sidebar.clamp(raw_width_px);
        Some(self.width_px)
    }

    fn enter(&mut self, to: ViewMode, trigger: Trigger) -> Transition {
        // The sidebar cannot sit next to a theater-sized player.
        let exit_theater = to == ViewMode::Sidebar && self.theater_active;
        if exit_theater {
            self.theater_active = false;
        }
        let from = match trigger {
            Trigger::Restore => None,
            _ => self.mode,
        };
        self.mode = Some(to);
        Transition {
            from,
            to,
            trigger,
            exit_theater,
            width_px: self.width_px,
        }
    }
}

/// The player's size control advertises the mode it would switch to, so a
/// title naming the default view means theater is on.
pub fn is_theater_title(title: &str) -> bool {
    title.contains("Default")
}

/// What a transition needs from the page.
pub trait Layout {
    type Anchor;

    fn capture_anchor(&self, mode: ViewMode) -> Option<Self::Anchor>;

    /// Runs after the new layout has settled.
    fn restore_anchor(&self, anchor: Option<Self::Anchor>, mode: ViewMode);

    fn exit_theater(&self);

    fn dock_sidebar(&self, width_px: u32);

    fn dock_inline(&self);

    fn apply_width(&self, width_px: u32);

    fn render_mode(&self, mode: ViewMode);

    fn expand_comments(&self);
}

/// Play a transition onto the page.
pub fn project<L: Layout>(layout: &L, transition: &Transition) {
    let anchor = transition.from.and_then(|from| layout.capture_anchor(from));

    if transition.exit_theater {
        layout.exit_theater();
    }
    match transition.to {
        ViewMode::Sidebar => layout.dock_sidebar(transition.width_px),
        ViewMode::Inline => layout.dock_inline(),
    }
    layout.render_mode(transition.to);
    layout.expand_comments();

    if transition.preserves_scroll() {
        layout.restore_anchor(anchor, transition.to);
    }
}
