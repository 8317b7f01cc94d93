/// Tuning values and host-page selectors for the content script

/// Host-page selectors, attribute names and ids this script depends on.
///
/// These track the video site's markup. A redesign that renames any of them
/// breaks detection until they are updated here.
pub mod selectors {
    pub const COMMENTS_ID: &str = "comments";
    pub const HIDDEN_ATTRIBUTE: &str = "hidden";
    pub const NAVIGATE_FINISH_EVENT: &str = "yt-navigate-finish";
    pub const WATCH_PAGE_PATTERN: &str = "youtube.com/watch";

    pub const PAGE: &str = "html";
    pub const DARK_ATTRIBUTE: &str = "dark";
    pub const PLAYER: &str = ".video-stream.html5-main-video";
    pub const PRIMARY: &str = "#primary";
    pub const SIDE_PANEL: &str = "#secondary";
    pub const SIDE_PANEL_INNER: &str = "#secondary-inner";
    pub const INLINE_SLOT: &str = "#below";
    pub const THEATER_TOGGLE: &str = ".ytp-size-button";
    pub const THEATER_TITLE_ATTRIBUTE: &str = "data-title-no-tooltip";

    pub const COMMENT_THREAD: &str = "ytd-comment-thread-renderer";
    pub const COMMENT_EXPANDER: &str = "#expander.style-scope.ytd-comment-view-model";
    pub const COMMENT_TEXT: &str = "#content-text";
    pub const READ_MORE: &str = "#more";
    pub const SHOW_LESS: &str = "#less";
    pub const READ_MORE_CLASS: &str = "more-button";
    pub const SHOW_LESS_CLASS: &str = "less-button";
    pub const COLLAPSED_ATTRIBUTE: &str = "collapsed";

    // Nodes and classes this script adds to the page
    pub const TOGGLE_BUTTON_ID: &str = "sidesy-toggle";
    pub const HEADER_CLASS: &str = "comments-header";
    pub const TOGGLE_BUTTON_CLASS: &str = "comments-header-btn";
    pub const CONTROL_CLASS: &str = "extension-control";
    pub const SIDEBAR_CLASS: &str = "popout";
    pub const DARK_CLASS: &str = "dark-mode";
    pub const LIGHT_CLASS: &str = "light-mode";
    pub const CUSTOM_WIDTH_CLASS: &str = "sidesy-custom-width";
    pub const MODE_ATTRIBUTE: &str = "data-sidesy-mode";
    pub const RESIZE_HANDLE_CLASS: &str = "sidesy-resize-handle";
    pub const RESIZING_BODY_CLASS: &str = "sidesy-resizing";
    pub const DRAGGING_CLASS: &str = "dragging";
    pub const ANNOUNCEMENT_ID: &str = "sidesy-announcement";
    pub const ANNOUNCEMENT_LEAVING_CLASS: &str = "sidesy-announcement--leaving";
}

/// Readiness heuristics. The numbers have no derivation beyond "works on the
/// current host page", so they stay tunable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Serialized comments markup must be strictly longer than this.
    pub content_threshold: usize,
    pub poll_interval_ms: u32,
    pub max_attempts: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            content_threshold: 100,
            poll_interval_ms: 500,
            max_attempts: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarConfig {
    pub min_width_px: u32,
    pub max_width_px: u32,
    /// The host's native side panel width.
    pub default_width_px: u32,
}

impl SidebarConfig {
    pub fn clamp(&self, width_px: f64) -> u32 {
        if width_px.is_nan() {
            return self.default_width_px;
        }
        width_px
            .round()
            .clamp(self.min_width_px as f64, self.max_width_px as f64) as u32
    }
}

impl Default for SidebarConfig {
    fn default() -> Self {
        SidebarConfig {
            min_width_px: 300,
            max_width_px: 700,
            default_width_px: 426,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpanderConfig {
    pub max_collapsed_lines: u32,
    pub fallback_line_height_px: f64,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        ExpanderConfig {
            max_collapsed_lines: 4,
            fallback_line_height_px: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorConfig {
    pub probe_count: usize,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig { probe_count: 6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementConfig {
    pub exit_animation_ms: u32,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        AnnouncementConfig {
            exit_animation_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Config {
    pub detection: DetectionConfig,
    pub sidebar: SidebarConfig,
    pub expander: ExpanderConfig,
    pub anchor: AnchorConfig,
    pub announcement: AnnouncementConfig,
}
