/// "What's new" announcement state
///
/// The background context sets `pending_announcement` after an update. The
/// content script shows the catalog once per pending version and records the
/// version as seen when the reader dismisses it.

use crate::error::StoreError;
use crate::storage::{self, KeyValueStore, LAST_SEEN_ANNOUNCEMENT_KEY, PENDING_ANNOUNCEMENT_KEY};

/// Items for the current release. Each entry is a title, optionally followed
/// by a line break and a body.
pub const CATALOG: &[&str] = &[
    "Resizable sidebar\nDrag the edge of the sidebar to set its width. It is remembered across videos.",
    "Keyboard shortcut\nToggle the sidebar from the keyboard. Pick the keys on your browser's extension shortcuts page.",
    "Smoother navigation\nComments follow you from video to video without a page reload.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementItem {
    pub title: String,
    pub body: Option<String>,
}

impl AnnouncementItem {
    pub fn parse(entry: &str) -> Self {
        let (title, body) = match entry.split_once('\n') {
            Some((title, body)) => (title, Some(body.trim())),
            None => (entry, None),
        };
        AnnouncementItem {
            title: title.trim().to_string(),
            body: body.filter(|b| !b.is_empty()).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub version: String,
    pub items: Vec<AnnouncementItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementState {
    pub last_seen: Option<String>,
    pub pending: Option<String>,
}

impl AnnouncementState {
    pub async fn load<S: KeyValueStore>(store: &S) -> Self {
        AnnouncementState {
            last_seen: storage::read(store, LAST_SEEN_ANNOUNCEMENT_KEY).await,
            pending: storage::read(store, PENDING_ANNOUNCEMENT_KEY).await,
        }
    }

    /// The pending version, unless it has already been seen.
    pub fn unseen(&self) -> Option<&str> {
        self.pending
            .as_deref()
            .filter(|pending| self.last_seen.as_deref() != Some(*pending))
    }
}

/// Decide whether to show a banner. `None` when nothing is pending, the
/// catalog is empty, or a banner is already up.
pub async fn pending_announcement<S: KeyValueStore>(
    store: &S,
    catalog: &[&str],
    banner_displayed: bool,
) -> Option<Announcement> {
    if banner_displayed || catalog.is_empty() {
        return None;
    }
    let state = AnnouncementState::load(store).await;
    let version = state.unseen()?.to_string();
    Some(Announcement {
        version,
        items: catalog.iter().map(|entry| AnnouncementItem::parse(entry)).collect(),
    })
}

/// Record `version` as seen and clear the pending marker.
pub async fn dismiss<S: KeyValueStore>(store: &S, version: &str) -> Result<(), StoreError> {
    storage::write(store, LAST_SEEN_ANNOUNCEMENT_KEY, &version).await?;
    store.remove_value(PENDING_ANNOUNCEMENT_KEY).await
}
