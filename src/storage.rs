/// Persisted view settings over the extension's key-value store
///
/// The store is shared with the popup and background contexts, so every write
/// names exactly the key it changes and every read tolerates a missing or
/// malformed value.

use crate::config::SidebarConfig;
use crate::error::StoreError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const COMMENTS_PLACEMENT_KEY: &str = "comments_placement";
pub const SIDEBAR_WIDTH_KEY: &str = "sidebar_width";
pub const LAST_SEEN_ANNOUNCEMENT_KEY: &str = "last_seen_announcement";
pub const PENDING_ANNOUNCEMENT_KEY: &str = "pending_announcement";

/// Async string-keyed store holding JSON values.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get_value(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set_value(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn remove_value(&self, key: &str) -> Result<(), StoreError>;
}

/// Where the comments were last placed. Stored as `"default"` or `"sidebar"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Default,
    Sidebar,
}

/// The persisted subset of the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub placement: Placement,
    pub width_px: u32,
}

/// Read and decode a key. Absent keys, decode failures and backend failures
/// all come back as `None`.
pub async fn read<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    match store.get_value(key).await {
        Ok(Some(Value::Null)) | Ok(None) => None,
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("ignoring malformed `{}`: {}", key, e);
                None
            }
        },
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

pub async fn write<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore,
{
    let value = serde_json::to_value(value).map_err(|e| StoreError::codec(key, e.to_string()))?;
    store.set_value(key, value).await
}

/// Load placement and width. The placement defaults to the sidebar; a zero or
/// missing width falls back to the default and any stored width is clamped.
pub async fn load_view_settings<S: KeyValueStore>(store: &S, sidebar: &SidebarConfig) -> ViewSettings {
    let placement = read::<Placement, _>(store, COMMENTS_PLACEMENT_KEY)
        .await
        .unwrap_or(Placement::Sidebar);

    let width_px = read::<f64, _>(store, SIDEBAR_WIDTH_KEY)
        .await
        .filter(|w| *w > 0.0)
        .map(|w| sidebar.clamp(w))
        .unwrap_or(sidebar.default_width_px);

    ViewSettings { placement, width_px }
}

pub async fn save_placement<S: KeyValueStore>(store: &S, placement: Placement) -> Result<(), StoreError> {
    write(store, COMMENTS_PLACEMENT_KEY, &placement).await
}

pub async fn save_sidebar_width<S: KeyValueStore>(store: &S, width_px: u32) -> Result<(), StoreError> {
    write(store, SIDEBAR_WIDTH_KEY, &width_px).await
}
