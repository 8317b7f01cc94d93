/// Messages delivered to the content script by the extension runtime

use serde::Deserialize;
use serde_json::Value;

pub const TOGGLE_SIDEBAR_ACTION: &str = "toggle-sidebar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMessage {
    /// From the keyboard shortcut; same effect as clicking the toggle.
    ToggleSidebar,
    /// Older background scripts announce a finished page load this way.
    Activate,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMessage {
    action: Option<String>,
    activate: Option<bool>,
}

impl InboundMessage {
    pub fn parse(value: Value) -> Option<Self> {
        let raw: RawMessage = serde_json::from_value(value).ok()?;
        if raw.action.as_deref() == Some(TOGGLE_SIDEBAR_ACTION) {
            return Some(InboundMessage::ToggleSidebar);
        }
        if raw.activate == Some(true) {
            return Some(InboundMessage::Activate);
        }
        None
    }
}
