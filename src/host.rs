/// The page-facing seam of the detection core
///
/// `Navigator` only talks to the page through `Host`. The browser build uses
/// `dom::DomHost`; tests drive the same state machine through a fake host whose
/// callbacks they fire by hand.

use crate::navigation::EpochId;
use crate::readiness::CommentsSnapshot;

/// A watcher or timer that can be stopped. Cancelling twice is a no-op.
pub trait Cancel {
    fn cancel(&mut self);
}

pub trait Host {
    /// Tier 1 handle: the attribute watch on the comments container.
    type Watch: Cancel;
    /// Tier 2 handle: the repeating readiness poll.
    type Poll: Cancel;
    /// Whatever activation added to the page, handed back on cleanup.
    type Augmentation;

    fn comments(&self) -> CommentsSnapshot;

    /// Watch the comments container's hidden marker. `on_change` runs on every
    /// change of the marker. Returns `None` when there is nothing to watch.
    fn watch_hidden(&self, on_change: Box<dyn FnMut()>) -> Option<Self::Watch>;

    fn start_poll(&self, interval_ms: u32, on_tick: Box<dyn FnMut()>) -> Self::Poll;

    /// One-time setup for a ready page. `None` when the page lacks the nodes
    /// the view needs.
    fn activate(&self, epoch: EpochId) -> Option<Self::Augmentation>;

    fn clear(&self, augmentation: Self::Augmentation);

    /// The new location is not a watch page.
    fn leave_target_page(&self);
}
