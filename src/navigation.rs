/// Per-navigation lifecycle: cleanup, detect, activate
///
/// The host page is a single-page app, so a "page load" is really a
/// navigation-finished event. Every such event supersedes the previous epoch:
/// its watchers are cancelled and its page augmentation removed before the new
/// epoch starts looking for comments. Callbacks remember the epoch they were
/// installed for and do nothing once that epoch is gone.

use crate::activation;
use crate::config::{DetectionConfig, selectors};
use crate::host::Host;
use crate::readiness::{DetectionState, PollProgress, ReadinessDetector};
use log::{debug, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use url::Url;

/// Opaque token for one in-page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochId(pub(crate) u64);

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch #{}", self.0)
    }
}

/// Everything owned by the current navigation.
pub struct Epoch<H: Host> {
    id: EpochId,
    on_target: bool,
    pub(crate) detection: DetectionState<H::Watch, H::Poll>,
    pub(crate) augmentation: Option<H::Augmentation>,
}

impl<H: Host> Epoch<H> {
    pub(crate) fn new(id: EpochId, on_target: bool) -> Self {
        Epoch {
            id,
            on_target,
            detection: DetectionState::new(),
            augmentation: None,
        }
    }

    pub fn id(&self) -> EpochId {
        self.id
    }
}

pub struct Navigator<H: Host> {
    host: H,
    config: DetectionConfig,
    detector: ReadinessDetector,
    epoch: Option<Epoch<H>>,
    next_epoch: u64,
}

pub type SharedNavigator<H> = Rc<RefCell<Navigator<H>>>;

/// Is `url` a watch page? Falls back to a plain substring test for strings
/// that do not parse as URLs.
pub fn is_watch_page(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let on_site = host == "youtube.com" || host.ends_with(".youtube.com");
            on_site && parsed.path() == "/watch"
        }
        Err(_) => url.contains(selectors::WATCH_PAGE_PATTERN),
    }
}

impl<H: Host> Navigator<H> {
    pub fn new(host: H, config: DetectionConfig) -> Self {
        Navigator {
            host,
            detector: ReadinessDetector::new(&config),
            config,
            epoch: None,
            next_epoch: 1,
        }
    }

    pub fn into_shared(self) -> SharedNavigator<H> {
        Rc::new(RefCell::new(self))
    }

    pub fn current_epoch(&self) -> Option<EpochId> {
        self.epoch.as_ref().map(|e| e.id)
    }

    pub fn is_activated(&self) -> bool {
        self.epoch.as_ref().is_some_and(|e| e.detection.is_activated())
    }

    fn epoch_mut(&mut self, id: EpochId) -> Option<&mut Epoch<H>> {
        self.epoch.as_mut().filter(|e| e.id == id)
    }

    fn is_current(&self, id: EpochId) -> bool {
        self.current_epoch() == Some(id)
    }

    /// Tear down the previous epoch and open a new one.
    fn begin_epoch(&mut self, on_target: bool) -> EpochId {
        self.teardown();
        let id = EpochId(self.next_epoch);
        self.next_epoch += 1;
        self.epoch = Some(Epoch::new(id, on_target));
        debug!("{} started (watch page: {})", id, on_target);
        id
    }

    fn teardown(&mut self) {
        let Some(mut epoch) = self.epoch.take() else {
            return;
        };
        epoch.detection.teardown();
        if let Some(augmentation) = epoch.augmentation.take() {
            self.host.clear(augmentation);
        }
        debug!("{} torn down", epoch.id);
    }

    fn try_activate(&mut self, id: EpochId) -> bool {
        let Navigator {
            host,
            detector,
            epoch,
            ..
        } = self;
        match epoch.as_mut().filter(|e| e.id == id) {
            Some(epoch) => activation::try_activate(host, detector, epoch),
            None => false,
        }
    }
}

impl<H: Host + 'static> Navigator<H> {
    /// Start Tier 2 for `id` unless it is already running or not needed.
    fn ensure_polling(&mut self, weak: Weak<RefCell<Self>>, id: EpochId) {
        let interval_ms = self.config.poll_interval_ms;
        let Some(epoch) = self.epoch.as_ref().filter(|e| e.id == id) else {
            return;
        };
        if epoch.detection.is_polling() || epoch.detection.is_activated() {
            return;
        }

        let poll = self.host.start_poll(
            interval_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    on_poll_tick(&shared, id);
                }
            }),
        );
        if let Some(epoch) = self.epoch_mut(id) {
            epoch.detection.set_poll(poll);
        }
    }
}

/// Handle a navigation-finished (or initial document-ready) signal.
pub fn navigate<H: Host + 'static>(shared: &SharedNavigator<H>, url: &str) {
    let id = {
        let mut nav = shared.borrow_mut();
        let on_target = is_watch_page(url);
        let id = nav.begin_epoch(on_target);
        if !on_target {
            nav.host.leave_target_page();
            return;
        }
        id
    };
    start_watching(shared, id);
}

/// Legacy outside trigger. Only restarts detection for a watch-page epoch
/// that is neither activated nor still detecting; never tears down a view.
pub fn kick<H: Host + 'static>(shared: &SharedNavigator<H>, url: &str) {
    let current = {
        let nav = shared.borrow();
        match nav.epoch.as_ref() {
            None => None,
            Some(epoch) => {
                if !epoch.on_target || epoch.detection.is_activated() || epoch.detection.in_flight() {
                    return;
                }
                Some(epoch.id)
            }
        }
    };
    match current {
        Some(id) => start_watching(shared, id),
        None => navigate(shared, url),
    }
}

/// Check now, otherwise install both detection tiers for `id`.
pub fn start_watching<H: Host + 'static>(shared: &SharedNavigator<H>, id: EpochId) {
    let mut nav = shared.borrow_mut();
    if nav.try_activate(id) {
        return;
    }

    let snapshot = nav.host.comments();
    if nav.detector.wants_attribute_watch(&snapshot) {
        let weak = Rc::downgrade(shared);
        let watch = nav.host.watch_hidden(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                on_hidden_changed(&shared, id);
            }
        }));
        if let (Some(watch), Some(epoch)) = (watch, nav.epoch_mut(id)) {
            epoch.detection.set_watch(watch);
        }
    }

    nav.ensure_polling(Rc::downgrade(shared), id);
}

/// Tier 1 callback.
fn on_hidden_changed<H: Host + 'static>(shared: &SharedNavigator<H>, id: EpochId) {
    let Ok(mut nav) = shared.try_borrow_mut() else {
        warn!("attribute change for {} arrived mid-update; skipped", id);
        return;
    };
    if !nav.is_current(id) || nav.host.comments().hidden {
        return;
    }
    if let Some(epoch) = nav.epoch_mut(id) {
        epoch.detection.cancel_watch();
    }
    // Unhidden is not the same as populated.
    if !nav.try_activate(id) {
        nav.ensure_polling(Rc::downgrade(shared), id);
    }
}

/// Tier 2 callback.
fn on_poll_tick<H: Host + 'static>(shared: &SharedNavigator<H>, id: EpochId) {
    let Ok(mut nav) = shared.try_borrow_mut() else {
        return;
    };
    if !nav.is_current(id) || nav.try_activate(id) {
        return;
    }
    let max_attempts = nav.config.max_attempts;
    let Some(epoch) = nav.epoch_mut(id) else {
        return;
    };
    if epoch.detection.record_attempt(max_attempts) == PollProgress::Exhausted {
        epoch.detection.teardown();
        debug!("{}: no comments after {} attempts, giving up", id, max_attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;

    const WATCH: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const OTHER_WATCH: &str = "https://www.youtube.com/watch?v=9bZkp7q19f0";
    const HOME: &str = "https://www.youtube.com/";

    fn setup() -> (FakeHost, SharedNavigator<FakeHost>) {
        let host = FakeHost::new();
        let nav = Navigator::new(host.clone(), DetectionConfig::default()).into_shared();
        (host, nav)
    }

    fn activations_for(host: &FakeHost, id: EpochId) -> usize {
        host.activations.borrow().iter().filter(|e| **e == id).count()
    }

    #[test]
    fn test_is_watch_page() {
        assert!(is_watch_page(WATCH));
        assert!(is_watch_page("https://m.youtube.com/watch?v=abc"));
        assert!(is_watch_page("youtube.com/watch?v=abc"));
        assert!(!is_watch_page(HOME));
        assert!(!is_watch_page("https://www.youtube.com/shorts/abc"));
        assert!(!is_watch_page("https://example.com/?next=youtube.com/watch"));
    }

    #[test]
    fn test_ready_page_activates_immediately_without_watchers() {
        let (host, nav) = setup();
        host.set_comments(true, false, 400);

        navigate(&nav, WATCH);

        assert_eq!(host.activations.borrow().len(), 1);
        assert!(host.watch_handles().is_empty());
        assert!(host.poll_handles().is_empty());
        assert!(nav.borrow().is_activated());
    }

    #[test]
    fn test_hidden_comments_install_both_tiers() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);

        navigate(&nav, WATCH);

        assert_eq!(host.live_watches(), 1);
        assert_eq!(host.live_polls(), 1);
        assert!(host.activations.borrow().is_empty());
    }

    #[test]
    fn test_missing_comments_poll_only() {
        let (host, nav) = setup();

        navigate(&nav, WATCH);

        assert_eq!(host.live_watches(), 0);
        assert_eq!(host.live_polls(), 1);
    }

    #[test]
    fn test_unhide_before_content_falls_through_to_poll() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);

        host.set_comments(true, false, 40);
        host.fire_watches();

        assert!(host.activations.borrow().is_empty());
        assert_eq!(host.live_watches(), 0);
        assert_eq!(host.live_polls(), 1);

        host.set_comments(true, false, 900);
        host.tick();

        assert_eq!(host.activations.borrow().len(), 1);
        assert_eq!(host.live_polls(), 0);
    }

    #[test]
    fn test_attribute_change_while_still_hidden_is_ignored() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);

        host.fire_watches();

        assert_eq!(host.live_watches(), 1);
        assert!(host.activations.borrow().is_empty());
    }

    #[test]
    fn test_unhide_with_content_activates_via_watch() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);

        host.set_comments(true, false, 300);
        host.fire_watches();

        assert_eq!(host.activations.borrow().len(), 1);
        assert_eq!(host.live_watches(), 0);
        assert_eq!(host.live_polls(), 0);
    }

    #[test]
    fn test_both_tiers_racing_activate_once() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);

        host.set_comments(true, false, 300);
        host.fire_stale();
        host.tick();
        host.fire_stale();

        assert_eq!(host.activations.borrow().len(), 1);
    }

    #[test]
    fn test_poll_gives_up_at_ceiling() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);

        for _ in 0..59 {
            host.tick();
        }
        assert_eq!(host.live_polls(), 1);
        assert_eq!(host.live_watches(), 1);

        host.tick();

        assert_eq!(host.live_polls(), 0);
        assert_eq!(host.live_watches(), 0);
        assert!(!nav.borrow().is_activated());
        assert!(host.activations.borrow().is_empty());
    }

    #[test]
    fn test_navigation_cancels_previous_epoch_first() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);
        let old_watches = host.watch_handles();
        let old_polls = host.poll_handles();

        navigate(&nav, OTHER_WATCH);

        assert!(old_watches.iter().all(|h| h.is_cancelled()));
        assert!(old_polls.iter().all(|h| h.is_cancelled()));
        assert_eq!(host.live_watches(), 1);
        assert_eq!(host.live_polls(), 1);
    }

    #[test]
    fn test_stale_callbacks_cannot_activate_old_epoch() {
        let (host, nav) = setup();
        host.set_comments(true, true, 0);
        navigate(&nav, WATCH);
        let first = nav.borrow().current_epoch().unwrap();

        navigate(&nav, HOME);
        host.set_comments(true, false, 500);
        host.fire_stale();

        assert_eq!(activations_for(&host, first), 0);
        assert!(!nav.borrow().is_activated());
    }

    #[test]
    fn test_navigation_clears_previous_augmentation() {
        let (host, nav) = setup();
        host.set_comments(true, false, 500);
        navigate(&nav, WATCH);
        let first = nav.borrow().current_epoch().unwrap();

        navigate(&nav, OTHER_WATCH);
        let second = nav.borrow().current_epoch().unwrap();

        assert_eq!(*host.cleared.borrow(), vec![first]);
        assert_eq!(activations_for(&host, second), 1);
        assert_ne!(first, second);
    }

    #[test]
    fn test_leaving_watch_page_tears_down_and_stops() {
        let (host, nav) = setup();
        host.set_comments(true, false, 500);
        navigate(&nav, WATCH);

        navigate(&nav, HOME);

        assert_eq!(host.cleared.borrow().len(), 1);
        assert_eq!(host.left_target.get(), 1);
        assert_eq!(host.activations.borrow().len(), 1);
        assert!(!nav.borrow().is_activated());
    }

    #[test]
    fn test_each_navigation_gets_a_fresh_budget() {
        let (host, nav) = setup();
        navigate(&nav, WATCH);
        for _ in 0..60 {
            host.tick();
        }
        assert_eq!(host.live_polls(), 0);

        navigate(&nav, OTHER_WATCH);
        assert_eq!(host.live_polls(), 1);

        host.set_comments(true, false, 500);
        host.tick();
        assert_eq!(host.activations.borrow().len(), 1);
    }

    #[test]
    fn test_kick_restarts_detection_only_when_idle() {
        let (host, nav) = setup();
        navigate(&nav, WATCH);
        for _ in 0..60 {
            host.tick();
        }

        host.set_comments(true, false, 500);
        kick(&nav, WATCH);
        assert_eq!(host.activations.borrow().len(), 1);

        // Already active: no teardown, no second setup.
        kick(&nav, WATCH);
        assert_eq!(host.activations.borrow().len(), 1);
        assert!(host.cleared.borrow().is_empty());
    }

    #[test]
    fn test_kick_before_any_navigation_navigates() {
        let (host, nav) = setup();
        host.set_comments(true, false, 500);

        kick(&nav, WATCH);

        assert_eq!(host.activations.borrow().len(), 1);
    }

    #[test]
    fn test_kick_off_target_is_ignored() {
        let (host, nav) = setup();
        navigate(&nav, HOME);
        host.set_comments(true, false, 500);

        kick(&nav, HOME);

        assert!(host.activations.borrow().is_empty());
    }

    #[test]
    fn test_random_event_sequences_activate_at_most_once_per_epoch() {
        let urls = [WATCH, OTHER_WATCH, HOME];
        let mut seed: u64 = 0x5eed;
        let mut next = move |bound: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % bound
        };

        for _ in 0..50 {
            let (host, nav) = setup();
            for _ in 0..200 {
                match next(6) {
                    0 => navigate(&nav, urls[next(3) as usize]),
                    1 => host.set_comments(next(2) == 0, next(2) == 0, next(300) as usize),
                    2 => host.fire_watches(),
                    3 => host.tick(),
                    4 => host.fire_stale(),
                    _ => kick(&nav, urls[next(3) as usize]),
                }

                let activations = host.activations.borrow();
                let mut seen = std::collections::HashSet::new();
                assert!(activations.iter().all(|id| seen.insert(*id)));
            }
        }
    }
}
