/// Comments readiness heuristic and the per-epoch detection state
///
/// Readiness is judged on a cheap snapshot of the comments container: it must
/// exist, must not carry the hidden marker, and its serialized markup must be
/// longer than a fixed threshold. The threshold is a proxy for "at least one
/// comment or placeholder has rendered".

use crate::config::DetectionConfig;
use crate::host::Cancel;

/// What the page currently shows of the comments container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentsSnapshot {
    pub present: bool,
    pub hidden: bool,
    /// Length of the container's serialized markup.
    pub content_len: usize,
}

impl CommentsSnapshot {
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Length of serialized markup as the page counts it, in UTF-16 units.
pub fn markup_len(markup: &str) -> usize {
    markup.encode_utf16().count()
}

#[derive(Debug, Clone, Copy)]
pub struct ReadinessDetector {
    content_threshold: usize,
}

impl ReadinessDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        ReadinessDetector {
            content_threshold: config.content_threshold,
        }
    }

    pub fn is_ready(&self, snapshot: &CommentsSnapshot) -> bool {
        snapshot.present && !snapshot.hidden && snapshot.content_len > self.content_threshold
    }

    /// Tier 1 only makes sense while the container exists and is hidden.
    pub fn wants_attribute_watch(&self, snapshot: &CommentsSnapshot) -> bool {
        snapshot.present && snapshot.hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollProgress {
    Continue,
    Exhausted,
}

/// Detection bookkeeping owned by one navigation epoch.
///
/// Each tier handle is either absent or single. Dropping the state cancels
/// whatever is still running.
#[derive(Debug)]
pub struct DetectionState<W: Cancel, P: Cancel> {
    watch: Option<W>,
    poll: Option<P>,
    attempts: u32,
    activated: bool,
}

impl<W: Cancel, P: Cancel> DetectionState<W, P> {
    pub fn new() -> Self {
        DetectionState {
            watch: None,
            poll: None,
            attempts: 0,
            activated: false,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Flip `activated` to true. Returns false if it already was.
    pub fn mark_activated(&mut self) -> bool {
        !std::mem::replace(&mut self.activated, true)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    pub fn in_flight(&self) -> bool {
        self.is_watching() || self.is_polling()
    }

    pub fn set_watch(&mut self, watch: W) {
        if let Some(mut previous) = self.watch.replace(watch) {
            previous.cancel();
        }
    }

    pub fn set_poll(&mut self, poll: P) {
        if let Some(mut previous) = self.poll.replace(poll) {
            previous.cancel();
        }
    }

    /// Count one poll tick against the ceiling.
    pub fn record_attempt(&mut self, max_attempts: u32) -> PollProgress {
        self.attempts = self.attempts.saturating_add(1);
        if self.attempts >= max_attempts {
            PollProgress::Exhausted
        } else {
            PollProgress::Continue
        }
    }

    pub fn cancel_watch(&mut self) {
        if let Some(mut watch) = self.watch.take() {
            watch.cancel();
        }
    }

    pub fn cancel_poll(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
    }

    pub fn teardown(&mut self) {
        self.cancel_watch();
        self.cancel_poll();
    }
}

impl<W: Cancel, P: Cancel> Default for DetectionState<W, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Cancel, P: Cancel> Drop for DetectionState<W, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
