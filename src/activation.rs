/// Single entry point for first-time setup of a navigation epoch

use crate::host::Host;
use crate::navigation::Epoch;
use crate::readiness::ReadinessDetector;
use log::info;

/// Activate `epoch` if the comments are ready.
///
/// Returns true when the epoch is (now or already) activated. Both detection
/// tiers call through here; the flag is checked and set with no suspension
/// point in between.
pub fn try_activate<H: Host>(host: &H, detector: &ReadinessDetector, epoch: &mut Epoch<H>) -> bool {
    if epoch.detection.is_activated() {
        return true;
    }
    if !detector.is_ready(&host.comments()) {
        return false;
    }

    epoch.detection.mark_activated();
    info!("comments ready, activating {}", epoch.id());
    epoch.augmentation = host.activate(epoch.id());
    // One of the tiers got us here; stop both anyway.
    epoch.detection.teardown();
    true
}
