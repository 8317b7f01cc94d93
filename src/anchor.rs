/// Scroll-anchor sampling and correction
///
/// Before a layout switch we find the topmost visible comment thread and note
/// how far it sits below the top of the active viewport. After the switch we
/// scroll by however far it has drifted from that offset.

/// The area a reader is looking at: the window for the inline layout, the
/// comments region's box for the sidebar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
    pub center_x: f64,
}

impl Viewport {
    /// `count` horizontally centred points, top to bottom, each in the middle
    /// of its band.
    pub fn probe_points(&self, count: usize) -> Vec<(f64, f64)> {
        if count == 0 || self.height <= 0.0 {
            return Vec::new();
        }
        let band = self.height / count as f64;
        (0..count)
            .map(|i| (self.center_x, self.top + band * (i as f64 + 0.5)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnchor<E> {
    pub element: E,
    pub offset_px: f64,
}

impl<E> ScrollAnchor<E> {
    /// How far to scroll so the element sits at its recorded offset again.
    /// Positive means scroll down.
    pub fn correction(&self, element_top: f64, viewport_top: f64) -> f64 {
        (element_top - viewport_top) - self.offset_px
    }
}

/// Probe `viewport` and anchor on the first hit. `hit` maps a point to the
/// comment thread under it and that thread's current top edge.
pub fn sample<E, F>(viewport: &Viewport, count: usize, mut hit: F) -> Option<ScrollAnchor<E>>
where
    F: FnMut(f64, f64) -> Option<(E, f64)>,
{
    viewport
        .probe_points(count)
        .into_iter()
        .find_map(|(x, y)| hit(x, y))
        .map(|(element, top)| ScrollAnchor {
            element,
            offset_px: top - viewport.top,
        })
}
