/// "Show more" / "show less" decisions for long comments

use crate::config::ExpanderConfig;

/// Visibility of a comment's expand controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpanderControls {
    pub more_visible: bool,
    pub less_visible: bool,
    /// Whether the text block keeps its `collapsed` marker.
    pub collapsed: bool,
}

impl ExpanderControls {
    /// Short comment: no controls at all.
    pub const NONE: ExpanderControls = ExpanderControls {
        more_visible: false,
        less_visible: false,
        collapsed: true,
    };

    /// Long comment, clamped.
    pub const FOLDED: ExpanderControls = ExpanderControls {
        more_visible: true,
        less_visible: false,
        collapsed: true,
    };

    /// Long comment, fully shown.
    pub const UNFOLDED: ExpanderControls = ExpanderControls {
        more_visible: false,
        less_visible: true,
        collapsed: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderClick {
    More,
    Less,
}

impl ExpanderClick {
    /// Classify a click target by its class list.
    pub fn from_classes<'a>(mut classes: impl Iterator<Item = &'a str>) -> Option<Self> {
        use crate::config::selectors::{READ_MORE_CLASS, SHOW_LESS_CLASS};

        classes.find_map(|class| match class {
            READ_MORE_CLASS => Some(ExpanderClick::More),
            SHOW_LESS_CLASS => Some(ExpanderClick::Less),
            _ => None,
        })
    }

    pub fn controls(self) -> ExpanderControls {
        match self {
            ExpanderClick::More => ExpanderControls::UNFOLDED,
            ExpanderClick::Less => ExpanderControls::FOLDED,
        }
    }
}

/// Parse a computed `line-height` such as `"20px"`. Keywords like `normal`
/// fall back to the configured height.
pub fn parse_line_height(value: &str, config: &ExpanderConfig) -> f64 {
    value
        .trim()
        .strip_suffix("px")
        .and_then(|px| px.trim().parse::<f64>().ok())
        .filter(|px| px.is_finite() && *px > 0.0)
        .unwrap_or(config.fallback_line_height_px)
}

pub fn line_count(text_height_px: f64, line_height_px: f64) -> u32 {
    let lines = (text_height_px / line_height_px).ceil();
    if lines.is_finite() && lines > 0.0 { lines as u32 } else { 0 }
}

pub fn controls_for(lines: u32, config: &ExpanderConfig) -> ExpanderControls {
    if lines > config.max_collapsed_lines {
        ExpanderControls::FOLDED
    } else {
        ExpanderControls::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_rounds_up() {
        assert_eq!(line_count(80.0, 20.0), 4);
        assert_eq!(line_count(81.0, 20.0), 5);
        assert_eq!(line_count(0.0, 20.0), 0);
        assert_eq!(line_count(50.0, 0.0), 0);
    }

    #[test]
    fn test_more_than_four_lines_gets_read_more() {
        let config = ExpanderConfig::default();
        assert_eq!(controls_for(5, &config), ExpanderControls::FOLDED);
        assert_eq!(controls_for(4, &config), ExpanderControls::NONE);
        assert_eq!(controls_for(0, &config), ExpanderControls::NONE);
    }

    #[test]
    fn test_parse_line_height() {
        let config = ExpanderConfig::default();
        assert_eq!(parse_line_height("22px", &config), 22.0);
        assert_eq!(parse_line_height(" 18.5px ", &config), 18.5);
        assert_eq!(parse_line_height("normal", &config), 20.0);
        assert_eq!(parse_line_height("0px", &config), 20.0);
    }

    #[test]
    fn test_click_classification() {
        let more = ["style-scope", "more-button"];
        let less = ["less-button"];
        let other = ["style-scope"];

        assert_eq!(ExpanderClick::from_classes(more.into_iter()), Some(ExpanderClick::More));
        assert_eq!(ExpanderClick::from_classes(less.into_iter()), Some(ExpanderClick::Less));
        assert_eq!(ExpanderClick::from_classes(other.into_iter()), None);
    }

    #[test]
    fn test_click_round_trip() {
        let opened = ExpanderClick::More.controls();
        assert!(opened.less_visible && !opened.more_visible && !opened.collapsed);

        let closed = ExpanderClick::Less.controls();
        assert_eq!(closed, ExpanderControls::FOLDED);
    }
}
