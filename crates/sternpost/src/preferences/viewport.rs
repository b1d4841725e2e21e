//! Viewport thresholds

/// Widths at or below this are laid out for mobile
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Scroll offset past which the back-to-top control shows
pub const BACK_TO_TOP_OFFSET: f64 = 300.0;

pub fn is_mobile(width: f64) -> bool {
    width <= MOBILE_BREAKPOINT
}

pub fn back_to_top_visible(scroll_offset: f64) -> bool {
    scroll_offset > BACK_TO_TOP_OFFSET
}

/// Tracks crossings of the mobile breakpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    mobile: bool,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self {
            mobile: is_mobile(width),
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Record a resize; true when the breakpoint was crossed
    pub fn resize(&mut self, width: f64) -> bool {
        let was_mobile = self.mobile;
        self.mobile = is_mobile(width);
        was_mobile != self.mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert!(is_mobile(768.0));
        assert!(!is_mobile(769.0));
    }

    #[test]
    fn test_back_to_top_is_exclusive() {
        assert!(!back_to_top_visible(300.0));
        assert!(back_to_top_visible(301.0));
    }

    #[test]
    fn test_resize_reports_crossings() {
        let mut viewport = Viewport::new(1024.0);
        assert!(!viewport.resize(900.0));
        assert!(viewport.resize(600.0));
        assert!(viewport.is_mobile());
        assert!(!viewport.resize(500.0));
        assert!(viewport.resize(1200.0));
    }
}
