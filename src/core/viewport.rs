// Tracks the rendered size of the drawing surface

use crate::core::model::ViewportSize;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Layout rectangle reported by the host on every layout change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceRect {
    /// Left edge in client coordinates; pointer offsets are taken against it.
    #[serde(default)]
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ViewportSizer {
    rect: SurfaceRect,
}

impl ViewportSizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new layout. Returns `true` when the size changed, which
    /// is what invalidates downstream artifacts; a pure move does not.
    pub fn observe(&mut self, rect: SurfaceRect) -> bool {
        let rect = SurfaceRect {
            left: if rect.left.is_finite() { rect.left } else { 0.0 },
            width: sanitize_extent(rect.width),
            height: sanitize_extent(rect.height),
        };
        let resized = rect.width != self.rect.width || rect.height != self.rect.height;
        if resized {
            debug!("Viewport resized to {}x{}", rect.width, rect.height);
        }
        self.rect = rect;
        resized
    }

    pub fn size(&self) -> ViewportSize {
        ViewportSize::new(self.rect.width, self.rect.height)
    }

    pub fn left(&self) -> f64 {
        self.rect.left
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let sizer = ViewportSizer::new();
        assert!(!sizer.size().is_drawable());
    }

    #[test]
    fn test_observe_reports_resize_only() {
        let mut sizer = ViewportSizer::new();
        assert!(sizer.observe(SurfaceRect { left: 0.0, width: 500.0, height: 300.0 }));
        assert!(!sizer.observe(SurfaceRect { left: 40.0, width: 500.0, height: 300.0 }));
        assert_eq!(sizer.left(), 40.0);
        assert!(sizer.observe(SurfaceRect { left: 40.0, width: 640.0, height: 300.0 }));
        assert_eq!(sizer.size(), ViewportSize::new(640.0, 300.0));
    }

    #[test]
    fn test_negative_and_nan_sizes_collapse_to_zero() {
        let mut sizer = ViewportSizer::new();
        sizer.observe(SurfaceRect { left: f64::NAN, width: -10.0, height: f64::NAN });
        assert_eq!(sizer.size(), ViewportSize::new(0.0, 0.0));
        assert_eq!(sizer.left(), 0.0);
    }
}
