//! Viewport transform: the pan/zoom mapping between screen and canvas space.
//!
//! Everything here is pure — methods take `self` by value or reference and
//! return a new [`Viewport`]; the interaction layer decides when to store it.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Allowed zoom interval. Zoom can never reach 0, so the transform stays
/// invertible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 0.1, max: 5.0 }
    }
}

impl ZoomRange {
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

/// Pan offset of the canvas origin in screen space, plus a scalar zoom.
///
/// `canvas = (screen - pan) / zoom` and `screen = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Point,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        (screen - self.pan) / self.zoom
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        canvas * self.zoom + self.pan
    }

    /// Zoom by `factor`, keeping the canvas point under `anchor` (a screen
    /// position, typically the cursor) visually fixed. The requested zoom is
    /// clamped into `range`; out-of-range factors are capped, not rejected.
    #[must_use]
    pub fn zoom_at_point(&self, anchor: Point, factor: f32, range: ZoomRange) -> Self {
        let zoom = range.clamp(self.zoom * factor);
        // Solve pan' so that (anchor - pan') / zoom' == (anchor - pan) / zoom.
        let canvas = self.screen_to_canvas(anchor);
        Self {
            pan: anchor - canvas * zoom,
            zoom,
        }
    }

    /// Translate by a screen-space delta. No canvas conversion: pan is itself
    /// a screen-space offset.
    #[must_use]
    pub fn pan_by(&self, delta: Point) -> Self {
        Self {
            pan: self.pan + delta,
            zoom: self.zoom,
        }
    }

    /// Coerce an externally supplied viewport (e.g. from an imported payload)
    /// into a valid one: non-finite pan resets to origin, zoom is clamped.
    #[must_use]
    pub fn sanitized(&self, range: ZoomRange) -> Self {
        let pan = if self.pan.is_finite() {
            self.pan
        } else {
            Point::ZERO
        };
        let zoom = if self.zoom.is_finite() {
            range.clamp(self.zoom)
        } else {
            1.0
        };
        Self { pan, zoom }
    }
}
