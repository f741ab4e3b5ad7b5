//! Camera bounds in world space
//!
//! The view is an axis-aligned rectangle of world coordinates that gets
//! stretched over the canvas. Following the ship is a pure translation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space rectangle currently shown on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Shift both corners by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.min += delta;
        self.max += delta;
    }

    /// Smallest bounds that contain `region`, centred on it, matching the
    /// canvas aspect ratio (width / height).
    pub fn look_at(region: Bounds, aspect: f32) -> Self {
        let size = region.size();
        if aspect <= 0.0 || !aspect.is_finite() || size.y <= 0.0 {
            return region;
        }

        let region_aspect = size.x / size.y;
        let fitted = if region_aspect < aspect {
            // Region is taller than the canvas: widen
            Vec2::new(size.y * aspect, size.y)
        } else {
            // Region is wider than the canvas: heighten
            Vec2::new(size.x, size.x / aspect)
        };

        let center = region.center();
        Self::new(center - fitted * 0.5, center + fitted * 0.5)
    }

    /// Resize handler: keep the world width, derive the height from the new
    /// canvas size so the picture isn't stretched.
    pub fn fit_height(&mut self, width_px: f32, height_px: f32) {
        if width_px <= 0.0 || height_px <= 0.0 {
            return;
        }
        let width = self.size().x;
        self.max.y = self.min.y + height_px / width_px * width;
    }

    /// Map a world point into clip space (-1..1, y up)
    pub fn world_to_ndc(&self, p: Vec2) -> Vec2 {
        let size = self.size();
        let t = (p - self.min) / size;
        Vec2::new(t.x * 2.0 - 1.0, 1.0 - t.y * 2.0)
    }
}

/// Translation that re-centres `bounds` on `target`
pub fn camera_follow(bounds: &Bounds, target: Vec2) -> Vec2 {
    (target - bounds.max) + (bounds.max - bounds.min) / 2.0
}
