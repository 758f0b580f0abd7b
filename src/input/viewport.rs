//! Pan/zoom transform between client and model coordinates.

use crate::config::ViewportConfig;
use crate::draw::Point;
use crate::util;

/// Bounds and step sizes for viewport zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Factor applied by a single zoom-in/zoom-out button press
    pub zoom_step: f64,
    /// Scales at or below this are treated as "at rest"
    pub rest_snap_threshold: f64,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 5.0,
            zoom_step: 1.2,
            rest_snap_threshold: 1.05,
        }
    }
}

impl From<&ViewportConfig> for ViewportLimits {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale.max(config.min_scale),
            zoom_step: config.zoom_step,
            rest_snap_threshold: config.rest_snap_threshold,
        }
    }
}

impl ViewportLimits {
    /// Clamps `scale` into range. Non-finite scales fall back to `min_scale`.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if !scale.is_finite() {
            return self.min_scale;
        }
        util::clamp(scale, self.min_scale, self.max_scale)
    }
}

/// Current scale and pan offset.
///
/// A model point `m` appears at `origin + offset + m * scale` on screen, where
/// `origin` is the container's client position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Viewport {
    /// Unscaled, unpanned transform.
    pub const IDENTITY: Viewport = Viewport {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Maps a client point to model space.
    pub fn client_to_model(&self, client: Point, origin: Point) -> Point {
        self.local_to_model(Point::new(client.x - origin.x, client.y - origin.y))
    }

    /// Maps a model point back to client space.
    pub fn model_to_client(&self, model: Point, origin: Point) -> Point {
        let local = self.model_to_local(model);
        Point::new(local.x + origin.x, local.y + origin.y)
    }

    /// Maps a container-relative point to model space.
    pub fn local_to_model(&self, local: Point) -> Point {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        Point::new(
            (local.x - self.offset_x) / scale,
            (local.y - self.offset_y) / scale,
        )
    }

    pub fn model_to_local(&self, model: Point) -> Point {
        Point::new(
            model.x * self.scale + self.offset_x,
            model.y * self.scale + self.offset_y,
        )
    }

    /// Whether the scale is at (or below) the rest threshold.
    pub fn is_at_rest(&self, limits: &ViewportLimits) -> bool {
        self.scale <= limits.rest_snap_threshold
    }

    /// Returns the transform with `scale` that keeps `model_anchor` displayed at
    /// the container-relative point `local_anchor`.
    ///
    /// The scale is clamped to the limits first.
    pub fn anchored(model_anchor: Point, local_anchor: Point, scale: f64, limits: &ViewportLimits) -> Viewport {
        let scale = limits.clamp_scale(scale);
        Viewport {
            scale,
            offset_x: local_anchor.x - model_anchor.x * scale,
            offset_y: local_anchor.y - model_anchor.y * scale,
        }
    }

    /// Zooms to `scale` keeping whatever is under `local_anchor` in place.
    pub fn zoomed_at(&self, local_anchor: Point, scale: f64, limits: &ViewportLimits) -> Viewport {
        let model_anchor = self.local_to_model(local_anchor);
        Viewport::anchored(model_anchor, local_anchor, scale, limits)
    }

    /// Snaps to the identity transform when both this scale and
    /// `previous_scale` are at rest, so the canvas cannot drift while unzoomed.
    pub fn snapped_to_rest(self, previous_scale: f64, limits: &ViewportLimits) -> Viewport {
        if self.scale <= limits.rest_snap_threshold && previous_scale <= limits.rest_snap_threshold {
            Viewport::IDENTITY
        } else {
            self
        }
    }

    /// Returns the transform shifted by `(dx, dy)` screen pixels.
    pub fn panned(&self, dx: f64, dy: f64) -> Viewport {
        Viewport {
            scale: self.scale,
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
        }
    }

    /// One zoom step in, anchored at the container centre.
    pub fn zoom_in(&self, center: Point, limits: &ViewportLimits) -> Viewport {
        self.zoomed_at(center, self.scale * limits.zoom_step, limits)
    }

    /// One zoom step out, anchored at the container centre.
    pub fn zoom_out(&self, center: Point, limits: &ViewportLimits) -> Viewport {
        let step = if limits.zoom_step > 0.0 { limits.zoom_step } else { 1.0 };
        self.zoomed_at(center, self.scale / step, limits)
            .snapped_to_rest(self.scale, limits)
    }
}
