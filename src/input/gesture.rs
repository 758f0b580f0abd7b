//! Pointer routing and multi-touch navigation.
//!
//! The controller sits between raw pointer events and the active tool. Single
//! contacts (pen, mouse, one finger) are resolved to model points for drawing;
//! two or more touch contacts are reserved for navigation and classified as
//! either a pinch-zoom or a two-finger pan. Navigation updates are stored in a
//! pending slot and applied at most once per animation frame via
//! [`GestureController::flush`]; wheel zoom is applied immediately.

use std::collections::BTreeMap;

use super::events::{MouseButton, PointerEvent, PointerType, WheelEvent};
use super::viewport::{Viewport, ViewportLimits};
use crate::config::Config;
use crate::draw::Point;
use crate::util;

/// Thresholds for gesture classification (screen pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    /// Two contacts closer than this do not start a gesture
    pub min_pinch_separation: f64,
    /// Change in finger distance that locks the gesture to zoom
    pub zoom_threshold: f64,
    /// Midpoint displacement that locks the gesture to pan
    pub pan_threshold: f64,
    /// Pan displacements below this are ignored
    pub pan_dead_zone: f64,
    /// Minimum pan displacement while the canvas is at rest scale
    pub rest_pan_min_distance: f64,
    /// Exponent factor applied to wheel deltas
    pub wheel_sensitivity: f64,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            min_pinch_separation: 40.0,
            zoom_threshold: 10.0,
            pan_threshold: 10.0,
            pan_dead_zone: 2.0,
            rest_pan_min_distance: 8.0,
            wheel_sensitivity: 0.0015,
        }
    }
}

impl From<&Config> for GestureSettings {
    fn from(config: &Config) -> Self {
        let gesture = &config.gesture;
        Self {
            min_pinch_separation: gesture.min_pinch_separation,
            zoom_threshold: gesture.zoom_threshold,
            pan_threshold: gesture.pan_threshold,
            pan_dead_zone: gesture.pan_dead_zone,
            rest_pan_min_distance: gesture.rest_pan_min_distance,
            wheel_sensitivity: config.viewport.wheel_sensitivity,
        }
    }
}

/// Capabilities of the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputProfile {
    /// Device is classified as mobile
    pub mobile: bool,
    /// A fine pointer (stylus) is available
    pub fine_pointer: bool,
    /// Touch input is available
    pub touch: bool,
}

impl InputProfile {
    /// Mouse-and-keyboard desktop.
    pub fn desktop() -> Self {
        Self::default()
    }

    /// Tablet with a stylus.
    pub fn stylus_tablet() -> Self {
        Self {
            mobile: true,
            fine_pointer: true,
            touch: true,
        }
    }

    /// In pen-priority mode only pen and touch pointers are processed.
    pub fn pen_priority(&self) -> bool {
        self.mobile && self.fine_pointer && self.touch
    }
}

/// Interpretation of the current two-finger session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Movement still inside the dead zone
    Undecided,
    Zoom,
    Pan,
}

/// What the host should do with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRoute {
    /// Forward to the active tool at this model point
    Draw(Point),
    /// Consumed by navigation
    Navigate,
    /// Not processed
    Ignored,
    /// A second touch arrived mid-draw; discard the tool interaction
    CancelDrawing,
}

/// Viewport and finger state captured when a pinch session starts.
#[derive(Debug, Clone, Copy)]
struct GestureBaseline {
    ids: (u32, u32),
    distance: f64,
    /// Container-relative midpoint
    midpoint: Point,
    viewport: Viewport,
    /// Model point under the midpoint at gesture start
    model_anchor: Point,
}

#[derive(Debug, Clone, Copy)]
struct MiddlePan {
    start: Point,
    viewport: Viewport,
}

/// Routes pointer input and drives viewport navigation.
pub struct GestureController {
    settings: GestureSettings,
    limits: ViewportLimits,
    profile: InputProfile,
    /// Client position of the container's top-left corner
    origin: Point,
    /// Active touch contacts by pointer id (client coordinates)
    pointers: BTreeMap<u32, Point>,
    baseline: Option<GestureBaseline>,
    kind: GestureKind,
    /// Set while two touches are down but too close to start a gesture
    rejected: bool,
    middle_pan: Option<MiddlePan>,
    /// Pointer currently forwarded to the tool
    drawing_pointer: Option<u32>,
    pending: Option<Viewport>,
}

impl GestureController {
    pub fn new(settings: GestureSettings, limits: ViewportLimits, profile: InputProfile) -> Self {
        Self {
            settings,
            limits,
            profile,
            origin: Point::default(),
            pointers: BTreeMap::new(),
            baseline: None,
            kind: GestureKind::Undecided,
            rejected: false,
            middle_pan: None,
            drawing_pointer: None,
            pending: None,
        }
    }

    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    pub fn profile(&self) -> InputProfile {
        self.profile
    }

    pub fn set_profile(&mut self, profile: InputProfile) {
        self.profile = profile;
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Updates the container's client position (layout change or scroll).
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Current two-finger classification, if a gesture is active.
    pub fn kind(&self) -> Option<GestureKind> {
        self.baseline.map(|_| self.kind)
    }

    pub fn is_navigating(&self) -> bool {
        self.baseline.is_some() || self.middle_pan.is_some() || self.pointers.len() >= 2
    }

    pub fn touch_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn has_pending_update(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the pending navigation update, if any.
    ///
    /// Called once per animation frame; returns `true` when the viewport changed.
    pub fn flush(&mut self, viewport: &mut Viewport) -> bool {
        match self.pending.take() {
            Some(update) if update != *viewport => {
                *viewport = update;
                true
            }
            _ => false,
        }
    }

    /// Drops all gesture and pointer state without touching the viewport.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.end_gesture();
        self.middle_pan = None;
        self.drawing_pointer = None;
    }

    fn accepts(&self, event: &PointerEvent) -> bool {
        !(self.profile.pen_priority() && event.pointer_type == PointerType::Mouse)
    }

    fn local(&self, client: Point) -> Point {
        Point::new(client.x - self.origin.x, client.y - self.origin.y)
    }

    /// Latest viewport including an update that has not been flushed yet.
    fn effective(&self, viewport: &Viewport) -> Viewport {
        self.pending.unwrap_or(*viewport)
    }

    pub fn pointer_down(&mut self, event: &PointerEvent, viewport: &Viewport) -> PointerRoute {
        if !self.accepts(event) {
            log::trace!("Ignoring {:?} pointer in pen-priority mode", event.pointer_type);
            return PointerRoute::Ignored;
        }

        match event.button {
            MouseButton::Secondary => return PointerRoute::Ignored,
            MouseButton::Middle => {
                self.middle_pan = Some(MiddlePan {
                    start: event.client,
                    viewport: self.effective(viewport),
                });
                return PointerRoute::Navigate;
            }
            MouseButton::Primary => {}
        }

        if event.pointer_type == PointerType::Touch {
            self.pointers.insert(event.pointer_id, event.client);
            if self.pointers.len() >= 2 {
                if self.baseline.is_none() && !self.rejected {
                    self.begin_gesture(viewport);
                }
                return match self.drawing_pointer.take() {
                    Some(_) => PointerRoute::CancelDrawing,
                    None => PointerRoute::Navigate,
                };
            }
        }

        if self.drawing_pointer.is_some() {
            return PointerRoute::Ignored;
        }
        self.drawing_pointer = Some(event.pointer_id);
        PointerRoute::Draw(viewport.client_to_model(event.client, self.origin))
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, viewport: &Viewport) -> PointerRoute {
        if !self.accepts(event) {
            return PointerRoute::Ignored;
        }

        if event.pointer_type == PointerType::Mouse
            && let Some(pan) = self.middle_pan
        {
            let dx = event.client.x - pan.start.x;
            let dy = event.client.y - pan.start.y;
            self.pending = Some(pan.viewport.panned(dx, dy));
            return PointerRoute::Navigate;
        }

        if event.pointer_type == PointerType::Touch
            && let Some(position) = self.pointers.get_mut(&event.pointer_id)
        {
            *position = event.client;
            if self.pointers.len() >= 2 {
                self.update_gesture();
                return PointerRoute::Navigate;
            }
        }

        if self.drawing_pointer == Some(event.pointer_id) {
            PointerRoute::Draw(viewport.client_to_model(event.client, self.origin))
        } else {
            PointerRoute::Ignored
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent, viewport: &Viewport) -> PointerRoute {
        if !self.accepts(event) {
            return PointerRoute::Ignored;
        }

        if event.button == MouseButton::Middle && self.middle_pan.take().is_some() {
            return PointerRoute::Navigate;
        }

        if event.pointer_type == PointerType::Touch && self.pointers.remove(&event.pointer_id).is_some() {
            let was_navigating = self.baseline.is_some() || self.rejected || !self.pointers.is_empty();
            if self.pointers.len() < 2 {
                self.end_gesture();
            } else if self
                .baseline
                .is_some_and(|b| !self.pointers.contains_key(&b.ids.0) || !self.pointers.contains_key(&b.ids.1))
            {
                self.begin_gesture(viewport);
            }
            if was_navigating && self.drawing_pointer != Some(event.pointer_id) {
                return PointerRoute::Navigate;
            }
        }

        if self.drawing_pointer == Some(event.pointer_id) {
            self.drawing_pointer = None;
            PointerRoute::Draw(viewport.client_to_model(event.client, self.origin))
        } else {
            PointerRoute::Ignored
        }
    }

    /// Zooms synchronously around the cursor.
    ///
    /// The scale changes by `exp(-delta_y * wheel_sensitivity)`, so equal wheel
    /// distances give equal zoom ratios. Zooming out into rest scale snaps the
    /// viewport back to the origin.
    pub fn wheel(&mut self, event: &WheelEvent, viewport: &mut Viewport) -> bool {
        if !event.delta_y.is_finite() || event.delta_y == 0.0 {
            return false;
        }
        let current = self.effective(viewport);
        let factor = (-event.delta_y * self.settings.wheel_sensitivity).exp();
        let mut next = current.zoomed_at(self.local(event.client), current.scale * factor, &self.limits);
        if event.delta_y > 0.0 {
            next = next.snapped_to_rest(current.scale, &self.limits);
        }
        self.pending = None;
        let changed = next != *viewport;
        *viewport = next;
        changed
    }

    fn pair(&self) -> Option<((u32, Point), (u32, Point))> {
        let mut iter = self.pointers.iter().map(|(&id, &p)| (id, p));
        Some((iter.next()?, iter.next()?))
    }

    fn begin_gesture(&mut self, viewport: &Viewport) {
        // Re-baselining keeps the latest unflushed update and continues from it
        let carried = self.pending;
        let viewport = self.effective(viewport);
        self.end_gesture();
        self.pending = carried;
        let Some(((id_a, a), (id_b, b))) = self.pair() else {
            return;
        };

        let distance = util::distance(a, b);
        if distance <= f64::EPSILON || distance < self.settings.min_pinch_separation {
            log::debug!(
                "Two-finger gesture rejected: separation {:.1}px < {:.1}px",
                distance,
                self.settings.min_pinch_separation
            );
            self.rejected = true;
            return;
        }

        let midpoint = self.local(util::midpoint(a, b));
        self.baseline = Some(GestureBaseline {
            ids: (id_a, id_b),
            distance,
            midpoint,
            viewport,
            model_anchor: viewport.local_to_model(midpoint),
        });
        log::debug!("Two-finger gesture started at scale {:.2}", viewport.scale);
    }

    fn end_gesture(&mut self) {
        if self.baseline.take().is_some() {
            log::debug!("Two-finger gesture ended ({:?})", self.kind);
        }
        self.kind = GestureKind::Undecided;
        self.rejected = false;
        self.pending = None;
    }

    fn update_gesture(&mut self) {
        let Some(baseline) = self.baseline else {
            return;
        };
        let (Some(&a), Some(&b)) = (self.pointers.get(&baseline.ids.0), self.pointers.get(&baseline.ids.1)) else {
            return;
        };

        let live_distance = util::distance(a, b);
        let live_midpoint = self.local(util::midpoint(a, b));
        let displacement = util::distance(live_midpoint, baseline.midpoint);

        if self.kind == GestureKind::Undecided {
            if (live_distance - baseline.distance).abs() > self.settings.zoom_threshold {
                self.kind = GestureKind::Zoom;
            } else if displacement > self.settings.pan_threshold {
                self.kind = GestureKind::Pan;
            } else {
                return;
            }
            log::debug!("Two-finger gesture locked to {:?}", self.kind);
        }

        match self.kind {
            GestureKind::Zoom => {
                let scale = baseline.viewport.scale * (live_distance / baseline.distance);
                let next = Viewport::anchored(baseline.model_anchor, live_midpoint, scale, &self.limits)
                    .snapped_to_rest(baseline.viewport.scale, &self.limits);
                self.pending = Some(next);
            }
            GestureKind::Pan => {
                if displacement < self.settings.pan_dead_zone {
                    return;
                }
                if baseline.viewport.is_at_rest(&self.limits) && displacement < self.settings.rest_pan_min_distance {
                    return;
                }
                self.pending = Some(baseline.viewport.panned(
                    live_midpoint.x - baseline.midpoint.x,
                    live_midpoint.y - baseline.midpoint.y,
                ));
            }
            GestureKind::Undecided => {}
        }
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureSettings::default(), ViewportLimits::default(), InputProfile::desktop())
    }
}
