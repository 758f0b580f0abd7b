//! Utility functions for colors and stroke geometry.
//!
//! This module provides:
//! - Color name lookup used by the configuration system
//! - Distance helpers used by the eraser hit test
//! - Point-in-polygon test used by the lasso selector
//! - Axis-aligned bounding boxes for selections and dirty checks

use crate::draw::{Color, Point, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color
/// - `None` if the name is not recognized
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Clamps a value to a specified range.
///
/// Unlike [`f64::clamp`] this never panics: an inverted range returns `min`.
pub fn clamp(val: f64, min: f64, max: f64) -> f64 {
    if val < min {
        min
    } else if val > max {
        max
    } else {
        val
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Geometric midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Distance from `p` to the segment `a`-`b`.
///
/// Projects `p` onto the infinite line through `a` and `b`, clamps the
/// parametric position to `[0, 1]` and measures the distance to that clamped
/// point. A zero-length segment degrades to the distance to `a`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq == 0.0 {
        return distance(p, a);
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq;
    let t = clamp(t, 0.0, 1.0);
    let projected = Point::new(a.x + t * dx, a.y + t * dy);
    distance(p, projected)
}

/// Even-odd ray casting test.
///
/// The polygon is implicitly closed (last vertex connects to the first).
/// Polygons with fewer than three vertices contain nothing.
///
/// Boundary convention: a horizontal ray is cast towards +x and an edge is
/// counted when it straddles the ray with a half-open `[min_y, max_y)` span and
/// its crossing lies strictly to the right of the point. For an axis-aligned
/// square this makes the left and top-of-screen (minimum x / minimum y) edges
/// inside, and the right and bottom-of-screen (maximum x / maximum y) edges
/// outside, so adjacent polygons never both claim a shared edge.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let vi = polygon[i];
        let vj = polygon[j];
        if (vi.y > p.y) != (vj.y > p.y) {
            let crossing_x = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < crossing_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounding box in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Builds the tightest box around the given points; `None` when empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in iter {
            bounds.include(*point);
        }
        Some(bounds)
    }

    /// Grows the box so that it contains `point`.
    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Returns a box covering both inputs.
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Returns the box shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
