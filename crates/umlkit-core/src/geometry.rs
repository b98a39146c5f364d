//! Geometric primitives for element placement on the canvas.
//!
//! This module provides the small set of geometric types the editor needs to
//! describe where elements live and how large they are.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Canvas coordinates follow the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```

use serde::Deserialize;

/// A 2D point representing a position on the canvas.
///
/// # Examples
///
/// ```
/// # use umlkit_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let offset = p1.sub_point(p2);
/// assert_eq!(offset.x(), 5.0);
/// assert_eq!(offset.y(), 15.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean distance from the origin
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Dimensions of an element.
///
/// `Size` is deserializable so it can be used directly in configuration
/// files (`{ width = 100, height = 80 }`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height of both sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns true if both dimensions are finite and strictly positive
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the same top-left corner with a different size
    pub fn with_size(self, size: Size) -> Self {
        Self::new_from_top_left(self.min_point(), size)
    }

    /// Returns true if the point lies inside the bounds (edges included)
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlkit_core::geometry::{Bounds, Point, Size};
    /// let class = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 80.0));
    /// let label = Bounds::new_from_top_left(Point::new(10.0, 90.0), Size::new(120.0, 20.0));
    ///
    /// let combined = class.merge(&label);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 110.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Point where the ray from the center towards `point` leaves the bounds.
    ///
    /// Returns `point` itself when it lies inside the bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlkit_core::geometry::{Bounds, Point, Size};
    /// let bounds = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(100.0, 80.0));
    /// assert_eq!(bounds.boundary_towards(Point::new(200.0, 0.0)), Point::new(50.0, 0.0));
    /// ```
    pub fn boundary_towards(self, point: Point) -> Point {
        let center = self.center();
        let direction = point.sub_point(center);
        if direction.hypot() < 0.001 {
            return point;
        }

        let scale_x = if direction.x() == 0.0 {
            f32::INFINITY
        } else {
            (self.width() / 2.0) / direction.x().abs()
        };
        let scale_y = if direction.y() == 0.0 {
            f32::INFINITY
        } else {
            (self.height() / 2.0) / direction.y().abs()
        };
        let scale = scale_x.min(scale_y);
        if scale >= 1.0 {
            return point;
        }

        Point::new(
            direction.x().mul_add(scale, center.x()),
            direction.y().mul_add(scale, center.y()),
        )
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}
