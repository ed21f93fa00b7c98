// Copyright (c) 2024-2026 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The planar module contains the geometry of the projection plane:
//! the foot of the perpendicular from a `Point` onto a `Vector`, clamped
//! to the `Vector`'s end points.
//!
//! Points are offsets in metres from the centre of a projection; `Point`s
//! from projections with different centres must not be mixed.

#![allow(clippy::float_cmp)]

/// A point in the projection plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A `Point` with not-a-number components: outside of the projection.
    #[must_use]
    pub const fn nan() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// Whether either component is not-a-number.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

/// A line segment in the projection plane, between two `Point`s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    pub start: Point,
    pub end: Point,
}

impl Vector {
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Whether `value` is in the closed range between `a` and `b`, in either order.
///
/// Not-a-number is never in range.
#[must_use]
pub fn in_range(value: f64, a: f64, b: f64) -> bool {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    (min..=max).contains(&value)
}

/// The one of `a` and `b` nearer to `value`, `a` if they are equally near.
///
/// returns `value` if it is not-a-number.
#[must_use]
pub fn nearest(value: f64, a: f64, b: f64) -> f64 {
    if value.is_nan() {
        value
    } else if libm::fabs(value - a) <= libm::fabs(value - b) {
        a
    } else {
        b
    }
}

/// Clamp `value` to the closed range between `a` and `b`, to the nearer
/// one if it is outside.
fn clamp(value: f64, a: f64, b: f64) -> f64 {
    if in_range(value, a, b) {
        value
    } else {
        nearest(value, a, b)
    }
}

/// Calculate the foot of the perpendicular from `point` onto the line
/// through `vector`, clamped to the `vector` end points on each axis.
/// * `vector` - the line segment.
/// * `point` - the point.
///
/// Horizontal and vertical lines are detected by exact comparison.
/// Degenerate input, e.g. a zero length `vector`, may give not-a-number
/// components.
///
/// # Examples
/// ```
/// use wgs84_intercept::planar::{intersect, Point, Vector};
///
/// let vector = Vector::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
/// assert_eq!(Point::new(5.0, 0.0), intersect(&vector, &Point::new(5.0, 7.0)));
/// ```
#[must_use]
pub fn intersect(vector: &Vector, point: &Point) -> Point {
    let p1 = vector.start;
    let p2 = vector.end;

    let (x, y) = if p1.y == p2.y {
        (point.x, p1.y)
    } else if p1.x == p2.x {
        (p1.x, point.y)
    } else {
        let m = (p2.y - p1.y) / (p2.x - p1.x);
        let b = p1.y - m * p1.x;
        // the perpendicular through point
        let m2 = -1.0 / m;
        let b2 = point.y - m2 * point.x;

        let x = (b2 - b) / (m - m2);
        (x, m * x + b)
    };

    Point::new(clamp(x, p1.x, p2.x), clamp(y, p1.y, p2.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_in_range() {
        assert!(in_range(5.0, 0.0, 10.0));
        assert!(in_range(5.0, 10.0, 0.0));
        assert!(in_range(0.0, 0.0, 10.0));
        assert!(in_range(10.0, 10.0, 0.0));
        assert!(in_range(-3.0, -3.0, -3.0));

        assert!(!in_range(-0.1, 0.0, 10.0));
        assert!(!in_range(10.1, 10.0, 0.0));
        assert!(!in_range(f64::NAN, 0.0, 10.0));
    }

    #[test]
    fn test_nearest() {
        assert_eq!(0.0, nearest(-1.0, 0.0, 10.0));
        assert_eq!(10.0, nearest(11.0, 0.0, 10.0));
        assert_eq!(10.0, nearest(11.0, 10.0, 0.0));

        // ties go to the first
        assert_eq!(0.0, nearest(5.0, 0.0, 10.0));
        assert_eq!(10.0, nearest(5.0, 10.0, 0.0));

        assert!(nearest(f64::NAN, 0.0, 10.0).is_nan());
    }

    #[test]
    fn test_intersect_horizontal() {
        let vector = Vector::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(
            Point::new(5.0, 0.0),
            intersect(&vector, &Point::new(5.0, 7.0))
        );
        assert_eq!(
            Point::new(3.0, 0.0),
            intersect(&vector, &Point::new(3.0, -7.0))
        );

        // beyond the end of the vector
        assert_eq!(
            Point::new(10.0, 0.0),
            intersect(&vector, &Point::new(15.0, 7.0))
        );
        assert_eq!(
            Point::new(0.0, 0.0),
            intersect(&vector, &Point::new(-15.0, 7.0))
        );
    }

    #[test]
    fn test_intersect_vertical() {
        let vector = Vector::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert_eq!(
            Point::new(0.0, 5.0),
            intersect(&vector, &Point::new(7.0, 5.0))
        );

        // a reversed vector
        let vector = Vector::new(Point::new(0.0, 10.0), Point::new(0.0, 0.0));
        assert_eq!(
            Point::new(0.0, 10.0),
            intersect(&vector, &Point::new(7.0, 12.0))
        );
    }

    #[test]
    fn test_intersect_diagonal() {
        let vector = Vector::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let result = intersect(&vector, &Point::new(0.0, 10.0));
        assert!(is_within_tolerance(5.0, result.x, 4.0 * f64::EPSILON));
        assert!(is_within_tolerance(5.0, result.y, 4.0 * f64::EPSILON));

        let vector = Vector::new(Point::new(-2.0, 4.0), Point::new(6.0, 0.0));
        let result = intersect(&vector, &Point::new(3.0, 6.0));
        // the foot of the perpendicular is on the line: y = 3 - x / 2
        assert!(is_within_tolerance(3.0 - result.x / 2.0, result.y, 8.0 * f64::EPSILON));
        // and perpendicular to it
        let dot = (result.x - 3.0) * 8.0 + (result.y - 6.0) * -4.0;
        assert!(is_within_tolerance(0.0, dot, 64.0 * f64::EPSILON));
    }

    #[test]
    fn test_intersect_clamped() {
        let vector = Vector::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(
            Point::new(10.0, 10.0),
            intersect(&vector, &Point::new(20.0, 20.0))
        );
        assert_eq!(
            Point::new(0.0, 0.0),
            intersect(&vector, &Point::new(-20.0, -15.0))
        );

        // each axis is clamped independently
        let vector = Vector::new(Point::new(0.0, 0.0), Point::new(10.0, 1.0));
        let result = intersect(&vector, &Point::new(20.0, -50.0));
        assert_eq!(10.0, result.x);
        assert!(in_range(result.y, 0.0, 1.0));
    }

    #[test]
    fn test_intersect_nan() {
        let vector = Vector::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(intersect(&vector, &Point::nan()).is_nan());

        let vector = Vector::new(Point::nan(), Point::new(10.0, 10.0));
        assert!(intersect(&vector, &Point::new(5.0, 5.0)).is_nan());
    }
}
