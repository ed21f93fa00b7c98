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

//! The gnomonic module contains the ellipsoidal
//! [gnomonic projection](https://en.wikipedia.org/wiki/Gnomonic_projection)
//! described by CFF Karney in
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf), section 8.
//!
//! Geodesics through the centre of the projection are straight lines.
//! Other geodesics are very nearly straight near the centre, so lines
//! projected about a nearby centre can be intersected in the plane.

use crate::log::debug;
use crate::planar::Point;
use crate::{geodesic, Coordinate, Ellipsoid, GeodesicSegment, LatLong, Metres};
use angle_sc::{Angle, Radians};

/// The maximum number of Newton iterations of the reverse projection.
pub const MAX_ITERATIONS: u32 = 10;

/// A projection between positions on the ellipsoid and `Point`s in a plane
/// about a centre position.
pub trait Projection {
    /// Project `position` into the plane about `center`.
    ///
    /// returns not-a-number components if `position` cannot be projected.
    fn forward(&self, center: &Coordinate, position: &Coordinate) -> Point;

    /// Project `point` in the plane about `center` back onto the ellipsoid.
    ///
    /// returns not-a-number components if `point` cannot be projected.
    fn reverse(&self, center: &Coordinate, point: &Point) -> Coordinate;
}

/// The gnomonic projection on an `Ellipsoid`.
#[derive(Clone, Copy, Debug)]
pub struct Gnomonic<'a> {
    ellipsoid: &'a Ellipsoid,
}

impl<'a> Gnomonic<'a> {
    #[must_use]
    pub const fn new(ellipsoid: &'a Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// Solve the reverse projection of `point` about `center`.
    ///
    /// The position is on the geodesic from `center` along the azimuth of
    /// `point`, at the distance where `m12 / M12` is the distance of `point`
    /// from the centre. The distance is found by Newton's method, solving for
    /// `M12 / m12` instead beyond the Semimajor axis.
    /// * `center` - the centre of the projection.
    /// * `point` - the point in the projection plane.
    ///
    /// returns the position and the number of Newton iterations, or None if
    /// the search did not converge within `MAX_ITERATIONS`.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    #[must_use]
    pub fn solve_reverse(&self, center: &Coordinate, point: &Point) -> Option<(Coordinate, u32)> {
        if point.is_nan() || center.is_nan() {
            return None;
        }

        let a = self.ellipsoid.a().0;
        let tolerance = 0.01 * libm::sqrt(f64::EPSILON) * a;

        let azimuth = Angle::from(Radians(libm::atan2(point.x, point.y)));
        let rho = libm::hypot(point.x, point.y);
        let mut s = a * libm::atan(rho / a);
        let little = rho <= a;
        let rho = if little { rho } else { 1.0 / rho };

        let segment = GeodesicSegment::from_lat_lon_azi_arc_length(
            &LatLong::from(center),
            azimuth,
            Radians(0.0),
            self.ellipsoid,
        );

        let mut position = Coordinate::nan();
        let mut converged = false;
        for iteration in 0..MAX_ITERATIONS {
            let sigma = segment.metres_to_radians(Metres(s));
            position = Coordinate::from(&segment.arc_lat_long(sigma, Angle::from(sigma)));
            if converged {
                return Some((position, iteration));
            }

            let (m12, geodesic_scale) = segment.arc_reduced_length_and_scale(sigma);
            let ds = if little {
                (m12.0 - rho * geodesic_scale) * geodesic_scale
            } else {
                (rho * m12.0 - geodesic_scale) * m12.0
            };
            s -= ds;

            // reversed, so that not-a-number escapes
            if !(libm::fabs(ds) >= tolerance) {
                converged = true;
            }
        }

        if converged {
            Some((position, MAX_ITERATIONS))
        } else {
            debug!(x = point.x, y = point.y, "gnomonic reverse did not converge");
            None
        }
    }
}

impl Projection for Gnomonic<'_> {
    fn forward(&self, center: &Coordinate, position: &Coordinate) -> Point {
        if center.is_nan() || position.is_nan() {
            return Point::nan();
        }

        let result = geodesic::calculate_inverse(
            &LatLong::from(center),
            &LatLong::from(position),
            self.ellipsoid,
        );
        if result.geodesic_scale() <= 0.0 {
            return Point::nan();
        }

        let rho = result.reduced_length().0 / result.geodesic_scale();
        let azimuth = result.azimuth1();
        Point::new(rho * azimuth.sin().0, rho * azimuth.cos().0)
    }

    fn reverse(&self, center: &Coordinate, point: &Point) -> Coordinate {
        self.solve_reverse(center, point)
            .map_or_else(Coordinate::nan, |(position, _)| position)
    }
}
