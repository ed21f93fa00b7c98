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

//! wgs84-intercept
//!
//! [![License](https://img.shields.io/badge/License-MIT-blue)](https://opensource.org/license/mit/)
//!
//! A library for calculating distances, bearings and point to line intercepts
//! on the [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid.
//!
//! ## Geodesic navigation
//!
//! The shortest path between two points on the surface of an ellipsoid is a
//! [geodesic](https://en.wikipedia.org/wiki/Geodesics_on_an_ellipsoid).
//! This library calculates:
//!
//! - the distance, initial bearing and final bearing between two positions;
//! - the position at a distance along an initial bearing from a position;
//! - the intercept of a position onto a `Line` between two positions: the
//!   position on the `Line` closest to it;
//! - and the distance from a position to a `Line`.
//!
//! ## Intercepts
//!
//! The intercept is found iteratively in a
//! [gnomonic projection](https://en.wikipedia.org/wiki/Gnomonic_projection)
//! centred at the current estimate. Geodesics through the centre of a
//! gnomonic projection are straight lines, so the perpendicular from the
//! position onto the projected `Line` is a close approximation to the
//! geodesic perpendicular. The foot of the perpendicular is projected back
//! onto the ellipsoid, becoming the centre of the next projection.
//!
//! The iteration ends when the estimate stops moving, when it revisits a
//! previous estimate, when the projection fails or after `MAX_ITERATIONS`.
//! See the `intercept` module.
//!
//! ## Design
//!
//! The geodesic calculations use the correspondence between geodesics on an
//! ellipsoid and great-circle arcs on an auxiliary sphere described by
//! Charles Karney in [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf),
//! the basis of [GeographicLib](https://geographiclib.sourceforge.io/).
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`
//!   and perform great-circle calculations;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.
//! Enable the `tracing` feature to log the intercept iterations.

#![cfg_attr(not(test), no_std)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod ellipsoid;
pub mod geodesic;
pub mod gnomonic;
pub mod intercept;
mod log;
pub mod planar;

pub use angle_sc::{Angle, Degrees, Radians};
pub use icao_units::si::Metres;
pub use intercept::{InterceptError, InterceptOutcome};
pub use unit_sphere::LatLong;

use angle_sc::is_small;
use angle_sc::trig::{cosine_from_sine, UnitNegRange};
use ellipsoid::coefficients::GeodesicSeries;
use gnomonic::Gnomonic;
use intercept::InterceptSolver;
use lazy_static::lazy_static;

/// A position on the surface of the ellipsoid: a longitude and a latitude.
///
/// Note: the longitude comes first. Ranges are not validated: values
/// outside of them are passed to the geodesic calculations as they are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    lon: Degrees,
    lat: Degrees,
}

impl Coordinate {
    /// Constructor.
    /// * `lon` - the longitude.
    /// * `lat` - the latitude.
    #[must_use]
    pub const fn new(lon: Degrees, lat: Degrees) -> Self {
        Self { lon, lat }
    }

    /// A `Coordinate` with not-a-number components: an undefined position.
    #[must_use]
    pub const fn nan() -> Self {
        Self::new(Degrees(f64::NAN), Degrees(f64::NAN))
    }

    /// The longitude.
    #[must_use]
    pub const fn lon(&self) -> Degrees {
        self.lon
    }

    /// The latitude.
    #[must_use]
    pub const fn lat(&self) -> Degrees {
        self.lat
    }

    /// Whether either component is not-a-number.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.lon.0.is_nan() || self.lat.0.is_nan()
    }

    /// The exact bit patterns of the longitude and latitude.
    #[must_use]
    pub fn to_bits(self) -> (u64, u64) {
        (self.lon.0.to_bits(), self.lat.0.to_bits())
    }
}

impl From<&Coordinate> for LatLong {
    fn from(a: &Coordinate) -> Self {
        Self::new(a.lat, a.lon)
    }
}

impl From<&LatLong> for Coordinate {
    fn from(a: &LatLong) -> Self {
        Self::new(a.lon(), a.lat())
    }
}

/// A line between an origin and a destination `Coordinate`.
///
/// The intercept of a position onto a `Line` does not depend upon its
/// direction, but it is always between its end points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    origin: Coordinate,
    destination: Coordinate,
}

impl Line {
    /// Constructor.
    #[must_use]
    pub const fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        self.destination
    }

    /// The arithmetic mean of the end point longitudes and latitudes.
    ///
    /// Note: it is not the geodesic mid point.
    #[must_use]
    pub fn midpoint(&self) -> Coordinate {
        Coordinate::new(
            Degrees((self.origin.lon.0 + self.destination.lon.0) / 2.0),
            Degrees((self.origin.lat.0 + self.destination.lat.0) / 2.0),
        )
    }
}

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The reciprocal of one minus the flattening ratio.
    recip_one_minus_f: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The third flattening of the ellipsoid.
    n: f64,

    /// The A3 series `coefficients` of the ellipsoid.
    a3: [f64; 6],
    /// The C3x series `coefficients` of the ellipsoid.
    c3x: [f64; 15],
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio.
    #[must_use]
    pub fn new(a: Metres, f: f64) -> Self {
        let one_minus_f = 1.0 - f;
        let n = ellipsoid::calculate_3rd_flattening(f);
        Self {
            a,
            f,
            b: ellipsoid::calculate_minor_axis(a, f),
            one_minus_f,
            recip_one_minus_f: 1.0 / one_minus_f,
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            n,
            a3: ellipsoid::coefficients::evaluate_coeffs_a3(n),
            c3x: ellipsoid::coefficients::evaluate_coeffs_c3x(n),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    #[must_use]
    pub const fn recip_one_minus_f(&self) -> f64 {
        self.recip_one_minus_f
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The A3 series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn a3(&self) -> &[f64; 6] {
        &self.a3
    }

    /// The C3x series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn c3x(&self) -> &[f64; 15] {
        &self.c3x
    }

    /// Convert a geodetic Latitude to a parametric Latitude on the
    /// auxiliary sphere.
    #[must_use]
    pub fn calculate_parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::calculate_parametric_latitude(lat, self.one_minus_f)
    }

    /// Convert a parametric Latitude on the auxiliary sphere to a
    /// geodetic Latitude.
    #[must_use]
    pub fn calculate_geodetic_latitude(&self, beta: Angle) -> Angle {
        ellipsoid::calculate_geodetic_latitude(beta, self.one_minus_f)
    }
}

lazy_static! {
    /// A static instance of the WGS-84 `Ellipsoid`.
    pub static ref WGS84_ELLIPSOID: Ellipsoid = Ellipsoid::wgs84();
}

/// A geodesic segment on the surface of an ellipsoid.
///
/// It is represented by a great circle arc on the auxiliary sphere, from
/// a start position along a start azimuth.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicSegment<'a> {
    /// The parametric start latitude on the auxiliary sphere.
    beta: Angle,
    /// The start longitude.
    lon: Angle,
    /// The start azimuth.
    azi: Angle,
    /// Azimuth at the Equator.
    azi0: Angle,
    /// Great circle arc distance to the first Equator crossing.
    sigma1: Angle,
    /// Great circle arc length on the auxiliary sphere in radians.
    arc_length: Radians,
    /// The square of Karney's `k`, derived from Clairaut's constant.
    k2: f64,
    /// The series coefficients of the geodesic.
    series: GeodesicSeries,
    /// constant used to convert geodesic/great circle longitudes.
    a3c: f64,
    /// Start parameter for geodesic/great circle distance differences.
    b11: Radians,
    /// A reference to the underlying `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
}

impl<'a> GeodesicSegment<'a> {
    /// Construct a `GeodesicSegment`
    /// * `beta` - the start point parametric latitude on the auxiliary sphere.
    /// * `lon` - the start point longitude.
    /// * `azi` - the start azimuth.
    /// * `arc_length` - the great circle arc length on the auxiliary sphere in radians.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn new(
        beta: Angle,
        lon: Angle,
        azi: Angle,
        arc_length: Radians,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        let clairaut = UnitNegRange(azi.sin().0 * beta.cos().0);
        let azi0 = Angle::new(clairaut, cosine_from_sine(clairaut, 1.0));

        let sigma1 = Angle::from_y_x(beta.sin().0, beta.cos().0 * azi.cos().0);

        let k2 = ellipsoid::calculate_k2(clairaut.0, ellipsoid.ep_2());
        let series = GeodesicSeries::new(ellipsoid::calculate_epsilon(k2), ellipsoid);
        let a3c = ellipsoid.f() * clairaut.0 * series.a3f();
        let b11 = series.b1(sigma1);
        Self {
            beta,
            lon,
            azi,
            azi0,
            sigma1,
            arc_length,
            k2,
            series,
            a3c,
            b11,
            ellipsoid,
        }
    }

    /// Construct a `GeodesicSegment` from a start position, azimuth and
    /// arc length on the auxiliary sphere.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `arc_length` - the great circle arc length on the auxiliary sphere.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn from_lat_lon_azi_arc_length(
        a: &LatLong,
        azimuth: Angle,
        arc_length: Radians,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        Self::new(
            ellipsoid.calculate_parametric_latitude(Angle::from(a.lat())),
            Angle::from(a.lon()),
            azimuth,
            arc_length,
            ellipsoid,
        )
    }

    /// Construct a `GeodesicSegment` using the "direct" method with the
    /// length in metres.
    /// * `a` - the start position in geodetic coordinates.
    /// * `azimuth` - the azimuth at the start position.
    /// * `length` - the length on the `Ellipsoid` in metres, may be negative.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn from_lat_lon_azi_length(
        a: &LatLong,
        azimuth: Angle,
        length: Metres,
        ellipsoid: &'a Ellipsoid,
    ) -> Self {
        let mut segment = Self::from_lat_lon_azi_arc_length(a, azimuth, Radians(0.0), ellipsoid);
        segment.arc_length = segment.metres_to_radians(length);
        segment
    }

    /// Accessor for the start parametric latitude on the auxiliary sphere.
    #[must_use]
    pub const fn beta(&self) -> Angle {
        self.beta
    }

    /// Accessor for the start longitude.
    #[must_use]
    pub const fn lon(&self) -> Angle {
        self.lon
    }

    /// Accessor for the start azimuth.
    #[must_use]
    pub const fn azi(&self) -> Angle {
        self.azi
    }

    /// Accessor for the arc length on the auxiliary sphere in radians.
    #[must_use]
    pub const fn arc_length(&self) -> Radians {
        self.arc_length
    }

    /// Accessor for the reference to the underlying `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// Convert a distance in metres on the ellipsoid to radians on the
    /// auxiliary sphere.
    /// CFF Karney, Eqs. 20 and 21.
    /// * `distance` - the distance along the `GeodesicSegment` in metres.
    ///
    /// returns the distance along the great circle arc in radians.
    #[must_use]
    pub fn metres_to_radians(&self, distance: Metres) -> Radians {
        if is_small(libm::fabs(distance.0), f64::EPSILON) {
            Radians(0.0)
        } else {
            let tau12 = Radians(distance.0 / (self.ellipsoid.b().0 * self.series.a1()));
            let tau2 = self.sigma1 + Angle::from(self.b11 + tau12);
            tau12 + self.series.b1p(tau2) + self.b11
        }
    }

    /// Convert a great circle distance in radians on the auxiliary sphere
    /// to metres on the ellipsoid.
    /// CFF Karney, Eqs. 7 and 15.
    /// * `arc_distance` - the great circle distance in radians on the auxiliary sphere.
    /// * `sigma` the `arc_distance` as an `Angle`.
    #[must_use]
    pub fn radians_to_metres(&self, arc_distance: Radians, sigma: Angle) -> Metres {
        if is_small(libm::fabs(arc_distance.0), f64::EPSILON) {
            Metres(0.0)
        } else {
            let b12 = self.series.b1(self.sigma1 + sigma);
            Metres(self.ellipsoid.b().0 * self.series.a1() * (arc_distance + b12 - self.b11).0)
        }
    }

    /// The length of the `GeodesicSegment` in metres.
    #[must_use]
    pub fn length(&self) -> Metres {
        self.radians_to_metres(self.arc_length, Angle::from(self.arc_length))
    }

    /// Calculate the parametric latitude at the great circle arc distance.
    /// * `sigma` - the arc distance on the auxiliary sphere as an Angle.
    #[must_use]
    pub fn arc_beta(&self, sigma: Angle) -> Angle {
        let sigma_sum = self.sigma1 + sigma;
        Angle::from_y_x(
            self.azi0.cos().0 * sigma_sum.sin().0,
            libm::hypot(self.azi0.sin().0, self.azi0.cos().0 * sigma_sum.cos().0),
        )
    }

    /// Calculate the geodetic latitude at the great circle arc distance.
    /// * `sigma` - the arc distance on the auxiliary sphere as an Angle.
    #[must_use]
    pub fn arc_latitude(&self, sigma: Angle) -> Angle {
        self.ellipsoid
            .calculate_geodetic_latitude(self.arc_beta(sigma))
    }

    /// Calculate the azimuth at the great circle arc distance.
    /// * `sigma` - the arc distance on the auxiliary sphere as an Angle.
    ///
    /// return the azimuth at `sigma`, due South at the North pole.
    #[must_use]
    pub fn arc_azimuth(&self, sigma: Angle) -> Angle {
        const MAX_LAT: f64 = 1.0 - 2.0 * f64::EPSILON;

        let sigma_sum = self.sigma1 + sigma;
        let sin_beta = self.azi0.cos().0 * sigma_sum.sin().0;

        if MAX_LAT < sin_beta {
            Angle::new(UnitNegRange(0.0), UnitNegRange(-1.0))
        } else {
            Angle::from_y_x(self.azi0.sin().0, self.azi0.cos().0 * sigma_sum.cos().0)
        }
    }

    /// Calculate the geodesic longitude difference at the arc distance
    /// along the auxiliary sphere.
    /// CFF Karney, Eqs. 8 and 23.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    /// * `sigma` - the arc distance as an Angle.
    ///
    /// return the longitude difference from the start point.
    #[must_use]
    pub fn delta_longitude(&self, arc_distance: Radians, sigma: Angle) -> Angle {
        if is_small(libm::fabs(arc_distance.0), f64::EPSILON) {
            return Angle::default();
        }

        // The great circle distance from the Northward Equator crossing.
        let sigma_sum = self.sigma1 + sigma;

        // The longitude difference on the auxiliary sphere, omega12.
        let omega12 = Angle::from_y_x(self.azi0.sin().0 * sigma_sum.sin().0, sigma_sum.cos().0)
            - Angle::from_y_x(
                self.azi0.sin().0 * self.beta.sin().0,
                self.beta.cos().0 * self.azi.cos().0,
            );

        let b31 = self.series.b3(self.sigma1);
        let b32 = self.series.b3(sigma_sum);
        omega12 - Angle::from(Radians(self.a3c * (arc_distance.0 + (b32.0 - b31.0))))
    }

    /// Calculate the geodesic longitude at the great circle arc distance.
    #[must_use]
    pub fn arc_longitude(&self, arc_distance: Radians, sigma: Angle) -> Angle {
        self.lon + self.delta_longitude(arc_distance, sigma)
    }

    /// Calculate the geodesic `LatLong` at the arc distance along the
    /// auxiliary sphere.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    /// * `sigma` - the arc distance as an Angle.
    #[must_use]
    pub fn arc_lat_long(&self, arc_distance: Radians, sigma: Angle) -> LatLong {
        LatLong::new(
            Degrees::from(self.arc_latitude(sigma)),
            Degrees::from(self.arc_longitude(arc_distance, sigma)),
        )
    }

    /// Calculate the geodesic `LatLong` at the distance along the
    /// `GeodesicSegment`.
    /// * `distance` - the distance in `Metres`.
    #[must_use]
    pub fn lat_long(&self, distance: Metres) -> LatLong {
        let arc_distance = self.metres_to_radians(distance);
        self.arc_lat_long(arc_distance, Angle::from(arc_distance))
    }

    /// Calculate the reduced length `m12` and the geodesic scale `M12` at
    /// the great circle arc distance along the auxiliary sphere.
    /// * `arc_distance` - the great circle arc distance on the auxiliary sphere.
    #[must_use]
    pub fn arc_reduced_length_and_scale(&self, arc_distance: Radians) -> (Metres, f64) {
        if is_small(libm::fabs(arc_distance.0), f64::EPSILON) {
            return (Metres(0.0), 1.0);
        }

        let sigma2 = self.sigma1 + Angle::from(arc_distance);
        let (m12b, geodesic_scale) = geodesic::calculate_reduced_length_and_scale(
            &self.series,
            self.k2,
            arc_distance,
            self.sigma1,
            sigma2,
        );
        (Metres(self.ellipsoid.b().0 * m12b), geodesic_scale)
    }
}

/// Calculate the distance between a pair of positions on the WGS-84 ellipsoid.
/// * `origin`, `destination` - the positions.
///
/// returns the length of the geodesic between the positions, zero if they
/// are the same.
///
/// # Examples
/// ```
/// use wgs84_intercept::*;
/// use angle_sc::is_within_tolerance;
///
/// let istanbul = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
/// let washington = Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488));
///
/// let distance = distance_to_point(&istanbul, &washington);
/// assert!(is_within_tolerance(8_419_134.939_770_32, distance.0, 1e-6));
/// ```
#[must_use]
pub fn distance_to_point(origin: &Coordinate, destination: &Coordinate) -> Metres {
    geodesic::calculate_inverse(
        &LatLong::from(origin),
        &LatLong::from(destination),
        &WGS84_ELLIPSOID,
    )
    .distance()
}

/// Calculate the outcome of the search for the intercept of a position onto
/// a `Line` on the WGS-84 ellipsoid.
///
/// The `InterceptOutcome` shows how the search ended: whether it converged,
/// detected a cycle, failed or reached its iteration limit.
#[must_use]
pub fn calculate_intercept(point: &Coordinate, line: &Line) -> InterceptOutcome {
    InterceptSolver::new(Gnomonic::new(&WGS84_ELLIPSOID)).solve(point, line)
}

/// Calculate the intercept of a position onto a `Line` on the WGS-84
/// ellipsoid: the position on the `Line` closest to the position.
/// * `point` - the position.
/// * `line` - the `Line`.
///
/// returns the intercept, with not-a-number components if it cannot be
/// calculated, e.g. when the position is too far from the `Line`.
///
/// # Examples
/// ```
/// use wgs84_intercept::*;
/// use angle_sc::is_within_tolerance;
///
/// let reykjavik = Coordinate::new(Degrees(-21.8524424), Degrees(64.132442));
/// let istanbul = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
/// let washington = Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488));
///
/// let result = intercept(&reykjavik, &Line::new(istanbul, washington));
/// assert!(is_within_tolerance(-21.983148259557282, result.lon().0, 1e-9));
/// assert!(is_within_tolerance(54.38603968291745, result.lat().0, 1e-9));
/// ```
#[must_use]
pub fn intercept(point: &Coordinate, line: &Line) -> Coordinate {
    calculate_intercept(point, line).position()
}

/// Calculate the intercept of a position onto a `Line` on the WGS-84
/// ellipsoid.
///
/// # Errors
///
/// `InterceptError::Degenerate` if the projection failed,
/// `InterceptError::NotConverged` if the iteration limit was reached.
pub fn try_intercept(point: &Coordinate, line: &Line) -> Result<Coordinate, InterceptError> {
    calculate_intercept(point, line).into_result()
}

/// Calculate the distance from a position to a `Line` on the WGS-84
/// ellipsoid: the distance from the position to its intercept.
///
/// returns not-a-number if the intercept cannot be calculated.
#[must_use]
pub fn distance_to_line(point: &Coordinate, line: &Line) -> Metres {
    let b = intercept(point, line);
    if b.is_nan() {
        Metres(f64::NAN)
    } else {
        distance_to_point(point, &b)
    }
}

/// Calculate the position at a distance along a geodesic from a start
/// position on the WGS-84 ellipsoid, the "direct" geodesic problem.
/// * `origin` - the start position.
/// * `azimuth` - the initial bearing, clockwise from North.
/// * `distance` - the distance, negative distances go backwards.
///
/// # Examples
/// ```
/// use wgs84_intercept::*;
/// use angle_sc::is_within_tolerance;
///
/// let origin = Coordinate::new(Degrees(0.0), Degrees(0.0));
/// let result = destination_point(&origin, Degrees(45.0), Metres(1_000_000.0));
/// assert!(is_within_tolerance(6.378_311_855_227_872, result.lon().0, 1e-9));
/// assert!(is_within_tolerance(6.381_348_569_778_495, result.lat().0, 1e-9));
/// ```
#[must_use]
pub fn destination_point(origin: &Coordinate, azimuth: Degrees, distance: Metres) -> Coordinate {
    let segment = GeodesicSegment::from_lat_lon_azi_length(
        &LatLong::from(origin),
        Angle::from(azimuth),
        distance,
        &WGS84_ELLIPSOID,
    );
    let arc_length = segment.arc_length();
    Coordinate::from(&segment.arc_lat_long(arc_length, Angle::from(arc_length)))
}

/// Calculate the initial bearing of the geodesic from `origin` to
/// `destination` on the WGS-84 ellipsoid.
///
/// returns the bearing clockwise from North in the range (-180°, 180°].
#[must_use]
pub fn initial_bearing(origin: &Coordinate, destination: &Coordinate) -> Degrees {
    Degrees::from(
        geodesic::calculate_inverse(
            &LatLong::from(origin),
            &LatLong::from(destination),
            &WGS84_ELLIPSOID,
        )
        .azimuth1(),
    )
}

/// Calculate the final bearing of the geodesic from `origin` to
/// `destination` on the WGS-84 ellipsoid: the bearing on arrival.
#[must_use]
pub fn final_bearing(origin: &Coordinate, destination: &Coordinate) -> Degrees {
    Degrees::from(
        geodesic::calculate_inverse(
            &LatLong::from(origin),
            &LatLong::from(destination),
            &WGS84_ELLIPSOID,
        )
        .azimuth2(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_ellipsoid_wgs84() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        assert_eq!(ellipsoid::wgs84::A, wgs84_ellipsoid.a());
        assert_eq!(ellipsoid::wgs84::F, wgs84_ellipsoid.f());
        assert_eq!(Metres(6_356_752.314_245_179), wgs84_ellipsoid.b());
        assert_eq!(1.0 - ellipsoid::wgs84::F, wgs84_ellipsoid.one_minus_f());
        assert_eq!(
            1.0 / (1.0 - ellipsoid::wgs84::F),
            wgs84_ellipsoid.recip_one_minus_f()
        );
        assert_eq!(0.006_739_496_742_276_434, wgs84_ellipsoid.ep_2());
        assert_eq!(
            ellipsoid::calculate_3rd_flattening(ellipsoid::wgs84::F),
            wgs84_ellipsoid.n()
        );
        assert_eq!(1.0, wgs84_ellipsoid.a3()[0]);
        assert_eq!(15, wgs84_ellipsoid.c3x().len());

        assert_eq!(wgs84_ellipsoid, *WGS84_ELLIPSOID);
    }

    #[test]
    fn test_coordinate() {
        let a = Coordinate::new(Degrees(-21.8524424), Degrees(64.132442));
        assert_eq!(-21.8524424, a.lon().0);
        assert_eq!(64.132442, a.lat().0);
        assert!(!a.is_nan());

        let lat_long = LatLong::from(&a);
        assert_eq!(a.lat(), lat_long.lat());
        assert_eq!(a.lon(), lat_long.lon());
        assert_eq!(a, Coordinate::from(&lat_long));

        assert!(Coordinate::nan().is_nan());
        assert!(Coordinate::new(Degrees(0.0), Degrees(f64::NAN)).is_nan());

        // Signed zeros are different keys
        let zero = Coordinate::new(Degrees(0.0), Degrees(0.0));
        let negative_zero = Coordinate::new(Degrees(-0.0), Degrees(0.0));
        assert_eq!(zero, negative_zero);
        assert_ne!(zero.to_bits(), negative_zero.to_bits());
    }

    #[test]
    fn test_line_midpoint() {
        let line = Line::new(
            Coordinate::new(Degrees(29.0121795), Degrees(41.0053215)),
            Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488)),
        );
        let midpoint = line.midpoint();
        assert!(is_within_tolerance(-24.001_193_5, midpoint.lon().0, 1e-12));
        assert!(is_within_tolerance(39.952_335_15, midpoint.lat().0, 1e-12));

        let reversed = Line::new(line.destination(), line.origin());
        assert_eq!(midpoint, reversed.midpoint());
    }

    #[test]
    fn test_geodesic_segment_direct() {
        let a = LatLong::new(Degrees(0.0), Degrees(0.0));
        let segment = GeodesicSegment::from_lat_lon_azi_length(
            &a,
            Angle::from(Degrees(45.0)),
            Metres(1_000_000.0),
            &WGS84_ELLIPSOID,
        );
        assert!(is_within_tolerance(
            1_000_000.0,
            segment.length().0,
            1e-6
        ));

        let b = segment.lat_long(Metres(1_000_000.0));
        assert!(is_within_tolerance(6.381_348_569_778_495, b.lat().0, 1e-9));
        assert!(is_within_tolerance(6.378_311_855_227_872, b.lon().0, 1e-9));

        // the start of the segment
        let start = segment.lat_long(Metres(0.0));
        assert_eq!(0.0, start.lat().0);
        assert_eq!(0.0, start.lon().0);
        assert_eq!(
            (Metres(0.0), 1.0),
            segment.arc_reduced_length_and_scale(Radians(0.0))
        );
    }

    #[test]
    fn test_geodesic_segment_meridian() {
        let a = LatLong::new(Degrees(-70.0), Degrees(40.0));
        let segment = GeodesicSegment::from_lat_lon_azi_arc_length(
            &a,
            Angle::from(Degrees(0.0)),
            Radians(core::f64::consts::FRAC_PI_2),
            &WGS84_ELLIPSOID,
        );

        // The azimuth is due North until the North pole
        assert_eq!(0.0, Degrees::from(segment.azi()).0);
        let azimuth = segment.arc_azimuth(Angle::from(Radians(0.5)));
        assert!(is_within_tolerance(0.0, Degrees::from(azimuth).0, 1e-12));

        // The longitude does not change along a meridian
        let b = segment.arc_lat_long(segment.arc_length(), Angle::from(segment.arc_length()));
        assert!(is_within_tolerance(40.0, b.lon().0, 1e-12));
        assert!(0.0 < b.lat().0);
    }

    #[test]
    fn test_distance_to_point() {
        let istanbul = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
        let washington = Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488));

        let d1 = distance_to_point(&istanbul, &washington);
        let d2 = distance_to_point(&washington, &istanbul);
        assert!(is_within_tolerance(8_419_134.939_770_32, d1.0, 1e-6));
        assert!(is_within_tolerance(d1.0, d2.0, 1e-6));

        assert_eq!(0.0, distance_to_point(&istanbul, &istanbul).0);
    }

    #[test]
    fn test_bearings() {
        let istanbul = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
        let washington = Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488));

        assert!(is_within_tolerance(
            -50.554_509_218_025_51,
            initial_bearing(&istanbul, &washington).0,
            1e-10
        ));
        assert!(is_within_tolerance(
            -131.504_708_569_650_3,
            final_bearing(&istanbul, &washington).0,
            1e-10
        ));

        // The final bearing is opposite to the initial bearing of the
        // reverse geodesic
        let reverse = initial_bearing(&washington, &istanbul).0;
        assert!(is_within_tolerance(
            -131.504_708_569_650_3 + 180.0,
            reverse,
            1e-10
        ));
    }

    #[test]
    fn test_destination_point() {
        let origin = Coordinate::new(Degrees(0.0), Degrees(0.0));

        let result = destination_point(&origin, Degrees(45.0), Metres(1_000_000.0));
        assert!(is_within_tolerance(6.378_311_855_227_872, result.lon().0, 1e-9));
        assert!(is_within_tolerance(6.381_348_569_778_495, result.lat().0, 1e-9));

        // A negative distance goes backwards
        let result = destination_point(&origin, Degrees(45.0), Metres(-1_000_000.0));
        assert!(is_within_tolerance(-6.378_311_855_227_872, result.lon().0, 1e-9));
        assert!(is_within_tolerance(-6.381_348_569_778_495, result.lat().0, 1e-9));

        // A zero distance stays at the origin
        assert_eq!(origin, destination_point(&origin, Degrees(45.0), Metres(0.0)));
    }

    #[test]
    fn test_direct_inverse_round_trip() {
        let origin = Coordinate::new(Degrees(-21.8524424), Degrees(64.132442));
        for azimuth in [-135.0, -45.0, 0.0, 30.0, 90.0, 179.0] {
            let destination = destination_point(&origin, Degrees(azimuth), Metres(2_500_000.0));
            assert!(is_within_tolerance(
                azimuth,
                initial_bearing(&origin, &destination).0,
                1e-9
            ));
            assert!(is_within_tolerance(
                2_500_000.0,
                distance_to_point(&origin, &destination).0,
                1e-6
            ));
        }
    }

    #[test]
    fn test_intercept() {
        let reykjavik = Coordinate::new(Degrees(-21.8524424), Degrees(64.132442));
        let istanbul = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
        let washington = Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488));
        let line = Line::new(istanbul, washington);

        let result = intercept(&reykjavik, &line);
        assert!(is_within_tolerance(-21.983_148_259_557_282, result.lon().0, 1e-9));
        assert!(is_within_tolerance(54.386_039_682_917_45, result.lat().0, 1e-9));

        // A pure function
        assert_eq!(result, intercept(&reykjavik, &line));
        assert_eq!(Ok(result), try_intercept(&reykjavik, &line));
        assert!(matches!(
            calculate_intercept(&reykjavik, &line),
            InterceptOutcome::Converged { iterations: 2, .. }
        ));

        // The direction of the line does not matter
        let reversed = intercept(&reykjavik, &Line::new(washington, istanbul));
        assert!(is_within_tolerance(result.lon().0, reversed.lon().0, 1e-9));
        assert!(is_within_tolerance(result.lat().0, reversed.lat().0, 1e-9));
    }

    #[test]
    fn test_distance_to_line() {
        let reykjavik = Coordinate::new(Degrees(-21.8524424), Degrees(64.132442));
        let line = Line::new(
            Coordinate::new(Degrees(29.0121795), Degrees(41.0053215)),
            Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488)),
        );

        let distance = distance_to_line(&reykjavik, &line);
        assert!(is_within_tolerance(1_085_757.971_366_864_4, distance.0, 1e-3));
        assert_eq!(
            distance,
            distance_to_point(&reykjavik, &intercept(&reykjavik, &line))
        );
    }

    #[test]
    fn test_intercept_degenerate() {
        // Tokyo is beyond the projection of the Istanbul, Washington line
        let tokyo = Coordinate::new(Degrees(139.6917), Degrees(35.6895));
        let line = Line::new(
            Coordinate::new(Degrees(29.0121795), Degrees(41.0053215)),
            Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488)),
        );

        assert!(intercept(&tokyo, &line).is_nan());
        assert!(distance_to_line(&tokyo, &line).0.is_nan());
        assert!(matches!(
            try_intercept(&tokyo, &line),
            Err(InterceptError::Degenerate { .. })
        ));
    }
}
