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

//! The geodesic module solves the inverse geodesic problem: the shortest
//! path between a pair of points on the surface of an ellipsoid.
//!
//! The path is found as a great circle arc on the auxiliary sphere, using
//! Newton's method on the azimuth at the start of the arc, see CFF Karney
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).
//! Besides the azimuths and length, the solution carries the differential
//! quantities: the reduced length `m12` and the geodesic scale `M12`.

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use crate::ellipsoid::coefficients::{evaluate_polynomial, GeodesicSeries};
use crate::ellipsoid::{calculate_epsilon, calculate_k2, calculate_parametric_latitude};
use crate::{Ellipsoid, GeodesicSegment, Metres};
use angle_sc::trig::{cosine_from_sine, UnitNegRange};
use angle_sc::{is_small, Angle, Radians};
use unit_sphere::great_circle;
use unit_sphere::LatLong;

/// The maximum precision, in Radians.
pub const MAX_PRECISION: Radians = Radians(2.0 * f64::EPSILON);

/// The maximum number of Newton iterations to find the start azimuth.
pub const MAX_ITERATIONS: u32 = 20;

/// Estimate omega12 by solving the astroid problem.
/// Solve k^4+2*k^3-(x^2+y^2-1)*k^2-2*y^2*k-y^2 = 0 for positive root k.
/// * `x`, `y` - astroid parameters, see Karney section 7.
///
/// returns the solution to the astroid problem.
#[must_use]
fn calculate_astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.0) / 6.0;

    // y = 0 with |x| <= 1
    if (q <= 0.0) && (r <= 0.0) {
        return 0.0;
    }

    let s = p * q / 4.0;
    let r2 = r * r;
    let r3 = r * r2;
    let mut u = r;

    // The discriminant of the quadratic equation for T3.
    // It is zero on the evolute curve p^(1/3)+q^(1/3) = 1
    let discriminant = s * (s + 2.0 * r3);
    if 0.0 <= discriminant {
        // Pick the sign of the sqrt to maximise abs(T3)
        let t3 = s + r3;
        let t3 = t3 + libm::copysign(libm::sqrt(discriminant), t3);
        let t = libm::cbrt(t3);
        u += if t == 0.0 { 0.0 } else { t + r2 / t };
    } else {
        // T is complex, but u is real.
        // Choose the cube root which avoids cancellation, r < 0 here.
        let angle = libm::atan2(libm::sqrt(-discriminant), -(s + r3));
        u += 2.0 * r * libm::cos(angle / 3.0);
    }

    let v = libm::sqrt(u * u + q);
    // u + v, positive
    let uv = if u < 0.0 { q / (v - u) } else { u + v };
    let w = (uv - q) / (2.0 * v);

    // uv > 0 and w >= 0
    uv / (libm::sqrt(uv + w * w) + w)
}

/// Estimate the initial azimuth on the auxiliary sphere for a nearly antipodal arc.
/// It calculates and solves the astroid problem.
/// * `beta1`, `beta2` - the parametric latitudes of the start and finish points
///   on the auxiliary sphere.
/// * `lambda12` - Longitude difference between start and finish points.
#[must_use]
fn estimate_antipodal_initial_azimuth(
    beta1: Angle,
    beta2: Angle,
    lambda12: Angle,
    ellipsoid: &Ellipsoid,
) -> Angle {
    const Y_TOLERANCE: f64 = 200.0 * f64::EPSILON;
    const X_TOLERANCE: f64 = 2000.0 / core::f64::consts::FRAC_2_SQRT_PI;

    // The integration parameter, assuming sin alpha1 = 1
    let eps = calculate_epsilon(calculate_k2(beta1.cos().0, ellipsoid.ep_2()));
    let a3f = evaluate_polynomial(ellipsoid.a3(), eps);

    let lamscale = ellipsoid.f() * beta1.cos().0 * a3f * core::f64::consts::PI;
    let betscale = lamscale * beta1.cos().0;

    let x = Radians::from(lambda12.opposite()).0 / lamscale;
    let y = (beta1 + beta2).sin().0 / betscale;

    if (x <= -(1.0 + X_TOLERANCE)) || (y < -Y_TOLERANCE) {
        let k = calculate_astroid(x, y);
        let omg12a = lamscale * (-x * k / (1.0 + k));

        let omega12 = Radians(core::f64::consts::PI - omg12a);
        great_circle::calculate_gc_azimuth(beta1, beta2, Angle::from(omega12))
    } else {
        let sin_alpha = UnitNegRange(if -x < 1.0 { -x } else { 1.0 });
        Angle::new(sin_alpha, cosine_from_sine(sin_alpha, -1.0))
    }
}

/// Calculate the cosine of the longitude difference from the Equator crossing.
/// * `beta` the parametric latitude
/// * `cos_azimuth` the cosine of the azimuth at the parametric latitude
///
/// returns the cosine of the longitude difference, one if the parametric
/// latitude is close to the Equator.
#[must_use]
pub fn calculate_cos_omega(beta: Angle, cos_azimuth: UnitNegRange) -> UnitNegRange {
    if is_small(libm::fabs(beta.sin().0), f64::EPSILON) {
        UnitNegRange(1.0)
    } else {
        UnitNegRange(cos_azimuth.0 * beta.cos().0)
    }
}

/// Calculate the azimuth on the auxiliary sphere at latitude `beta2` given
/// the latitude `beta1` and the azimuth there: `alpha1`.
#[must_use]
fn calculate_end_azimuth(beta1: Angle, beta2: Angle, alpha1: Angle) -> Angle {
    let clairaut = alpha1.sin().0 * beta1.cos().0;
    let same_cos_beta = beta2.cos() == beta1.cos();

    let sin_alpha2 = if same_cos_beta {
        alpha1.sin()
    } else {
        UnitNegRange::clamp(clairaut / beta2.cos().0)
    };

    let cos_alpha2 = if !same_cos_beta || (libm::fabs(beta2.sin().0) != -beta1.sin().0) {
        let t1 = alpha1.cos().0 * beta1.cos().0;
        let t2 = if beta1.cos().0 < libm::fabs(beta1.sin().0) {
            (beta2.cos().0 - beta1.cos().0) * (beta1.cos().0 + beta2.cos().0)
        } else {
            (beta1.sin().0 - beta2.sin().0) * (beta1.sin().0 + beta2.sin().0)
        };
        let t3 = t1 * t1 + t2;
        UnitNegRange::clamp(if 0.0 < t3 {
            libm::sqrt(t3) / beta2.cos().0
        } else {
            0.0
        })
    } else {
        UnitNegRange(libm::fabs(alpha1.cos().0))
    };

    Angle::new(sin_alpha2, cos_alpha2)
}

/// Calculate the longitude difference between the auxiliary sphere and
/// the ellipsoid.
/// * `clairaut` - Clairaut's constant.
/// * `series` - the series coefficients of the geodesic.
/// * `sigma12` - the arc length on the auxiliary sphere.
/// * `sigma1`, `sigma2` - the arc distances from the Equator crossing.
#[must_use]
fn delta_omega12(
    clairaut: UnitNegRange,
    series: &GeodesicSeries,
    sigma12: Radians,
    sigma1: Angle,
    sigma2: Angle,
    ellipsoid: &Ellipsoid,
) -> f64 {
    let a3c = ellipsoid.f() * clairaut.0 * series.a3f();
    a3c * (sigma12 + (series.b3(sigma2) - series.b3(sigma1))).0
}

/// Calculate the reduced length, divided by the Semiminor axis, and the
/// geodesic scale of a geodesic.
/// CFF Karney, Eqs. 38, 39 and 40.
/// * `series` - the series coefficients of the geodesic.
/// * `k2` - the square of Karney's `k` for the geodesic.
/// * `sigma12` - the arc length on the auxiliary sphere.
/// * `sigma1`, `sigma2` - the arc distances from the Equator crossing.
///
/// returns `m12 / b` and `M12`.
#[must_use]
pub(crate) fn calculate_reduced_length_and_scale(
    series: &GeodesicSeries,
    k2: f64,
    sigma12: Radians,
    sigma1: Angle,
    sigma2: Angle,
) -> (f64, f64) {
    let (sin_sigma1, cos_sigma1) = (sigma1.sin().0, sigma1.cos().0);
    let (sin_sigma2, cos_sigma2) = (sigma2.sin().0, sigma2.cos().0);
    let dn1 = libm::sqrt(1.0 + k2 * sin_sigma1 * sin_sigma1);
    let dn2 = libm::sqrt(1.0 + k2 * sin_sigma2 * sin_sigma2);

    let j12 = series.j12(sigma12, sigma1, sigma2);
    let m12b = dn2 * (cos_sigma1 * sin_sigma2)
        - dn1 * (sin_sigma1 * cos_sigma2)
        - cos_sigma1 * cos_sigma2 * j12;

    let t = k2 * (sin_sigma2 - sin_sigma1) * (sin_sigma2 + sin_sigma1) / (dn1 + dn2);
    let geodesic_scale =
        libm::cos(sigma12.0) + (t * sin_sigma2 - cos_sigma2 * j12) * sin_sigma1 / dn1;

    (m12b, geodesic_scale)
}

/// Find the azimuth and great circle length on the auxiliary sphere.
/// It uses Newton's method to solve:
///   f(alp1) = lambda12(alp1) - lam12 = 0
/// * `lat_a`, `lat_b` - the geodetic latitudes of the start and finish points.
/// * `lambda12` - Longitude difference between start and finish points.
/// * `gc_length` - the great circle length between the points.
///
/// returns the azimuth and great circle length on the auxiliary sphere at the
/// start of the geodesic and the number of iterations taken.
#[allow(clippy::similar_names)]
#[must_use]
fn find_azimuth_and_aux_length(
    lat_a: Angle,
    lat_b: Angle,
    lambda12: Angle,
    gc_length: Radians,
    ellipsoid: &Ellipsoid,
) -> (Angle, Radians, u32) {
    let antipodal_arc_threshold = core::f64::consts::PI * ellipsoid.one_minus_f();

    // Start at the latitude furthest from the Equator
    let swap_latitudes = libm::fabs(lat_a.sin().0) < libm::fabs(lat_b.sin().0);
    let (mut lat1, mut lat2) = if swap_latitudes {
        (lat_b, lat_a)
    } else {
        (lat_a, lat_b)
    };

    // Start South of the Equator
    let negate_latitude = 0.0 < lat1.sin().0;
    if negate_latitude {
        lat1 = -lat1;
        lat2 = -lat2;
    }

    let beta1 = calculate_parametric_latitude(lat1, ellipsoid.one_minus_f());
    let beta2 = calculate_parametric_latitude(lat2, ellipsoid.one_minus_f());

    let dn1 = libm::sqrt(1.0 + ellipsoid.ep_2() * beta1.sin().0 * beta1.sin().0);

    // Use positive lambda12, so all azimuths are positive
    let abs_lambda12 = lambda12.abs();

    let mut alpha1 = if antipodal_arc_threshold < gc_length.0 {
        estimate_antipodal_initial_azimuth(beta1, beta2, abs_lambda12, ellipsoid)
    } else {
        great_circle::calculate_gc_azimuth(lat1, lat2, abs_lambda12)
    };
    let mut alpha2 = alpha1;
    let mut sigma12_rad = gc_length;
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let clairaut = UnitNegRange(alpha1.sin().0 * beta1.cos().0);
        let k2 = calculate_k2(clairaut.0, ellipsoid.ep_2());
        let series = GeodesicSeries::new(calculate_epsilon(k2), ellipsoid);

        // The longitude (omega1) and distance (sigma1) from the
        // Northbound Equator crossing
        let cos_omega1 = calculate_cos_omega(beta1, alpha1.cos());
        let omega1 = Angle::from_y_x(clairaut.0 * beta1.sin().0, cos_omega1.0);
        let sigma1 = Angle::from_y_x(beta1.sin().0, cos_omega1.0);

        alpha2 = calculate_end_azimuth(beta1, beta2, alpha1);

        let cos_omega2 = calculate_cos_omega(beta2, alpha2.cos());
        let omega2 = Angle::from_y_x(clairaut.0 * beta2.sin().0, cos_omega2.0);
        let sigma2 = Angle::from_y_x(beta2.sin().0, cos_omega2.0);

        // clamp omega12 and sigma12 to the range 0 to Pi
        let mut omega12 = omega2 - omega1;
        if omega12.sin() < UnitNegRange(0.0) {
            omega12 = Angle::from_y_x(0.0, omega12.cos().0);
        }
        let mut sigma12 = sigma2 - sigma1;
        if sigma12.sin() < UnitNegRange(0.0) {
            sigma12 = Angle::from_y_x(0.0, sigma12.cos().0);
        }

        // The difference between the geodesic and great circle longitudes
        let eta = Radians::from(omega12 - abs_lambda12);
        sigma12_rad = Radians::from(sigma12);
        let domg12 = delta_omega12(clairaut, &series, sigma12_rad, sigma1, sigma2, ellipsoid);

        let v = eta.0 - domg12;
        if is_small(libm::fabs(v), MAX_PRECISION.0) {
            break;
        }

        // The derivative of v with respect to alpha1, Karney Eq. 46
        let dv = if is_small(libm::fabs(alpha2.cos().0), f64::EPSILON) {
            -2.0 * ellipsoid.one_minus_f() * dn1 / beta1.sin().0
        } else {
            let (m12b, _) =
                calculate_reduced_length_and_scale(&series, k2, sigma12_rad, sigma1, sigma2);
            ellipsoid.one_minus_f() * m12b / (alpha2.cos().0 * beta2.cos().0)
        };
        if is_small(libm::fabs(dv), MAX_PRECISION.0) {
            break;
        }

        let dalpha1 = UnitNegRange::clamp(-v / dv);
        if is_small(libm::fabs(dalpha1.0), MAX_PRECISION.0) {
            break;
        }

        alpha1 = alpha1 + Angle::from(Radians(dalpha1.0));
    }

    if swap_latitudes {
        alpha1 = alpha2;
    }
    if swap_latitudes != negate_latitude {
        alpha1 = alpha1.negate_cos();
    }
    if lambda12.sin().0 < 0.0 {
        alpha1 = -alpha1;
    }

    (alpha1, sigma12_rad, iterations)
}

/// Calculate the initial azimuth and great circle length between a pair
/// of points on the auxiliary sphere.
/// * `lat1`, `lat2` - the geodetic latitudes of the start and finish points.
/// * `delta_long` - the geodetic longitude difference.
///
/// returns the azimuth and great circle length on the auxiliary sphere at the
/// start of the geodesic and the number of Newton iterations taken:
/// zero for coincident, meridional and equatorial geodesics.
#[must_use]
pub fn aux_sphere_azimuth_length(
    lat1: Angle,
    lat2: Angle,
    delta_long: Angle,
    ellipsoid: &Ellipsoid,
) -> (Angle, Radians, u32) {
    const MIN_VALUE: UnitNegRange = UnitNegRange(2.0 * f64::EPSILON);
    const MAX_LENGTH: Radians = Radians(core::f64::consts::PI - 2.0 * MIN_VALUE.0);

    let gc_azimuth = great_circle::calculate_gc_azimuth(lat1, lat2, delta_long);
    let gc_length = great_circle::calculate_gc_distance(lat1, lat2, delta_long);
    if gc_length.0 <= MIN_VALUE.0 {
        return (gc_azimuth, Radians(0.0), 0);
    }

    // Meridional geodesics, including those passing over a pole
    let abs_delta_long = Radians::from(delta_long.abs());
    if (abs_delta_long.0 <= MIN_VALUE.0)
        || (MAX_LENGTH <= abs_delta_long)
        || (lat1.cos() <= MIN_VALUE)
        || (lat2.cos() <= MIN_VALUE)
    {
        let meridian_length = if MAX_LENGTH <= gc_length {
            Radians(core::f64::consts::PI)
        } else {
            let beta1 = calculate_parametric_latitude(lat1, ellipsoid.one_minus_f());
            let beta2 = calculate_parametric_latitude(lat2, ellipsoid.one_minus_f());
            great_circle::calculate_gc_distance(beta1, beta2, delta_long)
        };
        return (gc_azimuth, meridian_length, 0);
    }

    // Equatorial geodesics
    if (lat1.abs().sin() <= MIN_VALUE) && (lat2.abs().sin() <= MIN_VALUE) {
        let equator_length = Radians(gc_length.0 * ellipsoid.recip_one_minus_f());
        return (gc_azimuth, equator_length, 0);
    }

    find_azimuth_and_aux_length(lat1, lat2, delta_long, gc_length, ellipsoid)
}

/// Calculate the geodesic azimuth and great circle length on the auxiliary
/// sphere between a pair of positions.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
#[must_use]
pub fn calculate_azimuth_aux_length(
    a: &LatLong,
    b: &LatLong,
    ellipsoid: &Ellipsoid,
) -> (Angle, Radians, u32) {
    let a_lat = Angle::from(a.lat());
    let b_lat = Angle::from(b.lat());
    let delta_long = Angle::from(b.lon() - a.lon());
    aux_sphere_azimuth_length(a_lat, b_lat, delta_long, ellipsoid)
}

/// The solution of the inverse geodesic problem between a pair of positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicInverse {
    azimuth1: Angle,
    azimuth2: Angle,
    arc_length: Radians,
    distance: Metres,
    reduced_length: Metres,
    geodesic_scale: f64,
    iterations: u32,
}

impl GeodesicInverse {
    /// The azimuth at the start position.
    #[must_use]
    pub const fn azimuth1(&self) -> Angle {
        self.azimuth1
    }

    /// The azimuth at the finish position, in the direction of travel.
    #[must_use]
    pub const fn azimuth2(&self) -> Angle {
        self.azimuth2
    }

    /// The great circle arc length on the auxiliary sphere.
    #[must_use]
    pub const fn arc_length(&self) -> Radians {
        self.arc_length
    }

    /// The length of the geodesic.
    #[must_use]
    pub const fn distance(&self) -> Metres {
        self.distance
    }

    /// The reduced length of the geodesic, `m12`.
    #[must_use]
    pub const fn reduced_length(&self) -> Metres {
        self.reduced_length
    }

    /// The geodesic scale of the finish position relative to the start, `M12`.
    #[must_use]
    pub const fn geodesic_scale(&self) -> f64 {
        self.geodesic_scale
    }

    /// The number of Newton iterations taken to find `azimuth1`.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Solve the inverse geodesic problem between a pair of positions.
/// * `a`, `b` - the start and finish positions in geodetic coordinates.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// # Examples
/// ```
/// use wgs84_intercept::{geodesic, Degrees, LatLong, WGS84_ELLIPSOID};
/// use angle_sc::is_within_tolerance;
///
/// let a = LatLong::new(Degrees(0.0), Degrees(0.0));
/// let b = LatLong::new(Degrees(0.0), Degrees(90.0));
/// let result = geodesic::calculate_inverse(&a, &b, &WGS84_ELLIPSOID);
///
/// // a quarter of the Equator
/// assert!(is_within_tolerance(10_018_754.171394622, result.distance().0, 1e-6));
/// assert_eq!(90.0, Degrees::from(result.azimuth1()).0);
/// ```
#[must_use]
pub fn calculate_inverse(a: &LatLong, b: &LatLong, ellipsoid: &Ellipsoid) -> GeodesicInverse {
    let (azimuth1, arc_length, iterations) = calculate_azimuth_aux_length(a, b, ellipsoid);
    let segment = GeodesicSegment::from_lat_lon_azi_arc_length(a, azimuth1, arc_length, ellipsoid);
    let (reduced_length, geodesic_scale) = segment.arc_reduced_length_and_scale(arc_length);
    GeodesicInverse {
        azimuth1,
        azimuth2: segment.arc_azimuth(Angle::from(arc_length)),
        arc_length,
        distance: segment.length(),
        reduced_length,
        geodesic_scale,
        iterations,
    }
}
