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

//! This module contains the series coefficients for performing geodesic
//! calculations on the surface of an ellipsoid.
//!
//! It uses the equations given by CFF Karney in
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf) and
//! the equation for A2 in
//! [Geodesics on an arbitrary ellipsoid of revolution](https://arxiv.org/pdf/2208.00492.pdf).
//!
//! The coefficients that depend upon `epsilon` are evaluated once per
//! geodesic and held in a `GeodesicSeries`.

use crate::Ellipsoid;
use angle_sc::{Angle, Radians};

/// The scale factor `A1` minus one.
/// CFF Karney, Eq. 17.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// # Examples
/// ```
/// use wgs84_intercept::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
/// use wgs84_intercept::ellipsoid::coefficients::evaluate_a1;
///
/// // evaluate_a1 for WGS 84 latitude 45.0
/// let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
/// let a1 = evaluate_a1(eps45);
///
/// assert_eq!(0.0033839903702120875, a1);
/// ```
#[must_use]
pub fn evaluate_a1(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * (eps2 * (eps2 + 4.0) + 64.0) / 256.0;
    (t + eps) / (1.0 - eps)
}

/// The scale factor `A2` minus one.
///
/// CFF Karney [Geodesics on an arbitrary ellipsoid of revolution](https://arxiv.org/pdf/2208.00492.pdf),
/// Eq. A1.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_a2(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * ((-11. * eps2 - 28.) * eps2 - 192.) / 256.;
    (t - eps) / (1. + eps)
}

/// The coefficients `A3`.
/// CFF Karney, Eq. 23.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_a3(n: f64) -> [f64; 6] {
    [
        1.,
        (n - 1.) / 2.,
        (n * (3. * n - 1.) - 2.) / 8.,
        ((-n - 3.) * n - 1.) / 16.,
        (-2. * n - 3.) / 64.,
        -3. / 128.,
    ]
}

/// The coefficients `C1[l]` in the Fourier expansion of `B1`.
/// CFF Karney, Eq. 18.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c1(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps4 = (eps2 * eps) * eps; // Note: not the same as eps2 * eps2!
    let eps6 = (eps4 * eps) * eps;

    [
        0.,
        eps * ((6. - eps2) * eps2 - 16.) / 32.,
        eps2 * ((64. - 9. * eps2) * eps2 - 128.) / 2048.,
        eps * eps2 * (9. * eps2 - 16.) / 768.,
        eps4 * (3. * eps2 - 5.) / 512.,
        eps * eps4 * (-7. / 1280.),
        eps6 * (-7. / 2048.),
    ]
}

/// The coefficients `C1p[l]` in the Fourier expansion of `B1p`.
/// CFF Karney, Eq. 21.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c1p(eps: f64) -> [f64; 6] {
    let eps2 = eps * eps;
    let eps4 = (eps2 * eps) * eps; // Note: not the same as eps2 * eps2!

    [
        0.,
        eps * (eps2 * (205. * eps2 - 432.) + 768.) / 1536.,
        eps2 * (30. - 37. * eps2) / 96.,
        eps * eps2 * (116. - 225. * eps2) / 384.,
        eps4 * 539. / 1536.,
        (eps * eps4) * 3467. / 7680.,
    ]
}

/// The coefficients `C2[l]` in the Fourier expansion of `B2`.
/// CFF Karney, Eq. 42.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c2(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps4 = (eps2 * eps) * eps; // Note: not the same as eps2 * eps2!
    let eps6 = (eps4 * eps) * eps;

    [
        0.,
        eps * (eps2 * (eps2 + 2.) + 16.) / 32.,
        eps2 * (eps2 * (35. * eps2 + 64.) + 384.) / 2048.,
        eps * eps2 * (15. * eps2 + 80.) / 768.,
        eps4 * (7. * eps2 + 35.) / 512.,
        eps * eps4 * 63. / 1280.,
        eps6 * 77. / 2048.,
    ]
}

/// The coefficients `C3x[l]` in the Fourier expansion of `C3`.
/// CFF Karney, Eq. 25.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_c3x(n: f64) -> [f64; 15] {
    [
        (1. - n) / 4.,
        (1. - n * n) / 8.,
        (n * ((-5. * n - 1.) * n + 3.) + 3.) / 64.,
        (n * ((2. - 2. * n) * n + 2.) + 5.) / 128.,
        (n * (3. * n + 11.) + 12.) / 512.,
        ((n - 3.) * n + 2.) / 32.,
        (n * (n * (2. * n - 3.) - 2.) + 3.) / 64.,
        (n * ((-6. * n - 9.) * n + 2.) + 6.) / 256.,
        ((1. - 2. * n) * n + 5.) / 256.,
        (n * ((5. - n) * n - 9.) + 5.) / 192.,
        (n * (n * (10. * n - 6.) - 10.) + 9.) / 384.,
        ((-77. * n - 8.) * n + 42.) / 3072.,
        (n * ((20. - 7. * n) * n - 28.) + 14.) / 1024.,
        ((-7. * n - 40.) * n + 28.) / 2048.,
        (n * (75. * n - 90.) + 42.) / 5120.,
    ]
}

/// Evaluate the polynomial in x using
/// [Horner's method](https://en.wikipedia.org/wiki/Horner%27s_method).
/// * `coeffs` - the polynomial coefficients, lowest order first.
/// * `x` - the variable.
#[must_use]
pub fn evaluate_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .split_last()
        .map_or(0.0, |(last, elements)| {
            elements
                .iter()
                .rev()
                .fold(*last, |result, element| libm::fma(result, x, *element))
        })
}

/// The coefficients `C3[l]` in the Fourier expansion of `C3`.
/// CFF Karney, Eq. 26.
/// * `coeffs` - the polynomial coefficients from `evaluate_coeffs_C3x`.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_coeffs_c3y(coeffs: &[f64], eps: f64) -> [f64; 6] {
    let c1 = eps * evaluate_polynomial(&coeffs[0..5], eps);
    let eps_2 = eps * eps;
    let c2 = eps_2 * evaluate_polynomial(&coeffs[5..9], eps);
    let eps_3 = eps * eps_2;
    let c3 = eps_3 * evaluate_polynomial(&coeffs[9..12], eps);
    let eps_4 = eps * eps_3;
    let c4 = eps_4 * evaluate_polynomial(&coeffs[12..14], eps);
    let eps_5: f64 = eps * eps_4;
    let c5 = eps_5 * evaluate_polynomial(&coeffs[14..15], eps);
    [0.0, c1, c2, c3, c4, c5]
}

/// Evaluate the following:
///   `y = sum(c[i] * sin(2*i * angle), i, 1, n)`
/// using [Clenshaw summation](https://en.wikipedia.org/wiki/Clenshaw_algorithm).
/// `coeffs[0]` is not used.
/// * `coeffs` - the series coefficients.
/// * `angle` - the Angle.
#[must_use]
pub fn sin_cos_series(coeffs: &[f64], angle: Angle) -> Radians {
    let sin = angle.sin().0;
    let cos = angle.cos().0;

    // the Clenshaw ak(theta) parameter: 2 * cos(2 * angle)
    let ar = 2.0 * (cos - sin) * (cos + sin);

    let mut k0 = 0.0;
    let mut k1 = 0.0;
    for coeff in coeffs.iter().skip(1).rev() {
        let k = libm::fma(ar, k0, coeff - k1);
        k1 = k0;
        k0 = k;
    }

    Radians(2.0 * sin * cos * k0)
}

/// The series coefficients of a geodesic, evaluated for its `epsilon`.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicSeries {
    /// The scale factor `A1` minus one.
    a1m1: f64,
    /// The scale factor `A2` minus one.
    a2m1: f64,
    /// The `A3` polynomial evaluated at epsilon.
    a3f: f64,
    /// The `C1` distance series coefficients.
    c1: [f64; 7],
    /// The `C1p` inverse distance series coefficients.
    c1p: [f64; 6],
    /// The `C3` longitude series coefficients.
    c3: [f64; 6],
    /// The `J12` integral series coefficients: `A1 C1[l] - A2 C2[l]`.
    cj: [f64; 7],
}

impl GeodesicSeries {
    /// Evaluate the series coefficients of a geodesic.
    /// * `eps` - epsilon the integration variable derived from Clairaut's constant.
    /// * `ellipsoid` - the `Ellipsoid`.
    #[must_use]
    pub fn new(eps: f64, ellipsoid: &Ellipsoid) -> Self {
        let a1m1 = evaluate_a1(eps);
        let a2m1 = evaluate_a2(eps);
        let c1 = evaluate_coeffs_c1(eps);
        let c2 = evaluate_coeffs_c2(eps);

        let mut cj = [0.0; 7];
        for (l, coeff) in cj.iter_mut().enumerate().skip(1) {
            *coeff = (1.0 + a1m1) * c1[l] - (1.0 + a2m1) * c2[l];
        }

        Self {
            a1m1,
            a2m1,
            a3f: evaluate_polynomial(ellipsoid.a3(), eps),
            c1,
            c1p: evaluate_coeffs_c1p(eps),
            c3: evaluate_coeffs_c3y(ellipsoid.c3x(), eps),
            cj,
        }
    }

    /// The scale factor `A1`.
    #[must_use]
    pub fn a1(&self) -> f64 {
        1.0 + self.a1m1
    }

    /// The `A3` polynomial evaluated at epsilon.
    #[must_use]
    pub const fn a3f(&self) -> f64 {
        self.a3f
    }

    /// The `B1` distance integral at `sigma`.
    #[must_use]
    pub fn b1(&self, sigma: Angle) -> Radians {
        sin_cos_series(&self.c1, sigma)
    }

    /// The `B1p` inverse distance integral at `tau`.
    #[must_use]
    pub fn b1p(&self, tau: Angle) -> Radians {
        sin_cos_series(&self.c1p, tau)
    }

    /// The `B3` longitude integral at `sigma`.
    #[must_use]
    pub fn b3(&self, sigma: Angle) -> Radians {
        sin_cos_series(&self.c3, sigma)
    }

    /// Calculate the `J12` integral between `sigma1` and `sigma2`.
    /// CFF Karney, Eq. 40.
    /// * `sigma12` - the arc length between `sigma1` and `sigma2`.
    /// * `sigma1`, `sigma2` - the arc distances from the Equator crossing.
    #[must_use]
    pub fn j12(&self, sigma12: Radians, sigma1: Angle, sigma2: Angle) -> f64 {
        (self.a1m1 - self.a2m1) * sigma12.0
            + (sin_cos_series(&self.cj, sigma2).0 - sin_cos_series(&self.cj, sigma1).0)
    }
}
