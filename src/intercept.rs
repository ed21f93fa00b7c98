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

//! The intercept module finds the intercept of a position onto a `Line`:
//! the position on the `Line` closest to it.
//!
//! The search starts at the `Line` midpoint. Each iteration projects the
//! `Line` end points and the position about the current estimate,
//! intersects them in the plane and projects the foot of the perpendicular
//! back onto the ellipsoid as the next estimate.
//!
//! The search ends when:
//! - the next estimate is not-a-number: `Degenerate`;
//! - the change in the estimate is below `CONVERGENCE_THRESHOLD`: `Converged`;
//! - the estimate repeats a previous one exactly: `Cycled`;
//! - or the iteration limit is reached: `IterationLimit`.

use crate::gnomonic::Projection;
use crate::log::{debug, trace};
use crate::planar::{intersect, Vector};
use crate::{Coordinate, Line};
use thiserror::Error;

/// The maximum number of intercept iterations.
pub const MAX_ITERATIONS: usize = 100;

/// The change in longitude and latitude, in degrees, below which the
/// intercept has converged.
pub const CONVERGENCE_THRESHOLD: f64 = 1e-16;

/// How the change between successive estimates is compared with
/// `CONVERGENCE_THRESHOLD`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Convergence {
    /// Compare the signed changes: any decrease in both longitude and
    /// latitude has converged.
    #[default]
    Signed,
    /// Compare the magnitudes of the changes.
    Absolute,
}

impl Convergence {
    /// Whether the changes in longitude and latitude have converged.
    #[must_use]
    pub fn is_converged(self, delta_lon: f64, delta_lat: f64) -> bool {
        match self {
            Self::Signed => delta_lon < CONVERGENCE_THRESHOLD && delta_lat < CONVERGENCE_THRESHOLD,
            Self::Absolute => {
                libm::fabs(delta_lon) < CONVERGENCE_THRESHOLD
                    && libm::fabs(delta_lat) < CONVERGENCE_THRESHOLD
            }
        }
    }
}

/// How an intercept search ended, with its final position and the number
/// of iterations taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InterceptOutcome {
    /// The estimate stopped changing.
    Converged { position: Coordinate, iterations: usize },
    /// The estimate repeated a previous estimate.
    Cycled { position: Coordinate, iterations: usize },
    /// The estimate could not be projected, the position is not-a-number.
    Degenerate { position: Coordinate, iterations: usize },
    /// The iteration limit was reached, the position is the last estimate.
    IterationLimit { position: Coordinate, iterations: usize },
}

impl InterceptOutcome {
    /// The final position, not-a-number if `Degenerate`.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        match *self {
            Self::Converged { position, .. }
            | Self::Cycled { position, .. }
            | Self::Degenerate { position, .. }
            | Self::IterationLimit { position, .. } => position,
        }
    }

    /// The number of iterations taken.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        match *self {
            Self::Converged { iterations, .. }
            | Self::Cycled { iterations, .. }
            | Self::Degenerate { iterations, .. }
            | Self::IterationLimit { iterations, .. } => iterations,
        }
    }

    /// The final position of a `Converged` or `Cycled` search.
    ///
    /// # Errors
    ///
    /// `InterceptError::Degenerate` for a `Degenerate` search,
    /// `InterceptError::NotConverged` when the iteration limit was reached.
    pub const fn into_result(self) -> Result<Coordinate, InterceptError> {
        match self {
            Self::Converged { position, .. } | Self::Cycled { position, .. } => Ok(position),
            Self::Degenerate { iterations, .. } => Err(InterceptError::Degenerate { iterations }),
            Self::IterationLimit {
                position,
                iterations,
            } => Err(InterceptError::NotConverged {
                last: position,
                iterations,
            }),
        }
    }
}

/// The reasons an intercept could not be found.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum InterceptError {
    #[error("intercept could not be projected after {iterations} iterations")]
    Degenerate { iterations: usize },

    #[error("intercept did not converge in {iterations} iterations")]
    NotConverged { last: Coordinate, iterations: usize },
}

/// The estimates visited by a search, as exact bit patterns so that
/// +0.0 and -0.0 differ.
struct History {
    keys: [(u64, u64); MAX_ITERATIONS],
    len: usize,
}

impl History {
    const fn new() -> Self {
        Self {
            keys: [(0, 0); MAX_ITERATIONS],
            len: 0,
        }
    }

    /// Insert `key`, returns false if it was already present.
    fn insert(&mut self, key: (u64, u64)) -> bool {
        if self.keys[..self.len].contains(&key) {
            return false;
        }
        if self.len < MAX_ITERATIONS {
            self.keys[self.len] = key;
            self.len += 1;
        }
        true
    }
}

/// Finds intercepts with a `Projection`.
#[derive(Clone, Debug)]
pub struct InterceptSolver<P> {
    projection: P,
    max_iterations: usize,
    convergence: Convergence,
}

impl<P: Projection> InterceptSolver<P> {
    /// A solver with `MAX_ITERATIONS` and `Convergence::Signed`.
    #[must_use]
    pub const fn new(projection: P) -> Self {
        Self {
            projection,
            max_iterations: MAX_ITERATIONS,
            convergence: Convergence::Signed,
        }
    }

    /// Set the iteration limit, clamped to 1..=`MAX_ITERATIONS`.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.clamp(1, MAX_ITERATIONS);
        self
    }

    #[must_use]
    pub const fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    #[must_use]
    pub const fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    #[must_use]
    pub const fn convergence(&self) -> Convergence {
        self.convergence
    }

    /// Find the intercept of `point` onto `line`.
    /// * `point` - the position.
    /// * `line` - the `Line`.
    #[must_use]
    pub fn solve(&self, point: &Coordinate, line: &Line) -> InterceptOutcome {
        let origin = line.origin();
        let destination = line.destination();

        let mut estimate = line.midpoint();
        let mut history = History::new();

        for iteration in 1..=self.max_iterations {
            let a1 = self.projection.forward(&estimate, &origin);
            let a2 = self.projection.forward(&estimate, &destination);
            let b1 = self.projection.forward(&estimate, point);

            let foot = intersect(&Vector::new(a1, a2), &b1);
            let next = self.projection.reverse(&estimate, &foot);
            trace!(
                iteration,
                lon = next.lon().0,
                lat = next.lat().0,
                "intercept estimate"
            );

            if next.is_nan() {
                debug!(iteration, "intercept degenerate");
                return InterceptOutcome::Degenerate {
                    position: next,
                    iterations: iteration,
                };
            }

            let delta_lon = next.lon().0 - estimate.lon().0;
            let delta_lat = next.lat().0 - estimate.lat().0;
            estimate = next;

            if self.convergence.is_converged(delta_lon, delta_lat) {
                debug!(iteration, "intercept converged");
                return InterceptOutcome::Converged {
                    position: estimate,
                    iterations: iteration,
                };
            }

            if !history.insert(estimate.to_bits()) {
                debug!(iteration, "intercept cycled");
                return InterceptOutcome::Cycled {
                    position: estimate,
                    iterations: iteration,
                };
            }
        }

        debug!(
            iterations = self.max_iterations,
            "intercept reached the iteration limit"
        );
        InterceptOutcome::IterationLimit {
            position: estimate,
            iterations: self.max_iterations,
        }
    }
}
