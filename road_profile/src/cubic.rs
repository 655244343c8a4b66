//! Cubic polynomial segments in OpenDRIVE form.

use crate::profile::{Polynomial, ProfileRecord};

/// One piece of a piecewise-cubic profile.
///
/// `value(s) = a + b*ds + c*ds^2 + d*ds^3` with `ds = s - start`. The segment
/// is active from `start` up to the start of the next segment in its profile.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CubicInterval {
    #[serde(rename = "s")]
    pub start: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicInterval {
    pub fn new(start: f64, a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { start, a, b, c, d }
    }

    /// Segment with a constant value `a`.
    pub fn constant(start: f64, a: f64) -> Self {
        Self::new(start, a, 0.0, 0.0, 0.0)
    }

    /// Segment changing linearly from `from` at `start` to `to` at `start + length`.
    pub fn linear(start: f64, length: f64, from: f64, to: f64) -> Self {
        let slope = if length.abs() < f64::EPSILON {
            0.0
        } else {
            (to - from) / length
        };
        Self::new(start, from, slope, 0.0, 0.0)
    }

    /// Evaluates the polynomial at arc length `s`.
    pub fn value(&self, s: f64) -> f64 {
        let ds = s - self.start;
        // Horner form
        self.a + ds * (self.b + ds * (self.c + ds * self.d))
    }

    /// First derivative with respect to `s`.
    pub fn derivative(&self, s: f64) -> f64 {
        let ds = s - self.start;
        self.b + ds * (2.0 * self.c + ds * 3.0 * self.d)
    }

    /// Returns the same curve re-expanded around `new_start`.
    pub fn rebased(&self, new_start: f64) -> Self {
        let h = new_start - self.start;
        Self {
            start: new_start,
            a: self.value(new_start),
            b: self.derivative(new_start),
            c: self.c + 3.0 * self.d * h,
            d: self.d,
        }
    }

    /// Coefficients in persisted order `(s, a, b, c, d)`.
    pub fn to_tuple(&self) -> (f64, f64, f64, f64, f64) {
        (self.start, self.a, self.b, self.c, self.d)
    }

    pub fn from_tuple((start, a, b, c, d): (f64, f64, f64, f64, f64)) -> Self {
        Self::new(start, a, b, c, d)
    }
}

impl ProfileRecord for CubicInterval {
    fn start(&self) -> f64 {
        self.start
    }

    fn set_start(&mut self, start: f64) {
        self.start = start;
    }
}

impl Polynomial for CubicInterval {
    fn eval(&self, s: f64) -> f64 {
        self.value(s)
    }

    fn split(&self, s: f64) -> Self {
        self.rebased(s)
    }
}
