//! Interface to the road reference-curve evaluator.

/// Planar pose on the reference curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, counter-clockwise from +x.
    pub heading: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Unit vector pointing to the left of the direction of travel.
    pub fn left_normal(&self) -> nalgebra::Vector2<f64> {
        let h = self.heading + std::f64::consts::FRAC_PI_2;
        nalgebra::Vector2::new(h.cos(), h.sin())
    }
}

/// Arc-length parameterized reference curve.
///
/// Implementations are read-only; one curve is shared by every lane of a
/// road.
pub trait Curve {
    /// Pose at arc length `s`, or `None` if the curve cannot resolve it.
    fn at(&self, s: f64) -> Option<CurvePoint>;

    fn length(&self) -> f64;
}
