//! Plan-view reference line built from line, arc and spiral records.

use crate::curve::{Curve, CurvePoint};
use crate::error::Result;
use crate::geometry::{normalize_angle, Point};
use crate::profile::{Profile, ProfileRecord};

/// Slack allowed when evaluating at the very ends of the line.
const END_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryKind {
    Line,
    Arc { curvature: f64 },
    Spiral { curv_start: f64, curv_end: f64 },
}

/// One plan-view geometry record.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanGeometry {
    pub s: f64,
    pub x: f64,
    pub y: f64,
    pub hdg: f64,
    pub length: f64,
    #[serde(flatten)]
    pub kind: GeometryKind,
}

impl PlanGeometry {
    pub fn line(s: f64, x: f64, y: f64, hdg: f64, length: f64) -> Self {
        Self {
            s,
            x,
            y,
            hdg,
            length,
            kind: GeometryKind::Line,
        }
    }

    pub fn arc(s: f64, x: f64, y: f64, hdg: f64, length: f64, curvature: f64) -> Self {
        Self {
            s,
            x,
            y,
            hdg,
            length,
            kind: GeometryKind::Arc { curvature },
        }
    }

    pub fn spiral(
        s: f64,
        x: f64,
        y: f64,
        hdg: f64,
        length: f64,
        curv_start: f64,
        curv_end: f64,
    ) -> Self {
        Self {
            s,
            x,
            y,
            hdg,
            length,
            kind: GeometryKind::Spiral {
                curv_start,
                curv_end,
            },
        }
    }

    fn start_point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Pose at local distance `ds` from the start of this record.
    pub fn pose_at(&self, ds: f64) -> CurvePoint {
        match self.kind {
            GeometryKind::Line => self.line_pose(ds),
            GeometryKind::Arc { curvature } => self.arc_pose(ds, curvature),
            GeometryKind::Spiral {
                curv_start,
                curv_end,
            } => self.spiral_pose(ds, curv_start, curv_end),
        }
    }

    /// Pose at the end of this record.
    pub fn end_pose(&self) -> CurvePoint {
        self.pose_at(self.length)
    }

    fn line_pose(&self, ds: f64) -> CurvePoint {
        let p = self.start_point().offset_along(self.hdg, ds);
        CurvePoint::new(p.x, p.y, self.hdg)
    }

    fn arc_pose(&self, ds: f64, k: f64) -> CurvePoint {
        if k.abs() < f64::EPSILON {
            return self.line_pose(ds);
        }
        let heading = self.hdg + k * ds;
        let x = self.x + (heading.sin() - self.hdg.sin()) / k;
        let y = self.y - (heading.cos() - self.hdg.cos()) / k;
        CurvePoint::new(x, y, heading)
    }

    fn spiral_pose(&self, ds: f64, k0: f64, k1: f64) -> CurvePoint {
        let kp = if self.length.abs() < f64::EPSILON {
            0.0
        } else {
            (k1 - k0) / self.length
        };
        if kp.abs() < f64::EPSILON {
            return self.arc_pose(ds, k0);
        }
        let heading = self.hdg + k0 * ds + 0.5 * kp * ds * ds;

        // theta(s) = alpha * (s + beta / 2 alpha)^2 + delta
        let alpha = kp / 2.0;
        let beta = k0;
        let delta = self.hdg - beta * beta / (4.0 * alpha);
        let sign = alpha.signum();
        let z = |x: f64| -> f64 {
            sign * (2.0 * alpha.abs() / std::f64::consts::PI).sqrt() * (x + beta / (2.0 * alpha))
        };
        let (s0, c0) = fresnel::fresnl(z(0.0));
        let (s1, c1) = fresnel::fresnl(z(ds));
        let fac = (std::f64::consts::PI / (2.0 * alpha.abs())).sqrt();
        let dx = fac * ((c1 - c0) * delta.cos() - sign * (s1 - s0) * delta.sin());
        let dy = fac * ((s1 - s0) * delta.cos() + sign * (c1 - c0) * delta.sin());
        CurvePoint::new(self.x + dx, self.y + dy, heading)
    }
}

impl ProfileRecord for PlanGeometry {
    fn start(&self) -> f64 {
        self.s
    }

    fn set_start(&mut self, start: f64) {
        self.s = start;
    }
}

/// Reference line of a road made of consecutive plan-view records.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReferenceLine {
    pub geometries: Profile<PlanGeometry>,
}

impl ReferenceLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight reference line of `length` from `(x, y)` along `hdg`.
    pub fn straight(x: f64, y: f64, hdg: f64, length: f64) -> Self {
        Self {
            geometries: Profile::single(PlanGeometry::line(0.0, x, y, hdg, length)),
        }
    }

    pub fn add_geometry(&mut self, geometry: PlanGeometry) -> Result<()> {
        self.geometries.insert(geometry)
    }

    /// Appends a record starting where the current last record ends.
    pub fn push(&mut self, length: f64, kind: GeometryKind) -> Result<()> {
        let (s, start) = match self.geometries.last() {
            Some(last) => (last.s + last.length, last.end_pose()),
            None => (0.0, CurvePoint::new(0.0, 0.0, 0.0)),
        };
        self.geometries.insert(PlanGeometry {
            s,
            x: start.x,
            y: start.y,
            hdg: start.heading,
            length,
            kind,
        })
    }
}

impl Curve for ReferenceLine {
    fn at(&self, s: f64) -> Option<CurvePoint> {
        let length = self.length();
        if self.geometries.is_empty() || s < -END_TOLERANCE || s > length + END_TOLERANCE {
            return None;
        }
        let s = s.clamp(0.0, length);
        let geom = self
            .geometries
            .active_record(s)
            .or_else(|| self.geometries.first())?;
        let ds = (s - geom.s).clamp(0.0, geom.length);
        let pose = geom.pose_at(ds);
        Some(CurvePoint::new(pose.x, pose.y, normalize_angle(pose.heading)))
    }

    fn length(&self) -> f64 {
        self.geometries
            .last()
            .map(|g| g.s + g.length)
            .unwrap_or(0.0)
    }
}
