//! Conversion of mark placements into renderable triangle buffers.
//!
//! Emission is a pure function of the road's profile state: the returned
//! [`TriangleBuffer`] is owned by the caller, who uploads and disposes of it.

use log::{debug, warn};
use nalgebra::Vector2;

use crate::config::MarkConfig;
use crate::curve::Curve;
use crate::error::{ProfileError, Result};
use crate::geometry::Point3;
use crate::lane::{Lane, LaneSide};
use crate::lane_section::LaneSection;
use crate::road::Road;
use crate::road_mark::MarkColor;
use crate::tiler::{placements, Placement};

/// Vertex, normal, uv, colour and index buffers ready for upload.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriangleBuffer {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl TriangleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends `other`, rebasing its indices.
    pub fn append(&mut self, other: &TriangleBuffer) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.colors.extend_from_slice(&other.colors);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Appends a strip of `(inner, outer)` vertex pairs.
    ///
    /// `along` holds the distance of every station from the start of the
    /// strip. Winding depends on `side` so that every triangle faces +z.
    fn push_strip(
        &mut self,
        stations: &[[Point3; 2]],
        along: &[f64],
        width: f64,
        side: LaneSide,
        color: MarkColor,
    ) {
        if stations.len() < 2 {
            return;
        }
        let base = self.positions.len() as u32;
        let [r, g, b] = color.rgb();
        let rgba = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0];
        for (pair, u) in stations.iter().zip(along) {
            for (vertex, v) in pair.iter().zip([0.0, width]) {
                self.positions.push(vertex.to_f32());
                self.normals.push([0.0, 0.0, 1.0]);
                self.uvs.push([*u as f32, v as f32]);
                self.colors.push(rgba);
            }
        }
        for seg in 0..(stations.len() as u32 - 1) {
            let v0 = base + 2 * seg;
            let (v1, v2, v3) = (v0 + 1, v0 + 2, v0 + 3);
            match side {
                LaneSide::Right => self.indices.extend([v0, v3, v2, v0, v1, v3]),
                LaneSide::Left | LaneSide::Center => {
                    self.indices.extend([v0, v2, v3, v0, v3, v1])
                }
            }
        }
    }
}

/// Mesh of one lane, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LaneMesh {
    pub section: usize,
    pub lane_id: i32,
    pub buffer: TriangleBuffer,
}

/// Placed geometry of a single placement.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkGeometry {
    /// `[start inner, start outer, end inner, end outer]`.
    Quad([Point3; 4]),
    /// `(inner, outer)` pairs for consecutive stations along the curve.
    Ribbon(Vec<[Point3; 2]>),
}

impl MarkGeometry {
    pub fn stations(&self) -> Vec<[Point3; 2]> {
        match self {
            MarkGeometry::Quad([a, b, c, d]) => vec![[*a, *b], [*c, *d]],
            MarkGeometry::Ribbon(pairs) => pairs.clone(),
        }
    }
}

/// Places the marks of one lane on a reference curve.
pub struct MarkEmitter<'a, C: ?Sized> {
    road: &'a Road,
    section: &'a LaneSection,
    lane: &'a Lane,
    curve: &'a C,
    config: &'a MarkConfig,
}

impl<'a, C: Curve + ?Sized> MarkEmitter<'a, C> {
    pub fn new(
        road: &'a Road,
        section_index: usize,
        lane_id: i32,
        curve: &'a C,
        config: &'a MarkConfig,
    ) -> Result<Self> {
        let section = road
            .section(section_index)
            .ok_or(ProfileError::UnknownSection(section_index))?;
        let lane = section
            .lane(lane_id)
            .ok_or(ProfileError::UnknownLane(lane_id))?;
        Ok(Self {
            road,
            section,
            lane,
            curve,
            config,
        })
    }

    fn segment_count(&self, length: f64) -> usize {
        let max = self.config.max_segment_length;
        if max <= 0.0 || length <= max {
            return 1;
        }
        (length / max).ceil() as usize
    }

    /// Inner and outer vertex of a placement line at section-local `ls`.
    fn station(&self, ls: f64, placement: &Placement) -> Result<[Point3; 2]> {
        let s = self.section.start() + ls;
        let pose = self
            .curve
            .at(s)
            .ok_or(ProfileError::CurveUnavailable { s })?;
        let border = self.section.outer_border(self.lane.id(), ls)?;
        let side = self.lane.side().sign();
        let center = self.road.lane_offset_at(s) + side * (border + placement.lateral);
        let half = side * placement.width / 2.0;

        let origin = Vector2::new(pose.x, pose.y);
        let normal = pose.left_normal();
        let inner = origin + normal * (center - half);
        let outer = origin + normal * (center + half);
        let z = self.road.elevation_at(s) + self.lane.height_at(ls).1 + self.config.elevation_shift;
        Ok([
            Point3::new(inner.x, inner.y, z),
            Point3::new(outer.x, outer.y, z),
        ])
    }

    /// Geometry of a single placement.
    pub fn emit(&self, placement: &Placement) -> Result<MarkGeometry> {
        let n = self.segment_count(placement.length);
        let mut stations = Vec::with_capacity(n + 1);
        for k in 0..=n {
            let ls = placement.s + placement.length * k as f64 / n as f64;
            stations.push(self.station(ls.min(self.section.length()), placement)?);
        }
        if n == 1 {
            let [start, end] = [stations[0], stations[1]];
            return Ok(MarkGeometry::Quad([start[0], start[1], end[0], end[1]]));
        }
        Ok(MarkGeometry::Ribbon(stations))
    }

    /// Builds the whole lane mesh. Placements the curve cannot resolve are
    /// skipped with a warning.
    pub fn generate(&self) -> Result<TriangleBuffer> {
        let mut buffer = TriangleBuffer::new();
        let tiles = placements(
            self.lane,
            self.section.length(),
            0.0,
            self.section.length(),
            self.config,
        )?;
        let mut skipped = 0usize;
        for placement in tiles {
            let geometry = match self.emit(&placement) {
                Ok(geometry) => geometry,
                Err(ProfileError::CurveUnavailable { s }) => {
                    warn!(
                        "lane {}: skipping mark at s = {:.3}, curve unavailable at {:.3}",
                        self.lane.id(),
                        placement.s,
                        s
                    );
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let stations = geometry.stations();
            let n = stations.len() - 1;
            let along: Vec<f64> = (0..=n)
                .map(|k| placement.length * k as f64 / n as f64)
                .collect();
            buffer.push_strip(
                &stations,
                &along,
                placement.width,
                self.lane.side(),
                placement.color,
            );
        }
        debug!(
            "lane {} at s = {:.3}: {} triangles, {} placements skipped",
            self.lane.id(),
            self.section.start(),
            buffer.triangle_count(),
            skipped
        );
        Ok(buffer)
    }
}

/// Triangle mesh of the road marks of lane `lane_id` in section `section_index`.
pub fn generate_mark_mesh<C: Curve + ?Sized>(
    road: &Road,
    section_index: usize,
    lane_id: i32,
    curve: &C,
    config: &MarkConfig,
) -> Result<TriangleBuffer> {
    MarkEmitter::new(road, section_index, lane_id, curve, config)?.generate()
}
