//! Roads: reference line, lane sections and road-level profiles.

use crate::config::MarkConfig;
use crate::cubic::CubicInterval;
use crate::curve::Curve;
use crate::error::{ProfileError, Result};
use crate::lane_section::LaneSection;
use crate::mesh::{generate_mark_mesh, LaneMesh, TriangleBuffer};
use crate::profile::Profile;
use crate::reference_line::ReferenceLine;
use crate::tiler::{placements, Placements};

/// Allowed gap or overlap between consecutive lane sections.
const SECTION_TOLERANCE: f64 = 1e-6;

/// A road owning its lane sections and road-level profiles.
///
/// Elevation and lane-offset records use road arc length; lane profiles use
/// offsets local to their section.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawRoad")]
pub struct Road {
    pub id: String,
    pub name: String,
    pub reference_line: ReferenceLine,
    sections: Vec<LaneSection>,
    pub elevation: Profile<CubicInterval>,
    pub lane_offset: Profile<CubicInterval>,
}

#[derive(serde::Deserialize)]
struct RawRoad {
    id: String,
    #[serde(default)]
    name: String,
    reference_line: ReferenceLine,
    #[serde(default)]
    sections: Vec<LaneSection>,
    #[serde(default)]
    elevation: Profile<CubicInterval>,
    #[serde(default)]
    lane_offset: Profile<CubicInterval>,
}

impl TryFrom<RawRoad> for Road {
    type Error = ProfileError;

    fn try_from(raw: RawRoad) -> Result<Self> {
        let mut road = Road::new(&raw.id, &raw.name, raw.reference_line);
        road.elevation = raw.elevation;
        road.lane_offset = raw.lane_offset;
        for section in raw.sections {
            road.add_section(section)?;
        }
        Ok(road)
    }
}

impl Road {
    pub fn new(id: &str, name: &str, reference_line: ReferenceLine) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            reference_line,
            sections: Vec::new(),
            elevation: Profile::new(),
            lane_offset: Profile::new(),
        }
    }

    /// Length of the reference line.
    pub fn length(&self) -> f64 {
        self.reference_line.length()
    }

    /// Appends a section. It must start where the previous one ends.
    pub fn add_section(&mut self, section: LaneSection) -> Result<()> {
        if let Some(last) = self.sections.last() {
            if (section.start() - last.end()).abs() > SECTION_TOLERANCE {
                return Err(ProfileError::InvalidSection {
                    start: section.start(),
                    reason: format!("expected the section to start at {}", last.end()),
                });
            }
        }
        self.sections.push(section);
        Ok(())
    }

    pub fn sections(&self) -> &[LaneSection] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&LaneSection> {
        self.sections.get(index)
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut LaneSection> {
        self.sections.get_mut(index)
    }

    /// Index of the section active at road arc length `s`.
    pub fn section_index_at(&self, s: f64) -> Result<usize> {
        let (start, end) = match (self.sections.first(), self.sections.last()) {
            (Some(first), Some(last)) => (first.start(), last.end()),
            _ => {
                return Err(ProfileError::OutOfRange {
                    s,
                    start: 0.0,
                    end: 0.0,
                })
            }
        };
        if s < start || s > end {
            return Err(ProfileError::OutOfRange { s, start, end });
        }
        let n = self.sections.partition_point(|sec| sec.start() <= s);
        Ok(n.saturating_sub(1))
    }

    pub fn section_at(&self, s: f64) -> Result<&LaneSection> {
        let idx = self.section_index_at(s)?;
        Ok(&self.sections[idx])
    }

    /// Road elevation at `s`, zero when no record is active.
    pub fn elevation_at(&self, s: f64) -> f64 {
        self.elevation.value_or_zero(s)
    }

    /// Lateral shift of the center lane at `s`, positive to the left.
    pub fn lane_offset_at(&self, s: f64) -> f64 {
        self.lane_offset.value_or_zero(s)
    }

    /// Distance from the reference line to the inner border of `lane_id` at
    /// road arc length `s`, resolving the lane section first.
    pub fn cumulative_width(&self, lane_id: i32, s: f64) -> Result<f64> {
        let section = self.section_at(s)?;
        section.cumulative_width(lane_id, s - section.start())
    }

    /// Outer border counterpart of [`Road::cumulative_width`].
    pub fn outer_border(&self, lane_id: i32, s: f64) -> Result<f64> {
        let section = self.section_at(s)?;
        section.outer_border(lane_id, s - section.start())
    }

    /// Placements of a lane's road marks between section-local `s_start` and
    /// `s_end`.
    pub fn placements(
        &self,
        section_index: usize,
        lane_id: i32,
        s_start: f64,
        s_end: f64,
        config: &MarkConfig,
    ) -> Result<Placements> {
        let section = self.section_or_err(section_index)?;
        let lane = section
            .lane(lane_id)
            .ok_or(ProfileError::UnknownLane(lane_id))?;
        placements(lane, section.length(), s_start, s_end, config)
    }

    pub(crate) fn section_or_err(&self, index: usize) -> Result<&LaneSection> {
        self.sections
            .get(index)
            .ok_or(ProfileError::UnknownSection(index))
    }

    /// Triangle mesh of one lane's road marks.
    pub fn generate_mark_mesh<C: Curve + ?Sized>(
        &self,
        section_index: usize,
        lane_id: i32,
        curve: &C,
        config: &MarkConfig,
    ) -> Result<TriangleBuffer> {
        generate_mark_mesh(self, section_index, lane_id, curve, config)
    }

    /// Meshes of every lane of every section, in section then lane-id order.
    pub fn generate_all_mark_meshes<C: Curve + ?Sized>(
        &self,
        curve: &C,
        config: &MarkConfig,
    ) -> Result<Vec<LaneMesh>> {
        let mut meshes = Vec::new();
        for (idx, section) in self.sections.iter().enumerate() {
            for lane in section.lanes() {
                let buffer = generate_mark_mesh(self, idx, lane.id(), curve, config)?;
                meshes.push(LaneMesh {
                    section: idx,
                    lane_id: lane.id(),
                    buffer,
                });
            }
        }
        Ok(meshes)
    }

    /// Returns human readable descriptions of structural problems.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let (first, last) = match (self.sections.first(), self.sections.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                problems.push(format!("road {} has no lane sections", self.id));
                return problems;
            }
        };
        if first.start().abs() > SECTION_TOLERANCE {
            problems.push(format!("first lane section starts at {}", first.start()));
        }
        if (last.end() - self.length()).abs() > SECTION_TOLERANCE {
            problems.push(format!(
                "lane sections end at {} but the reference line is {} long",
                last.end(),
                self.length()
            ));
        }
        for (idx, section) in self.sections.iter().enumerate() {
            for lane in section.lanes() {
                for range in lane.mark_ranges(section.length()) {
                    let mark = range.mark;
                    if range.last_s_coordinate <= mark.s_offset {
                        problems.push(format!(
                            "section {idx} lane {}: mark at {} lies beyond the section end",
                            lane.id(),
                            mark.s_offset
                        ));
                    }
                    if !mark.kind.lines().is_empty() && !(mark.width > 0.0) {
                        problems.push(format!(
                            "section {idx} lane {}: mark at {} has width {}",
                            lane.id(),
                            mark.s_offset,
                            mark.width
                        ));
                    }
                    if mark.kind.is_patterned() && (mark.length <= 0.0 || mark.stride() <= 0.0) {
                        problems.push(format!(
                            "section {idx} lane {}: broken mark at {} has length {} and space {}",
                            lane.id(),
                            mark.s_offset,
                            mark.length,
                            mark.space
                        ));
                    }
                }
                if let Some(w) = lane.width.last() {
                    if w.start >= section.length() {
                        problems.push(format!(
                            "section {idx} lane {}: width record at {} lies beyond the section end",
                            lane.id(),
                            w.start
                        ));
                    }
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::{Lane, LaneType};

    fn road() -> Road {
        let mut road = Road::new("1", "main", ReferenceLine::straight(0.0, 0.0, 0.0, 100.0));
        for (start, len, width) in [(0.0, 40.0, 3.0), (40.0, 60.0, 3.5)] {
            let mut section = LaneSection::new(start, len).unwrap();
            for id in [-2, -1, 1] {
                section
                    .add_lane(Lane::with_width(id, LaneType::Driving, width))
                    .unwrap();
            }
            road.add_section(section).unwrap();
        }
        road
    }

    #[test]
    fn resolves_sections() {
        let road = road();
        assert_eq!(road.section_index_at(0.0).unwrap(), 0);
        assert_eq!(road.section_index_at(39.9).unwrap(), 0);
        assert_eq!(road.section_index_at(40.0).unwrap(), 1);
        assert_eq!(road.section_index_at(100.0).unwrap(), 1);
        assert!(road.section_index_at(100.1).is_err());
    }

    #[test]
    fn cumulative_width_per_section() {
        let road = road();
        assert_eq!(road.cumulative_width(-2, 10.0).unwrap(), 3.0);
        assert_eq!(road.cumulative_width(-2, 50.0).unwrap(), 3.5);
        assert_eq!(road.outer_border(-2, 50.0).unwrap(), 7.0);
        assert!(matches!(
            road.cumulative_width(-2, 120.0),
            Err(ProfileError::OutOfRange { .. })
        ));
    }

    #[test]
    fn sections_must_be_contiguous() {
        let mut road = road();
        let gap = LaneSection::new(120.0, 10.0).unwrap();
        assert!(matches!(
            road.add_section(gap),
            Err(ProfileError::InvalidSection { .. })
        ));
        assert_eq!(road.sections().len(), 2);
    }

    #[test]
    fn validate_reports_length_mismatch() {
        let mut road = road();
        assert!(road.validate().is_empty());
        road.reference_line = ReferenceLine::straight(0.0, 0.0, 0.0, 90.0);
        assert_eq!(road.validate().len(), 1);
    }

    #[test]
    fn validate_reports_non_positive_mark_width() {
        use crate::road_mark::{MarkKind, RoadMark};
        let cfg = MarkConfig::default();
        let mut road = road();
        let marks = &mut road.section_mut(0).unwrap().lane_mut(1).unwrap().marks;
        let mut flipped = RoadMark::new(0.0, MarkKind::Solid, &cfg);
        flipped.width = -0.12;
        marks.insert(flipped).unwrap();
        let none = RoadMark {
            width: 0.0,
            ..RoadMark::new(10.0, MarkKind::None, &cfg)
        };
        marks.insert(none).unwrap();
        let problems = road.validate();
        assert_eq!(problems.len(), 1, "{problems:?}");
        assert!(problems[0].contains("width -0.12"));
    }

    #[test]
    fn road_profiles_default_to_zero() {
        let mut road = road();
        assert_eq!(road.elevation_at(5.0), 0.0);
        road.elevation
            .insert(CubicInterval::new(0.0, 10.0, 0.05, 0.0, 0.0))
            .unwrap();
        assert!((road.elevation_at(20.0) - 11.0).abs() < 1e-12);
    }
}
