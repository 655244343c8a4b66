//! Lane sections and lateral lane stacking.

use crate::error::{ProfileError, Result};
use crate::lane::{Lane, LaneSide, LaneType};

/// Longitudinal slice of a road over which the set of lanes is fixed.
///
/// Lanes are kept sorted by id and always include the center lane `0`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawLaneSection")]
pub struct LaneSection {
    start: f64,
    length: f64,
    lanes: Vec<Lane>,
}

#[derive(serde::Deserialize)]
struct RawLaneSection {
    start: f64,
    length: f64,
    lanes: Vec<Lane>,
}

impl TryFrom<RawLaneSection> for LaneSection {
    type Error = ProfileError;

    fn try_from(raw: RawLaneSection) -> Result<Self> {
        let mut section = LaneSection::new(raw.start, raw.length)?;
        if raw.lanes.iter().any(|l| l.id() == 0) {
            section.lanes.clear();
        }
        for lane in raw.lanes {
            section.add_lane(lane)?;
        }
        Ok(section)
    }
}

impl LaneSection {
    /// Creates a section holding only the center lane.
    pub fn new(start: f64, length: f64) -> Result<Self> {
        if length.is_nan() || length <= 0.0 {
            return Err(ProfileError::InvalidSection {
                start,
                reason: format!("length must be positive, got {length}"),
            });
        }
        Ok(Self {
            start,
            length,
            lanes: vec![Lane::new(0, LaneType::None)],
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    /// Adds a lane; ids must be unique within the section.
    pub fn add_lane(&mut self, lane: Lane) -> Result<()> {
        let id = lane.id();
        match self.lanes.binary_search_by_key(&id, |l| l.id()) {
            Ok(_) => Err(ProfileError::DuplicateLane(id)),
            Err(idx) => {
                self.lanes.insert(idx, lane);
                Ok(())
            }
        }
    }

    /// Removes a lane. The center lane cannot be removed.
    pub fn remove_lane(&mut self, id: i32) -> Result<Lane> {
        if id == 0 {
            return Err(ProfileError::InvalidSection {
                start: self.start,
                reason: "the center lane cannot be removed".to_string(),
            });
        }
        let idx = self
            .lanes
            .binary_search_by_key(&id, |l| l.id())
            .map_err(|_| ProfileError::UnknownLane(id))?;
        Ok(self.lanes.remove(idx))
    }

    pub fn lane(&self, id: i32) -> Option<&Lane> {
        self.lanes
            .binary_search_by_key(&id, |l| l.id())
            .ok()
            .map(|i| &self.lanes[i])
    }

    pub fn lane_mut(&mut self, id: i32) -> Option<&mut Lane> {
        match self.lanes.binary_search_by_key(&id, |l| l.id()) {
            Ok(i) => Some(&mut self.lanes[i]),
            Err(_) => None,
        }
    }

    /// All lanes ordered by id.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Lanes of one side ordered from the center outward.
    pub fn lanes_on_side(&self, side: LaneSide) -> Vec<&Lane> {
        let mut lanes: Vec<&Lane> = self.lanes.iter().filter(|l| l.side() == side).collect();
        lanes.sort_by_key(|l| l.id().unsigned_abs());
        lanes
    }

    fn check_local(&self, ls: f64) -> Result<()> {
        if ls < 0.0 || ls > self.length {
            return Err(ProfileError::OutOfRange {
                s: ls,
                start: 0.0,
                end: self.length,
            });
        }
        Ok(())
    }

    /// Lateral distance from the reference line to the inner border of lane
    /// `lane_id` at section-local offset `ls`.
    ///
    /// Sums the widths of every lane on the same side whose `|id|` is below
    /// the target's.
    pub fn cumulative_width(&self, lane_id: i32, ls: f64) -> Result<f64> {
        self.check_local(ls)?;
        let target = self.lane(lane_id).ok_or(ProfileError::UnknownLane(lane_id))?;
        let side = target.side();
        if side == LaneSide::Center {
            return Ok(0.0);
        }
        let limit = lane_id.unsigned_abs();
        Ok(self
            .lanes
            .iter()
            .filter(|l| l.side() == side && l.id().unsigned_abs() < limit)
            .map(|l| l.width_at(ls))
            .sum())
    }

    /// Lateral distance from the reference line to the outer border of a lane.
    pub fn outer_border(&self, lane_id: i32, ls: f64) -> Result<f64> {
        let inner = self.cumulative_width(lane_id, ls)?;
        let own = self
            .lane(lane_id)
            .map(|l| l.width_at(ls))
            .unwrap_or(0.0);
        Ok(inner + own)
    }

    /// Combined width of all lanes on `side` at `ls`.
    pub fn total_width(&self, side: LaneSide, ls: f64) -> Result<f64> {
        self.check_local(ls)?;
        Ok(self
            .lanes
            .iter()
            .filter(|l| l.side() == side)
            .map(|l| l.width_at(ls))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cubic::CubicInterval;

    fn five_lanes() -> LaneSection {
        let mut section = LaneSection::new(0.0, 50.0).unwrap();
        for id in [-2, -1, 1, 2] {
            section
                .add_lane(Lane::with_width(id, LaneType::Driving, 3.0))
                .unwrap();
        }
        section
    }

    #[test]
    fn stacking_counts_inner_lanes_only() {
        let section = five_lanes();
        assert_eq!(section.cumulative_width(2, 10.0).unwrap(), 3.0);
        assert_eq!(section.cumulative_width(-2, 10.0).unwrap(), 3.0);
        assert_eq!(section.cumulative_width(1, 10.0).unwrap(), 0.0);
        assert_eq!(section.cumulative_width(0, 10.0).unwrap(), 0.0);
        assert_eq!(section.outer_border(-2, 10.0).unwrap(), 6.0);
        assert_eq!(section.total_width(LaneSide::Left, 0.0).unwrap(), 6.0);
    }

    #[test]
    fn stacking_follows_width_profiles() {
        let mut section = five_lanes();
        section
            .lane_mut(1)
            .unwrap()
            .width
            .insert(CubicInterval::linear(20.0, 10.0, 3.0, 4.0))
            .unwrap();
        assert!((section.cumulative_width(2, 25.0).unwrap() - 3.5).abs() < 1e-12);
        assert_eq!(section.cumulative_width(-2, 25.0).unwrap(), 3.0);
    }

    #[test]
    fn out_of_range_is_not_clamped() {
        let section = five_lanes();
        assert!(matches!(
            section.cumulative_width(1, 50.5),
            Err(ProfileError::OutOfRange { .. })
        ));
        assert!(matches!(
            section.cumulative_width(1, -0.1),
            Err(ProfileError::OutOfRange { .. })
        ));
        assert!(section.cumulative_width(1, 50.0).is_ok());
    }

    #[test]
    fn lane_ids_are_unique() {
        let mut section = five_lanes();
        assert_eq!(
            section.add_lane(Lane::new(1, LaneType::Shoulder)),
            Err(ProfileError::DuplicateLane(1))
        );
        assert_eq!(section.cumulative_width(7, 0.0), Err(ProfileError::UnknownLane(7)));
        assert!(section.remove_lane(0).is_err());
        section.remove_lane(2).unwrap();
        assert!(section.lane(2).is_none());
    }

    #[test]
    fn lanes_on_side_ordered_outward() {
        let section = five_lanes();
        let ids: Vec<i32> = section
            .lanes_on_side(LaneSide::Right)
            .iter()
            .map(|l| l.id())
            .collect();
        assert_eq!(ids, vec![-1, -2]);
    }

    #[test]
    fn rejects_empty_section() {
        assert!(LaneSection::new(0.0, 0.0).is_err());
    }

    #[test]
    fn file_center_lane_replaces_default() {
        let json = r#"{"start":0.0,"length":10.0,"lanes":[{"id":0,"type":"driving"},{"id":1}]}"#;
        let section: LaneSection = serde_json::from_str(json).unwrap();
        let ids: Vec<i32> = section.lanes().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(section.lane(0).unwrap().lane_type, LaneType::Driving);
    }

    #[test]
    fn duplicate_center_lane_in_file_is_rejected() {
        let json = r#"{"start":0.0,"length":10.0,"lanes":[{"id":0,"type":"none"},{"id":0,"type":"driving"}]}"#;
        let err = serde_json::from_str::<LaneSection>(json).unwrap_err();
        assert!(err.to_string().contains("lane 0 already exists"), "{err}");
    }
}
