//! Lanes and their per-lane profiles.

use crate::cubic::CubicInterval;
use crate::profile::{Profile, ProfileRecord};
use crate::road_mark::RoadMark;

/// Side of the reference line a lane lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneSide {
    Left,
    Center,
    Right,
}

impl LaneSide {
    /// Side implied by the sign of a lane id.
    pub fn from_id(id: i32) -> Self {
        match id.signum() {
            1 => LaneSide::Left,
            -1 => LaneSide::Right,
            _ => LaneSide::Center,
        }
    }

    /// Lateral sign: `+1` towards the left, `-1` towards the right.
    /// The center lane uses the left-hand convention.
    pub fn sign(&self) -> f64 {
        match self {
            LaneSide::Left | LaneSide::Center => 1.0,
            LaneSide::Right => -1.0,
        }
    }
}

/// Lane usage, using OpenDRIVE names on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneType {
    #[default]
    None,
    Driving,
    Shoulder,
    Sidewalk,
    Parking,
    Border,
    Stop,
    Restricted,
    Median,
    Biking,
    Curb,
    Entry,
    Exit,
    OnRamp,
    OffRamp,
}

/// Vertical offsets of a lane's inner and outer border, used for curbs and
/// raised sidewalks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LaneHeight {
    pub s_offset: f64,
    pub inner: f64,
    pub outer: f64,
}

impl LaneHeight {
    pub fn new(s_offset: f64, inner: f64, outer: f64) -> Self {
        Self {
            s_offset,
            inner,
            outer,
        }
    }
}

impl ProfileRecord for LaneHeight {
    fn start(&self) -> f64 {
        self.s_offset
    }

    fn set_start(&mut self, start: f64) {
        self.s_offset = start;
    }
}

/// A road-mark record together with the end of its active range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkRange<'a> {
    pub mark: &'a RoadMark,
    pub last_s_coordinate: f64,
}

/// Single lane of a lane section.
///
/// Profile offsets are local to the owning lane section.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lane {
    id: i32,
    #[serde(rename = "type", default)]
    pub lane_type: LaneType,
    #[serde(default)]
    pub width: Profile<CubicInterval>,
    #[serde(default)]
    pub marks: Profile<RoadMark>,
    #[serde(default)]
    pub height: Profile<LaneHeight>,
}

impl Lane {
    pub fn new(id: i32, lane_type: LaneType) -> Self {
        Self {
            id,
            lane_type,
            width: Profile::new(),
            marks: Profile::new(),
            height: Profile::new(),
        }
    }

    /// Lane of constant `width` starting at the section start.
    pub fn with_width(id: i32, lane_type: LaneType, width: f64) -> Self {
        Self {
            width: Profile::single(CubicInterval::constant(0.0, width)),
            ..Self::new(id, lane_type)
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn side(&self) -> LaneSide {
        LaneSide::from_id(self.id)
    }

    /// Width at section-local offset `ls`. The center lane has no width.
    pub fn width_at(&self, ls: f64) -> f64 {
        if self.side() == LaneSide::Center {
            return 0.0;
        }
        self.width.value_or_zero(ls)
    }

    /// `(inner, outer)` height at `ls`, zero when no record is active.
    pub fn height_at(&self, ls: f64) -> (f64, f64) {
        self.height
            .active_record(ls)
            .map(|h| (h.inner, h.outer))
            .unwrap_or((0.0, 0.0))
    }

    pub fn mark_at(&self, ls: f64) -> Option<&RoadMark> {
        self.marks.active_record(ls)
    }

    /// Mark records paired with their computed `last_s_coordinate`: the next
    /// record's offset, or `section_length` for the last record.
    pub fn mark_ranges(&self, section_length: f64) -> Vec<MarkRange<'_>> {
        self.marks
            .iter()
            .enumerate()
            .map(|(i, mark)| MarkRange {
                mark,
                last_s_coordinate: self.marks.record_end(i, section_length),
            })
            .collect()
    }
}
