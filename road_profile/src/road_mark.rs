//! Road-mark records and their pattern vocabulary.

use std::fmt;
use std::str::FromStr;

use crate::config::MarkConfig;
use crate::profile::ProfileRecord;

/// Kind of painted mark, using OpenDRIVE names on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum MarkKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "solid")]
    Solid,
    #[serde(rename = "broken")]
    Broken,
    #[serde(rename = "solid solid")]
    SolidSolid,
    #[serde(rename = "solid broken")]
    SolidBroken,
    #[serde(rename = "broken solid")]
    BrokenSolid,
}

/// Pattern of a single painted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum MarkLine {
    Solid,
    Broken,
}

impl MarkKind {
    /// Individual lines of the mark, inner line first.
    pub fn lines(&self) -> &'static [MarkLine] {
        match self {
            MarkKind::None => &[],
            MarkKind::Solid => &[MarkLine::Solid],
            MarkKind::Broken => &[MarkLine::Broken],
            MarkKind::SolidSolid => &[MarkLine::Solid, MarkLine::Solid],
            MarkKind::SolidBroken => &[MarkLine::Solid, MarkLine::Broken],
            MarkKind::BrokenSolid => &[MarkLine::Broken, MarkLine::Solid],
        }
    }

    pub fn is_patterned(&self) -> bool {
        self.lines().contains(&MarkLine::Broken)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MarkKind::None => "none",
            MarkKind::Solid => "solid",
            MarkKind::Broken => "broken",
            MarkKind::SolidSolid => "solid solid",
            MarkKind::SolidBroken => "solid broken",
            MarkKind::BrokenSolid => "broken solid",
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "none" => Ok(MarkKind::None),
            "solid" => Ok(MarkKind::Solid),
            "broken" => Ok(MarkKind::Broken),
            "solid solid" => Ok(MarkKind::SolidSolid),
            "solid broken" => Ok(MarkKind::SolidBroken),
            "broken solid" => Ok(MarkKind::BrokenSolid),
            other => Err(format!("unknown road mark type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkWeight {
    #[default]
    Standard,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkColor {
    #[default]
    Standard,
    White,
    Yellow,
    Blue,
    Green,
    Red,
    Orange,
}

impl MarkColor {
    /// Display colour. `Standard` renders white.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            MarkColor::Standard | MarkColor::White => [255, 255, 255],
            MarkColor::Yellow => [255, 204, 0],
            MarkColor::Blue => [0, 90, 200],
            MarkColor::Green => [0, 160, 70],
            MarkColor::Red => [210, 30, 30],
            MarkColor::Orange => [255, 128, 0],
        }
    }
}

/// One record of a lane's road-mark profile.
///
/// `s_offset` is local to the owning lane section. The record stays active
/// until the next record's `s_offset` or the end of the section.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoadMark {
    pub s_offset: f64,
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default)]
    pub weight: MarkWeight,
    #[serde(default)]
    pub color: MarkColor,
    pub width: f64,
    pub length: f64,
    pub space: f64,
    #[serde(default)]
    pub height: f64,
}

impl RoadMark {
    /// Mark of `kind` at `s_offset` with pattern defaults taken from `config`.
    pub fn new(s_offset: f64, kind: MarkKind, config: &MarkConfig) -> Self {
        let length = if kind.is_patterned() {
            config.broken_length
        } else {
            0.0
        };
        Self {
            s_offset,
            kind,
            weight: MarkWeight::Standard,
            color: MarkColor::Standard,
            width: config.mark_width,
            length,
            space: config.space_for(kind),
            height: 0.0,
        }
    }

    pub fn with_color(mut self, color: MarkColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_pattern(mut self, length: f64, space: f64) -> Self {
        self.length = length;
        self.space = space;
        self
    }

    /// Distance from the start of one dash to the start of the next.
    pub fn stride(&self) -> f64 {
        self.length + self.space
    }
}

impl ProfileRecord for RoadMark {
    fn start(&self) -> f64 {
        self.s_offset
    }

    fn set_start(&mut self, start: f64) {
        self.s_offset = start;
    }
}
