//! Cross-sectional profile and road-mark geometry engine for parametric
//! road networks.
//!
//! Roads carry piecewise-cubic profiles (lane width, elevation, lane offset)
//! and road-mark records keyed by arc length. This crate evaluates those
//! profiles, stacks lanes laterally, tiles mark patterns along a lane and
//! emits the resulting triangle meshes.

pub mod config;
pub mod cubic;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod io;
pub mod lane;
pub mod lane_section;
pub mod mesh;
pub mod profile;
pub mod reference_line;
pub mod road;
pub mod road_mark;
pub mod tiler;

pub use config::MarkConfig;
pub use cubic::CubicInterval;
pub use curve::{Curve, CurvePoint};
pub use error::{ProfileError, Result};
pub use lane::{Lane, LaneHeight, LaneSide, LaneType};
pub use lane_section::LaneSection;
pub use mesh::TriangleBuffer;
pub use profile::{Profile, ProfileRecord};
pub use reference_line::{GeometryKind, PlanGeometry, ReferenceLine};
pub use road::Road;
pub use road_mark::{MarkColor, MarkKind, MarkLine, MarkWeight, RoadMark};
pub use tiler::Placement;
