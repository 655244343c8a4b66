//! Error taxonomy shared by the profile, stacking, tiling and mesh layers.

use thiserror::Error;

/// Failures raised by the engine.
///
/// `DuplicateOffset`, `InvalidPattern` and the lane/section variants point at
/// a defect in the editing tool that issued the call and are always returned
/// to the caller. `CurveUnavailable` is recovered per placement by the mesh
/// emitter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("a record already exists at s = {s}")]
    DuplicateOffset { s: f64 },

    #[error("s = {s} is outside the valid range [{start}, {end}]")]
    OutOfRange { s: f64, start: f64, end: f64 },

    #[error("invalid mark pattern at s = {s_offset}: length {length}, space {space}")]
    InvalidPattern {
        s_offset: f64,
        length: f64,
        space: f64,
    },

    #[error("reference curve cannot resolve s = {s}")]
    CurveUnavailable { s: f64 },

    #[error("no lane with id {0}")]
    UnknownLane(i32),

    #[error("no lane section with index {0}")]
    UnknownSection(usize),

    #[error("lane {0} already exists in this section")]
    DuplicateLane(i32),

    #[error("invalid lane section at s = {start}: {reason}")]
    InvalidSection { start: f64, reason: String },

    #[error("no record starts at s = {s}")]
    MissingRecord { s: f64 },
}

pub type Result<T> = std::result::Result<T, ProfileError>;
