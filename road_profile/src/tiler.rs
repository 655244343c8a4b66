//! Tiling of road-mark patterns into discrete placement intervals.

use crate::config::MarkConfig;
use crate::error::{ProfileError, Result};
use crate::lane::Lane;
use crate::road_mark::{MarkColor, MarkLine, RoadMark};

const TILE_EPSILON: f64 = 1e-9;

/// One painted tile along a lane.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Placement {
    /// Start offset, local to the lane section.
    pub s: f64,
    pub length: f64,
    /// Offset of the line's center from the lane border.
    pub lateral: f64,
    pub width: f64,
    pub line: MarkLine,
    pub color: MarkColor,
}

impl Placement {
    pub fn end(&self) -> f64 {
        self.s + self.length
    }
}

/// One line of one mark record, clipped to the query window.
#[derive(Debug, Clone, Copy)]
struct LineJob {
    /// Dash phase origin, the record's own start.
    origin: f64,
    from: f64,
    to: f64,
    line: MarkLine,
    lateral: f64,
    dash: f64,
    stride: f64,
    width: f64,
    color: MarkColor,
}

impl LineJob {
    /// First dash index whose start is not before `from`.
    fn first_step(&self) -> u64 {
        let k = ((self.from - self.origin) / self.stride - TILE_EPSILON).ceil();
        k.max(0.0) as u64
    }

    fn tile(&self, s: f64, length: f64) -> Placement {
        Placement {
            s,
            length,
            lateral: self.lateral,
            width: self.width,
            line: self.line,
            color: self.color,
        }
    }
}

/// Lazy, restartable sequence of placements for one lane.
///
/// Produced by [`placements`]. Calling [`placements`] again on an unchanged
/// lane yields the same sequence.
#[derive(Debug, Clone)]
pub struct Placements {
    jobs: Vec<LineJob>,
    job: usize,
    step: Option<u64>,
}

impl Iterator for Placements {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        while let Some(&job) = self.jobs.get(self.job) {
            match job.line {
                MarkLine::Solid => {
                    self.job += 1;
                    return Some(job.tile(job.from, job.to - job.from));
                }
                MarkLine::Broken => {
                    let k = *self.step.get_or_insert_with(|| job.first_step());
                    let s = job.origin + k as f64 * job.stride;
                    if s + job.dash <= job.to + TILE_EPSILON {
                        self.step = Some(k + 1);
                        let length = job.dash.min(job.to - s);
                        return Some(job.tile(s, length));
                    }
                    self.job += 1;
                    self.step = None;
                }
            }
        }
        None
    }
}

/// Lateral offsets of the lines of `mark`, inner line first.
fn line_offsets(mark: &RoadMark, config: &MarkConfig) -> Vec<(MarkLine, f64)> {
    let lines = mark.kind.lines();
    if lines.len() < 2 {
        return lines.iter().map(|l| (*l, 0.0)).collect();
    }
    let half = (mark.width + config.double_line_gap) / 2.0;
    vec![(lines[0], -half), (lines[1], half)]
}

fn check_pattern(mark: &RoadMark) -> Result<()> {
    if mark.length <= 0.0 || mark.stride() <= 0.0 || mark.stride().is_nan() {
        return Err(ProfileError::InvalidPattern {
            s_offset: mark.s_offset,
            length: mark.length,
            space: mark.space,
        });
    }
    Ok(())
}

/// Placement intervals of `lane`'s road marks between `s_start` and `s_end`
/// (section-local offsets).
///
/// Dash phase is anchored at each record's `s_offset`. Solid lines are clipped
/// to the window; broken lines only yield dashes that fit entirely inside the
/// clipped record range, so a broken record shorter than one dash yields
/// nothing. A broken line with a non-positive dash length or
/// stride fails with [`ProfileError::InvalidPattern`] before anything is
/// produced.
pub fn placements(
    lane: &Lane,
    section_length: f64,
    s_start: f64,
    s_end: f64,
    config: &MarkConfig,
) -> Result<Placements> {
    if s_start < 0.0 || s_start > s_end {
        return Err(ProfileError::OutOfRange {
            s: s_start,
            start: 0.0,
            end: s_end.min(section_length),
        });
    }
    if s_end > section_length + TILE_EPSILON {
        return Err(ProfileError::OutOfRange {
            s: s_end,
            start: 0.0,
            end: section_length,
        });
    }

    let mut jobs = Vec::new();
    for range in lane.mark_ranges(section_length) {
        let mark = range.mark;
        let from = mark.s_offset.max(s_start);
        let to = range.last_s_coordinate.min(s_end);
        if to - from <= TILE_EPSILON {
            continue;
        }
        for (line, lateral) in line_offsets(mark, config) {
            if line == MarkLine::Broken {
                check_pattern(mark)?;
            }
            jobs.push(LineJob {
                origin: mark.s_offset,
                from,
                to,
                line,
                lateral,
                dash: mark.length,
                stride: mark.stride(),
                width: mark.width,
                color: mark.color,
            });
        }
    }
    Ok(Placements {
        jobs,
        job: 0,
        step: None,
    })
}
