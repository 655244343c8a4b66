//! Tunable constants for mark tiling and mesh emission.

use std::io;

use crate::road_mark::MarkKind;

/// Mark pattern defaults and mesh emission settings.
///
/// Loaded from JSON; any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarkConfig {
    /// Gap between dashes of a broken line.
    pub broken_space: f64,
    /// Gap used for solid lines.
    pub solid_space: f64,
    /// Dash length of a broken line.
    pub broken_length: f64,
    pub mark_width: f64,
    /// Lift above the road surface so marks do not z-fight with it.
    pub elevation_shift: f64,
    /// Clear gap between the two lines of a dual mark.
    pub double_line_gap: f64,
    /// Longest chord of one ribbon segment.
    pub max_segment_length: f64,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            broken_space: 4.5,
            solid_space: 0.0,
            broken_length: 3.0,
            mark_width: 0.12,
            elevation_shift: 0.01,
            double_line_gap: 0.12,
            max_segment_length: 2.0,
        }
    }
}

impl MarkConfig {
    /// Default gap for a newly created mark of `kind`.
    pub fn space_for(&self, kind: MarkKind) -> f64 {
        if kind.is_patterned() {
            self.broken_space
        } else {
            self.solid_space
        }
    }
}

/// Reads a [`MarkConfig`] from a JSON file.
pub fn load_config(path: &str) -> io::Result<MarkConfig> {
    let contents = crate::io::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: MarkConfig = serde_json::from_str(r#"{"broken_space": 6.0}"#).unwrap();
        assert_eq!(cfg.broken_space, 6.0);
        assert_eq!(cfg.elevation_shift, 0.01);
        assert_eq!(cfg.space_for(MarkKind::Broken), 6.0);
        assert_eq!(cfg.space_for(MarkKind::SolidSolid), 0.0);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marks.json");
        std::fs::write(&path, r#"{"mark_width": 0.2}"#).unwrap();
        let cfg = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.mark_width, 0.2);
        assert!(load_config(dir.path().join("missing.json").to_str().unwrap()).is_err());
    }
}
