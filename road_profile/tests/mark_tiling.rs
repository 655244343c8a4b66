use road_profile::tiler::placements;
use road_profile::{Lane, LaneType, MarkConfig, MarkKind, Placement, ProfileError, RoadMark};

fn broken_lane(length: f64, space: f64) -> Lane {
    let cfg = MarkConfig::default();
    let mut lane = Lane::with_width(1, LaneType::Driving, 3.5);
    lane.marks
        .insert(RoadMark::new(0.0, MarkKind::Broken, &cfg).with_pattern(length, space))
        .unwrap();
    lane
}

#[test]
fn broken_pattern_over_hundred_units() {
    let cfg = MarkConfig::default();
    let lane = broken_lane(3.0, 4.5);
    let tiles: Vec<Placement> = placements(&lane, 100.0, 0.0, 100.0, &cfg).unwrap().collect();
    assert_eq!(tiles.len(), 13);
    assert!(tiles.iter().all(|t| t.length > 0.0 && t.length <= 3.0));
    assert_eq!(tiles[1].s, 7.5);
}

#[test]
fn tiling_is_restartable() {
    let cfg = MarkConfig::default();
    let lane = broken_lane(3.0, 4.5);
    let first: Vec<Placement> = placements(&lane, 100.0, 0.0, 100.0, &cfg).unwrap().collect();
    let second: Vec<Placement> = placements(&lane, 100.0, 0.0, 100.0, &cfg).unwrap().collect();
    assert_eq!(first, second);
}

#[test]
fn tiles_never_overlap_across_records() {
    let cfg = MarkConfig::default();
    let mut lane = broken_lane(2.0, 1.0);
    lane.marks
        .insert(RoadMark::new(10.0, MarkKind::Solid, &cfg))
        .unwrap();
    lane.marks
        .insert(RoadMark::new(30.0, MarkKind::Broken, &cfg).with_pattern(1.0, 1.0))
        .unwrap();
    let tiles: Vec<Placement> = placements(&lane, 40.0, 0.0, 40.0, &cfg).unwrap().collect();
    for pair in tiles.windows(2) {
        assert!(pair[0].end() <= pair[1].s + 1e-9);
    }
    let solid: Vec<_> = tiles.iter().filter(|t| t.length == 20.0).collect();
    assert_eq!(solid.len(), 1);
    assert_eq!(solid[0].s, 10.0);
    assert!(tiles.iter().all(|t| t.end() <= 40.0 + 1e-9));
}

#[test]
fn none_produces_nothing() {
    let cfg = MarkConfig::default();
    let mut lane = Lane::new(-1, LaneType::Driving);
    lane.marks
        .insert(RoadMark::new(0.0, MarkKind::None, &cfg))
        .unwrap();
    assert_eq!(placements(&lane, 50.0, 0.0, 50.0, &cfg).unwrap().count(), 0);
}

#[test]
fn negative_stride_is_invalid() {
    let cfg = MarkConfig::default();
    let lane = broken_lane(2.0, -3.0);
    let err = placements(&lane, 10.0, 0.0, 10.0, &cfg).unwrap_err();
    assert_eq!(
        err,
        ProfileError::InvalidPattern {
            s_offset: 0.0,
            length: 2.0,
            space: -3.0
        }
    );
}

#[test]
fn solid_ignores_pattern_fields() {
    let cfg = MarkConfig::default();
    let mut lane = Lane::new(1, LaneType::Driving);
    lane.marks
        .insert(RoadMark::new(0.0, MarkKind::Solid, &cfg).with_pattern(0.0, 0.0))
        .unwrap();
    assert_eq!(placements(&lane, 5.0, 0.0, 5.0, &cfg).unwrap().count(), 1);
}
