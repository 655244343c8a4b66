use road_profile::{CubicInterval, Lane, LaneSection, LaneSide, LaneType, ProfileError};

fn section(width: f64) -> LaneSection {
    let mut section = LaneSection::new(0.0, 100.0).unwrap();
    for id in [-2, -1, 1, 2] {
        section
            .add_lane(Lane::with_width(id, LaneType::Driving, width))
            .unwrap();
    }
    section
}

#[test]
fn symmetric_five_lane_stack() {
    let section = section(3.0);
    for s in [0.0, 25.0, 100.0] {
        assert_eq!(section.cumulative_width(2, s).unwrap(), 3.0);
        assert_eq!(section.cumulative_width(-2, s).unwrap(), 3.0);
    }
}

#[test]
fn stacking_is_monotonic_outward() {
    let mut section = section(3.0);
    for id in [3, 4] {
        section
            .add_lane(Lane::with_width(id, LaneType::Shoulder, 1.5))
            .unwrap();
    }
    let mut last = -1.0;
    for lane in section.lanes_on_side(LaneSide::Left) {
        let w = section.cumulative_width(lane.id(), 50.0).unwrap();
        assert!(w > last);
        last = w;
    }
    assert_eq!(section.cumulative_width(4, 50.0).unwrap(), 7.5);
}

#[test]
fn other_side_does_not_contribute() {
    let mut section = section(3.0);
    section
        .lane_mut(-1)
        .unwrap()
        .width
        .insert(CubicInterval::constant(50.0, 10.0))
        .unwrap();
    assert_eq!(section.cumulative_width(2, 60.0).unwrap(), 3.0);
    assert_eq!(section.cumulative_width(-2, 60.0).unwrap(), 10.0);
}

#[test]
fn missing_width_counts_as_zero() {
    let mut section = LaneSection::new(0.0, 10.0).unwrap();
    let mut late = Lane::new(1, LaneType::Driving);
    late.width.insert(CubicInterval::constant(5.0, 3.0)).unwrap();
    section.add_lane(late).unwrap();
    section.add_lane(Lane::new(2, LaneType::Driving)).unwrap();
    assert_eq!(section.cumulative_width(2, 2.0).unwrap(), 0.0);
    assert_eq!(section.cumulative_width(2, 6.0).unwrap(), 3.0);
}

#[test]
fn outside_section_is_out_of_range() {
    let section = section(3.0);
    assert!(matches!(
        section.cumulative_width(1, 101.0),
        Err(ProfileError::OutOfRange { .. })
    ));
}
