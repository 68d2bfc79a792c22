use chart_axis::core::{
    AxisBreak, AxisScale, BreakSet, DurationUnit, SegmentKind, compute_nice_range,
};
use chart_axis::error::{AxisError, BreakError};

fn scale_with_breaks(min: f64, max: f64, breaks: &[(f64, f64, f64)]) -> AxisScale {
    let mut scale = AxisScale::new(min, max).expect("valid scale");
    for &(start, end, size) in breaks {
        scale
            .add_break(AxisBreak::new(start, end, size).expect("valid break"))
            .expect("non-overlapping break");
    }
    scale
}

#[test]
fn plain_domain_yields_round_grid() {
    let range = compute_nice_range(0.0, 100.0, 5, true, None).expect("nice range");
    assert_eq!((range.min, range.max, range.step), (0.0, 100.0, 20.0));

    let padded = compute_nice_range(0.0, 100.0, 5, false, None).expect("nice range");
    assert_eq!((padded.min, padded.max, padded.step), (0.0, 120.0, 20.0));
}

#[test]
fn single_break_compresses_following_values() {
    let scale = scale_with_breaks(0.0, 100.0, &[(40.0, 60.0, 0.1)]);

    assert!((scale.total_compressed_length() - 82.0).abs() <= 1e-12);
    let at_start = scale.value_to_position(40.0).expect("position");
    let at_end = scale.value_to_position(60.0).expect("position");
    assert!((at_start - 40.0 / 82.0).abs() <= 1e-12);
    assert!((at_end - 42.0 / 82.0).abs() <= 1e-12);
    assert_eq!(scale.value_to_position(100.0), Ok(1.0));

    let inside = scale.value_to_position(50.0).expect("position");
    assert!((inside - 41.0 / 82.0).abs() <= 1e-12);
    let recovered = scale.position_to_value(inside).expect("value");
    assert!((recovered - 50.0).abs() <= 1e-9);
}

#[test]
fn overlapping_break_is_rejected() {
    let mut scale = scale_with_breaks(0.0, 100.0, &[(10.0, 20.0, 0.5)]);
    let result = scale.add_break(AxisBreak::new(15.0, 25.0, 0.5).expect("valid break"));
    assert_eq!(
        result,
        Err(AxisError::Break(BreakError::Overlap {
            start: 15.0,
            end: 25.0
        }))
    );
    assert_eq!(scale.breaks().len(), 1);
}

#[test]
fn degenerate_and_oversized_breaks_are_rejected() {
    assert_eq!(
        AxisBreak::new(5.0, 5.0, 0.5),
        Err(BreakError::Degenerate {
            start: 5.0,
            end: 5.0
        })
    );
    assert_eq!(
        AxisBreak::new(1.0, 2.0, 1.5),
        Err(BreakError::InvalidSize(1.5))
    );
}

#[test]
fn merge_folds_overlaps_and_remove_restores_linear_mapping() {
    let mut set = BreakSet::new();
    set.add_break(AxisBreak::new(10.0, 20.0, 0.5).expect("valid break"))
        .expect("add");
    set.merge_break(AxisBreak::new(15.0, 30.0, 0.2).expect("valid break"))
        .expect("merge");
    set.recompute(0.0, 100.0);

    assert_eq!(set.len(), 1);
    let merged = set.breaks()[0];
    assert_eq!(
        (merged.start_value(), merged.end_value(), merged.break_size()),
        (10.0, 30.0, 0.2)
    );

    let removed = set.remove_break(10.0, 30.0).expect("remove");
    assert_eq!(removed.start_value(), 10.0);
    assert!(set.is_empty());
    assert!((set.value_to_position(25.0) - 0.25).abs() <= 1e-12);
    assert_eq!(
        set.remove_break(10.0, 30.0),
        Err(BreakError::NotFound {
            start: 10.0,
            end: 30.0
        })
    );
}

#[test]
fn segments_tile_the_unit_interval() {
    let scale = scale_with_breaks(
        0.0,
        100.0,
        &[(10.0, 20.0, 0.0), (30.0, 50.0, 0.25), (80.0, 90.0, 0.5)],
    );
    let segments = scale.breaks().segments();
    assert_eq!(segments.first().map(|segment| segment.position_start), Some(0.0));
    assert_eq!(segments.last().map(|segment| segment.position_end), Some(1.0));
    for pair in segments.windows(2) {
        assert!((pair[0].position_end - pair[1].position_start).abs() <= 1e-12);
        assert_eq!(pair[0].value_end, pair[1].value_start);
    }
    assert_eq!(
        segments
            .iter()
            .filter(|segment| matches!(segment.kind, SegmentKind::Break(_)))
            .count(),
        3
    );
}

#[test]
fn collapsed_break_position_maps_to_midpoint() {
    let scale = scale_with_breaks(0.0, 100.0, &[(40.0, 60.0, 0.0)]);
    let position = scale.value_to_position(50.0).expect("position");
    assert_eq!(scale.value_to_position(40.0), Ok(position));
    assert_eq!(scale.value_to_position(60.0), Ok(position));
    assert_eq!(scale.position_to_value(position), Ok(50.0));
}

#[test]
fn break_lookup_uses_half_open_intervals() {
    let scale = scale_with_breaks(0.0, 100.0, &[(10.0, 20.0, 0.5), (20.0, 30.0, 0.5)]);
    let breaks = scale.breaks();

    let at_touch = breaks.break_at(20.0).expect("break at shared bound");
    assert_eq!(at_touch.start_value(), 20.0);
    assert_eq!(breaks.break_at(30.0).map(AxisBreak::start_value), Some(20.0));
    assert!(breaks.break_at(31.0).is_none());
    assert!(breaks.break_at(5.0).is_none());
}

#[test]
fn zoom_outside_a_break_deactivates_it() {
    let mut scale = scale_with_breaks(0.0, 100.0, &[(40.0, 60.0, 0.1)]);
    scale.set_domain(70.0, 90.0).expect("pan");

    let axis_break = scale.breaks().breaks()[0];
    assert!(!axis_break.is_active());
    assert_eq!(axis_break.adjusted_start_position(), None);
    assert!((scale.value_to_position(80.0).expect("position") - 0.5).abs() <= 1e-12);
    assert_eq!(scale.position_to_value(2.0), Ok(90.0));
}

#[test]
fn grid_values_respect_duration_units() {
    let scale = AxisScale::new(0.0, 90.0 * 60.0).expect("valid scale");
    let values = scale
        .grid_values(5, Some(DurationUnit::Minute))
        .expect("grid values");
    assert_eq!(values, vec![0.0, 1_800.0, 3_600.0, 5_400.0]);
}
