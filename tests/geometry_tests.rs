use approx::assert_relative_eq;
use chart_axis::AxisError;
use chart_axis::geometry::{
    AxisGeometry, CircularGeometry, GridShape, LinearGeometry, RadialGeometry, RangeShape,
    path_is_finite,
};
use kurbo::{Point, Shape};

fn full_circle() -> CircularGeometry {
    CircularGeometry::new(Point::ORIGIN, -90.0, 270.0, 100.0, 0.0).expect("valid circle")
}

#[test]
fn circular_axis_starts_at_twelve_o_clock() {
    let geometry = AxisGeometry::from(full_circle());

    let start = geometry.position_to_point(0.0).expect("start point");
    assert_relative_eq!(start.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(start.y, -100.0, epsilon = 1e-9);

    let quarter = geometry.position_to_point(0.25).expect("quarter point");
    assert_relative_eq!(quarter.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(quarter.y, 0.0, epsilon = 1e-9);

    assert_relative_eq!(
        geometry.axis_length(),
        std::f64::consts::TAU * 100.0,
        max_relative = 1e-12
    );
}

#[test]
fn dispatch_matches_concrete_geometries() {
    let linear = LinearGeometry::horizontal(Point::new(10.0, 200.0), 400.0, 150.0)
        .expect("valid linear axis");
    let radial = RadialGeometry::new(Point::new(50.0, 50.0), 0.0, 40.0, 10.0)
        .expect("valid radial axis");
    let circle = full_circle();

    for (geometry, expected) in [
        (AxisGeometry::from(linear), linear.position_to_point(0.3)),
        (AxisGeometry::from(radial), radial.position_to_point(0.3)),
        (AxisGeometry::from(circle), circle.position_to_point(0.3)),
    ] {
        assert_eq!(geometry.position_to_point(0.3), Ok(expected));
    }

    assert_eq!(AxisGeometry::from(linear).axis_length(), 400.0);
    assert_eq!(AxisGeometry::from(radial).axis_length(), 30.0);
}

#[test]
fn vertical_axis_grows_upward_unless_inversed() {
    let geometry =
        LinearGeometry::vertical(Point::new(0.0, 0.0), 200.0, 300.0).expect("valid axis");
    assert_eq!(geometry.position_to_point(0.0), Point::new(0.0, 200.0));
    assert_eq!(geometry.position_to_point(1.0), Point::new(0.0, 0.0));

    let inversed = geometry.with_inversed(true);
    assert_eq!(inversed.position_to_point(0.0), Point::new(0.0, 0.0));
    assert_relative_eq!(
        inversed.point_to_position(Point::new(0.0, 50.0)),
        0.25,
        epsilon = 1e-12
    );
}

#[test]
fn non_finite_inputs_are_rejected() {
    let geometry = AxisGeometry::from(full_circle());
    assert!(matches!(
        geometry.position_to_point(f64::NAN),
        Err(AxisError::NonFinite { .. })
    ));
    assert!(matches!(
        geometry.point_to_position(Point::new(f64::INFINITY, 0.0)),
        Err(AxisError::NonFinite { .. })
    ));
    assert!(geometry
        .range_path(0.0, f64::NAN, RangeShape::default())
        .is_err());
}

#[test]
fn radial_inputs_must_be_finite() {
    let radial = RadialGeometry::new(Point::ORIGIN, -90.0, 100.0, 0.0)
        .expect("valid radial axis")
        .with_grid_shape(GridShape::Polygons);
    let geometry = AxisGeometry::from(radial);

    assert!(matches!(
        geometry.grid_path(0.5, &[0.0, f64::NAN, 90.0]),
        Err(AxisError::NonFinite { .. })
    ));
    assert!(matches!(
        geometry.position_to_point_at(f64::NAN, Some(0.5)),
        Err(AxisError::NonFinite { .. })
    ));
    assert!(matches!(
        geometry.position_to_point_at(0.5, Some(f64::NAN)),
        Err(AxisError::NonFinite { .. })
    ));

    let quarter = geometry
        .position_to_point_at(1.0, Some(0.25))
        .expect("point on the quarter ray");
    assert_relative_eq!(quarter.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(quarter.y, 0.0, epsilon = 1e-9);
    assert_eq!(
        geometry.position_to_point_at(0.5, None),
        geometry.position_to_point(0.5)
    );

    let circle = AxisGeometry::from(full_circle());
    assert_eq!(
        circle.position_to_point_at(0.25, Some(0.9)),
        circle.position_to_point(0.25)
    );
}

#[test]
fn invalid_shapes_fail_validation() {
    assert!(CircularGeometry::new(Point::ORIGIN, 0.0, 0.0, 100.0, 0.0).is_err());
    assert!(CircularGeometry::new(Point::ORIGIN, 0.0, 90.0, 50.0, 60.0).is_err());
    assert!(LinearGeometry::horizontal(Point::ORIGIN, 0.0, 10.0).is_err());
    assert!(RadialGeometry::new(Point::ORIGIN, 0.0, 10.0, -1.0).is_err());
}

#[test]
fn point_to_position_snaps_gaps_to_nearest_end() {
    let gauge = CircularGeometry::new(Point::ORIGIN, 180.0, 360.0, 100.0, 0.0)
        .expect("valid half circle");

    assert_relative_eq!(gauge.point_to_position(Point::new(0.0, -100.0)), 0.5, epsilon = 1e-12);
    // Just below the right end of the gap folds to the end angle.
    assert_eq!(gauge.point_to_position(Point::new(100.0, 1.0)), 1.0);
    // Just below the left end folds to the start angle.
    assert_eq!(gauge.point_to_position(Point::new(-100.0, 1.0)), 0.0);
}

#[test]
fn every_geometry_produces_finite_paths() {
    let radial = RadialGeometry::new(Point::new(200.0, 200.0), -90.0, 150.0, 0.0)
        .expect("valid radial axis")
        .with_grid_shape(GridShape::Polygons);
    let rays = [-90.0, -18.0, 54.0, 126.0, 198.0];
    let geometries = [
        AxisGeometry::from(
            LinearGeometry::horizontal(Point::new(0.0, 300.0), 500.0, 300.0).expect("linear"),
        ),
        AxisGeometry::from(full_circle()),
        AxisGeometry::from(radial),
    ];

    for geometry in geometries {
        let line = geometry.axis_line_path();
        assert!(path_is_finite(&line));
        assert!(!line.elements().is_empty());

        let range = geometry
            .range_path(0.2, 0.6, RangeShape::default())
            .expect("range path");
        assert!(path_is_finite(&range));

        for position in [0.0, 0.5, 1.0] {
            let grid = geometry.grid_path(position, &rays).expect("grid path");
            assert!(path_is_finite(&grid));
        }
    }
}

#[test]
fn rounded_sector_stays_inside_plain_sector() {
    let circle = CircularGeometry::new(Point::ORIGIN, 0.0, 90.0, 100.0, 40.0).expect("valid arc");
    let plain = circle
        .range_path(0.0, 1.0, RangeShape::default())
        .expect("plain sector");
    let rounded = circle
        .range_path(
            0.0,
            1.0,
            RangeShape {
                corner_radius: Some(10.0),
                ..RangeShape::default()
            },
        )
        .expect("rounded sector");

    assert!(rounded.area().abs() < plain.area().abs());
    assert!(rounded.area().abs() > plain.area().abs() * 0.9);
}

#[test]
fn polygon_band_is_a_closed_ring() {
    let radial = RadialGeometry::new(Point::ORIGIN, -90.0, 100.0, 0.0)
        .expect("valid radial axis")
        .with_grid_shape(GridShape::Polygons);
    let rays = [-90.0, 0.0, 90.0, 180.0];

    let band = radial.band_path(0.5, 1.0, &rays);
    // Square of half-diagonal 100 minus square of half-diagonal 50.
    assert_relative_eq!(band.area().abs(), 20_000.0 - 5_000.0, max_relative = 1e-9);

    assert!(radial.band_path(0.5, 0.5, &rays).elements().is_empty());
}
