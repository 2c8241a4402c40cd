use std::collections::HashMap;

use geojson_vt::{
    build_tile, tile::signed_area, transform_tile, BBox, FeatureId, FeatureType, GeoJsonVtOptions,
    Geometry, PropertyValue, SimplifiedLine, SimplifiedPoint, SourceFeature, SourceGeometry, Tile,
};

fn ring(coords: &[[f64; 2]], importance: f64, size: f64) -> SimplifiedLine {
    SimplifiedLine::new(
        coords
            .iter()
            .map(|&[x, y]| SimplifiedPoint::new(x, y, importance))
            .collect(),
        size,
    )
}

/// A clockwise ring in tile space (y pointing down).
fn clockwise_square(x: f64, y: f64, side: f64) -> SimplifiedLine {
    ring(
        &[
            [x, y],
            [x + side, y],
            [x + side, y + side],
            [x, y + side],
            [x, y],
        ],
        1.0,
        side * side,
    )
}

fn mixed_features() -> Vec<SourceFeature> {
    vec![
        SourceFeature::new(SourceGeometry::MultiPoint(vec![
            SimplifiedPoint::new(0.51, 0.51, 0.0),
            SimplifiedPoint::new(0.52, 0.53, 0.0),
        ])),
        SourceFeature::new(SourceGeometry::LineString(ring(
            &[[0.5, 0.5], [0.55, 0.52], [0.6, 0.6]],
            0.0,
            0.15,
        ))),
        SourceFeature::new(SourceGeometry::Polygon(vec![
            clockwise_square(0.5, 0.5, 0.2),
            clockwise_square(0.55, 0.55, 0.05),
        ])),
        SourceFeature::new(SourceGeometry::MultiPolygon(vec![
            vec![clockwise_square(0.6, 0.6, 0.1)],
            vec![clockwise_square(0.5, 0.7, 0.00001)],
        ])),
    ]
}

fn projected(tile: &Tile, index: usize) -> &Geometry<i32> {
    tile.features()[index].geometry().projected().unwrap()
}

#[test]
fn transform_is_idempotent() {
    let options = GeoJsonVtOptions::default();
    let mut once = build_tile(&mixed_features(), 1, 1, 1, &options);
    transform_tile(&mut once, 4096);

    let mut twice = build_tile(&mixed_features(), 1, 1, 1, &options);
    transform_tile(&mut twice, 4096);
    transform_tile(&mut twice, 4096);

    assert_eq!(once, twice);
}

#[test]
fn point_counts_include_dropped_points() {
    let options = GeoJsonVtOptions::default().with_tolerance(50.0);
    let features = mixed_features();
    let total: usize = features.iter().map(|f| f.geometry.points().count()).sum();

    for z in 0..=options.max_zoom {
        let tile = build_tile(&features, z, 0, 0, &options);
        assert_eq!(tile.num_points(), total, "at zoom {z}");
        assert!(tile.num_simplified() <= tile.num_points(), "at zoom {z}");
    }
}

#[test]
fn simplified_away_line_is_dropped_but_counted() {
    let options = GeoJsonVtOptions::default();
    let bbox = BBox::new(0.1, 0.2, 0.3, 0.4);
    let line = SourceFeature::new(SourceGeometry::LineString(ring(
        &[[0.1, 0.2], [0.2, 0.3], [0.3, 0.4]],
        0.0,
        1.0,
    )))
    .with_bbox(bbox);

    let tile = build_tile(&[line], 3, 0, 0, &options);

    assert!(tile.features().is_empty());
    assert_eq!(tile.num_features(), 1);
    assert_eq!(tile.num_points(), 3);
    assert_eq!(tile.num_simplified(), 0);
    assert_eq!(tile.bbox(), &bbox);
}

#[test]
fn max_zoom_keeps_every_point() {
    let options = GeoJsonVtOptions::default().with_max_zoom(5).with_tolerance(1e6);
    let tile = build_tile(&mixed_features(), 5, 0, 0, &options);

    assert_eq!(tile.num_simplified(), tile.num_points());
    assert_eq!(tile.features().len(), 4);
}

#[test]
fn outer_ring_and_hole_have_opposite_winding() {
    let options = GeoJsonVtOptions::default().with_max_zoom(0);
    let outer = clockwise_square(0.1, 0.1, 0.5);
    let hole = clockwise_square(0.2, 0.2, 0.1);
    let polygon = SourceFeature::new(SourceGeometry::Polygon(vec![outer.clone(), hole.clone()]));

    let reversed = |line: &SimplifiedLine| {
        let mut line = line.clone();
        line.points.reverse();
        line
    };
    let flipped = SourceFeature::new(SourceGeometry::Polygon(vec![
        reversed(&outer),
        reversed(&hole),
    ]));

    let tile = build_tile(&[polygon, flipped], 0, 0, 0, &options);

    let outer_areas: Vec<f64> = tile
        .features()
        .iter()
        .map(|feature| {
            let rings = feature.geometry().normalized().unwrap().rings().unwrap();
            let outer = signed_area(&rings[0]);
            let hole = signed_area(&rings[1]);
            assert!(outer * hole < 0.0);
            outer
        })
        .collect();

    // independent of the input winding
    assert!(outer_areas[0] < 0.0);
    assert!(outer_areas[1] < 0.0);
}

#[test]
fn point_projection() {
    let feature = SourceFeature::new(SourceGeometry::Point(vec![SimplifiedPoint::new(
        0.25, 0.25, 0.0,
    )]));
    let mut tile = build_tile(&[feature], 1, 0, 0, &GeoJsonVtOptions::default());
    transform_tile(&mut tile, 4096);

    assert_eq!(projected(&tile, 0), &Geometry::Point(vec![[2048, 2048]]));
}

#[test]
fn ids_are_propagated() {
    let point = |x| SourceGeometry::Point(vec![SimplifiedPoint::new(x, 0.5, 0.0)]);
    let features = vec![
        SourceFeature::new(point(0.1)).with_id("orca-42"),
        SourceFeature::new(point(0.2)),
    ];
    let tile = build_tile(&features, 0, 0, 0, &GeoJsonVtOptions::default());

    assert_eq!(tile.features()[0].id(), Some(&FeatureId::from("orca-42")));
    assert_eq!(tile.features()[1].id(), None);

    let json = serde_json::to_value(&tile).unwrap();
    assert!(json["features"][1].get("id").is_none());
}

#[test]
fn line_metrics_are_added_to_a_copy_of_the_tags() {
    let options = GeoJsonVtOptions::default()
        .with_max_zoom(0)
        .with_line_metrics(true);
    let tags = HashMap::from([("pod".to_owned(), PropertyValue::from("K"))]);
    let line = SourceFeature::new(SourceGeometry::LineString(
        ring(&[[0.1, 0.1], [0.2, 0.2]], 0.0, 0.5).with_range(0.25, 0.75),
    ))
    .with_tags(tags.clone());
    let source_tags = line.tags.clone();

    let tile = build_tile(&[line], 0, 0, 0, &options);
    let tile_tags = tile.features()[0].tags().unwrap();

    assert_eq!(tile_tags["mapbox_clip_start"].as_f64(), Some(0.5));
    assert_eq!(tile_tags["mapbox_clip_end"].as_f64(), Some(1.5));
    assert_eq!(tile_tags["pod"].as_str(), Some("K"));
    assert_eq!(source_tags.as_deref(), Some(&tags));
}

#[test]
fn multi_polygon_keeps_all_rings_without_tolerance() {
    let options = GeoJsonVtOptions::default().with_max_zoom(2);
    let multi_polygon = SourceFeature::new(SourceGeometry::MultiPolygon(vec![
        vec![clockwise_square(0.1, 0.1, 0.1)],
        vec![clockwise_square(0.3, 0.3, 0.1)],
    ]));
    let tile = build_tile(&[multi_polygon], 2, 0, 0, &options);

    let feature = &tile.features()[0];
    assert_eq!(feature.feature_type(), FeatureType::Polygon);
    let rings = feature.geometry().normalized().unwrap().rings().unwrap();
    assert_eq!(rings.len(), 2);
    assert!(rings.iter().all(|ring| ring.len() == 5));
}

#[test]
fn multi_polygon_winding_restarts_for_every_polygon() {
    let options = GeoJsonVtOptions::default().with_max_zoom(0);
    let reversed = |mut line: SimplifiedLine| {
        line.points.reverse();
        line
    };
    let multi_polygon = SourceFeature::new(SourceGeometry::MultiPolygon(vec![
        vec![
            clockwise_square(0.1, 0.1, 0.3),
            clockwise_square(0.2, 0.2, 0.1),
        ],
        vec![
            reversed(clockwise_square(0.5, 0.5, 0.3)),
            reversed(clockwise_square(0.6, 0.6, 0.1)),
        ],
    ]));
    let tile = build_tile(&[multi_polygon], 0, 0, 0, &options);

    let rings = tile.features()[0]
        .geometry()
        .normalized()
        .unwrap()
        .rings()
        .unwrap();
    let areas: Vec<f64> = rings.iter().map(|ring| signed_area(ring)).collect();

    assert_eq!(areas.len(), 4);
    assert!(areas[0] < 0.0, "{areas:?}");
    assert!(areas[1] > 0.0, "{areas:?}");
    assert!(areas[2] < 0.0, "{areas:?}");
    assert!(areas[3] > 0.0, "{areas:?}");
}

#[test]
fn flat_features_from_json() {
    let features: Vec<geojson_vt::FlatFeature> = serde_json::from_str(
        r#"[
            {"id": "a", "type": "Point", "geometry": [0.25, 0.75, 0]},
            {"type": "MultiLineString", "geometry": [
                {"coords": [0.25, 0.25, 1, 0.5, 0.5, 1], "size": 0.5}
            ]}
        ]"#,
    )
    .unwrap();
    let features = features
        .into_iter()
        .map(SourceFeature::try_from)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let mut tile = build_tile(&features, 0, 0, 0, &GeoJsonVtOptions::default());
    transform_tile(&mut tile, 8);

    assert_eq!(projected(&tile, 0), &Geometry::Point(vec![[2, 6]]));
    assert_eq!(
        projected(&tile, 1),
        &Geometry::LineString(vec![vec![[2, 2], [4, 4]]])
    );
    assert_eq!(tile.bbox(), &BBox::new(0.25, 0.25, 0.5, 0.75));
}
