use super::*;

#[test]
fn default_layout_matches_shipped_sizes() {
    let g = StandaloneGeometry::default();
    let img = render_standalone(MarkerFamily::Bch13_5_5, MarkerIdentity(31), &g).unwrap();
    assert_eq!(img.width(), 480.0);
    let svg = img.to_svg();
    assert!(svg.contains(r#"<rect x="40" y="40" width="400" height="400" fill="black"/>"#));
    assert!(svg.contains(r#"<rect x="140" y="140" width="200" height="200" fill="white"/>"#));
    assert!(svg.contains(r#"<rect x="140" y="140" width="50" height="50" fill="black"/>"#));
    assert!(svg.contains("Marker 31 (4x4_BCH_13_5_5)"));
}

#[test]
fn every_cell_is_painted_with_the_grid_value() {
    let g = StandaloneGeometry::default();
    for fam in [MarkerFamily::Bch13_5_5, MarkerFamily::Bch22_7_7] {
        let id = MarkerIdentity(fam.id_count() - 3);
        let img = render_standalone(fam, id, &g).unwrap();
        let grid = identity_grid(fam, id).unwrap();
        let n = grid.size();
        // Background, border, inner field, n*n cells.
        assert_eq!(img.rects().len(), 3 + n * n);
        for row in 0..n {
            for col in 0..n {
                let p = standalone_cell_center(&g, n, row, col);
                assert_eq!(img.fill_at(p), Fill::from_dark(grid.is_dark(row, col)));
            }
        }
    }
}

#[test]
fn border_ring_is_dark_and_margin_is_light() {
    let g = StandaloneGeometry::default();
    let img = render_standalone(MarkerFamily::Bch13_5_5, MarkerIdentity(0), &g).unwrap();
    assert_eq!(img.fill_at(Point::new(60.0, 240.0)), Fill::Dark);
    assert_eq!(img.fill_at(Point::new(20.0, 240.0)), Fill::Light);
}

#[test]
fn label_can_be_disabled() {
    let g = StandaloneGeometry {
        label: false,
        ..StandaloneGeometry::default()
    };
    let img = render_standalone(MarkerFamily::Bch13_5_5, MarkerIdentity(1), &g).unwrap();
    assert!(img.labels().is_empty());
    assert!(!img.to_svg().contains("<text"));
}

#[test]
fn invalid_identity_and_geometry_are_rejected() {
    let g = StandaloneGeometry::default();
    assert!(matches!(
        render_standalone(MarkerFamily::Bch13_5_5, MarkerIdentity(32), &g),
        Err(MarkerError::InvalidIdentity { .. })
    ));
    let bad = StandaloneGeometry {
        border_ratio: 0.5,
        ..StandaloneGeometry::default()
    };
    assert!(render_standalone(MarkerFamily::Bch13_5_5, MarkerIdentity(1), &bad).is_err());
}
