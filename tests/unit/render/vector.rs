use super::*;

#[test]
fn svg_lists_background_then_shapes_then_labels() {
    let mut img = VectorImage::new(100.0, 80.0);
    img.fill_rect(Rect::new(10.0, 10.0, 30.0, 30.5), Fill::Dark);
    img.add_label(Label {
        anchor: Point::new(50.0, 75.0),
        text: "A&B".to_string(),
        font_size: 14.0,
    });
    let svg = img.to_svg();
    assert!(svg.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 80" width="100" height="80"><rect x="0" y="0" width="100" height="80" fill="white"/>"#
    ));
    assert!(svg.contains(r#"<rect x="10" y="10" width="20" height="20.5" fill="black"/>"#));
    assert!(svg.contains(">A&amp;B</text></svg>"));
}

#[test]
fn fill_at_uses_topmost_rect() {
    let mut img = VectorImage::new(10.0, 10.0);
    img.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Fill::Dark);
    img.fill_rect(Rect::new(2.0, 2.0, 8.0, 8.0), Fill::Light);
    assert_eq!(img.fill_at(Point::new(1.0, 1.0)), Fill::Dark);
    assert_eq!(img.fill_at(Point::new(5.0, 5.0)), Fill::Light);
}

#[test]
fn rasterize_paints_dark_and_light_pixels() {
    let mut img = VectorImage::new(20.0, 20.0);
    img.fill_rect(Rect::new(0.0, 0.0, 10.0, 20.0), Fill::Dark);
    let raster = img.rasterize(2.0).unwrap();
    assert_eq!(raster.dimensions(), (40, 40));
    assert_eq!(raster.get_pixel(5, 20).0, [0, 0, 0, 255]);
    assert_eq!(raster.get_pixel(35, 20).0, [255, 255, 255, 255]);
}

#[test]
fn rasterize_rejects_bad_scale() {
    let img = VectorImage::new(20.0, 20.0);
    assert!(img.rasterize(0.0).is_err());
    assert!(img.rasterize(f32::NAN).is_err());
    assert!(img.rasterize(10_000.0).is_err());
}

#[test]
fn num_formatting_is_compact() {
    assert_eq!(num(128.0), "128");
    assert_eq!(num(84.5), "84.5");
    assert_eq!(num(-3.0), "-3");
}

#[test]
fn demultiply_restores_straight_alpha() {
    let mut px = [64u8, 0, 128, 128];
    demultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [128, 0, 255, 128]);
}
