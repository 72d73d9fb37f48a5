use super::*;
use crate::code::family::MarkerFamily;
use crate::code::synth::identity_grid;
use crate::foundation::core::MarkerIdentity;

#[test]
fn patt_layout_is_byte_exact() {
    let grid = Grid::parse_rows(&["#.", ".."]).unwrap();
    let t = to_pattern_template(&grid, 2).unwrap();
    let expected = concat!(
        // 0 degrees, B G R
        "  0 255\n255 255\n",
        "  0 255\n255 255\n",
        "  0 255\n255 255\n",
        "\n",
        // 90 degrees clockwise: top-left moves to top-right
        "255   0\n255 255\n",
        "255   0\n255 255\n",
        "255   0\n255 255\n",
        "\n",
        "255 255\n255   0\n",
        "255 255\n255   0\n",
        "255 255\n255   0\n",
        "\n",
        "255 255\n  0 255\n",
        "255 255\n  0 255\n",
        "255 255\n  0 255\n",
        "\n",
    );
    assert_eq!(t.to_patt_string(), expected);
}

#[test]
fn default_template_has_sixteen_pixel_rows() {
    let grid = identity_grid(MarkerFamily::Bch13_5_5, MarkerIdentity(7)).unwrap();
    let text = to_pattern_template(&grid, DEFAULT_RESOLUTION)
        .unwrap()
        .to_patt_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4 * (3 * 16 + 1));
    assert_eq!(lines[0].len(), 16 * 3 + 15);
    assert_eq!(lines[48], "");
    assert!(text.ends_with("\n\n"));
}

#[test]
fn every_rotation_decodes_back_to_the_grid() {
    for family in [MarkerFamily::Bch13_5_5, MarkerFamily::Bch22_7_7] {
        for id in [0, 1, 17, family.id_count() - 1] {
            let grid = identity_grid(family, MarkerIdentity(id)).unwrap();
            let n = grid.size();
            let parsed = PatternTemplate::parse(
                &to_pattern_template(&grid, DEFAULT_RESOLUTION)
                    .unwrap()
                    .to_patt_string(),
            )
            .unwrap();
            let expected = grid.rotations();
            for (rot, want) in expected.iter().enumerate() {
                assert_eq!(&parsed.cells(rot, n).unwrap(), want, "{family} id {id} rot {rot}");
            }
        }
    }
}

#[test]
fn decoding_is_exact_at_odd_resolutions() {
    let grid = identity_grid(MarkerFamily::Bch22_7_7, MarkerIdentity(93)).unwrap();
    for res in [5, 7, 11, 13] {
        let t = to_pattern_template(&grid, res).unwrap();
        for (rot, want) in grid.rotations().iter().enumerate() {
            assert_eq!(&t.cells(rot, 5).unwrap(), want, "res {res} rot {rot}");
        }
    }
}

#[test]
fn rotations_are_distinct_for_marker_grids() {
    let grid = identity_grid(MarkerFamily::Bch13_5_5, MarkerIdentity(12)).unwrap();
    let t = to_pattern_template(&grid, 16).unwrap();
    for a in 0..4 {
        for b in (a + 1)..4 {
            assert_ne!(t.rotation(a), t.rotation(b));
        }
    }
}

#[test]
fn qr_sized_grids_are_downsampled() {
    let rows: Vec<Vec<bool>> = (0..25).map(|r| (0..25).map(|c| r < 7 && c < 7).collect()).collect();
    let qr = Grid::from_rows(&rows).unwrap();
    let t = to_pattern_template(&qr, 16).unwrap();
    assert_eq!(t.resolution(), 16);
    assert_eq!(t.value_at(0, 0, 0), DARK_SENTINEL);
    assert_eq!(t.value_at(0, 15, 15), LIGHT_SENTINEL);
    // The finder block ends up in the top-right after one clockwise turn.
    assert_eq!(t.value_at(1, 0, 15), DARK_SENTINEL);
}

#[test]
fn parse_rejects_malformed_text() {
    assert!(PatternTemplate::parse("").is_err());
    assert!(PatternTemplate::parse("  0 128\n").is_err());

    let grid = Grid::parse_rows(&["#.", ".."]).unwrap();
    let text = to_pattern_template(&grid, 2).unwrap().to_patt_string();
    let truncated: String = text.lines().skip(1).map(|l| format!("{l}\n")).collect();
    assert!(PatternTemplate::parse(&truncated).is_err());

    let mixed = text.replacen("  0 255\n255 255\n  0 255", "  0 255\n255 255\n255 255", 1);
    assert!(matches!(
        PatternTemplate::parse(&mixed),
        Err(MarkerError::Validation(_))
    ));
}

#[test]
fn cells_needs_enough_resolution() {
    let grid = identity_grid(MarkerFamily::Bch22_7_7, MarkerIdentity(0)).unwrap();
    let t = to_pattern_template(&grid, 4).unwrap();
    assert!(t.cells(0, 5).is_err());
    assert!(to_pattern_template(&grid, 0).is_err());
}

#[test]
fn cells_rejects_rotation_out_of_range() {
    let grid = identity_grid(MarkerFamily::Bch13_5_5, MarkerIdentity(9)).unwrap();
    let t = to_pattern_template(&grid, DEFAULT_RESOLUTION).unwrap();
    assert_eq!(t.cells(3, 4).unwrap(), grid.rotations()[3]);
    assert!(matches!(t.cells(4, 4), Err(MarkerError::Validation(_))));
}

#[test]
#[should_panic]
fn rotation_panics_past_the_last_quarter_turn() {
    let grid = identity_grid(MarkerFamily::Bch13_5_5, MarkerIdentity(9)).unwrap();
    let t = to_pattern_template(&grid, DEFAULT_RESOLUTION).unwrap();
    let _ = t.rotation(4);
}
