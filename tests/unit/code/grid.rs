use super::*;

fn sample() -> Grid {
    Grid::parse_rows(&["#..", "##.", "..#"]).unwrap()
}

#[test]
fn rotate_cw_moves_left_column_to_top_row() {
    let g = sample();
    let r = g.rotate_cw();
    // Left column read bottom-up becomes the top row.
    assert_eq!(
        r.rows().next().unwrap(),
        &[g.is_dark(2, 0), g.is_dark(1, 0), g.is_dark(0, 0)]
    );
    assert_eq!(r.to_string(), ".##\n.#.\n#..\n");
}

#[test]
fn four_rotations_return_to_start() {
    let g = Grid::parse_rows(&["#..#", ".##.", "#...", "..##"]).unwrap();
    let back = g.rotate_cw().rotate_cw().rotate_cw().rotate_cw();
    assert_eq!(back, g);
}

#[test]
fn rotations_are_distinct_without_symmetry_and_equal_with_it() {
    let rots = sample().rotations();
    for i in 0..4 {
        for j in i + 1..4 {
            assert_ne!(rots[i], rots[j]);
        }
    }

    let symmetric = Grid::parse_rows(&["#.#", "...", "#.#"]).unwrap();
    for r in symmetric.rotations() {
        assert_eq!(r, symmetric);
    }
}

#[test]
fn resample_scales_cells_into_blocks() {
    let g = Grid::parse_rows(&["#.", ".#"]).unwrap();
    let big = g.resample(4);
    assert_eq!(big.to_string(), "##..\n##..\n..##\n..##\n");
    assert_eq!(big.dark_count(), 8);
}

#[test]
fn parse_rejects_ragged_and_unknown_cells() {
    assert!(Grid::parse_rows(&["##", "#"]).is_err());
    assert!(Grid::parse_rows(&["#x", "##"]).is_err());
    assert!(Grid::parse_rows::<&str>(&[]).is_err());
}
