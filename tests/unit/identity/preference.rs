use super::*;

#[test]
fn shipped_order_is_a_permutation_of_the_family() {
    let order = PreferenceOrder::for_family(MarkerFamily::Bch13_5_5);
    let set: BTreeSet<_> = order.as_slice().iter().copied().collect();
    assert_eq!(set.len(), 32);
    assert_eq!(order.as_slice()[0], MarkerIdentity(31));
    order.validate(MarkerFamily::Bch13_5_5).unwrap();
}

#[test]
fn new_rejects_out_of_range_and_duplicates() {
    let fam = MarkerFamily::Bch13_5_5;
    assert!(PreferenceOrder::new(fam, &[3, 0, 1]).is_ok());
    assert!(matches!(
        PreferenceOrder::new(fam, &[3, 40]),
        Err(MarkerError::InvalidIdentity { value: 40, .. })
    ));
    assert!(matches!(
        PreferenceOrder::new(fam, &[3, 3]),
        Err(MarkerError::Validation(_))
    ));
}

#[test]
fn dark_cell_ranking_puts_darkest_grid_first() {
    let fam = MarkerFamily::Bch22_7_7;
    let order = PreferenceOrder::by_dark_cells(fam);
    assert_eq!(order.as_slice().len(), 128);
    // Identity 0 has no dark data cells.
    assert_eq!(order.as_slice()[127], MarkerIdentity(0));

    let darks: Vec<usize> = order
        .as_slice()
        .iter()
        .map(|&id| identity_grid(fam, id).unwrap().dark_count())
        .collect();
    assert!(darks.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn dark_cell_ranking_agrees_with_shipped_order_at_the_ends() {
    let fam = MarkerFamily::Bch13_5_5;
    let derived = PreferenceOrder::by_dark_cells(fam);
    let shipped = PreferenceOrder::for_family(fam);
    assert_eq!(derived.as_slice().last(), shipped.as_slice().last());

    let dark = |id: MarkerIdentity| identity_grid(fam, id).unwrap().dark_count();
    assert_eq!(dark(shipped.as_slice()[0]), 11);
    assert!(dark(derived.as_slice()[0]) >= dark(shipped.as_slice()[0]));
}

#[test]
fn ranking_serializes_as_plain_list() {
    let order = PreferenceOrder::new(MarkerFamily::Bch13_5_5, &[3, 0]).unwrap();
    assert_eq!(serde_json::to_string(&order).unwrap(), "[3,0]");
}
