use super::*;

const SHIPPED_BCH_13_5_5: [u32; 32] = [
    0x0000, 0x01D1, 0x0273, 0x03A2, 0x04E6, 0x0537, 0x0695, 0x0744, //
    0x081D, 0x09CC, 0x0A6E, 0x0BBF, 0x0CFB, 0x0D2A, 0x0E88, 0x0F59, //
    0x103A, 0x11EB, 0x1249, 0x1398, 0x14DC, 0x150D, 0x16AF, 0x177E, //
    0x1827, 0x19F6, 0x1A54, 0x1B85, 0x1CC1, 0x1D10, 0x1EB2, 0x1F63,
];

fn min_pairwise_distance(table: &[Codeword]) -> u32 {
    let mut min = u32::MAX;
    for (i, a) in table.iter().enumerate() {
        for b in &table[i + 1..] {
            min = min.min(a.distance(*b));
        }
    }
    min
}

#[test]
fn bch_13_5_5_reproduces_shipped_table() {
    let table: Vec<u32> = codeword_table(MarkerFamily::Bch13_5_5)
        .iter()
        .map(|cw| cw.0)
        .collect();
    assert_eq!(table, SHIPPED_BCH_13_5_5);
}

#[test]
fn tables_meet_design_distance() {
    for fam in MarkerFamily::ALL {
        let table = codeword_table(fam);
        assert_eq!(table.len(), fam.id_count() as usize);
        assert!(
            min_pairwise_distance(table) >= fam.design_distance(),
            "{fam}"
        );
    }
}

#[test]
fn codewords_fit_their_width_and_carry_identity_in_top_bits() {
    for fam in MarkerFamily::ALL {
        for (id, cw) in codeword_table(fam).iter().enumerate() {
            assert!(cw.0 < (1 << fam.codeword_bits()));
            assert_eq!(cw.0 >> fam.parity_bits(), id as u32);
        }
    }
}

#[test]
fn encode_rejects_out_of_range_identity() {
    let fam = MarkerFamily::Bch13_5_5;
    assert_eq!(encode(fam, MarkerIdentity(1)).unwrap(), Codeword(0x01D1));
    let err = encode(fam, MarkerIdentity(32)).unwrap_err();
    assert!(matches!(err, MarkerError::InvalidIdentity { value: 32, .. }));
}

#[test]
fn every_two_bit_error_is_corrected() {
    let fam = MarkerFamily::Bch13_5_5;
    let bits = fam.codeword_bits();
    for id in 0..fam.id_count() {
        let cw = encode(fam, MarkerIdentity(id)).unwrap();
        assert_eq!(correct(fam, cw), Some(MarkerIdentity(id)));
        for i in 0..bits {
            for j in i..bits {
                let flipped = Codeword(cw.0 ^ (1 << i) ^ (1 << j));
                assert_eq!(correct(fam, flipped), Some(MarkerIdentity(id)));
            }
        }
    }
}

#[test]
fn exact_match_reports_zero_distance_and_wide_margin() {
    let fam = MarkerFamily::Bch22_7_7;
    let cw = encode(fam, MarkerIdentity(77)).unwrap();
    let m = decode_nearest(fam, cw);
    assert_eq!(m.identity, MarkerIdentity(77));
    assert_eq!(m.distance, 0);
    assert!(m.margin >= fam.design_distance());
}

#[test]
fn raw_matrix_family_misreads_single_bit_flips() {
    let fam = MarkerFamily::Matrix3x3;
    let cw = encode(fam, MarkerIdentity(5)).unwrap();
    assert_eq!(cw, Codeword(5));
    assert_eq!(correct(fam, Codeword(cw.0 ^ 1)), Some(MarkerIdentity(4)));
}

#[test]
fn codeword_display_is_hex() {
    assert_eq!(Codeword(0x1D1).to_string(), "0x01D1");
}
