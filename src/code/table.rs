//! Static codeword tables.
//!
//! Each table is built by `const fn` from the family's generator polynomial,
//! so the lookup is a compile-time constant with no initialization or
//! mutation path. Codewords are systematic: the identity sits in the top
//! `data_bits`, the polynomial remainder in the low `parity_bits`.

use crate::code::family::MarkerFamily;
use crate::foundation::core::MarkerIdentity;
use crate::foundation::error::{MarkerError, MarkerResult};

/// Error-correcting binary encoding of a marker identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Codeword(pub u32);

impl Codeword {
    /// Value of bit `index` (0 = least significant).
    pub fn bit(self, index: u32) -> bool {
        (self.0 >> index) & 1 == 1
    }

    /// Hamming distance to `other`.
    pub fn distance(self, other: Codeword) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl std::fmt::Display for Codeword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

const fn systematic_codeword(family: MarkerFamily, data: u32) -> u32 {
    let parity = family.parity_bits();
    let shifted = data << parity;
    let mut rem = shifted;
    let mut bit = family.codeword_bits();
    while bit > parity {
        bit -= 1;
        if (rem >> bit) & 1 == 1 {
            rem ^= family.generator() << (bit - parity);
        }
    }
    shifted | rem
}

const fn build_table<const N: usize>(family: MarkerFamily) -> [Codeword; N] {
    assert!(N == family.id_count() as usize);
    let mut out = [Codeword(0); N];
    let mut id = 0;
    while id < N {
        out[id] = Codeword(systematic_codeword(family, id as u32));
        id += 1;
    }
    out
}

static MATRIX_3X3: [Codeword; 64] = build_table(MarkerFamily::Matrix3x3);
static BCH_13_5_5: [Codeword; 32] = build_table(MarkerFamily::Bch13_5_5);
static BCH_22_7_7: [Codeword; 128] = build_table(MarkerFamily::Bch22_7_7);

/// Full codeword table of `family`, indexed by identity.
pub fn codeword_table(family: MarkerFamily) -> &'static [Codeword] {
    match family {
        MarkerFamily::Matrix3x3 => &MATRIX_3X3,
        MarkerFamily::Bch13_5_5 => &BCH_13_5_5,
        MarkerFamily::Bch22_7_7 => &BCH_22_7_7,
    }
}

/// Translate `identity` into its codeword.
///
/// Identities outside the family's range are rejected, never clamped.
pub fn encode(family: MarkerFamily, identity: MarkerIdentity) -> MarkerResult<Codeword> {
    codeword_table(family)
        .get(identity.0 as usize)
        .copied()
        .ok_or(MarkerError::InvalidIdentity {
            value: identity.0,
            family,
            id_count: family.id_count(),
        })
}

/// Result of matching an observed word against a codeword table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeMatch {
    /// Identity of the nearest codeword.
    pub identity: MarkerIdentity,
    /// Hamming distance between the observed word and that codeword.
    pub distance: u32,
    /// `second_best_distance - distance`; 0 means the match is ambiguous.
    pub margin: u32,
}

impl DecodeMatch {
    /// `true` when the distance is within the family's guaranteed correction radius.
    pub fn is_correctable(&self, family: MarkerFamily) -> bool {
        self.distance <= family.correctable_bits() && self.margin > 0
    }
}

/// Find the codeword nearest to `word` (ties resolve to the lower identity).
pub fn decode_nearest(family: MarkerFamily, word: Codeword) -> DecodeMatch {
    let mut best = (u32::MAX, 0u32);
    let mut second = u32::MAX;
    for (id, cw) in codeword_table(family).iter().enumerate() {
        let d = cw.distance(word);
        if d < best.0 {
            second = best.0;
            best = (d, id as u32);
        } else if d < second {
            second = d;
        }
    }
    DecodeMatch {
        identity: MarkerIdentity(best.1),
        distance: best.0,
        margin: second.saturating_sub(best.0),
    }
}

/// Decode `word`, accepting it only inside the family's correction radius.
pub fn correct(family: MarkerFamily, word: Codeword) -> Option<MarkerIdentity> {
    let m = decode_nearest(family, word);
    m.is_correctable(family).then_some(m.identity)
}

#[cfg(test)]
#[path = "../../tests/unit/code/table.rs"]
mod tests;
