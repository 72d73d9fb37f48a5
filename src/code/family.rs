//! Marker code families.
//!
//! A family fixes the grid size, the codeword construction and therefore the
//! identity range. Every family shares the same orientation corners and scan
//! order (see [`crate::to_grid`]).

use std::str::FromStr;

use crate::foundation::error::MarkerError;

/// Smallest design distance accepted for an active family.
///
/// Distance 5 lets a detector correct any 2-bit misread.
pub const MIN_ACTIVE_DISTANCE: u32 = 5;

/// Number of orientation cells every family reserves.
pub const ORIENTATION_CELL_COUNT: usize = 3;

/// Barcode marker family understood by the external detector.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub enum MarkerFamily {
    /// Legacy 3x3 matrix code: 6 raw data bits, no error correction.
    #[serde(rename = "3x3")]
    Matrix3x3,
    /// 4x4 grid carrying a BCH(13,5) codeword, minimum distance 5.
    #[default]
    #[serde(rename = "4x4_BCH_13_5_5")]
    Bch13_5_5,
    /// 5x5 grid carrying a BCH(22,7) codeword, minimum distance 7.
    #[serde(rename = "5x5_BCH_22_7_7")]
    Bch22_7_7,
}

impl MarkerFamily {
    /// Every known family, legacy first.
    pub const ALL: [MarkerFamily; 3] = [Self::Matrix3x3, Self::Bch13_5_5, Self::Bch22_7_7];

    /// Side length of the marker grid in cells.
    pub const fn grid_size(self) -> usize {
        match self {
            Self::Matrix3x3 => 3,
            Self::Bch13_5_5 => 4,
            Self::Bch22_7_7 => 5,
        }
    }

    /// Number of identity bits carried by a codeword.
    pub const fn data_bits(self) -> u32 {
        match self {
            Self::Matrix3x3 => 6,
            Self::Bch13_5_5 => 5,
            Self::Bch22_7_7 => 7,
        }
    }

    /// Number of parity bits appended below the data bits.
    pub const fn parity_bits(self) -> u32 {
        match self {
            Self::Matrix3x3 => 0,
            Self::Bch13_5_5 => 8,
            Self::Bch22_7_7 => 15,
        }
    }

    /// Total codeword width in bits.
    pub const fn codeword_bits(self) -> u32 {
        self.data_bits() + self.parity_bits()
    }

    /// Generator polynomial, bit `i` holding the coefficient of `x^i`.
    ///
    /// `0x1D1` is `x^8 + x^7 + x^6 + x^4 + 1`; `0x8FAF` is the BCH(31,16)
    /// generator shortened to 22 bits.
    pub const fn generator(self) -> u32 {
        match self {
            Self::Matrix3x3 => 0x1,
            Self::Bch13_5_5 => 0x1D1,
            Self::Bch22_7_7 => 0x8FAF,
        }
    }

    /// Number of identities: the valid range is `0..id_count()`.
    pub const fn id_count(self) -> u32 {
        1 << self.data_bits()
    }

    /// Guaranteed minimum pairwise Hamming distance between codewords.
    pub const fn design_distance(self) -> u32 {
        match self {
            Self::Matrix3x3 => 1,
            Self::Bch13_5_5 => 5,
            Self::Bch22_7_7 => 7,
        }
    }

    /// Bit errors a nearest-codeword decoder can always undo.
    pub const fn correctable_bits(self) -> u32 {
        (self.design_distance() - 1) / 2
    }

    /// Return `true` when `value` is a valid identity of this family.
    pub const fn contains(self, value: u32) -> bool {
        value < self.id_count()
    }

    /// Families below [`MIN_ACTIVE_DISTANCE`] are only kept to describe old identities.
    pub const fn is_legacy(self) -> bool {
        self.design_distance() < MIN_ACTIVE_DISTANCE
    }

    /// Detector-facing family name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Matrix3x3 => "3x3",
            Self::Bch13_5_5 => "4x4_BCH_13_5_5",
            Self::Bch22_7_7 => "5x5_BCH_22_7_7",
        }
    }
}

impl std::fmt::Display for MarkerFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkerFamily {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fam| fam.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MarkerError::validation(format!("unknown marker family '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/code/family.rs"]
mod tests;
