use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::code::family::MarkerFamily;
use crate::code::synth::identity_grid;
use crate::foundation::core::MarkerIdentity;
use crate::foundation::error::{MarkerError, MarkerResult};

/// Contrast ranking shipped for `4x4_BCH_13_5_5` panels.
///
/// Darker grids come first: identity 31 (11 dark cells) leads and identity 0
/// (only the two dark orientation cells) is last.
pub const BCH_13_5_5_CONTRAST_ORDER: [u32; 32] = [
    31, 30, 29, 27, 23, 15, 28, 26, 25, 22, 21, 14, 13, 24, 20, 19, 11, 12, 18, 17, 10, 9, 7, 16,
    8, 6, 5, 3, 4, 2, 1, 0,
];

/// Ordered ranking of identities, most desirable first.
///
/// The ranking is data: the allocator only walks it. A ranking may name a
/// subset of the family; unnamed identities come after it in numeric order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PreferenceOrder(Vec<MarkerIdentity>);

impl PreferenceOrder {
    /// Validate `ranking` against `family`: every entry in range, no duplicates.
    pub fn new(family: MarkerFamily, ranking: &[u32]) -> MarkerResult<Self> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(ranking.len());
        for &value in ranking {
            let id = MarkerIdentity::checked(value, family)?;
            if !seen.insert(id) {
                return Err(MarkerError::validation(format!(
                    "preference order lists identity {id} twice"
                )));
            }
            out.push(id);
        }
        Ok(Self(out))
    }

    /// Default ranking for `family`.
    pub fn for_family(family: MarkerFamily) -> Self {
        match family {
            MarkerFamily::Bch13_5_5 => Self(
                BCH_13_5_5_CONTRAST_ORDER
                    .iter()
                    .map(|&v| MarkerIdentity(v))
                    .collect(),
            ),
            other => Self::by_dark_cells(other),
        }
    }

    /// Rank by number of dark grid cells, descending; ties by ascending identity.
    ///
    /// Follows the same measure as [`BCH_13_5_5_CONTRAST_ORDER`], so the
    /// all-light data grid of identity 0 is always ranked last.
    pub fn by_dark_cells(family: MarkerFamily) -> Self {
        let mut ranked: Vec<(usize, MarkerIdentity)> = (0..family.id_count())
            .filter_map(|v| {
                let id = MarkerIdentity(v);
                identity_grid(family, id)
                    .ok()
                    .map(|g| (g.dark_count(), id))
            })
            .collect();
        ranked.sort_by_key(|&(dark, id)| (Reverse(dark), id));
        Self(ranked.into_iter().map(|(_, id)| id).collect())
    }

    /// Ranked identities.
    pub fn as_slice(&self) -> &[MarkerIdentity] {
        &self.0
    }

    /// Re-check the ranking against `family`.
    pub fn validate(&self, family: MarkerFamily) -> MarkerResult<()> {
        let raw: Vec<u32> = self.0.iter().map(|id| id.0).collect();
        Self::new(family, &raw).map(|_| ())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/identity/preference.rs"]
mod tests;
