use std::collections::BTreeSet;

use crate::code::family::MarkerFamily;
use crate::foundation::core::MarkerIdentity;
use crate::foundation::error::{MarkerError, MarkerResult};
use crate::identity::preference::PreferenceOrder;

/// Picks the next free identity for a new panel.
///
/// Pure: the caller reads the used set and persists the result under one
/// serialization point (see [`crate::MarkerRegistry`]).
#[derive(Clone, Debug)]
pub struct Allocator {
    family: MarkerFamily,
    preference: PreferenceOrder,
}

impl Allocator {
    /// Build an allocator; `preference` must belong to `family`.
    pub fn new(family: MarkerFamily, preference: PreferenceOrder) -> MarkerResult<Self> {
        preference.validate(family)?;
        Ok(Self { family, preference })
    }

    /// Allocator using the family's default ranking.
    pub fn with_default_order(family: MarkerFamily) -> Self {
        Self {
            family,
            preference: PreferenceOrder::for_family(family),
        }
    }

    /// Family this allocator hands out identities from.
    pub fn family(&self) -> MarkerFamily {
        self.family
    }

    /// First unused identity by preference, then lowest unused in range.
    ///
    /// Used identities outside the family's range are ignored.
    pub fn allocate(&self, used: &BTreeSet<MarkerIdentity>) -> MarkerResult<MarkerIdentity> {
        self.preference
            .as_slice()
            .iter()
            .copied()
            .chain((0..self.family.id_count()).map(MarkerIdentity))
            .find(|id| !used.contains(id))
            .ok_or(MarkerError::IdentitySpaceExhausted {
                family: self.family,
                id_count: self.family.id_count(),
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/identity/allocator.rs"]
mod tests;
