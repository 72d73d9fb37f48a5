use crate::code::family::MarkerFamily;
use crate::foundation::error::{MarkerError, MarkerResult};

pub use kurbo::{Point, Rect};

/// Marker identity: the small integer a panel's marker encodes.
///
/// A raw identity carries no family. Use [`MarkerIdentity::checked`] at every
/// boundary where a value enters from outside to reject out-of-range input.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct MarkerIdentity(pub u32);

impl MarkerIdentity {
    /// Validate `value` against the identity range of `family`.
    pub fn checked(value: u32, family: MarkerFamily) -> MarkerResult<Self> {
        if family.contains(value) {
            Ok(Self(value))
        } else {
            Err(MarkerError::InvalidIdentity {
                value,
                family,
                id_count: family.id_count(),
            })
        }
    }

    /// Raw integer value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for MarkerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the panel that owns a marker, issued by the panel store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PanelId(pub u64);

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
