use crate::code::family::MarkerFamily;

/// Convenience result type used across panelmark.
pub type MarkerResult<T> = Result<T, MarkerError>;

/// Top-level error taxonomy used by the marker APIs.
#[derive(thiserror::Error, Debug)]
pub enum MarkerError {
    /// Invalid user-provided configuration, geometry or matrix data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A marker value outside the family's identity range was requested.
    #[error("invalid identity: {value} is outside {family} (valid range 0..{id_count})")]
    InvalidIdentity {
        /// The rejected value.
        value: u32,
        /// Family the value was checked against.
        family: MarkerFamily,
        /// Number of identities in the family.
        id_count: u32,
    },

    /// Every identity of the active family is already assigned.
    #[error("identity space exhausted: all {id_count} {family} marker slots are in use")]
    IdentitySpaceExhausted {
        /// Active family.
        family: MarkerFamily,
        /// Number of identities in the family.
        id_count: u32,
    },

    /// Failure reported by the storage collaborator.
    #[error("store error: {0}")]
    Store(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MarkerError {
    /// Build a [`MarkerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MarkerError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`MarkerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors caused by caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidIdentity { .. } | Self::IdentitySpaceExhausted { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
