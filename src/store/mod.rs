//! Storage collaborator for panel identities.
//!
//! Panel records live elsewhere; this seam only covers the identity column.
//! [`crate::MarkerRegistry`] serializes callers inside one process with its
//! lock and wraps every read-allocate-write step in
//! [`IdentityStore::transaction`]. Stores shared between processes make that
//! hook exclusive across them.

use std::collections::BTreeSet;

use crate::foundation::core::{MarkerIdentity, PanelId};
use crate::foundation::error::MarkerResult;
use crate::identity::migrate::StoredIdentity;

pub(crate) mod json_file;
pub(crate) mod memory;

/// Identity persistence used by allocation and migration.
pub trait IdentityStore {
    /// Run `f` as one exclusive read-modify-write against the backing storage.
    ///
    /// Reads inside `f` see every change committed before the transaction
    /// began, including changes made through other handles. The default runs
    /// `f` directly, which suits stores owned by a single handle.
    fn transaction<R, F>(&mut self, f: F) -> MarkerResult<R>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> MarkerResult<R>,
    {
        f(self)
    }

    /// Every stored `(panel, identity)` row, ascending by panel.
    fn snapshot(&self) -> MarkerResult<Vec<StoredIdentity>>;

    /// Set of identities currently held by any panel.
    fn list_used_identities(&self) -> MarkerResult<BTreeSet<MarkerIdentity>> {
        Ok(self.snapshot()?.into_iter().map(|row| row.identity).collect())
    }

    /// Identity held by `panel`, if any.
    fn identity_of(&self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .find(|row| row.panel == panel)
            .map(|row| row.identity))
    }

    /// Record `identity` for a panel that holds none. Fails if another panel holds it.
    fn reserve_identity(&mut self, panel: PanelId, identity: MarkerIdentity) -> MarkerResult<()>;

    /// Replace `old` with `new` for `panel`. Fails if `panel` does not hold `old`
    /// or `new` is taken.
    fn reassign_identity(
        &mut self,
        panel: PanelId,
        old: MarkerIdentity,
        new: MarkerIdentity,
    ) -> MarkerResult<()>;

    /// Forget `panel`'s identity, returning it.
    fn release_identity(&mut self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>>;
}
