use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{MarkerIdentity, PanelId};
use crate::foundation::error::{MarkerError, MarkerResult};
use crate::identity::migrate::StoredIdentity;
use crate::store::IdentityStore;

/// In-process identity store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    rows: BTreeMap<PanelId, MarkerIdentity>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`; identities must be unique.
    pub fn from_rows(rows: impl IntoIterator<Item = StoredIdentity>) -> MarkerResult<Self> {
        let mut store = Self::new();
        for row in rows {
            store.reserve_identity(row.panel, row.identity)?;
        }
        Ok(store)
    }

    /// Number of panels holding an identity.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when no panel holds an identity.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn holder_of(&self, identity: MarkerIdentity) -> Option<PanelId> {
        self.rows
            .iter()
            .find(|&(_, &id)| id == identity)
            .map(|(&panel, _)| panel)
    }
}

impl IdentityStore for MemoryStore {
    fn snapshot(&self) -> MarkerResult<Vec<StoredIdentity>> {
        Ok(self
            .rows
            .iter()
            .map(|(&panel, &identity)| StoredIdentity { panel, identity })
            .collect())
    }

    fn list_used_identities(&self) -> MarkerResult<BTreeSet<MarkerIdentity>> {
        Ok(self.rows.values().copied().collect())
    }

    fn identity_of(&self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        Ok(self.rows.get(&panel).copied())
    }

    fn reserve_identity(&mut self, panel: PanelId, identity: MarkerIdentity) -> MarkerResult<()> {
        if let Some(existing) = self.rows.get(&panel) {
            return Err(MarkerError::store(format!(
                "panel {panel} already holds marker {existing}"
            )));
        }
        if let Some(holder) = self.holder_of(identity) {
            return Err(MarkerError::store(format!(
                "marker {identity} is already held by panel {holder}"
            )));
        }
        self.rows.insert(panel, identity);
        Ok(())
    }

    fn reassign_identity(
        &mut self,
        panel: PanelId,
        old: MarkerIdentity,
        new: MarkerIdentity,
    ) -> MarkerResult<()> {
        match self.rows.get(&panel) {
            Some(&current) if current == old => {}
            Some(&current) => {
                return Err(MarkerError::store(format!(
                    "panel {panel} holds marker {current}, not {old}"
                )));
            }
            None => return Err(MarkerError::store(format!("panel {panel} holds no marker"))),
        }
        if let Some(holder) = self.holder_of(new).filter(|&h| h != panel) {
            return Err(MarkerError::store(format!(
                "marker {new} is already held by panel {holder}"
            )));
        }
        self.rows.insert(panel, new);
        Ok(())
    }

    fn release_identity(&mut self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        Ok(self.rows.remove(&panel))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/memory.rs"]
mod tests;
