use parking_lot::Mutex;

use crate::code::family::MarkerFamily;
use crate::config::file::MarkerConfig;
use crate::foundation::core::{MarkerIdentity, PanelId};
use crate::foundation::error::MarkerResult;
use crate::identity::allocator::Allocator;
use crate::identity::migrate::{MigrationReport, reconcile};
use crate::store::IdentityStore;

/// Serialization point for identity assignment.
///
/// The store sits behind one mutex. Assignment reads the used set, picks the
/// next identity and reserves it while holding the lock and inside one
/// [`IdentityStore::transaction`], so concurrent callers can never be handed
/// the same identity, even through separate registries over a shared store. [`MarkerRegistry::open`] runs the
/// migration pass before the registry is returned, so nothing can be
/// allocated until migration has finished.
///
/// Share across threads with `Arc<MarkerRegistry<S>>`.
pub struct MarkerRegistry<S> {
    allocator: Allocator,
    store: Mutex<S>,
}

impl<S: IdentityStore> MarkerRegistry<S> {
    /// Validate `config`, wrap `store` and migrate out-of-range identities.
    #[tracing::instrument(skip_all, fields(family = %config.family))]
    pub fn open(store: S, config: &MarkerConfig) -> MarkerResult<(Self, MigrationReport)> {
        config.validate()?;
        let registry = Self {
            allocator: config.allocator()?,
            store: Mutex::new(store),
        };
        let report = registry.migrate()?;
        Ok((registry, report))
    }

    /// Run the migration pass again under the lock.
    ///
    /// A no-op once every stored identity is in range. Reassignments already
    /// written stay written if a later one fails.
    pub fn migrate(&self) -> MarkerResult<MigrationReport> {
        let family = self.allocator.family();
        self.store.lock().transaction(|store| {
            let snapshot = store.snapshot()?;
            reconcile(family, &snapshot, |change| {
                store.reassign_identity(change.panel, change.from, change.to)
            })
        })
    }

    /// Identity for `panel`, allocating and reserving one if it has none.
    #[tracing::instrument(skip(self), fields(family = %self.allocator.family()))]
    pub fn assign(&self, panel: PanelId) -> MarkerResult<MarkerIdentity> {
        self.store.lock().transaction(|store| {
            if let Some(existing) = store.identity_of(panel)? {
                return Ok(existing);
            }
            let used = store.list_used_identities()?;
            let identity = self.allocator.allocate(&used)?;
            store.reserve_identity(panel, identity)?;
            tracing::info!(%panel, %identity, "marker assigned");
            Ok(identity)
        })
    }

    /// Free `panel`'s identity, returning it.
    #[tracing::instrument(skip(self))]
    pub fn release(&self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        let released = self
            .store
            .lock()
            .transaction(|store| store.release_identity(panel))?;
        if let Some(identity) = released {
            tracing::info!(%panel, %identity, "marker released");
        }
        Ok(released)
    }

    /// Identity currently held by `panel`.
    pub fn identity_of(&self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        self.store
            .lock()
            .transaction(|store| store.identity_of(panel))
    }

    /// Family new identities come from.
    pub fn family(&self) -> MarkerFamily {
        self.allocator.family()
    }

    /// Run `f` against the store while holding the lock.
    ///
    /// `f` sees the store as of its last transaction; no reload happens here.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.store.lock())
    }

    /// Unwrap the store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/identity/registry.rs"]
mod tests;
