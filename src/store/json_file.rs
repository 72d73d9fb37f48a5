use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{MarkerIdentity, PanelId};
use crate::foundation::error::{MarkerError, MarkerResult};
use crate::identity::migrate::StoredIdentity;
use crate::store::IdentityStore;
use crate::store::memory::MemoryStore;

const FILE_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct StoreFile {
    version: u32,
    panels: Vec<StoredIdentity>,
}

/// Identity store persisted as a JSON file.
///
/// Every mutation is applied to a copy, written to `<path>.tmp` and renamed
/// over `<path>`; the in-memory state only changes once the rename succeeds.
///
/// Several handles, in one process or many, may share a path. Each
/// transaction and each standalone mutation holds an exclusive lock on
/// `<path>.lock` and reloads the file before touching it, so no handle ever
/// writes over rows another handle committed.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    locked: bool,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> MarkerResult<Self> {
        let path = path.into();
        let inner = load(&path)?;
        Ok(Self {
            path,
            inner,
            locked: false,
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, picking up rows committed by other handles.
    pub fn reload(&mut self) -> MarkerResult<()> {
        self.inner = load(&self.path)?;
        Ok(())
    }

    fn exclusive<R, F>(&mut self, f: F) -> MarkerResult<R>
    where
        F: FnOnce(&mut Self) -> MarkerResult<R>,
    {
        if self.locked {
            return f(self);
        }
        let lock_path = sibling(&self.path, ".lock");
        ensure_parent(&lock_path)?;
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("open store lock '{}'", lock_path.display()))?;
        let mut lock = fd_lock::RwLock::new(file);
        let _guard = lock
            .write()
            .with_context(|| format!("lock identity store '{}'", self.path.display()))?;

        self.reload()?;
        self.locked = true;
        let out = f(self);
        self.locked = false;
        out
    }

    fn commit<F>(&mut self, mutate: F) -> MarkerResult<()>
    where
        F: FnOnce(&mut MemoryStore) -> MarkerResult<()>,
    {
        self.exclusive(|store| {
            let mut next = store.inner.clone();
            mutate(&mut next)?;
            write_atomic(&store.path, &next)?;
            store.inner = next;
            Ok(())
        })
    }
}

fn load(path: &Path) -> MarkerResult<MemoryStore> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read identity store '{}'", path.display()))?;
    let file: StoreFile = serde_json::from_str(&text)
        .map_err(|e| MarkerError::serde(format!("identity store '{}': {e}", path.display())))?;
    if file.version != FILE_VERSION {
        return Err(MarkerError::store(format!(
            "identity store '{}' has version {}, expected {FILE_VERSION}",
            path.display(),
            file.version
        )));
    }
    MemoryStore::from_rows(file.panels)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn ensure_parent(path: &Path) -> MarkerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create store dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_atomic(path: &Path, store: &MemoryStore) -> MarkerResult<()> {
    let file = StoreFile {
        version: FILE_VERSION,
        panels: store.snapshot()?,
    };
    let json = serde_json::to_string_pretty(&file).map_err(|e| MarkerError::serde(e.to_string()))?;

    let tmp = sibling(path, ".tmp");
    std::fs::write(&tmp, json).with_context(|| format!("write '{}'", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("replace identity store '{}'", path.display()))?;
    Ok(())
}

impl IdentityStore for JsonFileStore {
    fn transaction<R, F>(&mut self, f: F) -> MarkerResult<R>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> MarkerResult<R>,
    {
        self.exclusive(f)
    }

    fn snapshot(&self) -> MarkerResult<Vec<StoredIdentity>> {
        self.inner.snapshot()
    }

    fn list_used_identities(&self) -> MarkerResult<BTreeSet<MarkerIdentity>> {
        self.inner.list_used_identities()
    }

    fn identity_of(&self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        self.inner.identity_of(panel)
    }

    fn reserve_identity(&mut self, panel: PanelId, identity: MarkerIdentity) -> MarkerResult<()> {
        self.commit(|s| s.reserve_identity(panel, identity))
    }

    fn reassign_identity(
        &mut self,
        panel: PanelId,
        old: MarkerIdentity,
        new: MarkerIdentity,
    ) -> MarkerResult<()> {
        self.commit(|s| s.reassign_identity(panel, old, new))
    }

    fn release_identity(&mut self, panel: PanelId) -> MarkerResult<Option<MarkerIdentity>> {
        self.exclusive(|store| {
            let mut released = None;
            if store.inner.identity_of(panel)?.is_some() {
                store.commit(|s| {
                    released = s.release_identity(panel)?;
                    Ok(())
                })?;
            }
            Ok(released)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/json_file.rs"]
mod tests;
