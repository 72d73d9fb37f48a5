//! One-shot reconciliation of stored identities against the active family.
//!
//! When the active family's range shrinks (for example 64 raw 3x3 codes to 32
//! BCH codes), identities issued earlier can fall outside it. A pass scans a
//! snapshot of stored identities and moves every out-of-range identity to the
//! lowest free slot, in ascending panel order. A panel that cannot be moved
//! keeps its identity and is reported; the pass itself does not fail.

use std::collections::BTreeSet;

use crate::code::family::MarkerFamily;
use crate::foundation::core::{MarkerIdentity, PanelId};
use crate::foundation::error::MarkerResult;

/// One stored `(panel, identity)` row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredIdentity {
    /// Owning panel; ascending order is creation order.
    pub panel: PanelId,
    /// Identity as stored, possibly out of range.
    pub identity: MarkerIdentity,
}

/// An identity moved into range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Reassignment {
    /// Panel whose identity changed.
    pub panel: PanelId,
    /// Out-of-range identity it held.
    pub from: MarkerIdentity,
    /// New in-range identity.
    pub to: MarkerIdentity,
}

/// Out-of-range identity left in place because the range is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlotUnavailable {
    /// Panel that keeps its invalid identity.
    pub panel: PanelId,
    /// The identity it keeps.
    pub identity: MarkerIdentity,
}

/// Outcome of a reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct MigrationReport {
    /// Applied reassignments, in processing order.
    pub reassigned: Vec<Reassignment>,
    /// Panels that could not be moved.
    pub unavailable: Vec<SlotUnavailable>,
}

impl MigrationReport {
    /// `true` when the snapshot had nothing out of range.
    pub fn is_noop(&self) -> bool {
        self.reassigned.is_empty() && self.unavailable.is_empty()
    }
}

/// Reconcile `snapshot` against `family`, calling `apply` for each reassignment.
///
/// `apply` persists one change. An error from it stops the pass and is
/// returned; changes `apply` already persisted stay in place, and running the
/// pass again picks up the remaining out-of-range rows.
pub fn reconcile<F>(
    family: MarkerFamily,
    snapshot: &[StoredIdentity],
    mut apply: F,
) -> MarkerResult<MigrationReport>
where
    F: FnMut(&Reassignment) -> MarkerResult<()>,
{
    let mut out_of_range: Vec<StoredIdentity> = snapshot
        .iter()
        .filter(|row| !family.contains(row.identity.0))
        .copied()
        .collect();
    if out_of_range.is_empty() {
        tracing::debug!(%family, panels = snapshot.len(), "migration scan: nothing out of range");
        return Ok(MigrationReport::default());
    }
    out_of_range.sort_by_key(|row| row.panel);

    let mut used: BTreeSet<MarkerIdentity> = snapshot.iter().map(|row| row.identity).collect();
    let mut report = MigrationReport::default();
    for row in out_of_range {
        let free = (0..family.id_count())
            .map(MarkerIdentity)
            .find(|id| !used.contains(id));
        let Some(to) = free else {
            tracing::warn!(
                panel = %row.panel,
                identity = %row.identity,
                %family,
                "migration: no free marker slot, panel keeps its identity"
            );
            report.unavailable.push(SlotUnavailable {
                panel: row.panel,
                identity: row.identity,
            });
            continue;
        };

        let change = Reassignment {
            panel: row.panel,
            from: row.identity,
            to,
        };
        apply(&change)?;
        tracing::info!(panel = %row.panel, from = %row.identity, %to, "migration: marker reassigned");
        used.remove(&row.identity);
        used.insert(to);
        report.reassigned.push(change);
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/identity/migrate.rs"]
mod tests;
