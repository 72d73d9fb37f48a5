//! JSON configuration for the marker subsystem.
//!
//! Every field has a default, so `{}` is a complete config.

use std::path::Path;

use anyhow::Context;

use crate::code::family::MarkerFamily;
use crate::foundation::error::{MarkerError, MarkerResult};
use crate::identity::allocator::Allocator;
use crate::identity::preference::PreferenceOrder;
use crate::render::composite::CompositeGeometry;
use crate::render::marker::StandaloneGeometry;
use crate::render::pattern::PatternOptions;

/// Marker settings: active family, allocation ranking and render geometry.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Family new identities are issued from.
    pub family: MarkerFamily,
    /// Explicit allocation ranking; the family default when absent.
    pub preference: Option<Vec<u32>>,
    /// Standalone marker layout.
    pub standalone: StandaloneGeometry,
    /// QR composite layout.
    pub composite: CompositeGeometry,
    /// `.patt` export settings.
    pub pattern: PatternOptions,
}

impl MarkerConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> MarkerResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(text: &str) -> MarkerResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| MarkerError::serde(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the family, ranking and geometry.
    pub fn validate(&self) -> MarkerResult<()> {
        if self.family.is_legacy() {
            return Err(MarkerError::validation(format!(
                "family {} is legacy-only and cannot issue new identities",
                self.family
            )));
        }
        self.preference_order()?;
        self.standalone.validate()?;
        self.composite.validate()?;
        let n = self.family.grid_size();
        if self.pattern.resolution < n {
            return Err(MarkerError::validation(format!(
                "pattern.resolution {} is smaller than the {n}x{n} grid",
                self.pattern.resolution
            )));
        }
        Ok(())
    }

    /// Allocation ranking for the active family.
    pub fn preference_order(&self) -> MarkerResult<PreferenceOrder> {
        match &self.preference {
            Some(ranking) => PreferenceOrder::new(self.family, ranking),
            None => Ok(PreferenceOrder::for_family(self.family)),
        }
    }

    /// Allocator for the active family and ranking.
    pub fn allocator(&self) -> MarkerResult<Allocator> {
        Allocator::new(self.family, self.preference_order()?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/file.rs"]
mod tests;
