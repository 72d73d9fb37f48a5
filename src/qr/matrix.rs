//! QR module matrices consumed by the composite renderer.
//!
//! The crate does not encode QR payloads itself. A [`QrModuleSource`] hands
//! over a finished module matrix together with the fraction of modules its
//! error-correction level can restore.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::code::grid::Grid;
use crate::foundation::error::{MarkerError, MarkerResult};

/// Smallest QR symbol side (version 1).
pub const MIN_QR_SIZE: usize = 21;

/// QR error-correction level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EcLevel {
    /// About 7% of modules recoverable.
    L,
    /// About 15% of modules recoverable.
    M,
    /// About 25% of modules recoverable.
    Q,
    /// About 30% of modules recoverable.
    #[default]
    H,
}

impl EcLevel {
    /// Declared fraction of modules that may be damaged.
    pub const fn budget(self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }
}

impl std::str::FromStr for EcLevel {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(MarkerError::validation(format!(
                "unknown error-correction level '{other}' (expected L, M, Q or H)"
            ))),
        }
    }
}

/// A QR module matrix and its error-correction budget.
#[derive(Clone, Debug, PartialEq)]
pub struct QrModules {
    grid: Grid,
    budget: f64,
}

impl QrModules {
    /// Wrap `grid` with the budget of `level`.
    pub fn new(grid: Grid, level: EcLevel) -> MarkerResult<Self> {
        Self::with_budget(grid, level.budget())
    }

    /// Wrap `grid` with an explicit budget fraction in `(0, 1)`.
    pub fn with_budget(grid: Grid, budget: f64) -> MarkerResult<Self> {
        let n = grid.size();
        if n < MIN_QR_SIZE || n % 2 == 0 {
            return Err(MarkerError::validation(format!(
                "QR module matrix must be square with an odd side >= {MIN_QR_SIZE}, got {n}"
            )));
        }
        if !(budget > 0.0 && budget < 1.0) {
            return Err(MarkerError::validation(format!(
                "QR error-correction budget must be in (0, 1), got {budget}"
            )));
        }
        Ok(Self { grid, budget })
    }

    /// Module matrix, `true` meaning dark.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Side in modules.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Declared error-correction budget.
    pub fn budget(&self) -> f64 {
        self.budget
    }
}

/// Producer of QR module matrices.
pub trait QrModuleSource {
    /// Module matrix encoding `payload` at `level`.
    fn build_module_grid(&self, payload: &str, level: EcLevel) -> MarkerResult<QrModules>;
}

#[derive(serde::Deserialize)]
struct MatrixDoc {
    #[serde(default)]
    ec_level: EcLevel,
    #[serde(default)]
    payload: Option<String>,
    rows: Vec<String>,
}

/// Module matrix produced by an external QR encoder and saved as JSON.
///
/// ```json
/// {"ec_level": "H", "payload": "https://example.test/p/7", "rows": ["1111111000...", "..."]}
/// ```
///
/// `payload` is optional; when present, [`QrModuleSource::build_module_grid`]
/// refuses requests for any other payload.
#[derive(Clone, Debug)]
pub struct ModuleMatrixFile {
    path: PathBuf,
    level: EcLevel,
    payload: Option<String>,
    modules: QrModules,
}

impl ModuleMatrixFile {
    /// Load and validate a matrix file.
    pub fn from_path(path: impl Into<PathBuf>) -> MarkerResult<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read QR matrix '{}'", path.display()))?;
        let mut file = Self::from_json_str(&text)
            .map_err(|e| MarkerError::validation(format!("QR matrix '{}': {e}", path.display())))?;
        file.path = path;
        Ok(file)
    }

    /// Parse a matrix document held in memory.
    pub fn from_json_str(text: &str) -> MarkerResult<Self> {
        let doc: MatrixDoc =
            serde_json::from_str(text).map_err(|e| MarkerError::serde(e.to_string()))?;
        let grid = Grid::parse_rows(&doc.rows)?;
        let modules = QrModules::new(grid, doc.ec_level)?;
        Ok(Self {
            path: PathBuf::new(),
            level: doc.ec_level,
            payload: doc.payload,
            modules,
        })
    }

    /// File the matrix was read from; empty for in-memory documents.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared error-correction level.
    pub fn level(&self) -> EcLevel {
        self.level
    }

    /// Payload recorded alongside the matrix, if any.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// The loaded modules.
    pub fn modules(&self) -> &QrModules {
        &self.modules
    }
}

impl QrModuleSource for ModuleMatrixFile {
    fn build_module_grid(&self, payload: &str, level: EcLevel) -> MarkerResult<QrModules> {
        if level != self.level {
            return Err(MarkerError::validation(format!(
                "QR matrix was encoded at level {:?}, requested {level:?}",
                self.level
            )));
        }
        if let Some(stored) = &self.payload
            && stored != payload
        {
            return Err(MarkerError::validation(format!(
                "QR matrix encodes '{stored}', requested '{payload}'"
            )));
        }
        Ok(self.modules.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qr/matrix.rs"]
mod tests;
