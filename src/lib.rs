//! Panelmark issues fiducial marker identities for wiring panels and renders
//! the artifacts a camera-side detector consumes.
//!
//! # Pipeline overview
//!
//! 1. **Allocate**: [`MarkerRegistry::assign`] hands a panel the next free
//!    [`MarkerIdentity`] under a single lock, after [`MarkerRegistry::open`]
//!    has migrated identities left over from an older family.
//! 2. **Encode**: [`encode`] maps the identity to an error-correcting
//!    [`Codeword`] (BCH for the active families).
//! 3. **Synthesize**: [`to_grid`] lays the codeword into a square [`Grid`] with
//!    three fixed orientation cells.
//! 4. **Render**: [`render_standalone`], [`render_composite`] (marker inside a
//!    QR clear zone) and [`to_pattern_template`] (`.patt` text) are pure
//!    functions of the grid.
//!
//! Steps 2 to 4 hold no state and may run concurrently from any thread. Only
//! assignment and migration take the registry lock.
//!
//! # Formats fixed by the detector
//!
//! - Orientation cells: `(0,0)` dark, `(n-1,0)` dark, `(n-1,n-1)` light.
//! - Codeword bits fill the other cells row-major, most significant bit first;
//!   a set bit is a dark cell.
//! - `.patt`: four clockwise rotations, three identical channels each, values
//!   `0` (dark) and `255` (light).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod code;
mod config;
mod foundation;
mod identity;
mod qr;
mod render;
mod store;

pub use code::family::{MIN_ACTIVE_DISTANCE, MarkerFamily, ORIENTATION_CELL_COUNT};
pub use code::grid::Grid;
pub use code::synth::{
    OrientationCell, from_grid, identity_grid, orient, orientation_cells, read_grid, to_grid,
};
pub use code::table::{Codeword, DecodeMatch, codeword_table, correct, decode_nearest, encode};
pub use config::file::MarkerConfig;
pub use foundation::core::{MarkerIdentity, PanelId, Point, Rect};
pub use foundation::error::{MarkerError, MarkerResult};
pub use identity::allocator::Allocator;
pub use identity::migrate::{
    MigrationReport, Reassignment, SlotUnavailable, StoredIdentity, reconcile,
};
pub use identity::preference::{BCH_13_5_5_CONTRAST_ORDER, PreferenceOrder};
pub use identity::registry::MarkerRegistry;
pub use qr::matrix::{EcLevel, MIN_QR_SIZE, ModuleMatrixFile, QrModuleSource, QrModules};
pub use render::composite::{ClearZone, CompositeGeometry, plan_clear_zone, render_composite};
pub use render::marker::{StandaloneGeometry, render_standalone, standalone_cell_center};
pub use render::pattern::{
    DARK_SENTINEL, DEFAULT_RESOLUTION, LIGHT_SENTINEL, PATTERN_CHANNELS, PatternOptions,
    PatternTemplate, to_pattern_template,
};
pub use render::vector::{Fill, FilledRect, Label, VectorImage};
pub use store::IdentityStore;
pub use store::json_file::JsonFileStore;
pub use store::memory::MemoryStore;
