pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod payout;
pub mod rng;
pub mod session;
pub mod symbols;
pub mod view;

pub use crate::config::{GameConfig, SeedConfig};
pub use crate::engine::{compute_grid, spin_once, spin_with_seeds, verify_grid, SpinOutcome};
pub use crate::error::{ConfigError, CoreError};
pub use crate::evaluator::{evaluate, find_matches, Evaluation, Match, MIN_RUN};
pub use crate::grid::{cell_index, cell_position, Grid, GridAccess, CELLS, REELS, ROWS};
pub use crate::payout::{payout_for, total_win, PAYOUT_PER_SYMBOL};
pub use crate::rng::{derive_floats, derive_hash_hex, ProvablyFairRng};
pub use crate::session::{CellTween, SlotSession, SpinPhase, SpinPlan, SpinTiming};
pub use crate::symbols::{asset_catalog, DisplaySymbol, Symbol, SymbolForm};
pub use crate::view::{apply_connected, MemoryReelView, ReelView};
