//! Spin lifecycle: `Idle -> Spinning -> Evaluating -> Idle`.
//!
//! The session rolls grids and evaluates them; animating the reels between
//! [`SlotSession::start_spin`] and [`SlotSession::finish_spin`] is the
//! renderer's job, following the [`SpinPlan`] it is handed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    engine::compute_grid,
    error::CoreError,
    evaluator::{evaluate, Evaluation},
    grid::{Grid, GridAccess, REELS, ROWS},
    rng::ProvablyFairRng,
    symbols::Symbol,
    view::{apply_connected, ReelView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Evaluating,
}

/// Reel animation timings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    pub reel_duration_ms: u64,
    /// Delay between consecutive reels starting.
    pub reel_stagger_ms: u64,
    /// Delay between rows within one reel.
    pub row_delay_ms: u64,
    /// How far a symbol drops while spinning, in pixels.
    pub drop_distance: f32,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            reel_duration_ms: 500,
            reel_stagger_ms: 100,
            row_delay_ms: 50,
            drop_distance: 200.0,
        }
    }
}

impl SpinTiming {
    pub fn tween_delay(&self, col: usize, row: usize) -> Duration {
        let reel = self.reel_stagger_ms.saturating_mul(col as u64);
        let row = self.row_delay_ms.saturating_mul(row as u64);
        Duration::from_millis(reel.saturating_add(row))
    }

    /// When to evaluate, counted from the start of the spin.
    pub fn evaluation_delay(&self) -> Duration {
        Duration::from_millis(
            self.reel_duration_ms
                .saturating_add(self.reel_stagger_ms.saturating_mul(REELS as u64)),
        )
    }
}

/// Animation of one cell: drop, then land on `symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellTween {
    pub row: usize,
    pub col: usize,
    pub delay: Duration,
    pub duration: Duration,
    pub drop_distance: f32,
    pub symbol: Symbol,
}

/// Everything a renderer needs to play one spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub nonce: u64,
    pub grid: Grid,
    pub tweens: Vec<CellTween>,
    pub evaluate_after: Duration,
}

impl SpinPlan {
    fn new(nonce: u64, grid: Grid, timing: &SpinTiming) -> Self {
        let mut tweens = Vec::with_capacity(REELS * ROWS);
        for col in 0..REELS {
            for row in 0..ROWS {
                let Some(symbol) = grid.symbol_at(row, col) else {
                    continue;
                };
                tweens.push(CellTween {
                    row,
                    col,
                    delay: timing.tween_delay(col, row),
                    duration: Duration::from_millis(timing.reel_duration_ms),
                    drop_distance: timing.drop_distance,
                    symbol,
                });
            }
        }
        Self {
            nonce,
            grid,
            tweens,
            evaluate_after: timing.evaluation_delay(),
        }
    }
}

pub struct SlotSession {
    rng: ProvablyFairRng,
    timing: SpinTiming,
    phase: SpinPhase,
    pending: Option<Grid>,
    last: Option<Evaluation>,
}

impl SlotSession {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, timing: SpinTiming) -> Self {
        Self {
            rng: ProvablyFairRng::new(server_seed, client_seed, 0),
            timing,
            phase: SpinPhase::Idle,
            pending: None,
            last: None,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Nonce of the most recent spin; 0 before the first one.
    pub fn nonce(&self) -> u64 {
        self.rng.nonce
    }

    pub fn server_seed_hash(&self) -> String {
        self.rng.server_seed_hash_hex()
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last.as_ref()
    }

    /// Roll the next grid. Only valid while idle.
    pub fn start_spin(&mut self) -> Result<SpinPlan, CoreError> {
        if self.phase != SpinPhase::Idle {
            return Err(CoreError::SpinInProgress);
        }
        let rng = self.rng.advance();
        let grid = compute_grid(&rng)?;
        let plan = SpinPlan::new(rng.nonce, grid, &self.timing);
        self.rng = rng;
        self.pending = Some(grid);
        self.phase = SpinPhase::Spinning;
        debug!(nonce = plan.nonce, "spin started");
        Ok(plan)
    }

    /// Evaluate what the reels landed on, highlight matches and report the
    /// win amount to the view.
    pub fn finish_spin<V: ReelView + ?Sized>(&mut self, view: &mut V) -> Result<Evaluation, CoreError> {
        if self.phase != SpinPhase::Spinning {
            return Err(CoreError::NotSpinning);
        }
        self.phase = SpinPhase::Evaluating;

        let landed = Grid::snapshot(&*view);
        if self.pending.take().is_some_and(|rolled| rolled != landed) {
            warn!(nonce = self.rng.nonce, "reels landed on a different grid than rolled");
        }

        let evaluation = evaluate(&landed);
        let switched = apply_connected(view, &evaluation);
        view.show_win_amount(evaluation.win_amount);
        info!("Win Amount: {}", evaluation.win_amount);
        debug!(
            matches = evaluation.matches.len(),
            switched,
            "spin evaluated"
        );

        self.last = Some(evaluation.clone());
        self.phase = SpinPhase::Idle;
        Ok(evaluation)
    }
}
