use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    evaluator::{evaluate, Evaluation},
    grid::{cell_position, Grid, CELLS},
    rng::ProvablyFairRng,
    symbols::Symbol,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub grid: Grid,
    pub evaluation: Evaluation,
}

/// Re-roll every cell independently from the base symbol catalog.
///
/// Cell `i` (row-major) is driven by the `i`-th float of the RNG stream.
pub fn compute_grid(rng: &ProvablyFairRng) -> Result<Grid, CoreError> {
    let floats = rng.next_floats(CELLS)?;
    let mut grid = Grid::empty();
    for (index, f) in floats.iter().enumerate() {
        let pick = ((f * Symbol::COUNT as f64).floor() as usize) % Symbol::COUNT;
        let (row, col) = cell_position(index);
        grid.set(row, col, Some(Symbol::ALL[pick]))?;
    }
    Ok(grid)
}

pub fn spin_once(rng: &ProvablyFairRng) -> Result<SpinOutcome, CoreError> {
    let grid = compute_grid(rng)?;
    let evaluation = evaluate(&grid);
    Ok(SpinOutcome { grid, evaluation })
}

/// Convenience: perform a spin creating the RNG from seeds.
pub fn spin_with_seeds(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
) -> Result<SpinOutcome, CoreError> {
    let rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    spin_once(&rng)
}

/// Check that a grid is exactly what the seeds would have produced.
pub fn verify_grid(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    expected: &Grid,
) -> Result<bool, CoreError> {
    let rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    Ok(compute_grid(&rng)? == *expected)
}
