use chrono::{DateTime, Utc};
use reelconnect_core::{Evaluation, Grid, Match, MemoryReelView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinRequest {
    pub client_seed: String,
}

/// A winning run as sent over the wire; `symbol` is the base asset key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchDto {
    pub symbol: String,
    pub count: usize,
    pub indices: Vec<usize>,
}

impl From<&Match> for MatchDto {
    fn from(m: &Match) -> Self {
        MatchDto {
            symbol: m.symbol.asset_key().to_string(),
            count: m.count,
            indices: m.indices.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinResponse {
    pub server_seed_hash: String,
    pub nonce: u64,
    /// Rows of base asset keys as rolled.
    pub grid: Vec<Vec<Option<String>>>,
    /// Rows of asset keys to draw once matches are highlighted.
    pub display: Vec<Vec<Option<String>>>,
    pub matches: Vec<MatchDto>,
    pub win_amount: u64,
}

impl SpinResponse {
    /// Assemble a response from a rolled grid and its evaluation.
    pub fn from_outcome(
        server_seed_hash: String,
        nonce: u64,
        grid: &Grid,
        evaluation: &Evaluation,
    ) -> Self {
        let mut view = MemoryReelView::default();
        view.show_grid(grid);
        reelconnect_core::apply_connected(&mut view, evaluation);
        SpinResponse {
            server_seed_hash,
            nonce,
            grid: grid.to_keys(),
            display: view.display_keys(),
            matches: evaluation.matches.iter().map(MatchDto::from).collect(),
            win_amount: evaluation.win_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifyResponse {
    pub server_seed_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RotateSeedRequest {
    pub new_seed: String,
}

/// Returned after a rotation: the retired seed is revealed so past spins can
/// be checked against the hash that was published for it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RotateSeedResponse {
    pub server_seed_hash: String,
    pub revealed_seed: String,
    pub revealed_seed_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinLogEntry {
    pub id: i64,
    pub ts: DateTime<Utc>,
    pub client_seed: String,
    pub nonce: i64,
    pub server_seed_hash: String,
    pub grid: Grid,
    pub matches: Vec<MatchDto>,
    pub win_amount: i64,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}
