use crate::evaluator::Match;

/// Credits paid per symbol in a winning run. Flat for every symbol; there is
/// no paytable.
pub const PAYOUT_PER_SYMBOL: u64 = 10;

pub fn payout_for(m: &Match) -> u64 {
    PAYOUT_PER_SYMBOL * m.count as u64
}

pub fn total_win(matches: &[Match]) -> u64 {
    matches.iter().map(payout_for).sum()
}
