//! Spin results

use serde::{Deserialize, Serialize};

/// Which pattern produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaylineKind {
    /// Straight line across the payline row
    Row,
    /// Top-left to bottom-right
    DiagonalDown,
    /// Top-right to bottom-left, anchored on reel 0
    DiagonalUp,
}

/// A single matched payline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaylineWin {
    pub kind: PaylineKind,
    /// Matched symbol name
    pub symbol_name: String,
    /// Multiplier this line contributes before clamping
    pub multiplier: f64,
    /// Positions of matched symbols (reel, row)
    pub positions: Vec<(usize, usize)>,
}

/// Outcome of evaluating one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Row or diagonal matched
    pub is_win: bool,
    /// Final multiplier, clamped to the configured maximum
    pub multiplier: f64,
    /// Credits paid: `round(bet * multiplier)`
    pub payout: u64,
    /// Bet the spin was played with
    pub bet: u64,
    /// Matched paylines
    pub wins: Vec<PaylineWin>,
}

impl SpinResult {
    /// Losing result
    pub fn lose(bet: u64) -> Self {
        Self {
            is_win: false,
            multiplier: 0.0,
            payout: 0,
            bet,
            wins: Vec::new(),
        }
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0 {
            self.payout as f64 / self.bet as f64
        } else {
            0.0
        }
    }

    pub fn has(&self, kind: PaylineKind) -> bool {
        self.wins.iter().any(|w| w.kind == kind)
    }
}
