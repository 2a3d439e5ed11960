//! Session statistics

use serde::{Deserialize, Serialize};

use crate::spin::SpinResult;

/// Running totals for a play session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    pub losses: u64,
    pub row_wins: u64,
    pub diagonal_wins: u64,
    pub largest_win: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Record one evaluated spin
    pub fn record(&mut self, result: &SpinResult) {
        use crate::spin::PaylineKind;

        self.total_spins += 1;
        self.total_bet += result.bet;
        self.total_win += result.payout;

        if result.is_win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if result.has(PaylineKind::Row) {
            self.row_wins += 1;
        }
        if result.has(PaylineKind::DiagonalDown) || result.has(PaylineKind::DiagonalUp) {
            self.diagonal_wins += 1;
        }

        self.largest_win = self.largest_win.max(result.payout);
        let ratio = result.win_ratio();
        if ratio > self.max_win_ratio {
            self.max_win_ratio = ratio;
        }
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Net credits won (negative when the house is ahead)
    pub fn net(&self) -> i128 {
        self.total_win as i128 - self.total_bet as i128
    }
}
