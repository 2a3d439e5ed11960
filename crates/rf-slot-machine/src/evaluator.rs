//! Win evaluation

use crate::config::MachineConfig;
use crate::grid::Grid;
use crate::spin::{PaylineKind, PaylineWin, SpinResult};

/// Inspects a resolved grid for a straight row match and the two
/// reel-0-anchored diagonals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinEvaluator {
    /// Row checked for a straight match
    pub payline_row: usize,
    /// Multiplier awarded for a diagonal match
    pub diagonal_multiplier: f64,
    /// Upper clamp for the final multiplier
    pub max_multiplier: f64,
}

impl WinEvaluator {
    pub fn new(payline_row: usize, diagonal_multiplier: f64, max_multiplier: f64) -> Self {
        Self {
            payline_row,
            diagonal_multiplier,
            max_multiplier,
        }
    }

    pub fn from_config(config: &MachineConfig) -> Self {
        Self::new(
            config.grid.payline_row(),
            config.wins.diagonal_multiplier,
            config.wins.max_multiplier,
        )
    }

    /// Evaluate a grid for the given bet
    pub fn evaluate(&self, grid: &Grid, bet: u64) -> SpinResult {
        let mut wins = Vec::new();
        let mut multiplier = 0.0_f64;

        if let Some(row_win) = self.row_match(grid) {
            multiplier = row_win.multiplier;
            wins.push(row_win);
        }

        for diagonal in self.diagonal_matches(grid) {
            multiplier = multiplier.max(self.diagonal_multiplier);
            wins.push(diagonal);
        }

        if wins.is_empty() {
            return SpinResult::lose(bet);
        }

        let multiplier = multiplier.clamp(0.0, self.max_multiplier.max(0.0));
        // Ties round to even
        let payout = (bet as f64 * multiplier).round_ties_even() as u64;

        SpinResult {
            is_win: true,
            multiplier,
            payout,
            bet,
            wins,
        }
    }

    fn row_match(&self, grid: &Grid) -> Option<PaylineWin> {
        let reels = grid.reel_count();
        if reels < 2 {
            return None;
        }

        let anchor = grid.symbol_at(0, self.payline_row).ok()?;
        for reel in 1..reels {
            if grid.symbol_at(reel, self.payline_row).ok()?.name != anchor.name {
                return None;
            }
        }

        Some(PaylineWin {
            kind: PaylineKind::Row,
            symbol_name: anchor.name.clone(),
            multiplier: anchor.payout_multiplier,
            positions: (0..reels).map(|reel| (reel, self.payline_row)).collect(),
        })
    }

    fn diagonal_matches(&self, grid: &Grid) -> Vec<PaylineWin> {
        let reels = grid.reel_count();
        if reels < 2 || grid.rows() < reels {
            return Vec::new();
        }

        let last = reels - 1;
        let down: Vec<(usize, usize)> = (0..reels).map(|i| (i, i)).collect();
        // Anchored on reel 0's bottom-most checked row, walking up
        let up: Vec<(usize, usize)> = (0..reels).map(|i| (i, last - i)).collect();

        [(PaylineKind::DiagonalDown, down), (PaylineKind::DiagonalUp, up)]
            .into_iter()
            .filter_map(|(kind, positions)| self.line_match(grid, kind, positions))
            .collect()
    }

    fn line_match(
        &self,
        grid: &Grid,
        kind: PaylineKind,
        positions: Vec<(usize, usize)>,
    ) -> Option<PaylineWin> {
        let (r0, row0) = positions[0];
        let anchor = grid.symbol_at(r0, row0).ok()?;
        for &(reel, row) in &positions[1..] {
            if grid.symbol_at(reel, row).ok()?.name != anchor.name {
                return None;
            }
        }

        Some(PaylineWin {
            kind,
            symbol_name: anchor.name.clone(),
            multiplier: self.diagonal_multiplier,
            positions,
        })
    }
}
