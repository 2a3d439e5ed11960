//! Spin engine: reel resolution and the spin phase state machine

use std::sync::Arc;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{SlotError, SlotResult};
use crate::grid::Grid;
use crate::reel::Reel;
use crate::symbols::SymbolTable;

/// Spin lifecycle: `Idle -> Spinning -> Evaluating -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpinPhase {
    #[default]
    Idle,
    /// Reels are being resolved
    Spinning,
    /// Grid is resolved and waiting to be evaluated
    Evaluating,
}

/// Owns the reels and resolves spins
///
/// All randomness is drawn synchronously inside [`SpinEngine::spin`]; each
/// reel samples only into its own window, so the result does not depend on
/// the order reels are resolved in.
#[derive(Debug)]
pub struct SpinEngine {
    table: Arc<SymbolTable>,
    reels: Vec<Reel>,
    phase: SpinPhase,
    rng: StdRng,
    spin_count: u64,
}

impl SpinEngine {
    pub fn new(table: Arc<SymbolTable>, grid: &GridSpec) -> Self {
        Self::with_rng(table, grid, StdRng::from_os_rng())
    }

    /// Create with a fixed seed for reproducible results
    pub fn seeded(table: Arc<SymbolTable>, grid: &GridSpec, seed: u64) -> Self {
        Self::with_rng(table, grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(table: Arc<SymbolTable>, grid: &GridSpec, mut rng: StdRng) -> Self {
        let reels = (0..grid.reels)
            .map(|i| Reel::new(i, Arc::clone(&table), grid.rows, &mut rng))
            .collect();
        Self {
            table,
            reels,
            phase: SpinPhase::Idle,
            rng,
            spin_count: 0,
        }
    }

    /// Reseed the RNG
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Resolve every reel and enter `Evaluating`
    pub fn spin(&mut self) -> SlotResult<Grid> {
        self.begin()?;
        for reel in &mut self.reels {
            reel.resolve(&mut self.rng);
        }
        Ok(self.resolved())
    }

    /// Like [`spin`](Self::spin), but each reel shows the given symbol
    /// names (`[reel][row]`) instead of a random draw
    ///
    /// Everything is validated before the phase changes.
    pub fn spin_forced<S: AsRef<str>>(&mut self, columns: &[Vec<S>]) -> SlotResult<Grid> {
        if self.phase != SpinPhase::Idle {
            return Err(SlotError::AlreadySpinning);
        }
        if columns.len() != self.reels.len() {
            return Err(SlotError::ShapeMismatch {
                expected: self.reels.len(),
                actual: columns.len(),
            });
        }
        let mut staged = self.reels.clone();
        for (reel, names) in staged.iter_mut().zip(columns) {
            reel.force(names.as_slice())?;
        }

        self.begin()?;
        self.reels = staged;
        Ok(self.resolved())
    }

    /// Return to `Idle` once the grid has been evaluated
    pub fn finish(&mut self) {
        if self.phase != SpinPhase::Idle {
            log::debug!("Spin #{} finished", self.spin_count);
        }
        self.phase = SpinPhase::Idle;
    }

    fn begin(&mut self) -> SlotResult<()> {
        if self.phase != SpinPhase::Idle {
            return Err(SlotError::AlreadySpinning);
        }
        self.phase = SpinPhase::Spinning;
        self.spin_count += 1;
        Ok(())
    }

    fn resolved(&mut self) -> Grid {
        self.phase = SpinPhase::Evaluating;
        let grid = self.grid();
        log::debug!("Spin #{} resolved: {:?}", self.spin_count, grid.names());
        grid
    }

    /// Snapshot of the current visible windows
    pub fn grid(&self) -> Grid {
        Grid::snapshot(&self.reels, Arc::clone(&self.table))
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SpinPhase::Idle
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn table(&self) -> &Arc<SymbolTable> {
        &self.table
    }

    /// Spins started since creation
    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }
}
