//! Reels and their visible windows

use std::sync::Arc;

use rand::Rng;

use crate::error::{SlotError, SlotResult};
use crate::symbols::{Symbol, SymbolTable};

/// One reel: a fixed-size visible window sampled from a shared symbol table
///
/// The window is allocated once and overwritten in place on every spin.
#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    table: Arc<SymbolTable>,
    window: Vec<u32>,
}

impl Reel {
    /// Create a reel and fill its window with random symbols
    pub fn new<R: Rng + ?Sized>(
        index: usize,
        table: Arc<SymbolTable>,
        visible_rows: usize,
        rng: &mut R,
    ) -> Self {
        let window = (0..visible_rows).map(|_| table.sample_id(rng)).collect();
        Self {
            index,
            table,
            window,
        }
    }

    /// Re-sample every visible row independently
    pub fn resolve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for slot in &mut self.window {
            *slot = self.table.sample_id(rng);
        }
    }

    /// Overwrite the window with the named symbols
    ///
    /// Fails without touching the window if the length differs from the
    /// window size or any name is unknown.
    pub fn force<S: AsRef<str>>(&mut self, names: &[S]) -> SlotResult<()> {
        if names.len() != self.window.len() {
            return Err(SlotError::ShapeMismatch {
                expected: self.window.len(),
                actual: names.len(),
            });
        }
        let ids = names
            .iter()
            .map(|n| self.table.id_of(n.as_ref()))
            .collect::<SlotResult<Vec<_>>>()?;
        self.window.copy_from_slice(&ids);
        Ok(())
    }

    pub fn visible_symbol_at(&self, row: usize) -> SlotResult<&Symbol> {
        let id = self.window.get(row).ok_or(SlotError::IndexOutOfRange {
            index: row,
            len: self.window.len(),
        })?;
        self.table
            .get(*id)
            .ok_or_else(|| SlotError::UnknownSymbol(format!("#{id}")))
    }

    /// Symbol ids in the visible window, top to bottom
    pub fn window(&self) -> &[u32] {
        &self.window
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn visible_rows(&self) -> usize {
        self.window.len()
    }
}
