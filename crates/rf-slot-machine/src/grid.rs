//! Resolved symbol grid (reels × rows)

use std::sync::Arc;

use crate::error::{SlotError, SlotResult};
use crate::reel::Reel;
use crate::symbols::{Symbol, SymbolTable};

/// Snapshot of every reel's visible window after a spin
#[derive(Debug, Clone)]
pub struct Grid {
    /// Symbol ids, indexed `[reel][row]`
    columns: Vec<Vec<u32>>,
    table: Arc<SymbolTable>,
}

impl Grid {
    pub fn snapshot(reels: &[Reel], table: Arc<SymbolTable>) -> Self {
        Self {
            columns: reels.iter().map(|r| r.window().to_vec()).collect(),
            table,
        }
    }

    pub fn reel_count(&self) -> usize {
        self.columns.len()
    }

    /// Rows of the shortest reel (all reels share a size in practice)
    pub fn rows(&self) -> usize {
        self.columns.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn symbol_at(&self, reel: usize, row: usize) -> SlotResult<&Symbol> {
        let column = self.columns.get(reel).ok_or(SlotError::IndexOutOfRange {
            index: reel,
            len: self.columns.len(),
        })?;
        let id = column.get(row).ok_or(SlotError::IndexOutOfRange {
            index: row,
            len: column.len(),
        })?;
        self.table
            .get(*id)
            .ok_or_else(|| SlotError::UnknownSymbol(format!("#{id}")))
    }

    /// Raw ids, `[reel][row]`
    pub fn ids(&self) -> &[Vec<u32>] {
        &self.columns
    }

    /// Symbol names, `[reel][row]`
    pub fn names(&self) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .map(|col| {
                col.iter()
                    .filter_map(|id| self.table.get(*id).map(|s| s.name.clone()))
                    .collect()
            })
            .collect()
    }

    /// Names on one row across all reels
    pub fn row_names(&self, row: usize) -> SlotResult<Vec<&str>> {
        (0..self.reel_count())
            .map(|reel| self.symbol_at(reel, row).map(|s| s.name.as_str()))
            .collect()
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::classic_symbols;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_snapshot_and_lookup() {
        let table = Arc::new(SymbolTable::load(&classic_symbols()).unwrap());
        let mut rng = StdRng::seed_from_u64(3);
        let mut reels: Vec<Reel> = (0..3)
            .map(|i| Reel::new(i, Arc::clone(&table), 3, &mut rng))
            .collect();
        reels[0].force(&["Cherry", "Bell", "Seven"]).unwrap();

        let grid = Grid::snapshot(&reels, Arc::clone(&table));
        assert_eq!(grid.reel_count(), 3);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.symbol_at(0, 1).unwrap().name, "Bell");
        assert_eq!(grid.names()[0], vec!["Cherry", "Bell", "Seven"]);
        assert_eq!(grid.row_names(2).unwrap()[0], "Seven");

        assert!(matches!(
            grid.symbol_at(3, 0),
            Err(SlotError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(grid.symbol_at(0, 5).is_err());
    }
}
