//! Symbol definitions and the weighted symbol table

use std::collections::HashSet;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Symbol definition as it appears in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Symbol name (e.g., "Cherry", "Seven")
    pub name: String,
    /// Bet multiplier paid for a full middle-row match
    pub payout_multiplier: f64,
    /// Relative selection weight
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl SymbolDef {
    pub fn new(name: impl Into<String>, payout_multiplier: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            payout_multiplier,
            weight,
        }
    }
}

/// A loaded symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Position in the owning table
    pub id: u32,
    pub name: String,
    pub payout_multiplier: f64,
    pub weight: f64,
}

/// Immutable registry of symbols with weighted sampling
///
/// Selection probability of a symbol is `weight / sum(weights)`. Sampling
/// goes through a cumulative-weight index, so each draw is O(log n).
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: WeightedIndex<f64>,
    total_weight: f64,
}

impl SymbolTable {
    /// Load and validate a symbol set
    pub fn load(defs: &[SymbolDef]) -> SlotResult<Self> {
        if defs.is_empty() {
            return Err(SlotError::Config("symbol table is empty".into()));
        }

        let mut seen = HashSet::with_capacity(defs.len());
        for def in defs {
            if def.name.trim().is_empty() {
                return Err(SlotError::Config("symbol name must not be empty".into()));
            }
            if !seen.insert(def.name.as_str()) {
                return Err(SlotError::Config(format!(
                    "duplicate symbol name '{}'",
                    def.name
                )));
            }
            if !def.weight.is_finite() || def.weight <= 0.0 {
                return Err(SlotError::Config(format!(
                    "symbol '{}' has non-positive weight {}",
                    def.name, def.weight
                )));
            }
            if !def.payout_multiplier.is_finite() || def.payout_multiplier < 0.0 {
                return Err(SlotError::Config(format!(
                    "symbol '{}' has negative payout multiplier {}",
                    def.name, def.payout_multiplier
                )));
            }
        }

        let index = WeightedIndex::new(defs.iter().map(|d| d.weight))
            .map_err(|e| SlotError::Config(format!("invalid symbol weights: {e}")))?;

        let symbols: Vec<Symbol> = defs
            .iter()
            .enumerate()
            .map(|(i, d)| Symbol {
                id: i as u32,
                name: d.name.clone(),
                payout_multiplier: d.payout_multiplier,
                weight: d.weight,
            })
            .collect();
        let total_weight = symbols.iter().map(|s| s.weight).sum();

        log::debug!(
            "Loaded symbol table: {} symbols, total weight {}",
            symbols.len(),
            total_weight
        );

        Ok(Self {
            symbols,
            index,
            total_weight,
        })
    }

    /// Draw one symbol id proportionally to its weight
    pub fn sample_id<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.index.sample(rng) as u32
    }

    /// Draw one symbol proportionally to its weight
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &Symbol {
        &self.symbols[self.index.sample(rng)]
    }

    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.get(id as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Resolve a name to its id
    pub fn id_of(&self, name: &str) -> SlotResult<u32> {
        self.by_name(name)
            .map(|s| s.id)
            .ok_or_else(|| SlotError::UnknownSymbol(name.to_string()))
    }

    /// Selection probability of a symbol
    pub fn probability(&self, id: u32) -> f64 {
        self.get(id)
            .map(|s| s.weight / self.total_weight)
            .unwrap_or(0.0)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Classic fruit-machine symbol set
pub fn classic_symbols() -> Vec<SymbolDef> {
    vec![
        SymbolDef::new("Cherry", 5.0, 30.0),
        SymbolDef::new("Lemon", 4.0, 25.0),
        SymbolDef::new("Orange", 6.0, 20.0),
        SymbolDef::new("Plum", 8.0, 12.0),
        SymbolDef::new("Bell", 15.0, 7.0),
        SymbolDef::new("Bar", 25.0, 4.0),
        SymbolDef::new("Seven", 50.0, 2.0),
    ]
}
