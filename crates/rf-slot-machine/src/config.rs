//! Slot machine configuration

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::{SymbolDef, classic_symbols};
use crate::timing::SpinTiming;

/// Grid shape (reels × visible rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: usize,
    /// Number of visible rows per reel
    pub rows: usize,
    /// Row checked for a straight match. Defaults to the middle row.
    #[serde(default)]
    pub payline_row: Option<usize>,
}

impl GridSpec {
    /// Classic 3×3 with the payline through the middle
    pub fn classic_3x3() -> Self {
        Self {
            reels: 3,
            rows: 3,
            payline_row: None,
        }
    }

    pub fn payline_row(&self) -> usize {
        self.payline_row.unwrap_or(self.rows / 2)
    }

    /// Whether both diagonals fit on this grid
    pub fn has_diagonals(&self) -> bool {
        self.reels >= 2 && self.rows >= self.reels
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::classic_3x3()
    }
}

/// Bet limits and starting balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimits {
    pub min_bet: u64,
    pub max_bet: u64,
    /// Bet placed when the machine starts
    pub default_bet: u64,
    pub initial_credits: u64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: 10,
            max_bet: 100,
            default_bet: 10,
            initial_credits: 100,
        }
    }
}

/// Payout multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinConfig {
    /// Multiplier awarded for either diagonal match
    pub diagonal_multiplier: f64,
    /// Upper clamp for the final multiplier
    pub max_multiplier: f64,
}

impl Default for WinConfig {
    fn default() -> Self {
        Self {
            diagonal_multiplier: 1.5,
            max_multiplier: 100.0,
        }
    }
}

/// Complete machine configuration, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Symbol set
    #[serde(default = "classic_symbols")]
    pub symbols: Vec<SymbolDef>,
    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default)]
    pub bets: BetLimits,
    #[serde(default)]
    pub wins: WinConfig,
    /// Presentation timing
    #[serde(default)]
    pub timing: SpinTiming,
}

impl MachineConfig {
    /// Classic 3×3 fruit machine
    pub fn classic() -> Self {
        Self {
            symbols: classic_symbols(),
            grid: GridSpec::classic_3x3(),
            bets: BetLimits::default(),
            wins: WinConfig::default(),
            timing: SpinTiming::normal(),
        }
    }

    /// Classic machine with instant timing and a deep balance, for tests
    pub fn studio() -> Self {
        Self::classic()
            .with_credits(100_000)
            .with_timing(SpinTiming::studio())
    }

    pub fn with_symbols(mut self, symbols: Vec<SymbolDef>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_grid(mut self, reels: usize, rows: usize) -> Self {
        self.grid = GridSpec {
            reels,
            rows,
            payline_row: None,
        };
        self
    }

    pub fn with_bets(mut self, min_bet: u64, max_bet: u64, default_bet: u64) -> Self {
        self.bets.min_bet = min_bet;
        self.bets.max_bet = max_bet;
        self.bets.default_bet = default_bet;
        self
    }

    pub fn with_credits(mut self, initial_credits: u64) -> Self {
        self.bets.initial_credits = initial_credits;
        self
    }

    pub fn with_wins(mut self, diagonal_multiplier: f64, max_multiplier: f64) -> Self {
        self.wins = WinConfig {
            diagonal_multiplier,
            max_multiplier,
        };
        self
    }

    pub fn with_timing(mut self, timing: SpinTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Check everything except the symbol table itself, which is
    /// validated when it is loaded
    pub fn validate(&self) -> SlotResult<()> {
        let grid = &self.grid;
        if grid.reels == 0 {
            return Err(SlotError::Config("reel count must be at least 1".into()));
        }
        if grid.rows == 0 {
            return Err(SlotError::Config("visible rows must be at least 1".into()));
        }
        if grid.payline_row() >= grid.rows {
            return Err(SlotError::Config(format!(
                "payline row {} outside {} visible rows",
                grid.payline_row(),
                grid.rows
            )));
        }

        let bets = &self.bets;
        if bets.min_bet == 0 {
            return Err(SlotError::Config("minimum bet must be at least 1".into()));
        }
        if bets.min_bet > bets.max_bet {
            return Err(SlotError::Config(format!(
                "minimum bet {} exceeds maximum bet {}",
                bets.min_bet, bets.max_bet
            )));
        }
        if !(bets.min_bet..=bets.max_bet).contains(&bets.default_bet) {
            return Err(SlotError::Config(format!(
                "default bet {} outside [{}, {}]",
                bets.default_bet, bets.min_bet, bets.max_bet
            )));
        }

        let wins = &self.wins;
        if !wins.diagonal_multiplier.is_finite() || wins.diagonal_multiplier < 0.0 {
            return Err(SlotError::Config(
                "diagonal multiplier must be a non-negative number".into(),
            ));
        }
        if !wins.max_multiplier.is_finite() || wins.max_multiplier < 0.0 {
            return Err(SlotError::Config(
                "max win multiplier must be a non-negative number".into(),
            ));
        }

        let timing = &self.timing;
        for value in [timing.spin_duration_ms, timing.settle_delay_ms] {
            if !value.is_finite() || value < 0.0 {
                return Err(SlotError::Config(
                    "timing values must be non-negative numbers".into(),
                ));
            }
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Export config as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_is_valid() {
        let config = MachineConfig::classic();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.payline_row(), 1);
        assert!(config.grid.has_diagonals());
    }

    #[test]
    fn test_validation_failures() {
        assert!(MachineConfig::classic().with_grid(0, 3).validate().is_err());
        assert!(MachineConfig::classic().with_grid(3, 0).validate().is_err());
        assert!(MachineConfig::classic().with_bets(0, 100, 10).validate().is_err());
        assert!(MachineConfig::classic().with_bets(50, 10, 20).validate().is_err());
        assert!(MachineConfig::classic().with_bets(10, 100, 200).validate().is_err());
        assert!(MachineConfig::classic().with_wins(-1.0, 100.0).validate().is_err());
        assert!(MachineConfig::classic().with_wins(1.5, f64::NAN).validate().is_err());

        let mut nan_timing = SpinTiming::normal();
        nan_timing.spin_duration_ms = f64::NAN;
        assert!(matches!(
            MachineConfig::classic().with_timing(nan_timing).validate(),
            Err(SlotError::Config(_))
        ));
        let mut negative_settle = SpinTiming::normal();
        negative_settle.settle_delay_ms = -1.0;
        assert!(MachineConfig::classic().with_timing(negative_settle).validate().is_err());

        let mut bad_row = MachineConfig::classic();
        bad_row.grid.payline_row = Some(3);
        assert!(matches!(bad_row.validate(), Err(SlotError::Config(_))));
    }

    #[test]
    fn test_with_timing() {
        let config = MachineConfig::classic().with_timing(SpinTiming::turbo());
        assert_eq!(config.timing, SpinTiming::turbo());
        assert!(config.validate().is_ok());

        let studio = MachineConfig::studio();
        assert!(studio.timing.is_instant());
        assert_eq!(studio.bets.initial_credits, 100_000);
    }

    #[test]
    fn test_diagonals_need_square_or_taller_grid() {
        assert!(!MachineConfig::classic().with_grid(5, 3).grid.has_diagonals());
        assert!(!MachineConfig::classic().with_grid(1, 3).grid.has_diagonals());
        assert!(MachineConfig::classic().with_grid(2, 3).grid.has_diagonals());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = MachineConfig::studio();
        let json = config.to_json().unwrap();
        let parsed = MachineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::classic());
    }

    #[test]
    fn test_yaml() {
        let yaml = r#"
symbols:
  - name: Cherry
    payout_multiplier: 5.0
    weight: 3.0
  - name: Seven
    payout_multiplier: 50.0
grid:
  reels: 3
  rows: 3
bets:
  min_bet: 5
  max_bet: 50
  default_bet: 5
  initial_credits: 200
"#;
        let config = MachineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.symbols.len(), 2);
        assert_eq!(config.symbols[1].weight, 1.0);
        assert_eq!(config.bets.initial_credits, 200);
        assert_eq!(config.wins, WinConfig::default());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            MachineConfig::from_json("{not json"),
            Err(SlotError::Parse(_))
        ));
        assert!(matches!(
            MachineConfig::from_json(r#"{"bets": {"min_bet": 0, "max_bet": 1, "default_bet": 1, "initial_credits": 0}}"#),
            Err(SlotError::Config(_))
        ));
    }
}
