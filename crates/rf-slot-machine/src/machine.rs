//! Slot machine facade
//!
//! Wires the symbol table, spin engine, win evaluator and ledger together
//! and publishes [`MachineEvent`]s.
//!
//! A spin is two calls so the presentation layer can animate in between:
//!
//! ```text
//! start_spin()     check wager ─> resolve reels ─> debit ─> SpinStarted
//!     │                                    (machine busy, grid returned)
//!     v
//! complete_spin()  evaluate ─> credit payout ─> Win/Lose ─> SpinCompleted
//! ```
//!
//! [`SlotMachine::spin`] runs both back to back.

use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::config::MachineConfig;
use crate::engine::{SpinEngine, SpinPhase};
use crate::error::{SlotError, SlotResult};
use crate::evaluator::WinEvaluator;
use crate::events::{EventBus, ListenerId, MachineEvent};
use crate::grid::Grid;
use crate::ledger::Ledger;
use crate::spin::SpinResult;
use crate::stats::SessionStats;
use crate::symbols::SymbolTable;
use crate::timing::SpinTiming;

/// Spin that has been resolved but not yet paid out
#[derive(Debug)]
struct PendingSpin {
    bet: u64,
    grid: Grid,
}

/// A complete slot machine
#[derive(Debug)]
pub struct SlotMachine {
    config: MachineConfig,
    table: Arc<SymbolTable>,
    engine: SpinEngine,
    evaluator: WinEvaluator,
    ledger: Ledger,
    bus: Arc<EventBus>,
    stats: SessionStats,
    pending: Option<PendingSpin>,
    last_result: Option<SpinResult>,
}

impl SlotMachine {
    /// Build a machine from a validated configuration
    pub fn new(config: MachineConfig) -> SlotResult<Self> {
        Self::build(config, None)
    }

    /// Build a machine with a seeded RNG for reproducible sessions
    pub fn seeded(config: MachineConfig, seed: u64) -> SlotResult<Self> {
        Self::build(config, Some(seed))
    }

    fn build(config: MachineConfig, seed: Option<u64>) -> SlotResult<Self> {
        config.validate()?;
        let table = Arc::new(SymbolTable::load(&config.symbols)?);
        let engine = match seed {
            Some(seed) => SpinEngine::seeded(Arc::clone(&table), &config.grid, seed),
            None => SpinEngine::new(Arc::clone(&table), &config.grid),
        };
        let bus = Arc::new(EventBus::new());
        let ledger = Ledger::new(&config.bets, Arc::clone(&bus));
        let evaluator = WinEvaluator::from_config(&config);

        log::info!(
            "Slot machine ready: {}x{} grid, {} symbols, bets {}..={}, {} credits",
            config.grid.reels,
            config.grid.rows,
            table.len(),
            config.bets.min_bet,
            config.bets.max_bet,
            ledger.credits()
        );

        Ok(Self {
            config,
            table,
            engine,
            evaluator,
            ledger,
            bus,
            stats: SessionStats::default(),
            pending: None,
            last_result: None,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn credits(&self) -> u64 {
        self.ledger.credits()
    }

    pub fn current_bet(&self) -> u64 {
        self.ledger.current_bet()
    }

    /// True from `start_spin` until `complete_spin`
    pub fn is_spinning(&self) -> bool {
        !self.engine.is_idle()
    }

    pub fn phase(&self) -> SpinPhase {
        self.engine.phase()
    }

    /// The symbols currently showing
    pub fn visible_grid(&self) -> Grid {
        self.engine.grid()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.config.timing
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Result of the most recently completed spin
    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // NOTIFICATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Register a callback for every event
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&MachineEvent) + Send + 'static,
    {
        self.bus.on(listener)
    }

    /// Receive every subsequent event on a channel
    pub fn subscribe(&self) -> Receiver<MachineEvent> {
        self.bus.subscribe()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BETTING
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn set_bet(&mut self, amount: u64) -> SlotResult<u64> {
        self.ensure_idle()?;
        self.ledger.set_bet(amount)
    }

    /// Raise the bet by `delta`; non-positive deltas are ignored
    pub fn adjust_bet(&mut self, delta: i64) -> SlotResult<u64> {
        self.ensure_idle()?;
        self.ledger.adjust_bet(delta)
    }

    pub fn increase_bet(&mut self, amount: u64) -> SlotResult<u64> {
        self.adjust_bet(i64::try_from(amount).unwrap_or(i64::MAX))
    }

    pub fn decrease_bet(&mut self, amount: u64) -> SlotResult<u64> {
        self.ensure_idle()?;
        self.ledger.decrease_bet(amount)
    }

    /// Top up the balance; non-positive amounts are ignored. Allowed while
    /// a spin is in flight.
    pub fn add_credits(&mut self, amount: i64) {
        if amount > 0 {
            log::debug!("Adding {} credits", amount);
            self.ledger.credit(amount as u64);
        }
    }

    fn ensure_idle(&self) -> SlotResult<()> {
        if self.is_spinning() {
            log::debug!("Bet change rejected while spinning");
            return Err(SlotError::MachineBusy);
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Execute a full random spin
    pub fn spin(&mut self) -> SlotResult<SpinResult> {
        self.start_spin()?;
        self.complete_spin()
    }

    /// Execute a full spin showing the given symbols (`[reel][row]`)
    pub fn spin_forced<S: AsRef<str>>(&mut self, columns: &[Vec<S>]) -> SlotResult<SpinResult> {
        self.start_spin_forced(columns)?;
        self.complete_spin()
    }

    /// Take the bet, resolve the reels and return the grid to animate
    /// towards. The machine stays busy until [`complete_spin`](Self::complete_spin).
    pub fn start_spin(&mut self) -> SlotResult<Grid> {
        self.begin_spin(|engine| engine.spin())
    }

    /// [`start_spin`](Self::start_spin) with a rigged grid
    pub fn start_spin_forced<S: AsRef<str>>(&mut self, columns: &[Vec<S>]) -> SlotResult<Grid> {
        self.begin_spin(|engine| engine.spin_forced(columns))
    }

    fn begin_spin<F>(&mut self, resolve: F) -> SlotResult<Grid>
    where
        F: FnOnce(&mut SpinEngine) -> SlotResult<Grid>,
    {
        if self.is_spinning() {
            log::debug!("Spin rejected: already spinning");
            return Err(SlotError::AlreadySpinning);
        }

        let bet = self.ledger.check_wager()?;
        let grid = resolve(&mut self.engine)?;
        if let Err(e) = self.ledger.debit(bet) {
            self.engine.finish();
            return Err(e);
        }

        log::debug!("Spin started, bet {}", bet);
        self.bus.emit(MachineEvent::SpinStarted);
        self.pending = Some(PendingSpin {
            bet,
            grid: grid.clone(),
        });
        Ok(grid)
    }

    /// Evaluate the pending spin, pay out and return to idle
    pub fn complete_spin(&mut self) -> SlotResult<SpinResult> {
        let PendingSpin { bet, grid } = self.pending.take().ok_or(SlotError::NotSpinning)?;

        let result = self.evaluator.evaluate(&grid, bet);
        if result.is_win {
            self.ledger.credit(result.payout);
            log::info!(
                "Win: {} credits ({}x on bet {})",
                result.payout,
                result.multiplier,
                bet
            );
            self.bus.emit(MachineEvent::Win(result.payout));
        } else {
            log::debug!("No win on bet {}", bet);
            self.bus.emit(MachineEvent::Lose);
        }

        self.stats.record(&result);
        self.engine.finish();
        self.bus.emit(MachineEvent::SpinCompleted);
        self.last_result = Some(result.clone());
        Ok(result)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SESSION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.engine.seed(seed);
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolDef;

    fn cherries() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Lemon", "Cherry", "Bell"],
            vec!["Seven", "Cherry", "Plum"],
            vec!["Bar", "Cherry", "Orange"],
        ]
    }

    fn mixed() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Lemon", "Cherry", "Bell"],
            vec!["Seven", "Plum", "Plum"],
            vec!["Bar", "Cherry", "Orange"],
        ]
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = MachineConfig::classic().with_symbols(vec![]);
        assert!(matches!(SlotMachine::new(config), Err(SlotError::Config(_))));

        let config =
            MachineConfig::classic().with_symbols(vec![SymbolDef::new("Cherry", 5.0, 0.0)]);
        assert!(matches!(SlotMachine::new(config), Err(SlotError::Config(_))));
    }

    #[test]
    fn test_initial_state() {
        let machine = SlotMachine::new(MachineConfig::classic()).unwrap();
        assert_eq!(machine.credits(), 100);
        assert_eq!(machine.current_bet(), 10);
        assert!(!machine.is_spinning());
        assert_eq!(machine.visible_grid().reel_count(), 3);
        assert!(machine.last_result().is_none());
    }

    #[test]
    fn test_forced_win_pays() {
        let mut machine = SlotMachine::seeded(MachineConfig::classic(), 1).unwrap();
        let rx = machine.subscribe();

        let result = machine.spin_forced(&cherries()).unwrap();
        assert!(result.is_win);
        assert_eq!(result.payout, 50);
        assert_eq!(machine.credits(), 100 - 10 + 50);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                MachineEvent::CreditsChanged(90),
                MachineEvent::SpinStarted,
                MachineEvent::CreditsChanged(140),
                MachineEvent::Win(50),
                MachineEvent::SpinCompleted,
            ]
        );
    }

    #[test]
    fn test_forced_loss() {
        let mut machine = SlotMachine::seeded(MachineConfig::classic(), 1).unwrap();
        let rx = machine.subscribe();

        let result = machine.spin_forced(&mixed()).unwrap();
        assert!(!result.is_win);
        assert_eq!(result.payout, 0);
        assert_eq!(machine.credits(), 90);
        assert_eq!(machine.last_result(), Some(&result));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                MachineEvent::CreditsChanged(90),
                MachineEvent::SpinStarted,
                MachineEvent::Lose,
                MachineEvent::SpinCompleted,
            ]
        );
    }

    #[test]
    fn test_busy_between_start_and_complete() {
        let mut machine = SlotMachine::seeded(MachineConfig::classic(), 5).unwrap();
        let grid = machine.start_spin().unwrap();
        assert!(machine.is_spinning());
        assert_eq!(machine.phase(), SpinPhase::Evaluating);
        let credits = machine.credits();

        assert_eq!(machine.start_spin().unwrap_err(), SlotError::AlreadySpinning);
        assert_eq!(machine.spin().unwrap_err(), SlotError::AlreadySpinning);
        assert_eq!(machine.set_bet(20).unwrap_err(), SlotError::MachineBusy);
        assert_eq!(machine.adjust_bet(10).unwrap_err(), SlotError::MachineBusy);
        assert_eq!(machine.decrease_bet(10).unwrap_err(), SlotError::MachineBusy);
        assert_eq!(machine.credits(), credits);
        assert_eq!(machine.visible_grid(), grid);
        assert_eq!(machine.current_bet(), 10);

        machine.complete_spin().unwrap();
        assert!(!machine.is_spinning());
        assert_eq!(machine.complete_spin().unwrap_err(), SlotError::NotSpinning);
    }

    #[test]
    fn test_add_credits_while_spinning() {
        let mut machine = SlotMachine::seeded(MachineConfig::classic(), 5).unwrap();
        machine.start_spin().unwrap();
        machine.add_credits(25);
        machine.add_credits(-25);
        machine.add_credits(0);
        assert_eq!(machine.credits(), 115);
    }

    #[test]
    fn test_rejected_forced_spin_changes_nothing() {
        let mut machine = SlotMachine::seeded(MachineConfig::classic(), 5).unwrap();
        let grid = machine.visible_grid();
        let rx = machine.subscribe();

        let bad = vec![vec!["Kiwi"; 3], vec!["Kiwi"; 3], vec!["Kiwi"; 3]];
        assert!(machine.spin_forced(&bad).is_err());
        assert_eq!(machine.credits(), 100);
        assert_eq!(machine.visible_grid(), grid);
        assert!(!machine.is_spinning());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_increase_and_decrease_bet() {
        let mut machine = SlotMachine::new(MachineConfig::classic()).unwrap();
        assert_eq!(machine.increase_bet(10), Ok(20));
        assert_eq!(machine.decrease_bet(10), Ok(10));
        assert!(machine.decrease_bet(10).is_err());
        assert_eq!(machine.current_bet(), 10);
    }

    #[test]
    fn test_stats_tracked() {
        let mut machine = SlotMachine::seeded(MachineConfig::studio(), 11).unwrap();
        for _ in 0..25 {
            machine.spin().unwrap();
        }
        assert_eq!(machine.stats().total_spins, 25);
        assert_eq!(machine.stats().total_bet, 250);
        assert_eq!(
            machine.stats().wins + machine.stats().losses,
            machine.stats().total_spins
        );

        machine.reset_stats();
        assert_eq!(machine.stats(), &SessionStats::default());
    }
}
