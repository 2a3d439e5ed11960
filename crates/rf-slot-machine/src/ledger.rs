//! Credits and bet bookkeeping
//!
//! Invariants:
//! - credits never go below zero
//! - after any credits mutation the bet is re-clamped to
//!   `min(bet, max_bet, credits)`, which can leave it below `min_bet`
//!   when the balance runs low
//!
//! Every operation validates before it mutates, so a failed call leaves
//! the ledger untouched.

use std::sync::Arc;

use crate::config::BetLimits;
use crate::error::{SlotError, SlotResult};
use crate::events::{EventBus, MachineEvent};

#[derive(Debug)]
pub struct Ledger {
    credits: u64,
    current_bet: u64,
    min_bet: u64,
    max_bet: u64,
    bus: Arc<EventBus>,
}

impl Ledger {
    /// Start from the configured balance and default bet. No events are
    /// emitted for the initial state.
    pub fn new(limits: &BetLimits, bus: Arc<EventBus>) -> Self {
        let credits = limits.initial_credits;
        let current_bet = limits.default_bet.min(limits.max_bet).min(credits);
        Self {
            credits,
            current_bet,
            min_bet: limits.min_bet,
            max_bet: limits.max_bet,
            bus,
        }
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn min_bet(&self) -> u64 {
        self.min_bet
    }

    pub fn max_bet(&self) -> u64 {
        self.max_bet
    }

    /// Set the bet. Bounds are checked against the configured limits; the
    /// stored bet is then capped at the current balance.
    pub fn set_bet(&mut self, amount: u64) -> SlotResult<u64> {
        if amount < self.min_bet || amount > self.max_bet {
            log::warn!(
                "Rejected bet {} (limits {}..={})",
                amount,
                self.min_bet,
                self.max_bet
            );
            self.bus.emit(MachineEvent::InvalidBet);
            return Err(self.invalid_bet(amount));
        }

        let bet = amount.min(self.credits);
        if bet != self.current_bet {
            self.current_bet = bet;
            log::debug!("Bet set to {}", bet);
            self.bus.emit(MachineEvent::BetChanged(bet));
        }
        Ok(bet)
    }

    /// Raise the bet by `delta`. Non-positive deltas are ignored.
    pub fn adjust_bet(&mut self, delta: i64) -> SlotResult<u64> {
        if delta <= 0 {
            return Ok(self.current_bet);
        }
        self.set_bet(self.current_bet.saturating_add(delta as u64))
    }

    /// Lower the bet by `amount`. Zero is ignored; going below zero is an
    /// invalid bet.
    pub fn decrease_bet(&mut self, amount: u64) -> SlotResult<u64> {
        if amount == 0 {
            return Ok(self.current_bet);
        }
        match self.current_bet.checked_sub(amount) {
            Some(target) => self.set_bet(target),
            None => {
                self.bus.emit(MachineEvent::InvalidBet);
                Err(SlotError::InvalidBet {
                    amount: 0,
                    min: self.min_bet,
                    max: self.max_bet,
                })
            }
        }
    }

    /// Check that the current bet can be played, without touching the
    /// balance. Failures are reported on the bus.
    pub fn check_wager(&self) -> SlotResult<u64> {
        let bet = self.current_bet;
        if bet < self.min_bet {
            log::warn!("Bet {} below minimum {}", bet, self.min_bet);
            self.bus.emit(MachineEvent::InvalidBet);
            return Err(self.invalid_bet(bet));
        }
        if self.credits < bet {
            log::warn!("Insufficient credits: {} available, {} bet", self.credits, bet);
            self.bus.emit(MachineEvent::InsufficientCredits);
            return Err(SlotError::InsufficientCredits {
                credits: self.credits,
                required: bet,
            });
        }
        Ok(bet)
    }

    pub fn debit(&mut self, amount: u64) -> SlotResult<()> {
        if self.credits < amount {
            log::warn!(
                "Insufficient credits: {} available, {} required",
                self.credits,
                amount
            );
            self.bus.emit(MachineEvent::InsufficientCredits);
            return Err(SlotError::InsufficientCredits {
                credits: self.credits,
                required: amount,
            });
        }
        self.set_credits(self.credits - amount);
        Ok(())
    }

    /// Add credits. Zero is ignored.
    pub fn credit(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.set_credits(self.credits.saturating_add(amount));
    }

    fn set_credits(&mut self, credits: u64) {
        self.credits = credits;
        log::debug!("Credits now {}", credits);
        self.bus.emit(MachineEvent::CreditsChanged(credits));

        let clamped = self.current_bet.min(self.max_bet).min(credits);
        if clamped != self.current_bet {
            self.current_bet = clamped;
            log::debug!("Bet clamped to {}", clamped);
            self.bus.emit(MachineEvent::BetChanged(clamped));
        }
    }

    fn invalid_bet(&self, amount: u64) -> SlotError {
        SlotError::InvalidBet {
            amount,
            min: self.min_bet,
            max: self.max_bet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Receiver;

    fn setup(min: u64, max: u64, default: u64, credits: u64) -> (Ledger, Receiver<MachineEvent>) {
        let bus = Arc::new(EventBus::new());
        let rx = bus.subscribe();
        let limits = BetLimits {
            min_bet: min,
            max_bet: max,
            default_bet: default,
            initial_credits: credits,
        };
        (Ledger::new(&limits, bus), rx)
    }

    #[test]
    fn test_initial_state_is_silent() {
        let (ledger, rx) = setup(10, 100, 10, 100);
        assert_eq!(ledger.credits(), 100);
        assert_eq!(ledger.current_bet(), 10);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_valid_bets() {
        let (mut ledger, _rx) = setup(10, 100, 10, 1000);
        for bet in 10..=100 {
            assert_eq!(ledger.set_bet(bet), Ok(bet));
            assert_eq!(ledger.current_bet(), bet);
        }
    }

    #[test]
    fn test_invalid_bets_leave_bet_unchanged() {
        let (mut ledger, rx) = setup(10, 100, 20, 1000);
        ledger.set_bet(20).unwrap();
        let _: Vec<_> = rx.try_iter().collect();

        for bet in [0, 9, 101, u64::MAX] {
            assert!(matches!(ledger.set_bet(bet), Err(SlotError::InvalidBet { .. })));
            assert_eq!(ledger.current_bet(), 20);
        }
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![MachineEvent::InvalidBet; 4]);
    }

    #[test]
    fn test_bet_capped_at_credits() {
        let (mut ledger, _rx) = setup(10, 100, 10, 30);
        assert_eq!(ledger.set_bet(50), Ok(30));
    }

    #[test]
    fn test_adjust_and_decrease() {
        let (mut ledger, rx) = setup(10, 100, 10, 1000);
        assert_eq!(ledger.adjust_bet(0), Ok(10));
        assert_eq!(ledger.adjust_bet(-5), Ok(10));
        assert!(rx.try_recv().is_err());

        assert_eq!(ledger.adjust_bet(15), Ok(25));
        assert_eq!(ledger.decrease_bet(10), Ok(15));
        assert_eq!(ledger.decrease_bet(0), Ok(15));
        assert!(ledger.decrease_bet(10).is_err());
        assert!(ledger.decrease_bet(100).is_err());
        assert!(ledger.adjust_bet(90).is_err());
        assert_eq!(ledger.current_bet(), 15);
    }

    #[test]
    fn test_debit_credit_roundtrip() {
        let (mut ledger, _rx) = setup(10, 100, 10, 100);
        ledger.debit(37).unwrap();
        assert_eq!(ledger.credits(), 63);
        ledger.credit(37);
        assert_eq!(ledger.credits(), 100);
    }

    #[test]
    fn test_debit_insufficient() {
        let (mut ledger, rx) = setup(10, 100, 10, 5);
        assert_eq!(
            ledger.debit(6),
            Err(SlotError::InsufficientCredits {
                credits: 5,
                required: 6
            })
        );
        assert_eq!(ledger.credits(), 5);
        assert_eq!(rx.try_recv(), Ok(MachineEvent::InsufficientCredits));
    }

    #[test]
    fn test_credit_zero_is_ignored() {
        let (mut ledger, rx) = setup(10, 100, 10, 100);
        ledger.credit(0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_bet_reclamped_below_min_when_credits_low() {
        let (mut ledger, rx) = setup(10, 100, 50, 100);
        ledger.debit(95).unwrap();

        assert_eq!(ledger.credits(), 5);
        assert_eq!(ledger.current_bet(), 5);
        assert!(ledger.current_bet() < ledger.min_bet());
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![MachineEvent::CreditsChanged(5), MachineEvent::BetChanged(5)]
        );

        // Topping up does not raise the bet back
        ledger.credit(100);
        assert_eq!(ledger.current_bet(), 5);
    }

    #[test]
    fn test_unchanged_bet_is_silent() {
        let (mut ledger, rx) = setup(10, 100, 10, 30);
        assert_eq!(ledger.set_bet(10), Ok(10));
        assert!(rx.try_recv().is_err());

        // Capped to the same value as before
        ledger.set_bet(30).unwrap();
        let _: Vec<_> = rx.try_iter().collect();
        assert_eq!(ledger.set_bet(80), Ok(30));
        assert!(rx.try_recv().is_err());

        assert_eq!(ledger.set_bet(20), Ok(20));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![MachineEvent::BetChanged(20)]);
    }
}
