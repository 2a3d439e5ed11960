//! # rf-slot-machine: reel slot spin engine
//!
//! Resolves spins against a weighted symbol pool, evaluates row and
//! diagonal matches, keeps the credit/bet ledger and notifies observers of
//! every state change. Rendering and animation live outside this crate and
//! consume [`MachineEvent`]s plus the visible [`Grid`].
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── SymbolTable (names, payout multipliers, weights)
//!     ├── SpinEngine ── Reel × N (visible windows)
//!     ├── WinEvaluator (middle row + two diagonals)
//!     ├── Ledger (credits, bet, clamping)
//!     └── EventBus (callbacks + channels)
//!           │
//!           v
//!     SpinResult + MachineEvent stream
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use rf_slot_machine::{MachineConfig, MachineEvent, SlotMachine};
//!
//! let mut machine = SlotMachine::new(MachineConfig::classic())?;
//! machine.on(|event| {
//!     if let MachineEvent::Win(amount) = event {
//!         println!("won {amount}");
//!     }
//! });
//! machine.set_bet(20)?;
//! let result = machine.spin()?;
//! println!("payout {} → credits {}", result.payout, machine.credits());
//! # Ok::<(), rf_slot_machine::SlotError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod grid;
pub mod ledger;
pub mod machine;
pub mod reel;
pub mod spin;
pub mod stats;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use evaluator::*;
pub use events::*;
pub use grid::*;
pub use ledger::*;
pub use machine::*;
pub use reel::*;
pub use spin::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
