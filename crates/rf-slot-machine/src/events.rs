//! Machine notifications
//!
//! Events are delivered synchronously, in emission order, to callback
//! listeners first and then to channel subscribers. Delivery happens while
//! the bus is locked, so a listener must not emit on the same bus.

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// State change notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineEvent {
    CreditsChanged(u64),
    BetChanged(u64),
    SpinStarted,
    SpinCompleted,
    /// Payout credited for a winning spin
    Win(u64),
    Lose,
    InsufficientCredits,
    InvalidBet,
}

impl MachineEvent {
    /// Stable event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreditsChanged(_) => "credits_changed",
            Self::BetChanged(_) => "bet_changed",
            Self::SpinStarted => "spin_started",
            Self::SpinCompleted => "spin_completed",
            Self::Win(_) => "win",
            Self::Lose => "lose",
            Self::InsufficientCredits => "insufficient_credits",
            Self::InvalidBet => "invalid_bet",
        }
    }
}

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&MachineEvent) + Send>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: Vec<(ListenerId, Listener)>,
    channels: Vec<Sender<MachineEvent>>,
}

/// Multicast event bus
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<Listeners>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback listener
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&MachineEvent) + Send + 'static,
    {
        let mut inner = self.inner.lock();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.callbacks.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback listener. Returns false if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.callbacks.len();
        inner.callbacks.retain(|(lid, _)| *lid != id);
        inner.callbacks.len() != before
    }

    /// Open an unbounded channel that receives every subsequent event
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<MachineEvent> {
        let (tx, rx) = unbounded();
        self.inner.lock().channels.push(tx);
        rx
    }

    pub fn emit(&self, event: MachineEvent) {
        log::trace!("event: {}", event.name());
        let mut inner = self.inner.lock();
        for (_, callback) in inner.callbacks.iter_mut() {
            callback(&event);
        }
        inner.channels.retain(|tx| tx.send(event).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.callbacks.len() + inner.channels.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EventBus")
            .field("callbacks", &inner.callbacks.len())
            .field("channels", &inner.channels.len())
            .finish()
    }
}
