//! Refresh signalling between components.
//!
//! Whoever changes the event set publishes a signal; views that show events
//! subscribe and re-fetch when one arrives.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Why a refresh was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshSignal {
    EventCreated { event_id: String },
    EventDeleted { event_id: String },
    Manual,
}

/// A cloneable handle to the shared refresh channel.
#[derive(Debug, Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<RefreshSignal>,
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        RefreshBus { sender }
    }

    /// Broadcast a signal. Returns how many subscribers will see it.
    pub fn publish(&self, signal: RefreshSignal) -> usize {
        tracing::debug!(?signal, "refresh requested");
        // No subscribers is fine: nobody is showing events right now.
        self.sender.send(signal).unwrap_or(0)
    }

    pub fn subscribe(&self) -> RefreshListener {
        RefreshListener {
            receiver: self.sender.subscribe(),
        }
    }
}

pub struct RefreshListener {
    receiver: broadcast::Receiver<RefreshSignal>,
}

impl RefreshListener {
    /// Wait for the next signal. Returns `None` once every bus handle is gone.
    ///
    /// If the listener fell behind, missed signals collapse into one `Manual`
    /// refresh since a single re-fetch covers all of them.
    pub async fn recv(&mut self) -> Option<RefreshSignal> {
        match self.receiver.recv().await {
            Ok(signal) => Some(signal),
            Err(broadcast::error::RecvError::Lagged(_)) => Some(RefreshSignal::Manual),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Take a pending signal without waiting.
    pub fn try_recv(&mut self) -> Option<RefreshSignal> {
        match self.receiver.try_recv() {
            Ok(signal) => Some(signal),
            Err(broadcast::error::TryRecvError::Lagged(_)) => Some(RefreshSignal::Manual),
            Err(_) => None,
        }
    }
}
