//! Events pushed from the connection thread to whoever owns the receiver.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Lifecycle of a notification connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ConnectionState {
    /// Constructed but never opened.
    #[default]
    Idle = 0,
    Connecting = 1,
    Open = 2,
    /// Dropped by the server or the network; a reconnect may follow.
    Disconnected = 3,
    /// Terminal. Closed by the owner or the reconnect policy gave up.
    Closed = 4,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::Disconnected,
            4 => ConnectionState::Closed,
            _ => ConnectionState::Idle,
        }
    }
}

/// Connection state shared between the client handle and its thread.
#[derive(Debug, Default)]
pub(crate) struct SharedState(AtomicU8);

impl SharedState {
    pub(crate) fn load(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub(crate) fn store(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A connection attempt started. `attempt` is 1 for the first try after
    /// opening or after a successful connection.
    Connecting { attempt: u32 },
    Open,
    /// One inbound text frame, payload untouched.
    Message(String),
    Disconnected { code: u16, reason: String },
    Reconnecting { attempt: u32, delay: Duration },
    Error(String),
    Closed,
}

/// Create a connected sender/receiver pair.
///
/// `NotificationClient::new` uses this internally; it is public so hosts can
/// feed events from somewhere other than a socket (replays, tests).
pub fn event_channel() -> (ClientEventSender, ClientEventReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        ClientEventSender { tx },
        ClientEventReceiver { rx: Mutex::new(rx) },
    )
}

/// Sending half, cloned into the connection thread.
#[derive(Clone, Debug)]
pub struct ClientEventSender {
    tx: Sender<ClientEvent>,
}

impl ClientEventSender {
    pub fn send(&self, event: ClientEvent) {
        if let Err(e) = self.tx.send(event) {
            log::debug!("[NotificationClient] Event dropped, receiver gone: {:?}", e.0);
        }
    }
}

/// Receiving half. Wrapped in a mutex so it can live in a Bevy resource.
#[derive(Debug)]
pub struct ClientEventReceiver {
    rx: Mutex<Receiver<ClientEvent>>,
}

impl ClientEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block for up to `timeout` waiting for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        let rx = self.rx.lock().ok()?;
        match rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain everything currently queued, in arrival order.
    pub fn drain(&self) -> Vec<ClientEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
