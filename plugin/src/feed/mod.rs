//! Notification Feed
//!
//! A WebSocket subscription that turns inbound text frames into events.
//! No Bevy dependencies - this can be used standalone.

mod backoff;
mod client;
mod error;
mod events;

pub use backoff::ReconnectPolicy;
pub use client::{ClientConfig, DEFAULT_ENDPOINT, NotificationClient};
pub use error::ClientError;
pub use events::{ClientEvent, ClientEventReceiver, ClientEventSender, ConnectionState, event_channel};
