//! Server-pushed notifications for Bevy UI.
//!
//! - [`feed`]: a WebSocket subscription with explicit lifecycle and reconnect
//!   policy, free of Bevy types.
//! - [`notify`]: the Bevy plugin that renders each received message into a
//!   notification area and removes it after a fixed duration.

pub mod feed;
pub mod notify;

pub use feed::{
    ClientConfig, ClientError, ClientEvent, ConnectionState, NotificationClient, ReconnectPolicy,
};
pub use notify::{
    ClearNotifications, ConnectionStatus, Notification, NotificationArea, NotificationClass,
    NotificationConfig, NotificationPlugin, RenderError, ShowNotification,
};
