use thiserror::Error;

/// Errors returned by `NotificationClient` operations.
///
/// Failures after `open` has returned (refused connections, dropped sockets)
/// are not errors of the call; they arrive as `ClientEvent`s instead.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported endpoint scheme '{0}' (expected ws)")]
    UnsupportedScheme(String),

    #[error("Notification client is already open")]
    AlreadyOpen,

    #[error("Failed to start connection runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("TCP connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("WebSocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),
}
