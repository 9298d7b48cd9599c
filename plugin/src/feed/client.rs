//! Notification Client
//!
//! Holds one WebSocket subscription to a notification endpoint. The socket is
//! driven by tokio-tungstenite on a dedicated thread with its own runtime;
//! everything the thread observes is pushed back as `ClientEvent`s.

use futures_util::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use url::Url;

use crate::feed::backoff::{Backoff, ReconnectPolicy};
use crate::feed::error::ClientError;
use crate::feed::events::{
    ClientEvent, ClientEventReceiver, ClientEventSender, ConnectionState, SharedState,
    event_channel,
};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

/// Close code reported when the socket ends without a close frame.
const ABNORMAL_CLOSURE: u16 = 1006;

/// Connection settings for a `NotificationClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }
}

enum Control {
    Close,
}

struct Running {
    control: mpsc::UnboundedSender<Control>,
    thread: JoinHandle<()>,
}

/// Owned handle to a notification subscription.
///
/// Nothing happens until [`open`](Self::open) is called. Dropping the handle
/// closes the connection.
pub struct NotificationClient {
    config: ClientConfig,
    events: ClientEventSender,
    state: Arc<SharedState>,
    running: Mutex<Option<Running>>,
}

impl NotificationClient {
    /// Create a client and the receiver its events will arrive on.
    pub fn new(config: ClientConfig) -> (NotificationClient, ClientEventReceiver) {
        let (events, receiver) = event_channel();
        let client = Self {
            config,
            events,
            state: Arc::new(SharedState::default()),
            running: Mutex::new(None),
        };
        (client, receiver)
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state.load()
    }

    /// Start the connection thread.
    ///
    /// Returns once the thread is running; the connection itself is reported
    /// through `ClientEvent::Open` or `ClientEvent::Error`.
    pub fn open(&self) -> Result<(), ClientError> {
        let url = parse_endpoint(&self.config.endpoint)?;

        let mut running = self.lock_running();
        if running
            .as_ref()
            .is_some_and(|running| !running.thread.is_finished())
        {
            return Err(ClientError::AlreadyOpen);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let policy = self.config.reconnect;
        let events = self.events.clone();
        let state = self.state.clone();
        state.store(ConnectionState::Connecting);

        let thread = std::thread::Builder::new()
            .name("notification-client".to_string())
            .spawn(move || {
                runtime.block_on(run_connection(url, policy, events, state, control_rx));
            })
            .inspect_err(|_| self.state.store(ConnectionState::Idle))?;

        *running = Some(Running {
            control: control_tx,
            thread,
        });
        log::info!("[NotificationClient] Opened {}", self.config.endpoint);
        Ok(())
    }

    /// Ask the connection thread to close. Does not wait for it.
    pub fn close(&self) {
        if let Some(running) = self.lock_running().as_ref() {
            log::info!("[NotificationClient] Closing {}", self.config.endpoint);
            let _ = running.control.send(Control::Close);
        }
    }

    /// Close and wait for the connection thread to exit.
    pub fn shutdown(&self) {
        let Some(running) = self.lock_running().take() else {
            return;
        };
        let _ = running.control.send(Control::Close);
        if running.thread.join().is_err() {
            log::error!("[NotificationClient] Connection thread panicked");
        }
    }

    fn lock_running(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for NotificationClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ClientError> {
    let url = Url::parse(endpoint).map_err(|source| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;

    match url.scheme() {
        "ws" => Ok(url),
        other => Err(ClientError::UnsupportedScheme(other.to_string())),
    }
}

/// Connection loop: connect, pump frames, back off, repeat until closed.
async fn run_connection(
    url: Url,
    policy: ReconnectPolicy,
    events: ClientEventSender,
    state: Arc<SharedState>,
    mut control: mpsc::UnboundedReceiver<Control>,
) {
    let mut backoff = Backoff::new(policy);

    loop {
        let attempt = backoff.attempt();
        state.store(ConnectionState::Connecting);
        events.send(ClientEvent::Connecting { attempt });
        log::info!("[NotificationClient] Connecting to {} (attempt {})", url, attempt);

        let connected = tokio::select! {
            result = connect(&url) => result,
            _ = control.recv() => break,
        };

        match connected {
            Ok(stream) => {
                backoff.reset();
                state.store(ConnectionState::Open);
                events.send(ClientEvent::Open);

                match pump(stream, &events, &mut control).await {
                    Exit::CloseRequested => break,
                    Exit::Dropped { code, reason } => {
                        log::warn!("[NotificationClient] Disconnected: {} {}", code, reason);
                        state.store(ConnectionState::Disconnected);
                        events.send(ClientEvent::Disconnected { code, reason });
                    }
                }
            }
            Err(e) => {
                log::error!("[NotificationClient] {}", e);
                state.store(ConnectionState::Disconnected);
                events.send(ClientEvent::Error(e.to_string()));
            }
        }

        let Some(delay) = backoff.next_delay() else {
            log::info!("[NotificationClient] Not reconnecting");
            break;
        };

        let attempt = backoff.attempt();
        log::info!(
            "[NotificationClient] Reconnecting in {:?} (attempt {})",
            delay,
            attempt
        );
        events.send(ClientEvent::Reconnecting { attempt, delay });

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = control.recv() => break,
        }
    }

    state.store(ConnectionState::Closed);
    events.send(ClientEvent::Closed);
    log::info!("[NotificationClient] Connection ended");
}

async fn connect(url: &Url) -> Result<WebSocketStream<TcpStream>, ClientError> {
    let host = url.host_str().unwrap_or("localhost");
    let port = url.port_or_known_default().unwrap_or(80);
    let addr = format!("{}:{}", host, port);

    let tcp_stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;
    log::debug!("[NotificationClient] TCP connected to {}", addr);

    let request = url.as_str().into_client_request()?;
    let (stream, response) = tokio_tungstenite::client_async(request, tcp_stream).await?;
    log::info!(
        "[NotificationClient] Connected (status: {})",
        response.status()
    );

    Ok(stream)
}

enum Exit {
    CloseRequested,
    Dropped { code: u16, reason: String },
}

/// Forward inbound text frames until the socket ends or a close is requested.
async fn pump(
    stream: WebSocketStream<TcpStream>,
    events: &ClientEventSender,
    control: &mut mpsc::UnboundedReceiver<Control>,
) -> Exit {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            _ = control.recv() => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    log::warn!("[NotificationClient] Failed to send close frame: {}", e);
                }
                return Exit::CloseRequested;
            }
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    log::debug!("[NotificationClient] Received {} bytes", text.len());
                    events.send(ClientEvent::Message(text.to_string()));
                }
                Some(Ok(Message::Binary(data))) => {
                    log::debug!(
                        "[NotificationClient] Skipping binary frame ({} bytes)",
                        data.len()
                    );
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.to_string()))
                        .unwrap_or((1000, String::new()));
                    return Exit::Dropped { code, reason };
                }
                // Ping and pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::error!("[NotificationClient] Read error: {}", e);
                    events.send(ClientEvent::Error(e.to_string()));
                    return Exit::Dropped {
                        code: ABNORMAL_CLOSURE,
                        reason: "Connection error".to_string(),
                    };
                }
                None => {
                    return Exit::Dropped {
                        code: ABNORMAL_CLOSURE,
                        reason: "Connection ended".to_string(),
                    };
                }
            },
        }
    }
}
