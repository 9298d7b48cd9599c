//! Notification Plugin for Bevy
//!
//! Wires a `NotificationClient` into the ECS: client events are drained every
//! frame and each text message becomes a notification under the configured
//! `NotificationArea`.

use std::time::Duration;

use bevy::prelude::*;

use crate::feed::{ClientConfig, ConnectionState, NotificationClient, ReconnectPolicy};
use crate::notify::style::NotificationClass;
use crate::notify::systems::*;

/// Configuration for the notification plugin.
#[derive(Clone, Debug)]
pub struct NotificationConfig {
    pub client: ClientConfig,
    pub area_id: String,
    pub display_duration: Duration,
    pub class: NotificationClass,
    /// Open the client during `Startup`.
    pub connect_on_startup: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            area_id: DEFAULT_AREA_ID.to_string(),
            display_duration: DEFAULT_DISPLAY_DURATION,
            class: NotificationClass::default(),
            connect_on_startup: true,
        }
    }
}

impl NotificationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.client.endpoint = endpoint.into();
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.client.reconnect = reconnect;
        self
    }

    pub fn with_area_id(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = area_id.into();
        self
    }

    pub fn with_display_duration(mut self, display_duration: Duration) -> Self {
        self.display_duration = display_duration;
        self
    }

    pub fn with_class(mut self, class: NotificationClass) -> Self {
        self.class = class;
        self
    }

    /// Leave the client closed until the app calls `open` on it.
    pub fn without_autoconnect(mut self) -> Self {
        self.connect_on_startup = false;
        self
    }
}

/// Bevy plugin for server-pushed notifications.
///
/// This plugin:
/// - Owns a `NotificationClient` as a resource and opens it at startup
/// - Renders each received text frame into the `NotificationArea` with the configured id
/// - Despawns each notification once its display duration has passed
///
/// ## Usage
///
/// ```ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(NotificationPlugin::default())
///     .run();
/// ```
#[derive(Default)]
pub struct NotificationPlugin {
    config: NotificationConfig,
}

impl NotificationPlugin {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for NotificationPlugin {
    fn build(&self, app: &mut App) {
        log::info!("[Notify] Building notification plugin...");

        let (client, receiver) = NotificationClient::new(self.config.client.clone());

        app.insert_resource(NotificationClientResource(client))
            .insert_resource(ClientEventsResource(receiver))
            .insert_resource(NotificationSettings {
                area_id: self.config.area_id.clone(),
                display_duration: self.config.display_duration,
            })
            .insert_resource(self.config.class.clone())
            .init_resource::<NotificationAreaMap>()
            .init_resource::<NotificationCounter>()
            .init_resource::<ConnectionStatus>()
            .add_message::<ShowNotification>()
            .add_message::<ClearNotifications>()
            .add_systems(
                Update,
                (
                    register_notification_areas,
                    // Before rendering, so new notifications start counting next frame
                    expire_notifications,
                    clear_notification_areas,
                    process_client_events,
                    show_requested_notifications,
                )
                    .chain(),
            );

        if self.config.connect_on_startup {
            app.add_systems(Startup, open_notification_client);
        }

        log::info!(
            "[Notify] Notification plugin configured (endpoint {}, area '{}')",
            self.config.client.endpoint,
            self.config.area_id
        );
    }
}

fn open_notification_client(
    client: Res<NotificationClientResource>,
    mut status: ResMut<ConnectionStatus>,
) {
    if let Err(e) = client.0.open() {
        log::error!("[Notify] Failed to open notification client: {}", e);
        status.state = ConnectionState::Closed;
        status.last_error = Some(e.to_string());
    }
}
