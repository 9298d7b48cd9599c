use std::time::Duration;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::feed::{ClientEventReceiver, ConnectionState, NotificationClient};

/// Identifier of the container notifications go into when none is configured.
pub const DEFAULT_AREA_ID: &str = "notification-area";

/// How long a notification stays on screen when not configured otherwise.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(5000);

/// Marker component for a UI node that hosts notifications
#[derive(Component, Clone, Debug)]
pub struct NotificationArea {
    pub id: String,
}

impl NotificationArea {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for NotificationArea {
    fn default() -> Self {
        Self::new(DEFAULT_AREA_ID)
    }
}

/// One visible notification.
#[derive(Component, Clone, Debug)]
pub struct Notification {
    /// Generation id, unique for the lifetime of the app.
    pub id: u64,
    pub text: String,
    /// `Time<Real>::elapsed()` when the notification was rendered.
    pub created_at: Duration,
    /// The container the notification was spawned into.
    pub area: Entity,
}

/// Removal timer owned by a single notification.
#[derive(Component, Debug)]
pub struct NotificationTimer(pub Timer);

/// Container id to entities, kept in sync with `NotificationArea` components
///
/// Several areas may share an id; the most recently registered live one is
/// used, and removing it falls back to the one registered before.
#[derive(Resource, Default, Clone, Debug)]
pub struct NotificationAreaMap {
    areas: HashMap<String, Vec<Entity>>,
}

impl NotificationAreaMap {
    /// Areas registered under `id`, oldest first.
    pub fn entities(&self, id: &str) -> &[Entity] {
        self.areas.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The area currently receiving notifications for `id`.
    pub fn get(&self, id: &str) -> Option<Entity> {
        self.entities(id).last().copied()
    }

    pub fn insert(&mut self, id: String, entity: Entity) {
        let entities = self.areas.entry(id).or_default();
        if !entities.contains(&entity) {
            entities.push(entity);
        }
    }

    pub fn remove(&mut self, entity: Entity) {
        for entities in self.areas.values_mut() {
            entities.retain(|area| *area != entity);
        }
        self.areas.retain(|_, entities| !entities.is_empty());
    }
}

/// Where notifications are rendered and for how long.
#[derive(Resource, Clone, Debug)]
pub struct NotificationSettings {
    pub area_id: String,
    pub display_duration: Duration,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            area_id: DEFAULT_AREA_ID.to_string(),
            display_duration: DEFAULT_DISPLAY_DURATION,
        }
    }
}

/// Next generation id to hand out.
#[derive(Resource, Default, Debug)]
pub struct NotificationCounter(pub u64);

impl NotificationCounter {
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// Bevy resource owning the notification client.
#[derive(Resource)]
pub struct NotificationClientResource(pub NotificationClient);

/// Receiver for events from the notification client
#[derive(Resource)]
pub struct ClientEventsResource(pub ClientEventReceiver);

/// Last connection state reported by the client.
#[derive(Resource, Default, Clone, Debug)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub last_error: Option<String>,
    /// Text messages received since startup.
    pub received: u64,
}

/// Request a notification from game code, bypassing the socket.
#[derive(Message, Clone, Debug)]
pub struct ShowNotification(pub String);

/// Remove every notification in the named container immediately.
#[derive(Message, Clone, Debug)]
pub struct ClearNotifications {
    pub area_id: String,
}
