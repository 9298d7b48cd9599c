use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::time::Real;
use thiserror::Error;

use crate::feed::{ClientEvent, ConnectionState};
use crate::notify::style::NotificationClass;
use crate::notify::systems::types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Notification area '{0}' not found")]
    AreaNotFound(String),
}

/// Spawns notifications into the configured container.
#[derive(SystemParam)]
pub struct NotificationRenderer<'w, 's> {
    commands: Commands<'w, 's>,
    area_map: Res<'w, NotificationAreaMap>,
    areas: Query<'w, 's, (), With<NotificationArea>>,
    settings: Res<'w, NotificationSettings>,
    class: Res<'w, NotificationClass>,
    counter: ResMut<'w, NotificationCounter>,
    time: Res<'w, Time<Real>>,
}

impl NotificationRenderer<'_, '_> {
    /// Show `message` as plain text until the display duration has passed.
    ///
    /// The entity is queued for spawning as a child of the container and
    /// carries its own removal timer.
    pub fn render(&mut self, message: &str) -> Result<Entity, RenderError> {
        let area = self
            .area_map
            .entities(&self.settings.area_id)
            .iter()
            .rev()
            .copied()
            .find(|area| self.areas.contains(*area))
            .ok_or_else(|| RenderError::AreaNotFound(self.settings.area_id.clone()))?;

        let id = self.counter.next();
        let class = &self.class;

        let entity = self
            .commands
            .spawn((
                Notification {
                    id,
                    text: message.to_string(),
                    created_at: self.time.elapsed(),
                    area,
                },
                NotificationTimer(Timer::new(self.settings.display_duration, TimerMode::Once)),
                class.node.clone(),
                BackgroundColor(class.background),
                BorderColor::all(class.border),
                Text::new(message),
                TextColor(class.text_color),
                TextFont::from_font_size(class.font_size),
                Name::new(format!("{} #{}", class.name, id)),
                ChildOf(area),
            ))
            .id();

        log::debug!(
            "[Notify] Rendered notification #{} entity={:?} area={:?}",
            id,
            entity,
            area
        );
        Ok(entity)
    }
}

/// Keep `NotificationAreaMap` in sync with spawned and removed containers
pub fn register_notification_areas(
    added: Query<(Entity, &NotificationArea), Added<NotificationArea>>,
    mut removed: RemovedComponents<NotificationArea>,
    mut area_map: ResMut<NotificationAreaMap>,
) {
    for entity in removed.read() {
        area_map.remove(entity);
    }

    for (entity, area) in &added {
        if let Some(previous) = area_map.get(&area.id) {
            log::warn!(
                "[Notify] Area '{}' registered twice: {:?} shadows {:?}",
                area.id,
                entity,
                previous
            );
        }
        area_map.insert(area.id.clone(), entity);
        log::info!("[Notify] Registered area '{}' entity={:?}", area.id, entity);
    }
}

/// Drain client events, rendering every text message
pub fn process_client_events(
    receiver: Res<ClientEventsResource>,
    mut status: ResMut<ConnectionStatus>,
    mut renderer: NotificationRenderer,
) {
    for event in receiver.0.drain() {
        match event {
            ClientEvent::Message(text) => {
                status.received += 1;
                if let Err(e) = renderer.render(&text) {
                    log::error!("[Notify] Dropped notification: {}", e);
                }
            }
            ClientEvent::Connecting { .. } => {
                status.state = ConnectionState::Connecting;
            }
            ClientEvent::Reconnecting { .. } => {
                status.state = ConnectionState::Disconnected;
            }
            ClientEvent::Open => {
                status.state = ConnectionState::Open;
                status.last_error = None;
            }
            ClientEvent::Disconnected { code, reason } => {
                log::info!("[Notify] Notification feed disconnected: {} {}", code, reason);
                status.state = ConnectionState::Disconnected;
            }
            ClientEvent::Error(message) => {
                status.last_error = Some(message);
            }
            ClientEvent::Closed => {
                status.state = ConnectionState::Closed;
            }
        }
    }
}

/// Render notifications requested through `ShowNotification`
pub fn show_requested_notifications(
    mut requests: MessageReader<ShowNotification>,
    mut renderer: NotificationRenderer,
) {
    for ShowNotification(text) in requests.read() {
        if let Err(e) = renderer.render(text) {
            log::error!("[Notify] Dropped notification: {}", e);
        }
    }
}
