use bevy::prelude::*;
use bevy::time::Real;

use crate::notify::systems::types::*;

/// Tick every notification's timer and despawn the ones that ran out.
///
/// Timers run on real time: a paused or clamped virtual clock does not keep
/// a notification on screen past its display duration.
///
/// Each notification only ever removes its own entity. If something else
/// already despawned it the entity is gone from this query, and
/// `try_despawn` covers removal later in the same frame.
pub fn expire_notifications(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut notifications: Query<(Entity, &Notification, &mut NotificationTimer)>,
) {
    for (entity, notification, mut timer) in &mut notifications {
        if !timer.0.tick(time.delta()).is_finished() {
            continue;
        }

        commands.entity(entity).try_despawn();
        log::debug!(
            "[Notify] Expired notification #{} entity={:?} after {:?}",
            notification.id,
            entity,
            time.elapsed().saturating_sub(notification.created_at)
        );
    }
}

/// Handle `ClearNotifications` by despawning the notifications in that area
pub fn clear_notification_areas(
    mut commands: Commands,
    mut requests: MessageReader<ClearNotifications>,
    area_map: Res<NotificationAreaMap>,
    children: Query<&Children>,
    notifications: Query<(), With<Notification>>,
) {
    for request in requests.read() {
        let Some(area) = area_map.get(&request.area_id) else {
            log::warn!("[Notify] Cannot clear unknown area '{}'", request.area_id);
            continue;
        };
        let Ok(children) = children.get(area) else {
            continue;
        };
        let children: &[Entity] = children;

        let mut cleared = 0;
        for &child in children {
            if notifications.contains(child) {
                commands.entity(child).try_despawn();
                cleared += 1;
            }
        }
        log::info!(
            "[Notify] Cleared {} notification(s) from '{}'",
            cleared,
            request.area_id
        );
    }
}
