use std::time::Duration;

use bevy::prelude::*;
use bevy::time::{TimePlugin, TimeUpdateStrategy, Virtual};
use bevy_notify::feed::{ClientEvent, ClientEventSender, ConnectionState, event_channel};
use bevy_notify::notify::{
    ClearNotifications, ClientEventsResource, ConnectionStatus, Notification, NotificationArea,
    NotificationConfig, NotificationPlugin, ShowNotification,
};

fn app_with(config: NotificationConfig) -> (App, ClientEventSender) {
    let mut app = App::new();
    app.add_plugins(TimePlugin);
    app.add_plugins(NotificationPlugin::new(config.without_autoconnect()));

    let (sender, receiver) = event_channel();
    app.insert_resource(ClientEventsResource(receiver));

    // The real clock starts on the first update; later frames carry a delta
    step(&mut app, 0);
    (app, sender)
}

fn app() -> (App, ClientEventSender) {
    app_with(NotificationConfig::new())
}

/// Let `ms` of wall-clock time pass and run one frame.
fn step(app: &mut App, ms: u64) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        ms,
    )));
    app.update();
}

fn spawn_area(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((Node::default(), NotificationArea::default()))
        .id()
}

/// Visible notification texts, oldest first.
fn visible(app: &mut App) -> Vec<String> {
    let mut query = app.world_mut().query::<&Notification>();
    let mut notifications: Vec<(u64, String)> = query
        .iter(app.world())
        .map(|n| (n.id, n.text.clone()))
        .collect();
    notifications.sort();
    notifications.into_iter().map(|(_, text)| text).collect()
}

fn message(text: &str) -> ClientEvent {
    ClientEvent::Message(text.to_string())
}

#[test]
fn message_renders_one_notification_in_the_area() {
    let (mut app, feed) = app();
    let area = spawn_area(&mut app);

    feed.send(message("Build succeeded"));
    step(&mut app, 0);

    let mut query = app.world_mut().query::<(&Notification, &Text, &ChildOf)>();
    let rendered: Vec<_> = query
        .iter(app.world())
        .map(|(n, text, child_of)| (n.text.clone(), text.0.clone(), child_of.parent()))
        .collect();

    assert_eq!(
        rendered,
        vec![(
            "Build succeeded".to_string(),
            "Build succeeded".to_string(),
            area
        )]
    );

    let children = app.world().get::<Children>(area).unwrap();
    assert_eq!(children.len(), 1);
}

#[test]
fn markup_is_rendered_as_literal_text() {
    let (mut app, feed) = app();
    spawn_area(&mut app);

    feed.send(message("<b>bold</b> & more"));
    feed.send(message(""));
    step(&mut app, 0);

    assert_eq!(visible(&mut app), vec!["<b>bold</b> & more", ""]);
}

#[test]
fn notification_is_removed_after_exactly_five_seconds() {
    let (mut app, feed) = app();
    spawn_area(&mut app);

    feed.send(message("Build succeeded"));
    step(&mut app, 0);
    assert_eq!(visible(&mut app).len(), 1);

    step(&mut app, 4999);
    assert_eq!(visible(&mut app), vec!["Build succeeded"]);

    step(&mut app, 1);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn one_long_frame_removes_the_notification() {
    let (mut app, feed) = app();
    spawn_area(&mut app);

    feed.send(message("Build succeeded"));
    step(&mut app, 0);

    // Well past the virtual clock's per-frame clamp
    step(&mut app, 6000);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn paused_game_time_does_not_hold_notifications() {
    let (mut app, feed) = app();
    spawn_area(&mut app);
    app.world_mut().resource_mut::<Time<Virtual>>().pause();

    feed.send(message("Paused"));
    step(&mut app, 0);

    for _ in 0..49 {
        step(&mut app, 100);
    }
    assert_eq!(visible(&mut app), vec!["Paused"]);

    step(&mut app, 100);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn overlapping_notifications_expire_in_arrival_order() {
    let (mut app, feed) = app();
    let area = spawn_area(&mut app);

    feed.send(message("Build succeeded"));
    step(&mut app, 0);

    feed.send(message("Deploy started"));
    step(&mut app, 1000);
    assert_eq!(visible(&mut app), vec!["Build succeeded", "Deploy started"]);

    // t = 5000
    step(&mut app, 4000);
    assert_eq!(visible(&mut app), vec!["Deploy started"]);

    // t = 5999
    step(&mut app, 999);
    assert_eq!(visible(&mut app), vec!["Deploy started"]);

    // t = 6000
    step(&mut app, 1);
    assert!(visible(&mut app).is_empty());
    assert!(
        app.world()
            .get::<Children>(area)
            .is_none_or(|children| children.is_empty())
    );
}

#[test]
fn burst_of_messages_coexists() {
    let (mut app, feed) = app();
    spawn_area(&mut app);

    for i in 0..5 {
        feed.send(message(&format!("event {}", i)));
    }
    step(&mut app, 0);

    assert_eq!(
        visible(&mut app),
        vec!["event 0", "event 1", "event 2", "event 3", "event 4"]
    );
}

#[test]
fn duplicate_text_is_not_deduplicated() {
    let (mut app, feed) = app();
    spawn_area(&mut app);

    feed.send(message("ping"));
    feed.send(message("ping"));
    step(&mut app, 0);

    let mut query = app.world_mut().query::<(Entity, &Notification)>();
    let rendered: Vec<_> = query.iter(app.world()).collect();
    assert_eq!(rendered.len(), 2);
    assert_ne!(rendered[0].0, rendered[1].0);
    assert_ne!(rendered[0].1.id, rendered[1].1.id);
}

#[test]
fn missing_area_drops_only_that_notification() {
    let (mut app, feed) = app();

    feed.send(message("nobody home"));
    step(&mut app, 0);
    assert!(visible(&mut app).is_empty());
    assert_eq!(app.world().resource::<ConnectionStatus>().received, 1);

    spawn_area(&mut app);
    feed.send(message("now there is"));
    step(&mut app, 0);
    assert_eq!(visible(&mut app), vec!["now there is"]);
}

#[test]
fn losing_the_area_does_not_disturb_scheduled_removals() {
    let (mut app, feed) = app();
    let area = spawn_area(&mut app);

    feed.send(message("first"));
    step(&mut app, 0);

    app.world_mut().entity_mut(area).remove::<NotificationArea>();
    feed.send(message("second"));
    step(&mut app, 1000);
    assert_eq!(visible(&mut app), vec!["first"]);

    step(&mut app, 3999);
    assert_eq!(visible(&mut app), vec!["first"]);

    step(&mut app, 1);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn removing_a_shadowing_area_falls_back_to_the_earlier_one() {
    let (mut app, feed) = app();
    let first = spawn_area(&mut app);
    step(&mut app, 0);

    let second = spawn_area(&mut app);
    step(&mut app, 0);

    app.world_mut().despawn(second);
    step(&mut app, 0);

    feed.send(message("hello"));
    step(&mut app, 0);

    let mut query = app.world_mut().query::<(&Notification, &ChildOf)>();
    let rendered: Vec<_> = query
        .iter(app.world())
        .map(|(n, child_of)| (n.text.clone(), child_of.parent()))
        .collect();
    assert_eq!(rendered, vec![("hello".to_string(), first)]);
}

#[test]
fn newest_area_with_a_shared_id_receives_notifications() {
    let (mut app, feed) = app();
    spawn_area(&mut app);
    step(&mut app, 0);
    let newest = spawn_area(&mut app);

    feed.send(message("hello"));
    step(&mut app, 0);

    let mut query = app.world_mut().query::<(&Notification, &ChildOf)>();
    let (_, child_of) = query.single(app.world()).unwrap();
    assert_eq!(child_of.parent(), newest);
}

#[test]
fn clearing_the_area_leaves_later_notifications_alone() {
    let (mut app, feed) = app();
    spawn_area(&mut app);

    feed.send(message("stale"));
    step(&mut app, 0);

    app.world_mut().write_message(ClearNotifications {
        area_id: "notification-area".to_string(),
    });
    step(&mut app, 0);
    assert!(visible(&mut app).is_empty());

    feed.send(message("fresh"));
    step(&mut app, 1000);

    // The cleared notification's deadline passes without touching "fresh"
    step(&mut app, 4000);
    assert_eq!(visible(&mut app), vec!["fresh"]);

    step(&mut app, 1000);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn show_notification_uses_the_same_renderer() {
    let (mut app, _feed) = app();
    spawn_area(&mut app);

    app.world_mut()
        .write_message(ShowNotification("Saved".to_string()));
    step(&mut app, 0);
    assert_eq!(visible(&mut app), vec!["Saved"]);

    step(&mut app, 5000);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn custom_area_and_duration() {
    let (mut app, feed) = app_with(
        NotificationConfig::new()
            .with_area_id("toasts")
            .with_display_duration(Duration::from_millis(250)),
    );
    spawn_area(&mut app);
    app.world_mut()
        .spawn((Node::default(), NotificationArea::new("toasts")));

    feed.send(message("quick"));
    step(&mut app, 0);

    let mut query = app.world_mut().query::<(&Notification, &ChildOf)>();
    let (_, child_of) = query.single(app.world()).unwrap();
    let parent = app.world().get::<NotificationArea>(child_of.parent()).unwrap();
    assert_eq!(parent.id, "toasts");

    step(&mut app, 249);
    assert_eq!(visible(&mut app).len(), 1);
    step(&mut app, 1);
    assert!(visible(&mut app).is_empty());
}

#[test]
fn connection_events_update_status() {
    let (mut app, feed) = app();

    feed.send(ClientEvent::Connecting { attempt: 1 });
    step(&mut app, 0);
    assert_eq!(
        app.world().resource::<ConnectionStatus>().state,
        ConnectionState::Connecting
    );

    feed.send(ClientEvent::Open);
    step(&mut app, 0);
    assert_eq!(
        app.world().resource::<ConnectionStatus>().state,
        ConnectionState::Open
    );

    feed.send(ClientEvent::Error("Connection reset".to_string()));
    feed.send(ClientEvent::Disconnected {
        code: 1006,
        reason: "Connection error".to_string(),
    });
    feed.send(ClientEvent::Closed);
    step(&mut app, 0);

    let status = app.world().resource::<ConnectionStatus>();
    assert_eq!(status.state, ConnectionState::Closed);
    assert_eq!(status.last_error.as_deref(), Some("Connection reset"));
}
