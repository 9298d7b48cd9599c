use bevy::prelude::*;
use bevy_notify::{NotificationArea, NotificationConfig, NotificationPlugin, ShowNotification};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(NotificationPlugin::new(
            NotificationConfig::new().with_endpoint("ws://localhost:8080/ws"),
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, notify_on_space)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    // Notifications stack in the top-right corner
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            right: Val::Px(16.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            ..default()
        },
        NotificationArea::default(),
    ));
}

/// Press space to show a local notification without a server.
fn notify_on_space(keyboard: Res<ButtonInput<KeyCode>>, mut show: MessageWriter<ShowNotification>) {
    if keyboard.just_pressed(KeyCode::Space) {
        show.write(ShowNotification("Hello from the demo".to_string()));
    }
}
