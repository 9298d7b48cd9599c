//! # Notifications for Bevy UI
//!
//! Shows server-pushed text messages as transient UI nodes.
//!
//! ## Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_notify::{NotificationArea, NotificationPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(NotificationPlugin::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(Camera2d);
//!     commands.spawn((
//!         Node {
//!             position_type: PositionType::Absolute,
//!             top: Val::Px(16.0),
//!             right: Val::Px(16.0),
//!             flex_direction: FlexDirection::Column,
//!             ..default()
//!         },
//!         NotificationArea::default(),
//!     ));
//! }
//! ```
pub mod plugin;

mod style;
mod systems;

pub use plugin::{NotificationConfig, NotificationPlugin};
pub use style::*;
pub use systems::*;
