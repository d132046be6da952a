use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::TerrainLayer;
use crate::config::ConfigLoaded;
use crate::player::possession::Vessel;

pub fn spawn_platforms(mut commands: Commands, config: Res<ConfigLoaded>) {
  for platform in &config.level.platforms {
    // Rapier cuboid uses half-extents
    commands.spawn((
      Name::new(format!("{:?} platform", platform.layer)),
      Sprite {
        color: Color::srgb(platform.color[0], platform.color[1], platform.color[2]),
        custom_size: Some(Vec2::new(platform.width, platform.height)),
        ..default()
      },
      Transform::from_xyz(platform.x, platform.y, 0.0),
      RigidBody::Fixed,
      Collider::cuboid(platform.width / 2.0, platform.height / 2.0),
      TerrainLayer::from(platform.layer),
    ));
  }
}

/// Vessels are loose crates the player can stand on or possess.
pub fn spawn_vessels(mut commands: Commands, config: Res<ConfigLoaded>) {
  for vessel in &config.level.vessels {
    let half = vessel.size / 2.0;
    commands.spawn((
      Vessel,
      Name::new("Vessel"),
      Sprite {
        color: Color::srgb(vessel.color[0], vessel.color[1], vessel.color[2]),
        custom_size: Some(Vec2::splat(vessel.size)),
        ..default()
      },
      Transform::from_xyz(vessel.x, vessel.y, 1.0),
      RigidBody::Dynamic,
      Collider::cuboid(half, half),
      LockedAxes::ROTATION_LOCKED,
      TerrainLayer::Foreground,
    ));
  }
}
