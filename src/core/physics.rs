use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::ConfigLoaded;

/// Downward acceleration in world units per second squared.
#[derive(Resource)]
pub struct GravityConfig {
  pub value: f32,
}

pub struct PhysicsPlugin {
  pub pixels_per_meter: f32,
}

impl Plugin for PhysicsPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(
        RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(self.pixels_per_meter),
      )
      .add_systems(Startup, setup_gravity)
      .add_systems(Update, sync_rapier_gravity);
  }
}

fn setup_gravity(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.insert_resource(GravityConfig {
    value: config.physics.gravity,
  });
}

/// Pushes the configured gravity into every Rapier context.
fn sync_rapier_gravity(
  gravity: Option<Res<GravityConfig>>,
  mut contexts: Query<&mut RapierConfiguration>,
) {
  let Some(gravity) = gravity else {
    return;
  };
  if !gravity.is_changed() {
    return;
  }
  for mut rapier in &mut contexts {
    rapier.gravity = Vec2::new(0.0, -gravity.value);
  }
}
