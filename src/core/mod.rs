pub(crate) mod camera;
mod physics;

use bevy::prelude::*;
pub use camera::{CameraSmoothness, GameCamera};
pub use physics::GravityConfig;

pub struct CorePlugin {
  pub pixels_per_meter: f32,
}

impl Plugin for CorePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(physics::PhysicsPlugin {
        pixels_per_meter: self.pixels_per_meter,
      })
      .init_resource::<CameraSmoothness>()
      .add_systems(Startup, camera::setup_camera)
      .add_systems(PostUpdate, camera::camera_follow);
  }
}
