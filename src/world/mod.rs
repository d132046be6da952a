//! Level geometry, vessels and trigger zones built from the level config.

mod platforms;
pub mod triggers;

use bevy::prelude::*;
pub use triggers::TriggerZone;

use crate::config::LayerName;
use crate::player::PlayerSystems;

/// Collision layer of a terrain collider. Only colliders carrying a layer
/// count as ground for the player's feet.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainLayer {
  Foreground,
  Bridge,
}

impl From<LayerName> for TerrainLayer {
  fn from(name: LayerName) -> Self {
    match name {
      LayerName::Foreground => TerrainLayer::Foreground,
      LayerName::Bridge => TerrainLayer::Bridge,
    }
  }
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(
        Startup,
        (
          platforms::spawn_platforms,
          platforms::spawn_vessels,
          triggers::spawn_trigger_zones,
        ),
      )
      .add_systems(
        Update,
        triggers::fire_trigger_zones.in_set(PlayerSystems::Sense),
      );
  }
}
