use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{FeetSensor, GroundContact, Player};
use crate::world::TerrainLayer;

/// Point-in-time ground query: does any feet sensor overlap a collider on a
/// terrain layer right now.
pub fn sense_ground_contact(
  rapier: ReadRapierContext,
  feet: Query<(Entity, &ChildOf), With<FeetSensor>>,
  terrain: Query<&TerrainLayer>,
  mut players: Query<&mut GroundContact, With<Player>>,
) {
  let Ok(context) = rapier.single() else {
    return;
  };

  for (sensor, child_of) in &feet {
    let grounded = context
      .intersection_pairs_with(sensor)
      .any(|(a, b, intersecting)| {
        let other = if a == sensor { b } else { a };
        intersecting && terrain.contains(other)
      });

    if let Ok(mut contact) = players.get_mut(child_of.parent()) {
      if contact.0 != grounded {
        trace!("Ground contact: {}", grounded);
        contact.0 = grounded;
      }
    }
  }
}
