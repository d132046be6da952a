use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::commands::Cues;
use super::components::{Opacity, Player, PlayerTuning};
use crate::audio::SoundCue;
use crate::effects::SoulBurst;

/// An object the player can possess.
#[derive(Component)]
pub struct Vessel;

/// Body state to put back when possession ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PossessionSnapshot {
  pub collider_enabled: bool,
  pub body: RigidBody,
}

#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub enum Possession {
  #[default]
  Free,
  Possessing {
    vessel: Entity,
    restore: PossessionSnapshot,
  },
}

impl Possession {
  pub fn is_possessing(&self) -> bool {
    matches!(self, Possession::Possessing { .. })
  }

  pub fn vessel(&self) -> Option<Entity> {
    match self {
      Possession::Free => None,
      Possession::Possessing { vessel, .. } => Some(*vessel),
    }
  }
}

/// Leaves the vessel: restores the body, shows the player fully opaque and
/// pops it up by `lift` so it does not overlap the vessel. Full opacity also
/// restarts a ghost's fade.
#[allow(clippy::too_many_arguments)]
pub fn release(
  entity: &mut EntityCommands,
  possession: &mut Possession,
  body: &mut RigidBody,
  opacity: &mut Opacity,
  transform: &mut Transform,
  restore: PossessionSnapshot,
  lift: f32,
  cues: &mut Cues,
) {
  *possession = Possession::Free;
  cues.bursts.write(SoulBurst {
    at: transform.translation,
  });
  cues.sounds.write(SoundCue::Soul);
  transform.translation.y += lift;
  *body = restore.body;
  if restore.collider_enabled {
    entity.remove::<ColliderDisabled>();
  }
  opacity.set_alpha(1.0);
  info!("Left vessel");
}

/// Keeps a possessing player glued to its vessel. A vanished vessel ends the
/// possession where the player stands.
pub fn follow_possessed_vessel(
  mut commands: Commands,
  mut players: Query<
    (
      Entity,
      &PlayerTuning,
      &mut Possession,
      &mut RigidBody,
      &mut Opacity,
      &mut Transform,
    ),
    With<Player>,
  >,
  vessels: Query<&Transform, (With<Vessel>, Without<Player>)>,
  mut cues: Cues,
) {
  for (entity, tuning, mut possession, mut body, mut opacity, mut transform) in &mut players {
    let Possession::Possessing { vessel, restore } = *possession else {
      continue;
    };

    match vessels.get(vessel) {
      Ok(vessel_transform) => {
        transform.translation.x = vessel_transform.translation.x;
        transform.translation.y = vessel_transform.translation.y;
      }
      Err(_) => {
        warn!("Possessed vessel {:?} is gone, releasing player", vessel);
        release(
          &mut commands.entity(entity),
          &mut possession,
          &mut body,
          &mut opacity,
          &mut transform,
          restore,
          tuning.release_lift,
          &mut cues,
        );
      }
    }
  }
}
