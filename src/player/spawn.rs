use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::animation::{AnimLayer, PlayerAnimator};
use super::components::{
  ControlIntent, Facing, FeetSensor, GroundContact, Opacity, Player, PlayerTuning, SequenceTimings,
  Vitals,
};
use super::landing::LandingWatch;
use super::possession::Possession;
use crate::config::{ConfigLoaded, SessionConfig};
use crate::input::{PlayerInput, player_input_actions};
use crate::session::CurrentLevel;

/// Asks for a fresh player at the level's spawn point.
#[derive(Message, Debug, Clone, Copy)]
pub struct RespawnPlayer;

/// Which animation layer a level starts on, and whether the ghost fade runs.
pub fn starting_form(level: u32, session: &SessionConfig) -> (AnimLayer, bool) {
  let human = session.human_levels.contains(&level);
  let layer = if human {
    AnimLayer::Human
  } else {
    AnimLayer::Ghost
  };
  let fading = !human && !session.fade_exempt_levels.contains(&level);
  (layer, fading)
}

fn resolve_level(level: Option<Res<CurrentLevel>>, config: &ConfigLoaded) -> u32 {
  match level {
    Some(level) => level.0,
    None => {
      warn!(
        "No current level set, assuming start level {}",
        config.session.start_level
      );
      config.session.start_level
    }
  }
}

pub fn spawn_player(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  level: Option<Res<CurrentLevel>>,
) {
  let level = resolve_level(level, &config);
  spawn_player_entity(&mut commands, &config, level);
}

pub fn respawn_player_on_request(
  mut commands: Commands,
  mut requests: MessageReader<RespawnPlayer>,
  config: Res<ConfigLoaded>,
  level: Option<Res<CurrentLevel>>,
) {
  // Several requests in one frame still make one player
  if requests.read().count() == 0 {
    return;
  }
  let level = resolve_level(level, &config);
  spawn_player_entity(&mut commands, &config, level);
}

fn spawn_player_entity(commands: &mut Commands, config: &ConfigLoaded, level: u32) -> Entity {
  let player = &config.player;
  let spawn_pos = Vec3::new(player.spawn_x, player.spawn_y, 10.0);
  let (layer, ghost) = starting_form(level, &config.session);

  // Rapier capsule_y uses half_height (cylinder part) and radius
  let half_height = player.collider_length / 2.0;
  let feet_offset = half_height + player.collider_radius;

  info!(
    "Spawning player at {:?} for level {} ({:?}, fading: {})",
    spawn_pos, level, layer, ghost
  );

  commands
    .spawn((
      (
        Player,
        Name::new("Player"),
        Transform::from_translation(spawn_pos),
        Visibility::default(),
        Sprite {
          custom_size: Some(Vec2::from(player.sprite_size)),
          ..default()
        },
      ),
      (
        RigidBody::Dynamic,
        Collider::capsule_y(half_height, player.collider_radius),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
        GravityScale(player.gravity_scale),
        Friction::coefficient(0.0),
      ),
      (
        ControlIntent::default(),
        GroundContact::default(),
        PlayerTuning::from(player),
        SequenceTimings(config.timings),
        Vitals { alive: true, ghost },
        Possession::default(),
        Opacity::opaque(),
        Facing::default(),
        PlayerAnimator::new(layer),
        LandingWatch::default(),
      ),
      PlayerInput,
      player_input_actions(),
      children![(
        FeetSensor,
        Name::new("Feet"),
        Transform::from_xyz(0.0, -feet_offset, 0.0),
        Collider::cuboid(player.feet_width / 2.0, player.feet_height / 2.0),
        Sensor,
      )],
    ))
    .id()
}
