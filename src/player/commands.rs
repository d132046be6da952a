//! One-way commands that triggers, input and the console send to the player.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{ControlIntent, Opacity, Player, PlayerTuning, SequenceTimings, Vitals};
use super::falling::FallingCue;
use super::possession::{Possession, PossessionSnapshot, Vessel};
use super::rebirth::RebirthTimeline;
use crate::audio::{SoundCue, VoiceClip, VoiceCue};
use crate::effects::SoulBurst;
use crate::reaper::SummonReaper;
use crate::session::SessionNotice;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
  Die,
  Restart,
  Possess(Entity),
  Release,
  BecomeGhost,
  PlayFallingSound,
  PlayReaperSound,
  PlayLevelCompleteSound,
}

/// Outgoing notifications shared by the player systems.
#[derive(SystemParam)]
pub struct Cues<'w> {
  pub sounds: MessageWriter<'w, SoundCue>,
  pub voice: MessageWriter<'w, VoiceCue>,
  pub session: MessageWriter<'w, SessionNotice>,
  pub bursts: MessageWriter<'w, SoulBurst>,
  pub reapers: MessageWriter<'w, SummonReaper>,
}

pub fn die(vitals: &mut Vitals, velocity: &mut Velocity, cues: &mut Cues) {
  vitals.alive = false;
  velocity.linvel = Vec2::ZERO;
  cues.sounds.write(SoundCue::Fade);
  cues.session.write(SessionNotice::ShowLoseScreen);
}

pub fn apply_player_commands(
  mut commands: Commands,
  mut reader: MessageReader<PlayerCommand>,
  mut players: Query<
    (
      Entity,
      &PlayerTuning,
      &SequenceTimings,
      &mut Vitals,
      &mut Possession,
      &mut Velocity,
      &mut RigidBody,
      &mut Opacity,
      &mut Transform,
      Has<ColliderDisabled>,
      Has<RebirthTimeline>,
    ),
    With<Player>,
  >,
  vessels: Query<&Transform, (With<Vessel>, Without<Player>)>,
  mut cues: Cues,
) {
  for command in reader.read() {
    let Ok((
      entity,
      tuning,
      timings,
      mut vitals,
      mut possession,
      mut velocity,
      mut body,
      mut opacity,
      mut transform,
      collider_disabled,
      reborn,
    )) = players.single_mut()
    else {
      warn!("Dropping {:?}: no single player to receive it", command);
      continue;
    };

    debug!("Player command: {:?}", command);
    match *command {
      PlayerCommand::Die => die(&mut vitals, &mut velocity, &mut cues),
      PlayerCommand::Restart => {
        cues.session.write(SessionNotice::ResetSession);
      }
      PlayerCommand::Possess(vessel) => {
        if possession.is_possessing() {
          debug!("Already possessing, ignoring possess of {:?}", vessel);
          continue;
        }
        let Ok(vessel_transform) = vessels.get(vessel) else {
          warn!("Cannot possess {:?}: not a vessel", vessel);
          continue;
        };
        let snapshot = PossessionSnapshot {
          collider_enabled: !collider_disabled,
          body: *body,
        };
        *possession = Possession::Possessing {
          vessel,
          restore: snapshot,
        };
        commands.entity(entity).insert(ColliderDisabled);
        *body = RigidBody::KinematicPositionBased;
        velocity.linvel = Vec2::ZERO;
        opacity.set_alpha(0.0);
        cues.bursts.write(SoulBurst {
          at: transform.translation,
        });
        cues.sounds.write(SoundCue::Soul);
        let target = vessel_transform.translation;
        transform.translation.x = target.x;
        transform.translation.y = target.y;
        info!("Possessing {:?}", vessel);
      }
      PlayerCommand::Release => {
        let Possession::Possessing { restore, .. } = *possession else {
          debug!("Not possessing anything, ignoring release");
          continue;
        };
        super::possession::release(
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
      PlayerCommand::BecomeGhost => {
        if reborn {
          debug!("Rebirth already underway");
          continue;
        }
        commands
          .entity(entity)
          .insert(RebirthTimeline::new(&timings.0));
        info!("Rebirth sequence started");
      }
      PlayerCommand::PlayFallingSound => {
        commands
          .entity(entity)
          .insert(FallingCue::new(timings.0.falling_cue_delay));
        cues.voice.write(VoiceCue {
          clip: VoiceClip::Falling,
          looping: true,
        });
      }
      PlayerCommand::PlayReaperSound => {
        cues.sounds.write(SoundCue::Reaper);
      }
      PlayerCommand::PlayLevelCompleteSound => {
        cues.voice.write(VoiceCue {
          clip: VoiceClip::LevelComplete,
          looping: false,
        });
      }
    }
  }
}

/// Interact possesses the nearest vessel in reach or releases the current
/// one. Restart is only honored once the player is dead.
pub fn commands_from_input(
  players: Query<
    (
      &ControlIntent,
      &Vitals,
      &Possession,
      &Transform,
      &PlayerTuning,
    ),
    With<Player>,
  >,
  vessels: Query<(Entity, &Transform), (With<Vessel>, Without<Player>)>,
  mut out: MessageWriter<PlayerCommand>,
) {
  for (intent, vitals, possession, transform, tuning) in &players {
    if intent.restart_pressed && !vitals.alive {
      out.write(PlayerCommand::Restart);
    }

    if !intent.interact_pressed {
      continue;
    }
    if possession.is_possessing() {
      out.write(PlayerCommand::Release);
      continue;
    }
    if !vitals.alive {
      continue;
    }

    let origin = transform.translation.truncate();
    let nearest = vessels
      .iter()
      .map(|(entity, vessel)| {
        (
          entity,
          vessel.translation.truncate().distance(origin),
        )
      })
      .filter(|&(_, distance)| distance <= tuning.possess_reach)
      .min_by(|a, b| a.1.total_cmp(&b.1));

    match nearest {
      Some((vessel, _)) => {
        out.write(PlayerCommand::Possess(vessel));
      }
      None => debug!("No vessel within {:.0} units", tuning.possess_reach),
    }
  }
}
