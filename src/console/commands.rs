//! Console commands.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_console::{ConsoleCommand, reply};
use bevy_rapier2d::prelude::Velocity;
use clap::{Parser, ValueEnum};

use crate::player::PlayerCommand;
use crate::player::components::Player;
use crate::player::possession::{Possession, Vessel};
use crate::session::CurrentLevel;

#[derive(Parser, ConsoleCommand)]
#[command(name = "die")]
pub struct DieCommand;

pub fn die_command(mut log: ConsoleCommand<DieCommand>, mut out: MessageWriter<PlayerCommand>) {
  if let Some(Ok(DieCommand)) = log.take() {
    out.write(PlayerCommand::Die);
    reply!(log, "Player killed");
  }
}

#[derive(Parser, ConsoleCommand)]
#[command(name = "restart")]
pub struct RestartCommand;

pub fn restart_command(
  mut log: ConsoleCommand<RestartCommand>,
  mut out: MessageWriter<PlayerCommand>,
) {
  if let Some(Ok(RestartCommand)) = log.take() {
    out.write(PlayerCommand::Restart);
    reply!(log, "Session reset");
  }
}

/// Possess the nearest vessel, ignoring reach.
#[derive(Parser, ConsoleCommand)]
#[command(name = "possess")]
pub struct PossessCommand;

pub fn possess_command(
  mut log: ConsoleCommand<PossessCommand>,
  players: Query<&Transform, With<Player>>,
  vessels: Query<(Entity, &Transform), (With<Vessel>, Without<Player>)>,
  mut out: MessageWriter<PlayerCommand>,
) {
  if let Some(Ok(PossessCommand)) = log.take() {
    let Ok(player) = players.single() else {
      reply!(log, "No player found");
      return;
    };
    let origin = player.translation.truncate();
    let nearest = vessels.iter().min_by(|(_, a), (_, b)| {
      let da = a.translation.truncate().distance_squared(origin);
      let db = b.translation.truncate().distance_squared(origin);
      da.total_cmp(&db)
    });
    match nearest {
      Some((vessel, _)) => {
        out.write(PlayerCommand::Possess(vessel));
        reply!(log, "Possessing {:?}", vessel);
      }
      None => reply!(log, "No vessels in this level"),
    }
  }
}

#[derive(Parser, ConsoleCommand)]
#[command(name = "release")]
pub struct ReleaseCommand;

pub fn release_command(
  mut log: ConsoleCommand<ReleaseCommand>,
  mut out: MessageWriter<PlayerCommand>,
) {
  if let Some(Ok(ReleaseCommand)) = log.take() {
    out.write(PlayerCommand::Release);
    reply!(log, "Releasing vessel");
  }
}

/// Start the rebirth sequence.
#[derive(Parser, ConsoleCommand)]
#[command(name = "ghost")]
pub struct GhostCommand;

pub fn ghost_command(mut log: ConsoleCommand<GhostCommand>, mut out: MessageWriter<PlayerCommand>) {
  if let Some(Ok(GhostCommand)) = log.take() {
    out.write(PlayerCommand::BecomeGhost);
    reply!(log, "Rebirth started");
  }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SoundKind {
  Falling,
  Reaper,
  Complete,
}

#[derive(Parser, ConsoleCommand)]
#[command(name = "sound")]
pub struct SoundCommand {
  /// Which cue to play
  kind: SoundKind,
}

pub fn sound_command(mut log: ConsoleCommand<SoundCommand>, mut out: MessageWriter<PlayerCommand>) {
  if let Some(Ok(SoundCommand { kind })) = log.take() {
    out.write(match kind {
      SoundKind::Falling => PlayerCommand::PlayFallingSound,
      SoundKind::Reaper => PlayerCommand::PlayReaperSound,
      SoundKind::Complete => PlayerCommand::PlayLevelCompleteSound,
    });
    reply!(log, "Playing {:?}", kind);
  }
}

#[derive(Parser, ConsoleCommand)]
#[command(name = "tp")]
pub struct TeleportCommand {
  /// X coordinate
  x: f32,
  /// Y coordinate
  y: f32,
}

pub fn teleport_command(
  mut log: ConsoleCommand<TeleportCommand>,
  mut players: Query<(&mut Transform, &mut Velocity, &Possession), With<Player>>,
) {
  if let Some(Ok(TeleportCommand { x, y })) = log.take() {
    let Ok((mut transform, mut velocity, possession)) = players.single_mut() else {
      reply!(log, "No player found");
      return;
    };
    // A possessing player is pinned to its vessel
    if possession.is_possessing() {
      reply!(log, "Release the vessel first");
      return;
    }
    transform.translation.x = x;
    transform.translation.y = y;
    velocity.linvel = Vec2::ZERO;
    reply!(log, "Teleported to ({}, {})", x, y);
  }
}

/// Switch level and restart; the level decides human or ghost form.
#[derive(Parser, ConsoleCommand)]
#[command(name = "level")]
pub struct LevelCommand {
  /// Level index
  index: u32,
}

pub fn level_command(
  mut log: ConsoleCommand<LevelCommand>,
  mut level: ResMut<CurrentLevel>,
  mut out: MessageWriter<PlayerCommand>,
) {
  if let Some(Ok(LevelCommand { index })) = log.take() {
    level.0 = index;
    out.write(PlayerCommand::Restart);
    reply!(log, "Switched to level {}", index);
  }
}
