//! Developer console exposing the player's one-way commands.

pub mod commands;

use bevy::prelude::*;
use bevy_console::{AddConsoleCommand, ConsoleConfiguration, ConsoleOpen, ConsolePlugin};
use commands::{
  DieCommand, GhostCommand, LevelCommand, PossessCommand, ReleaseCommand, RestartCommand,
  SoundCommand, TeleportCommand, die_command, ghost_command, level_command, possess_command,
  release_command, restart_command, sound_command, teleport_command,
};

use crate::player::PlayerSystems;
use crate::player::components::{ControlIntent, Player};

pub struct ConsolePlugins;

impl Plugin for ConsolePlugins {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(ConsolePlugin)
      .insert_resource(ConsoleConfiguration {
        keys: vec![KeyCode::Backquote, KeyCode::F1],
        ..default()
      })
      .add_console_command::<DieCommand, _>(die_command)
      .add_console_command::<RestartCommand, _>(restart_command)
      .add_console_command::<PossessCommand, _>(possess_command)
      .add_console_command::<ReleaseCommand, _>(release_command)
      .add_console_command::<GhostCommand, _>(ghost_command)
      .add_console_command::<SoundCommand, _>(sound_command)
      .add_console_command::<TeleportCommand, _>(teleport_command)
      .add_console_command::<LevelCommand, _>(level_command)
      .add_systems(
        Update,
        mute_player_while_typing
          .after(PlayerSystems::Sense)
          .before(PlayerSystems::Command),
      );
  }
}

/// Keys typed into the console must not also move the player.
fn mute_player_while_typing(
  console_open: Res<ConsoleOpen>,
  mut players: Query<&mut ControlIntent, With<Player>>,
) {
  if !console_open.open {
    return;
  }
  for mut intent in &mut players {
    intent.mute();
  }
}
