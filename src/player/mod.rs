pub mod animation;
pub mod commands;
pub mod components;
pub mod falling;
mod ground;
pub mod landing;
pub mod movement;
pub mod possession;
pub mod rebirth;
pub mod spawn;
pub mod timeline;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
pub use commands::PlayerCommand;
pub use spawn::RespawnPlayer;

use crate::audio::{SoundCue, VoiceCue};
use crate::effects::SoulBurst;
use crate::reaper::SummonReaper;
use crate::session::SessionNotice;

/// Frame phases of the player controller, run in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSystems {
  /// Read input and query the physics world.
  Sense,
  Command,
  Motion,
  /// Timed sequences.
  Script,
  Present,
}

/// The controller's state machines, free of input devices, physics queries
/// and assets. Collaborators talk to it only through messages.
pub struct PlayerLogicPlugin;

impl Plugin for PlayerLogicPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<PlayerCommand>()
      .add_message::<RespawnPlayer>()
      .add_message::<SoundCue>()
      .add_message::<VoiceCue>()
      .add_message::<SessionNotice>()
      .add_message::<SoulBurst>()
      .add_message::<SummonReaper>()
      .configure_sets(
        Update,
        (
          PlayerSystems::Sense,
          PlayerSystems::Command,
          PlayerSystems::Motion,
          PlayerSystems::Script,
          PlayerSystems::Present,
        )
          .chain(),
      )
      .add_systems(
        Update,
        (commands::commands_from_input, commands::apply_player_commands)
          .chain()
          .in_set(PlayerSystems::Command),
      )
      .add_systems(
        Update,
        (
          landing::poll_landing,
          movement::drive_movement,
          movement::fade_ghost,
          possession::follow_possessed_vessel,
          movement::freeze_dead,
        )
          .chain()
          .in_set(PlayerSystems::Motion),
      )
      .add_systems(
        Update,
        (rebirth::advance_rebirth, falling::advance_falling_cue).in_set(PlayerSystems::Script),
      );
  }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(PlayerLogicPlugin)
      .add_systems(
        Startup,
        (spawn::spawn_player, animation::load_clip_sprites),
      )
      .add_systems(
        Update,
        (movement::gather_control_intent, ground::sense_ground_contact)
          .in_set(PlayerSystems::Sense),
      )
      .add_systems(
        Update,
        animation::present_player_sprite.in_set(PlayerSystems::Present),
      )
      .add_systems(
        Update,
        spawn::respawn_player_on_request.after(PlayerSystems::Present),
      );
  }
}
