use std::collections::HashMap;

use bevy::prelude::*;

use super::components::{Facing, Opacity, Player};
use crate::config::ConfigLoaded;

/// Horizontal or vertical speed below this counts as standing still.
pub const SPEED_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimLayer {
  #[default]
  Human,
  Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimClip {
  HumanIdle,
  HumanRun,
  HumanJump,
  HumanFall,
  HumanDie,
  GhostIdle,
  GhostRun,
  GhostJump,
  GhostFall,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MotionFlags {
  pub running: bool,
  pub jumping: bool,
  pub falling: bool,
}

impl MotionFlags {
  /// Derives animation flags from the body's velocity. `jump_latched` holds
  /// jumping on between a jump press and the landing poll clearing it.
  pub fn from_motion(velocity: Vec2, grounded: bool, jump_latched: bool) -> Self {
    Self {
      running: velocity.x.abs() > SPEED_EPSILON,
      jumping: jump_latched || (velocity.y > SPEED_EPSILON && !grounded),
      falling: velocity.y < -SPEED_EPSILON && !grounded,
    }
  }
}

/// Layered animation state. The human layer overrides the ghost layer while
/// active.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAnimator {
  pub layer: AnimLayer,
  pub motion: MotionFlags,
  dying: bool,
}

impl PlayerAnimator {
  pub fn new(layer: AnimLayer) -> Self {
    Self {
      layer,
      ..default()
    }
  }

  pub fn set_motion(&mut self, motion: MotionFlags) {
    self.motion = motion;
  }

  pub fn trigger_die(&mut self) {
    self.dying = true;
  }

  pub fn is_dying(&self) -> bool {
    self.dying
  }

  /// Drops the human layer and snaps to the ghost idle pose.
  pub fn play_ghost_idle(&mut self) {
    self.layer = AnimLayer::Ghost;
    self.motion = MotionFlags::default();
    self.dying = false;
  }

  pub fn clip(&self) -> AnimClip {
    if self.dying {
      return AnimClip::HumanDie;
    }
    let MotionFlags {
      running,
      jumping,
      falling,
    } = self.motion;
    match (self.layer, jumping, falling, running) {
      (AnimLayer::Human, true, _, _) => AnimClip::HumanJump,
      (AnimLayer::Human, _, true, _) => AnimClip::HumanFall,
      (AnimLayer::Human, _, _, true) => AnimClip::HumanRun,
      (AnimLayer::Human, ..) => AnimClip::HumanIdle,
      (AnimLayer::Ghost, true, _, _) => AnimClip::GhostJump,
      (AnimLayer::Ghost, _, true, _) => AnimClip::GhostFall,
      (AnimLayer::Ghost, _, _, true) => AnimClip::GhostRun,
      (AnimLayer::Ghost, ..) => AnimClip::GhostIdle,
    }
  }
}

/// Sprite image for each animation clip.
#[derive(Resource, Default)]
pub struct ClipSprites(pub HashMap<AnimClip, Handle<Image>>);

pub fn load_clip_sprites(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  asset_server: Res<AssetServer>,
) {
  let sprites = &config.player.sprites;
  let paths = [
    (AnimClip::HumanIdle, &sprites.human_idle),
    (AnimClip::HumanRun, &sprites.human_run),
    (AnimClip::HumanJump, &sprites.human_jump),
    (AnimClip::HumanFall, &sprites.human_fall),
    (AnimClip::HumanDie, &sprites.human_die),
    (AnimClip::GhostIdle, &sprites.ghost_idle),
    (AnimClip::GhostRun, &sprites.ghost_run),
    (AnimClip::GhostJump, &sprites.ghost_jump),
    (AnimClip::GhostFall, &sprites.ghost_fall),
  ];

  let handles = paths
    .into_iter()
    .map(|(clip, path)| (clip, asset_server.load(path.clone())))
    .collect();
  commands.insert_resource(ClipSprites(handles));
}

/// Writes animator, facing and opacity into the player's sprite.
pub fn present_player_sprite(
  mut players: Query<(&PlayerAnimator, &Facing, &Opacity, &mut Sprite), With<Player>>,
  sprites: Option<Res<ClipSprites>>,
) {
  for (animator, facing, opacity, mut sprite) in &mut players {
    let color = Color::WHITE.with_alpha(opacity.alpha());
    if sprite.color != color {
      sprite.color = color;
    }
    let flip = *facing == Facing::Left;
    if sprite.flip_x != flip {
      sprite.flip_x = flip;
    }

    let Some(sprites) = sprites.as_ref() else {
      continue;
    };
    if let Some(image) = sprites.0.get(&animator.clip()) {
      if sprite.image != *image {
        sprite.image = image.clone();
      }
    }
  }
}
