use bevy::prelude::*;

use crate::config::{PlayerConfig, TimingsConfig};

#[derive(Component)]
pub struct Player;

/// Marker for the sensor collider under the player's feet.
#[derive(Component)]
pub struct FeetSensor;

/// Whether the feet sensor touched walkable terrain this frame.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContact(pub bool);

/// Device input for one frame, flattened out of the input actions.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct ControlIntent {
  pub axis: f32,
  pub jump_pressed: bool,
  pub interact_pressed: bool,
  pub restart_pressed: bool,
  jump_held: bool,
  interact_held: bool,
  restart_held: bool,
}

impl ControlIntent {
  /// Records which buttons are held this frame and derives press edges.
  pub fn update(&mut self, axis: f32, jump: bool, interact: bool, restart: bool) {
    self.axis = axis.clamp(-1.0, 1.0);
    self.jump_pressed = jump && !self.jump_held;
    self.interact_pressed = interact && !self.interact_held;
    self.restart_pressed = restart && !self.restart_held;
    self.jump_held = jump;
    self.interact_held = interact;
    self.restart_held = restart;
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// Drops this frame's axis and press edges but remembers which buttons are
  /// held, so a key still down afterwards does not count as a new press.
  pub fn mute(&mut self) {
    self.axis = 0.0;
    self.jump_pressed = false;
    self.interact_pressed = false;
    self.restart_pressed = false;
  }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
  pub move_speed: f32,
  pub jump_speed: f32,
  pub fade_duration: f32,
  pub release_lift: f32,
  pub possess_reach: f32,
}

impl From<&PlayerConfig> for PlayerTuning {
  fn from(config: &PlayerConfig) -> Self {
    Self {
      move_speed: config.move_speed,
      jump_speed: config.jump_speed,
      fade_duration: config.fade_duration,
      release_lift: config.release_lift,
      possess_reach: config.possess_reach,
    }
  }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct SequenceTimings(pub TimingsConfig);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
  pub alive: bool,
  /// Ghosts fade out over time while alive.
  pub ghost: bool,
}

impl Default for Vitals {
  fn default() -> Self {
    Self {
      alive: true,
      ghost: false,
    }
  }
}

#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
  Left,
  #[default]
  Right,
}

impl Facing {
  pub fn from_sign(x: f32) -> Self {
    if x < 0.0 { Facing::Left } else { Facing::Right }
  }

  pub fn sign(self) -> f32 {
    match self {
      Facing::Left => -1.0,
      Facing::Right => 1.0,
    }
  }
}

/// Sprite opacity, doubling as the ghost's remaining lifetime.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Opacity {
  alpha: f32,
  spent: bool,
}

impl Default for Opacity {
  fn default() -> Self {
    Self::opaque()
  }
}

impl Opacity {
  pub fn opaque() -> Self {
    Self {
      alpha: 1.0,
      spent: false,
    }
  }

  pub fn alpha(&self) -> f32 {
    self.alpha
  }

  /// Sets alpha directly. Raising it above zero re-arms the fade.
  pub fn set_alpha(&mut self, alpha: f32) {
    self.alpha = alpha.clamp(0.0, 1.0);
    if self.alpha > 0.0 {
      self.spent = false;
    }
  }

  /// Fades by `dt / duration`. Returns true only on the step where alpha
  /// first reaches zero; later calls return false until re-armed.
  ///
  /// A non-positive duration fades out immediately instead of dividing.
  pub fn fade(&mut self, dt: f32, duration: f32) -> bool {
    if self.spent {
      return false;
    }
    if duration > 0.0 {
      self.alpha = (self.alpha - dt.max(0.0) / duration).max(0.0);
    } else {
      self.alpha = 0.0;
    }
    if self.alpha <= 0.0 {
      self.spent = true;
      return true;
    }
    false
  }

  pub fn is_spent(&self) -> bool {
    self.spent
  }
}
