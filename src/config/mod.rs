mod plugin;

use std::path::Path;

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
pub use plugin::ConfigPlugin;
use serde::Deserialize;

use crate::player::commands::PlayerCommand;

pub const CONFIG_PATH: &str = "assets/config/game.config.toml";

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub timings: TimingsConfig,
  pub audio: AudioConfig,
  pub session: SessionConfig,
  pub reaper: ReaperConfig,
  pub level: LevelConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
  pub viewport_width: f32,
  pub viewport_height: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhysicsConfig {
  pub gravity: f32,
  pub pixels_per_meter: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
  pub spawn_x: f32,
  pub spawn_y: f32,
  pub collider_radius: f32,
  pub collider_length: f32,
  pub feet_width: f32,
  pub feet_height: f32,
  pub move_speed: f32,
  pub jump_speed: f32,
  pub fade_duration: f32,
  pub gravity_scale: f32,
  /// Upward offset applied when leaving a possessed vessel.
  pub release_lift: f32,
  pub possess_reach: f32,
  pub sprite_size: [f32; 2],
  pub sprites: PlayerSprites,
}

/// Image paths per animation clip, relative to `assets/`.
#[derive(Deserialize, Debug, Clone)]
pub struct PlayerSprites {
  pub human_idle: String,
  pub human_run: String,
  pub human_jump: String,
  pub human_fall: String,
  pub human_die: String,
  pub ghost_idle: String,
  pub ghost_run: String,
  pub ghost_jump: String,
  pub ghost_fall: String,
}

/// Every fixed delay used by the player's timed sequences, in seconds.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct TimingsConfig {
  pub landing_poll_interval: f32,
  pub landing_poll_timeout: f32,
  pub collapse_delay: f32,
  pub rise_delay: f32,
  pub reform_delay: f32,
  pub world_ui_delay: f32,
  pub haunt_delay: f32,
  pub falling_cue_delay: f32,
}

impl Default for TimingsConfig {
  fn default() -> Self {
    Self {
      landing_poll_interval: 0.01,
      landing_poll_timeout: 5.0,
      collapse_delay: 0.3,
      rise_delay: 3.0,
      reform_delay: 1.0,
      world_ui_delay: 1.0,
      haunt_delay: 10.0,
      falling_cue_delay: 3.5,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AudioConfig {
  pub one_shot_volume: f32,
  pub jump: String,
  pub fade: String,
  pub soul: String,
  pub falling: String,
  pub die: String,
  pub reaper: String,
  pub level_complete: String,
  pub dark_cave_music: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SessionConfig {
  pub start_level: u32,
  /// Levels where the player starts with the human animation layer.
  pub human_levels: Vec<u32>,
  /// Ghost-form levels where the fade never runs.
  pub fade_exempt_levels: Vec<u32>,
  pub lose_text: String,
  pub world_text: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReaperConfig {
  pub sprite: String,
  pub sprite_size: [f32; 2],
  pub follow_speed: f32,
  pub offset: [f32; 2],
}

#[derive(Deserialize, Debug, Clone)]
pub struct LevelConfig {
  pub platforms: Vec<PlatformConfig>,
  #[serde(default)]
  pub vessels: Vec<VesselConfig>,
  #[serde(default)]
  pub triggers: Vec<TriggerConfig>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayerName {
  Foreground,
  Bridge,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlatformConfig {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
  pub layer: LayerName,
  pub color: [f32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct VesselConfig {
  pub x: f32,
  pub y: f32,
  pub size: f32,
  pub color: [f32; 3],
}

/// Commands a trigger zone may issue when the player walks into it.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
  Die,
  BecomeGhost,
  PlayFallingSound,
  PlayReaperSound,
  LevelComplete,
}

impl From<TriggerAction> for PlayerCommand {
  fn from(action: TriggerAction) -> Self {
    match action {
      TriggerAction::Die => PlayerCommand::Die,
      TriggerAction::BecomeGhost => PlayerCommand::BecomeGhost,
      TriggerAction::PlayFallingSound => PlayerCommand::PlayFallingSound,
      TriggerAction::PlayReaperSound => PlayerCommand::PlayReaperSound,
      TriggerAction::LevelComplete => PlayerCommand::PlayLevelCompleteSound,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TriggerConfig {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
  pub action: TriggerAction,
}

/// Config loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
  Io(std::io::Error),
  Parse(toml::de::Error),
  Invalid { field: &'static str, reason: &'static str },
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io(e) => write!(f, "failed to read config: {}", e),
      Self::Parse(e) => write!(f, "failed to parse config: {}", e),
      Self::Invalid { field, reason } => write!(f, "invalid config value `{}`: {}", field, reason),
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      Self::Invalid { .. } => None,
    }
  }
}

impl From<std::io::Error> for ConfigError {
  fn from(e: std::io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(e: toml::de::Error) -> Self {
    Self::Parse(e)
  }
}

fn require_positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(ConfigError::Invalid {
      field,
      reason: "must be a positive number",
    })
  }
}

fn require_non_negative(value: f32, field: &'static str) -> Result<(), ConfigError> {
  if value.is_finite() && value >= 0.0 {
    Ok(())
  } else {
    Err(ConfigError::Invalid {
      field,
      reason: "must be zero or positive",
    })
  }
}

impl GameConfig {
  pub fn parse(source: &str) -> Result<Self, ConfigError> {
    let config: GameConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    Self::parse(&source)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    require_positive(self.physics.pixels_per_meter, "physics.pixels_per_meter")?;
    require_non_negative(self.player.move_speed, "player.move_speed")?;
    require_non_negative(self.player.jump_speed, "player.jump_speed")?;
    require_positive(self.player.fade_duration, "player.fade_duration")?;
    require_non_negative(self.player.release_lift, "player.release_lift")?;
    require_non_negative(self.player.possess_reach, "player.possess_reach")?;
    require_non_negative(self.audio.one_shot_volume, "audio.one_shot_volume")?;
    self.timings.validate()
  }
}

impl TimingsConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    require_positive(self.landing_poll_interval, "timings.landing_poll_interval")?;
    require_positive(self.landing_poll_timeout, "timings.landing_poll_timeout")?;
    if self.landing_poll_timeout < self.landing_poll_interval {
      return Err(ConfigError::Invalid {
        field: "timings.landing_poll_timeout",
        reason: "must not be shorter than the poll interval",
      });
    }
    require_non_negative(self.collapse_delay, "timings.collapse_delay")?;
    require_non_negative(self.rise_delay, "timings.rise_delay")?;
    require_non_negative(self.reform_delay, "timings.reform_delay")?;
    require_non_negative(self.world_ui_delay, "timings.world_ui_delay")?;
    require_non_negative(self.haunt_delay, "timings.haunt_delay")?;
    require_non_negative(self.falling_cue_delay, "timings.falling_cue_delay")
  }
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub timings: TimingsConfig,
  pub audio: AudioConfig,
  pub session: SessionConfig,
  pub reaper: ReaperConfig,
  pub level: LevelConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      camera: config.camera,
      physics: config.physics,
      player: config.player,
      timings: config.timings,
      audio: config.audio,
      session: config.session,
      reaper: config.reaper,
      level: config.level,
    }
  }
}
