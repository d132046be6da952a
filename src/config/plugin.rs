#[cfg(not(target_family = "wasm"))]
use bevy::{asset::AssetEvent, ecs::message::MessageReader};
use bevy::{camera::ScalingMode, prelude::*, window::PrimaryWindow};
#[cfg(not(target_family = "wasm"))]
use bevy_common_assets::toml::TomlAssetPlugin;

#[cfg(not(target_family = "wasm"))]
use super::ConfigHandle;
use super::{ConfigLoaded, GameConfig};
use crate::core::{GameCamera, GravityConfig};
use crate::player::components::{Player, PlayerTuning, SequenceTimings};

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
  fn build(&self, app: &mut App) {
    // Native: asset-based config with hot-reload
    #[cfg(not(target_family = "wasm"))]
    app
      .add_plugins(TomlAssetPlugin::<GameConfig>::new(&["config.toml"]))
      .add_systems(Update, watch_config_changes);

    app.add_systems(PreStartup, load_config_sync).add_systems(
      Update,
      (
        update_window_on_config_change,
        update_gravity_on_config_change,
        update_camera_on_config_change,
        update_player_on_config_change,
      ),
    );
  }
}

fn load_config_sync(
  mut commands: Commands,
  existing: Option<Res<ConfigLoaded>>,
  #[cfg(not(target_family = "wasm"))] asset_server: Res<AssetServer>,
) {
  // Native: set up asset handle for hot-reload
  #[cfg(not(target_family = "wasm"))]
  {
    let handle: Handle<GameConfig> = asset_server.load("config/game.config.toml");
    commands.insert_resource(ConfigHandle(handle));
  }

  // The binary inserts the config it already validated
  if existing.is_some() {
    return;
  }

  // WASM: embed config at compile time
  #[cfg(target_family = "wasm")]
  let config = GameConfig::parse(include_str!("../../assets/config/game.config.toml"));
  #[cfg(not(target_family = "wasm"))]
  let config = GameConfig::read(super::CONFIG_PATH);

  match config {
    Ok(config) => commands.insert_resource(ConfigLoaded::from(config)),
    Err(e) => panic!("Cannot start without a valid game config: {e}"),
  }
}

#[cfg(not(target_family = "wasm"))]
fn watch_config_changes(
  mut commands: Commands,
  config_handle: Res<ConfigHandle>,
  mut messages: MessageReader<AssetEvent<GameConfig>>,
  configs: Res<Assets<GameConfig>>,
) {
  for event in messages.read() {
    if let AssetEvent::Modified { id } = event {
      if config_handle.0.id() == *id {
        if let Some(config) = configs.get(&config_handle.0) {
          // Keep the previous config when the edited one is invalid
          match config.validate() {
            Ok(()) => {
              info!("Config reloaded!");
              commands.insert_resource(ConfigLoaded::from(config.clone()));
            }
            Err(e) => warn!("Ignoring config reload: {e}"),
          }
        }
      }
    }
  }
}

fn update_window_on_config_change(
  config: Res<ConfigLoaded>,
  mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
  if config.is_changed() {
    if let Ok(mut window) = windows.single_mut() {
      window
        .resolution
        .set(config.window.width as f32, config.window.height as f32);
      window.title.clone_from(&config.window.title);
    }
  }
}

fn update_gravity_on_config_change(config: Res<ConfigLoaded>, mut gravity: ResMut<GravityConfig>) {
  if config.is_changed() {
    gravity.value = config.physics.gravity;
  }
}

fn update_camera_on_config_change(
  config: Res<ConfigLoaded>,
  mut camera_query: Query<&mut Projection, With<GameCamera>>,
) {
  if config.is_changed() {
    for mut projection in camera_query.iter_mut() {
      if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scaling_mode = ScalingMode::AutoMin {
          min_width: config.camera.viewport_width,
          min_height: config.camera.viewport_height,
        };
      }
    }
  }
}

fn update_player_on_config_change(
  config: Res<ConfigLoaded>,
  mut players: Query<(&mut PlayerTuning, &mut SequenceTimings), With<Player>>,
) {
  if config.is_changed() {
    for (mut tuning, mut timings) in &mut players {
      *tuning = PlayerTuning::from(&config.player);
      timings.0 = config.timings;
    }
  }
}
