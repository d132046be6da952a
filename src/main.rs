use bevy::{
  prelude::*,
  window::{PresentMode, WindowResolution},
};
use revenant::{
  audio::AudioCuePlugin,
  config::{self, GameConfig},
  console::ConsolePlugins,
  core::CorePlugin,
  effects::EffectsPlugin,
  input::InputPlugin,
  player::PlayerPlugin,
  reaper::ReaperPlugin,
  session::{CurrentLevel, SessionPlugin},
  world::WorldPlugin,
};

fn main() {
  // WASM: set up panic hook for better error messages
  #[cfg(target_family = "wasm")]
  console_error_panic_hook::set_once();

  // WASM: embed config at compile time (no filesystem access)
  #[cfg(target_family = "wasm")]
  let config = GameConfig::parse(include_str!("../assets/config/game.config.toml"));
  #[cfg(not(target_family = "wasm"))]
  let config = GameConfig::read(config::CONFIG_PATH);

  let config = match config {
    Ok(config) => config,
    Err(e) => {
      eprintln!("{e}");
      std::process::exit(1);
    }
  };

  let mut app = App::new();

  app
    .add_plugins(
      DefaultPlugins
        .set(ImagePlugin::default_nearest())
        .set(WindowPlugin {
          primary_window: Some(Window {
            resolution: WindowResolution::new(config.window.width, config.window.height),
            title: config.window.title.clone(),
            present_mode: PresentMode::AutoVsync,
            #[cfg(target_family = "wasm")]
            canvas: Some("#bevy".to_string()),
            #[cfg(target_family = "wasm")]
            fit_canvas_to_parent: true,
            ..default()
          }),
          ..default()
        })
        .disable::<bevy::pbr::PbrPlugin>(),
    )
    .insert_resource(CurrentLevel(config.session.start_level))
    .insert_resource(config::ConfigLoaded::from(config.clone()))
    .add_plugins(config::ConfigPlugin)
    .add_plugins(CorePlugin {
      pixels_per_meter: config.physics.pixels_per_meter,
    })
    .add_plugins(InputPlugin)
    .add_plugins(PlayerPlugin)
    .add_plugins((AudioCuePlugin, EffectsPlugin, ReaperPlugin, SessionPlugin))
    .add_plugins(WorldPlugin)
    .add_plugins(ConsolePlugins);

  #[cfg(feature = "visual_debug")]
  app.add_plugins(revenant::visual_debug::VisualDebugPlugin);

  app.run();
}
