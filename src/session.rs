//! Game session: current level, lose screen, world banner and resets.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::effects::SoulParticle;
use crate::player::RespawnPlayer;
use crate::player::components::Player;
use crate::reaper::Reaper;

/// Index of the level being played. Decides the player's starting form.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLevel(pub u32);

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
  ShowLoseScreen,
  ResetSession,
  ShowWorldUi,
}

#[derive(Component)]
pub struct LoseScreen;

#[derive(Component)]
pub struct WorldUi;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<SessionNotice>()
      .add_message::<RespawnPlayer>()
      .add_systems(Startup, spawn_session_ui)
      .add_systems(Update, handle_session_notices);
  }
}

fn spawn_session_ui(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.spawn((
    LoseScreen,
    Node {
      width: Val::Percent(100.0),
      height: Val::Percent(100.0),
      justify_content: JustifyContent::Center,
      align_items: AlignItems::Center,
      ..default()
    },
    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
    Visibility::Hidden,
    children![(
      Text::new(config.session.lose_text.clone()),
      TextFont {
        font_size: 40.0,
        ..default()
      },
      TextColor(Color::WHITE),
    )],
  ));

  commands.spawn((
    WorldUi,
    Node {
      position_type: PositionType::Absolute,
      top: Val::Px(16.0),
      left: Val::Px(16.0),
      ..default()
    },
    Visibility::Hidden,
    children![(
      Text::new(config.session.world_text.clone()),
      TextFont {
        font_size: 24.0,
        ..default()
      },
      TextColor(Color::srgb(0.8, 0.85, 1.0)),
    )],
  ));
}

pub fn handle_session_notices(
  mut commands: Commands,
  mut notices: MessageReader<SessionNotice>,
  mut lose_screens: Query<&mut Visibility, (With<LoseScreen>, Without<WorldUi>)>,
  mut world_uis: Query<&mut Visibility, (With<WorldUi>, Without<LoseScreen>)>,
  doomed: Query<Entity, Or<(With<Player>, With<Reaper>, With<SoulParticle>)>>,
  mut respawn: MessageWriter<RespawnPlayer>,
) {
  let mut reset = false;
  for notice in notices.read() {
    match notice {
      SessionNotice::ShowLoseScreen => {
        info!("Showing lose screen");
        for mut visibility in &mut lose_screens {
          *visibility = Visibility::Visible;
        }
      }
      SessionNotice::ShowWorldUi => {
        for mut visibility in &mut world_uis {
          *visibility = Visibility::Visible;
        }
      }
      SessionNotice::ResetSession => reset = true,
    }
  }

  if reset {
    info!("Resetting session");
    for entity in &doomed {
      commands.entity(entity).try_despawn();
    }
    for mut visibility in lose_screens.iter_mut().chain(world_uis.iter_mut()) {
      *visibility = Visibility::Hidden;
    }
    respawn.write(RespawnPlayer);
  }
}
