//! The reaper that shadows the reborn ghost.

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::player::components::{Facing, Player};

#[derive(Message, Debug, Clone, Copy)]
pub struct SummonReaper {
  pub near: Vec3,
}

#[derive(Component)]
pub struct Reaper;

pub struct ReaperPlugin;

impl Plugin for ReaperPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<SummonReaper>()
      .add_systems(Update, (summon_reaper, follow_player).chain());
  }
}

fn summon_reaper(
  mut commands: Commands,
  mut summons: MessageReader<SummonReaper>,
  config: Res<ConfigLoaded>,
  asset_server: Res<AssetServer>,
) {
  for summon in summons.read() {
    let reaper = &config.reaper;
    let offset = Vec2::from(reaper.offset);
    info!("Reaper summoned near {:?}", summon.near);
    commands.spawn((
      Reaper,
      Name::new("Reaper"),
      Sprite {
        image: asset_server.load(reaper.sprite.clone()),
        custom_size: Some(Vec2::from(reaper.sprite_size)),
        ..default()
      },
      Transform::from_translation(summon.near + offset.extend(5.0)),
    ));
  }
}

/// Drifts each reaper toward a spot behind the player's back.
fn follow_player(
  players: Query<(&Transform, &Facing), (With<Player>, Without<Reaper>)>,
  mut reapers: Query<(&mut Transform, &mut Sprite), With<Reaper>>,
  config: Res<ConfigLoaded>,
  time: Res<Time>,
) {
  let Ok((player, facing)) = players.single() else {
    return;
  };
  let offset = Vec2::from(config.reaper.offset);
  let target = player.translation.truncate() + Vec2::new(-facing.sign() * offset.x, offset.y);
  let t = (config.reaper.follow_speed * time.delta_secs()).min(1.0);

  for (mut transform, mut sprite) in &mut reapers {
    let next = transform.translation.truncate().lerp(target, t);
    transform.translation.x = next.x;
    transform.translation.y = next.y;
    sprite.flip_x = *facing == Facing::Left;
  }
}
