//! Sensor zones that send a player command when the player walks in.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::{ConfigLoaded, TriggerAction};
use crate::player::PlayerCommand;
use crate::player::components::Player;

#[derive(Component, Debug)]
pub struct TriggerZone {
  pub action: TriggerAction,
  occupied: bool,
}

impl TriggerZone {
  pub fn new(action: TriggerAction) -> Self {
    Self {
      action,
      occupied: false,
    }
  }

  /// Records whether the player is inside and returns true on entry only.
  pub fn observe(&mut self, inside: bool) -> bool {
    let entered = inside && !self.occupied;
    self.occupied = inside;
    entered
  }
}

pub fn spawn_trigger_zones(mut commands: Commands, config: Res<ConfigLoaded>) {
  for trigger in &config.level.triggers {
    commands.spawn((
      TriggerZone::new(trigger.action),
      Name::new(format!("{:?} trigger", trigger.action)),
      Transform::from_xyz(trigger.x, trigger.y, 0.0),
      Collider::cuboid(trigger.width / 2.0, trigger.height / 2.0),
      Sensor,
    ));
  }
}

pub fn fire_trigger_zones(
  rapier: ReadRapierContext,
  mut zones: Query<(Entity, &mut TriggerZone)>,
  players: Query<Entity, With<Player>>,
  mut out: MessageWriter<PlayerCommand>,
) {
  let Ok(context) = rapier.single() else {
    return;
  };

  for (zone_entity, mut zone) in &mut zones {
    let inside = players
      .iter()
      .any(|player| context.intersection_pair(zone_entity, player) == Some(true));
    if zone.observe(inside) {
      debug!("Trigger {:?} entered", zone.action);
      out.write(zone.action.into());
    }
  }
}

#[cfg(test)]
mod tests {
  use bevy::ecs::message::MessageReader;

  use super::*;

  #[derive(Resource, Default)]
  struct Fired(Vec<PlayerCommand>);

  fn record(mut reader: MessageReader<PlayerCommand>, mut fired: ResMut<Fired>) {
    fired.0.extend(reader.read().copied());
  }

  fn settle(app: &mut App) {
    for _ in 0..10 {
      app.update();
    }
  }

  #[test]
  fn fires_once_per_entry() {
    let mut zone = TriggerZone::new(TriggerAction::Die);
    assert!(!zone.observe(false));
    assert!(zone.observe(true));
    assert!(!zone.observe(true));
    assert!(!zone.observe(false));
    assert!(zone.observe(true));
  }

  #[test]
  fn walking_into_a_zone_sends_its_command_once() {
    let mut app = App::new();
    app
      .add_plugins(MinimalPlugins)
      .add_plugins(bevy::transform::TransformPlugin)
      .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
      .add_message::<PlayerCommand>()
      .init_resource::<Fired>()
      .add_systems(Update, fire_trigger_zones)
      .add_systems(Last, record);

    app.world_mut().spawn((
      TriggerZone::new(TriggerAction::PlayReaperSound),
      Transform::from_xyz(100.0, 0.0, 0.0),
      Collider::cuboid(10.0, 10.0),
      Sensor,
    ));
    let player = app
      .world_mut()
      .spawn((
        Player,
        Transform::default(),
        RigidBody::Dynamic,
        GravityScale(0.0),
        Collider::ball(4.0),
      ))
      .id();

    settle(&mut app);
    assert!(app.world().resource::<Fired>().0.is_empty());

    app.world_mut().get_mut::<Transform>(player).unwrap().translation.x = 100.0;
    settle(&mut app);

    assert_eq!(
      app.world().resource::<Fired>().0,
      vec![PlayerCommand::PlayReaperSound]
    );
  }
}
