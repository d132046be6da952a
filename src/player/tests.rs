use std::time::Duration;

use bevy::ecs::message::{Message, MessageReader, Messages};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::*;

use super::PlayerLogicPlugin;
use super::animation::{AnimClip, AnimLayer, PlayerAnimator};
use super::commands::PlayerCommand;
use super::components::*;
use super::falling::FallingCue;
use super::landing::LandingWatch;
use super::possession::{Possession, Vessel};
use super::rebirth::RebirthTimeline;
use crate::audio::{SoundCue, VoiceClip, VoiceCue};
use crate::config::TimingsConfig;
use crate::effects::SoulBurst;
use crate::reaper::SummonReaper;
use crate::session::SessionNotice;

#[derive(Resource)]
struct Collected<M: Message>(Vec<M>);

impl<M: Message> Default for Collected<M> {
  fn default() -> Self {
    Self(Vec::new())
  }
}

fn collect<M: Message + Clone>(mut reader: MessageReader<M>, mut out: ResMut<Collected<M>>) {
  out.0.extend(reader.read().cloned());
}

fn collected<M: Message + Clone>(app: &App) -> Vec<M> {
  app.world().resource::<Collected<M>>().0.clone()
}

fn test_app() -> App {
  let mut app = App::new();

  app
    .add_plugins(MinimalPlugins)
    .add_plugins(PlayerLogicPlugin)
    .init_resource::<Collected<SoundCue>>()
    .init_resource::<Collected<VoiceCue>>()
    .init_resource::<Collected<SessionNotice>>()
    .init_resource::<Collected<SoulBurst>>()
    .init_resource::<Collected<SummonReaper>>()
    .add_systems(
      Last,
      (
        collect::<SoundCue>,
        collect::<VoiceCue>,
        collect::<SessionNotice>,
        collect::<SoulBurst>,
        collect::<SummonReaper>,
      ),
    );

  // Sequences below use frames far longer than the default clamp
  app
    .world_mut()
    .resource_mut::<Time<Virtual>>()
    .set_max_delta(Duration::from_secs(60));

  // First frame always has a zero delta
  step(&mut app, 0.0);
  app
}

fn step(app: &mut App, dt: f32) {
  app.insert_resource(TimeUpdateStrategy::ManualDuration(
    Duration::from_secs_f32(dt),
  ));
  app.update();
}

fn send(app: &mut App, command: PlayerCommand) {
  app
    .world_mut()
    .resource_mut::<Messages<PlayerCommand>>()
    .write(command);
}

fn tuning(fade_duration: f32) -> PlayerTuning {
  PlayerTuning {
    move_speed: 100.0,
    jump_speed: 300.0,
    fade_duration,
    release_lift: 16.0,
    possess_reach: 32.0,
  }
}

fn spawn_player(app: &mut App, ghost: bool, fade_duration: f32) -> Entity {
  let layer = if ghost {
    AnimLayer::Ghost
  } else {
    AnimLayer::Human
  };
  app
    .world_mut()
    .spawn((
      (
        Player,
        tuning(fade_duration),
        SequenceTimings(TimingsConfig::default()),
        Vitals { alive: true, ghost },
        Opacity::opaque(),
        Possession::default(),
        GroundContact(false),
        ControlIntent::default(),
        LandingWatch::default(),
        PlayerAnimator::new(layer),
        Facing::default(),
      ),
      (
        Velocity::zero(),
        RigidBody::Dynamic,
        Transform::default(),
      ),
    ))
    .id()
}

fn spawn_vessel(app: &mut App, at: Vec2) -> Entity {
  app
    .world_mut()
    .spawn((Vessel, Transform::from_xyz(at.x, at.y, 1.0)))
    .id()
}

fn get<C: Component + Clone>(app: &App, entity: Entity) -> C {
  app
    .world()
    .get::<C>(entity)
    .cloned()
    .expect("component should be present")
}

#[test]
fn ghost_fades_to_death_exactly_once() {
  let mut app = test_app();
  let player = spawn_player(&mut app, true, 2.0);

  step(&mut app, 1.0);
  assert!(get::<Vitals>(&app, player).alive);
  assert!((get::<Opacity>(&app, player).alpha() - 0.5).abs() < 1e-4);

  step(&mut app, 1.0);
  assert!(!get::<Vitals>(&app, player).alive);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 0.0);

  for _ in 0..5 {
    step(&mut app, 1.0);
  }

  let lose_screens = collected::<SessionNotice>(&app)
    .into_iter()
    .filter(|n| *n == SessionNotice::ShowLoseScreen)
    .count();
  assert_eq!(lose_screens, 1, "death must fire once per fade");
  let fades = collected::<SoundCue>(&app)
    .into_iter()
    .filter(|c| *c == SoundCue::Fade)
    .count();
  assert_eq!(fades, 1);
}

#[test]
fn human_never_fades() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);

  for _ in 0..5 {
    step(&mut app, 1.0);
  }

  assert!(get::<Vitals>(&app, player).alive);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 1.0);
}

#[test]
fn zero_fade_duration_dies_without_dividing() {
  let mut app = test_app();
  let player = spawn_player(&mut app, true, 0.0);

  step(&mut app, 0.016);

  let vitals = get::<Vitals>(&app, player);
  assert!(!vitals.alive);
  assert!(get::<Opacity>(&app, player).alpha().is_finite());
}

#[test]
fn jump_needs_ground_contact() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);

  app
    .world_mut()
    .get_mut::<ControlIntent>(player)
    .unwrap()
    .jump_pressed = true;
  step(&mut app, 0.02);

  assert_eq!(get::<Velocity>(&app, player).linvel.y, 0.0);
  assert!(!get::<LandingWatch>(&app, player).is_latched());
  assert!(collected::<SoundCue>(&app).is_empty());

  app.world_mut().get_mut::<GroundContact>(player).unwrap().0 = true;
  step(&mut app, 0.02);

  assert_eq!(get::<Velocity>(&app, player).linvel.y, 300.0);
  assert!(get::<LandingWatch>(&app, player).is_latched());
  assert_eq!(collected::<SoundCue>(&app), vec![SoundCue::Jump]);
}

#[test]
fn jump_latch_clears_only_after_landing() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);

  app.world_mut().get_mut::<GroundContact>(player).unwrap().0 = true;
  app
    .world_mut()
    .get_mut::<ControlIntent>(player)
    .unwrap()
    .jump_pressed = true;
  step(&mut app, 0.02);
  assert!(get::<LandingWatch>(&app, player).is_latched());

  app.world_mut().get_mut::<ControlIntent>(player).unwrap().clear();
  app.world_mut().get_mut::<GroundContact>(player).unwrap().0 = false;
  for _ in 0..20 {
    step(&mut app, 0.02);
    assert!(get::<LandingWatch>(&app, player).is_latched());
    assert_eq!(
      get::<PlayerAnimator>(&app, player).clip(),
      AnimClip::HumanJump
    );
  }

  app.world_mut().get_mut::<GroundContact>(player).unwrap().0 = true;
  step(&mut app, 0.02);
  assert!(!get::<LandingWatch>(&app, player).is_latched());
}

#[test]
fn run_sets_velocity_and_facing() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);
  app.world_mut().get_mut::<GroundContact>(player).unwrap().0 = true;

  app.world_mut().get_mut::<ControlIntent>(player).unwrap().axis = -1.0;
  step(&mut app, 0.02);

  assert_eq!(get::<Velocity>(&app, player).linvel.x, -100.0);
  assert_eq!(get::<Facing>(&app, player), Facing::Left);
  assert_eq!(
    get::<PlayerAnimator>(&app, player).clip(),
    AnimClip::HumanRun
  );

  app.world_mut().get_mut::<ControlIntent>(player).unwrap().axis = 0.0;
  step(&mut app, 0.02);
  assert_eq!(get::<Facing>(&app, player), Facing::Left);
}

#[test]
fn die_command_stops_the_player() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);
  app.world_mut().get_mut::<Velocity>(player).unwrap().linvel = Vec2::new(50.0, -20.0);

  send(&mut app, PlayerCommand::Die);
  step(&mut app, 0.02);

  assert!(!get::<Vitals>(&app, player).alive);
  assert_eq!(get::<Velocity>(&app, player).linvel, Vec2::ZERO);
  assert_eq!(
    collected::<SessionNotice>(&app),
    vec![SessionNotice::ShowLoseScreen]
  );

  // Dead players ignore movement input
  app.world_mut().get_mut::<ControlIntent>(player).unwrap().axis = 1.0;
  step(&mut app, 0.02);
  assert_eq!(get::<Velocity>(&app, player).linvel, Vec2::ZERO);
}

#[test]
fn restart_input_only_counts_when_dead() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);

  app
    .world_mut()
    .get_mut::<ControlIntent>(player)
    .unwrap()
    .restart_pressed = true;
  step(&mut app, 0.02);
  assert!(collected::<SessionNotice>(&app).is_empty());

  app.world_mut().get_mut::<Vitals>(player).unwrap().alive = false;
  step(&mut app, 0.02);
  assert!(collected::<SessionNotice>(&app).contains(&SessionNotice::ResetSession));
}

#[test]
fn possession_follows_vessel_and_release_restores_body() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);
  let vessel = spawn_vessel(&mut app, Vec2::new(50.0, 10.0));

  send(&mut app, PlayerCommand::Possess(vessel));
  step(&mut app, 0.02);

  assert_eq!(get::<Possession>(&app, player).vessel(), Some(vessel));
  assert_eq!(
    get::<RigidBody>(&app, player),
    RigidBody::KinematicPositionBased
  );
  assert!(app.world().get::<ColliderDisabled>(player).is_some());
  assert_eq!(get::<Opacity>(&app, player).alpha(), 0.0);
  assert_eq!(
    get::<Transform>(&app, player).translation.truncate(),
    Vec2::new(50.0, 10.0)
  );

  // Movement input is ignored while possessing
  app.world_mut().get_mut::<ControlIntent>(player).unwrap().axis = 1.0;
  app.world_mut().get_mut::<Transform>(vessel).unwrap().translation = Vec3::new(60.0, 20.0, 1.0);
  step(&mut app, 0.02);
  assert_eq!(
    get::<Transform>(&app, player).translation.truncate(),
    Vec2::new(60.0, 20.0)
  );
  assert_eq!(get::<Velocity>(&app, player).linvel, Vec2::ZERO);

  send(&mut app, PlayerCommand::Release);
  step(&mut app, 0.02);

  assert_eq!(get::<Possession>(&app, player), Possession::Free);
  assert_eq!(get::<RigidBody>(&app, player), RigidBody::Dynamic);
  assert!(app.world().get::<ColliderDisabled>(player).is_none());
  assert_eq!(get::<Opacity>(&app, player).alpha(), 1.0);
  assert_eq!(
    get::<Transform>(&app, player).translation.truncate(),
    Vec2::new(60.0, 36.0)
  );

  let souls = collected::<SoundCue>(&app)
    .into_iter()
    .filter(|c| *c == SoundCue::Soul)
    .count();
  assert_eq!(souls, 2);
  assert_eq!(collected::<SoulBurst>(&app).len(), 2);
}

#[test]
fn interact_possesses_only_vessels_in_reach() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 2.0);
  let _far = spawn_vessel(&mut app, Vec2::new(200.0, 0.0));

  app
    .world_mut()
    .get_mut::<ControlIntent>(player)
    .unwrap()
    .interact_pressed = true;
  step(&mut app, 0.02);
  assert_eq!(get::<Possession>(&app, player), Possession::Free);

  let near = spawn_vessel(&mut app, Vec2::new(20.0, 0.0));
  step(&mut app, 0.02);
  assert_eq!(get::<Possession>(&app, player).vessel(), Some(near));
}

#[test]
fn vanished_vessel_releases_player() {
  let mut app = test_app();
  let player = spawn_player(&mut app, true, 20.0);
  let vessel = spawn_vessel(&mut app, Vec2::new(10.0, 0.0));

  send(&mut app, PlayerCommand::Possess(vessel));
  step(&mut app, 0.02);
  app.world_mut().despawn(vessel);
  step(&mut app, 0.02);

  assert_eq!(get::<Possession>(&app, player), Possession::Free);
  assert!(app.world().get::<ColliderDisabled>(player).is_none());
  assert_eq!(get::<Opacity>(&app, player).alpha(), 1.0);
  assert_eq!(
    get::<Transform>(&app, player).translation.truncate(),
    Vec2::new(10.0, 16.0)
  );
}

#[test]
fn leaving_a_vessel_restarts_the_ghost_fade() {
  let mut app = test_app();
  let player = spawn_player(&mut app, true, 2.0);
  let vessel = spawn_vessel(&mut app, Vec2::new(10.0, 0.0));

  step(&mut app, 1.0);
  assert!((get::<Opacity>(&app, player).alpha() - 0.5).abs() < 1e-4);

  send(&mut app, PlayerCommand::Possess(vessel));
  step(&mut app, 0.0);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 0.0);

  send(&mut app, PlayerCommand::Release);
  step(&mut app, 0.0);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 1.0);
  assert!(get::<Vitals>(&app, player).alive);

  step(&mut app, 1.0);
  assert!(get::<Vitals>(&app, player).alive);
  assert!((get::<Opacity>(&app, player).alpha() - 0.5).abs() < 1e-4);
}

#[test]
fn possessing_through_rebirth_does_not_kill_on_release() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 10.0);

  send(&mut app, PlayerCommand::BecomeGhost);
  step(&mut app, 0.0);
  step(&mut app, 0.35);
  step(&mut app, 3.0);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 0.0);

  // Hop into a vessel while the soul is out of the body
  let vessel = spawn_vessel(&mut app, Vec2::new(10.0, 0.0));
  send(&mut app, PlayerCommand::Possess(vessel));
  step(&mut app, 0.0);
  assert!(get::<Possession>(&app, player).is_possessing());

  step(&mut app, 1.0);
  step(&mut app, 1.0);
  step(&mut app, 10.0);
  assert!(get::<Vitals>(&app, player).ghost);

  send(&mut app, PlayerCommand::Release);
  step(&mut app, 0.0);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 1.0);

  step(&mut app, 1.0);
  let vitals = get::<Vitals>(&app, player);
  assert!(vitals.alive);
  assert!((get::<Opacity>(&app, player).alpha() - 0.9).abs() < 1e-4);
  assert!(
    !collected::<SessionNotice>(&app).contains(&SessionNotice::ShowLoseScreen),
    "released ghost must not die on the next frame"
  );
}

#[test]
fn rebirth_runs_its_steps_in_order() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 10.0);

  send(&mut app, PlayerCommand::BecomeGhost);
  step(&mut app, 0.0);
  assert!(app.world().get::<RebirthTimeline>(player).is_some());
  assert!(get::<Vitals>(&app, player).alive);

  step(&mut app, 0.35);
  assert!(!get::<Vitals>(&app, player).alive);
  assert!(get::<PlayerAnimator>(&app, player).is_dying());
  assert!(collected::<SoulBurst>(&app).is_empty());

  step(&mut app, 3.0);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 0.0);
  assert_eq!(collected::<SoulBurst>(&app).len(), 1);
  assert!(collected::<SoundCue>(&app).contains(&SoundCue::Soul));
  assert!(collected::<SummonReaper>(&app).is_empty());

  step(&mut app, 1.0);
  let vitals = get::<Vitals>(&app, player);
  assert!(vitals.alive);
  assert!(!vitals.ghost);
  assert_eq!(get::<Opacity>(&app, player).alpha(), 1.0);
  assert_eq!(
    get::<PlayerAnimator>(&app, player).clip(),
    AnimClip::GhostIdle
  );
  assert_eq!(collected::<SummonReaper>(&app).len(), 1);
  assert!(!collected::<SessionNotice>(&app).contains(&SessionNotice::ShowWorldUi));

  step(&mut app, 1.0);
  assert!(collected::<SessionNotice>(&app).contains(&SessionNotice::ShowWorldUi));
  assert!(!get::<Vitals>(&app, player).ghost);

  step(&mut app, 10.0);
  assert!(get::<Vitals>(&app, player).ghost);
  assert!(collected::<VoiceCue>(&app).contains(&VoiceCue {
    clip: VoiceClip::DarkCaveMusic,
    looping: true,
  }));
  assert!(app.world().get::<RebirthTimeline>(player).is_none());
}

#[test]
fn second_become_ghost_is_ignored_while_reborn() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 10.0);

  send(&mut app, PlayerCommand::BecomeGhost);
  step(&mut app, 0.0);
  step(&mut app, 2.0);
  send(&mut app, PlayerCommand::BecomeGhost);
  step(&mut app, 0.0);

  assert_eq!(
    app
      .world()
      .get::<RebirthTimeline>(player)
      .and_then(RebirthTimeline::next_step),
    Some(super::rebirth::RebirthStep::Rise)
  );
}

#[test]
fn falling_cue_switches_to_death_clip() {
  let mut app = test_app();
  let player = spawn_player(&mut app, false, 10.0);

  send(&mut app, PlayerCommand::PlayFallingSound);
  step(&mut app, 0.0);
  assert_eq!(
    collected::<VoiceCue>(&app),
    vec![VoiceCue {
      clip: VoiceClip::Falling,
      looping: true,
    }]
  );
  assert!(app.world().get::<FallingCue>(player).is_some());

  step(&mut app, 3.0);
  assert_eq!(collected::<VoiceCue>(&app).len(), 1);

  step(&mut app, 0.6);
  assert_eq!(
    collected::<VoiceCue>(&app).last(),
    Some(&VoiceCue {
      clip: VoiceClip::Die,
      looping: false,
    })
  );
  assert!(app.world().get::<FallingCue>(player).is_none());
}

#[test]
fn one_shot_commands_emit_sounds() {
  let mut app = test_app();
  spawn_player(&mut app, false, 10.0);

  send(&mut app, PlayerCommand::PlayReaperSound);
  send(&mut app, PlayerCommand::PlayLevelCompleteSound);
  step(&mut app, 0.02);

  assert_eq!(collected::<SoundCue>(&app), vec![SoundCue::Reaper]);
  assert_eq!(
    collected::<VoiceCue>(&app),
    vec![VoiceCue {
      clip: VoiceClip::LevelComplete,
      looping: false,
    }]
  );
}

fn physics_app() -> App {
  let mut app = App::new();
  app
    .add_plugins(MinimalPlugins)
    .add_plugins(bevy::transform::TransformPlugin)
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .add_systems(Update, super::ground::sense_ground_contact);
  app
}

/// A weightless player whose feet sensor sits on the world origin.
fn spawn_standing_player(app: &mut App) -> Entity {
  app
    .world_mut()
    .spawn((
      Player,
      GroundContact(false),
      Transform::from_xyz(0.0, 10.0, 0.0),
      RigidBody::Dynamic,
      GravityScale(0.0),
      LockedAxes::ROTATION_LOCKED,
      children![(
        FeetSensor,
        Transform::from_xyz(0.0, -10.0, 0.0),
        Collider::cuboid(4.0, 1.0),
        Sensor,
      )],
    ))
    .id()
}

fn spawn_slab(app: &mut App, layer: Option<crate::world::TerrainLayer>) {
  let mut slab = app.world_mut().spawn((
    Transform::default(),
    RigidBody::Fixed,
    Collider::cuboid(50.0, 2.0),
  ));
  if let Some(layer) = layer {
    slab.insert(layer);
  }
}

fn settle(app: &mut App) {
  for _ in 0..10 {
    app.update();
  }
}

#[test]
fn feet_on_foreground_are_grounded() {
  let mut app = physics_app();
  spawn_slab(&mut app, Some(crate::world::TerrainLayer::Foreground));
  let player = spawn_standing_player(&mut app);

  settle(&mut app);

  assert!(get::<GroundContact>(&app, player).0);
}

#[test]
fn feet_on_bridge_are_grounded() {
  let mut app = physics_app();
  spawn_slab(&mut app, Some(crate::world::TerrainLayer::Bridge));
  let player = spawn_standing_player(&mut app);

  settle(&mut app);

  assert!(get::<GroundContact>(&app, player).0);
}

#[test]
fn untagged_collider_is_not_ground() {
  let mut app = physics_app();
  spawn_slab(&mut app, None);
  let player = spawn_standing_player(&mut app);

  settle(&mut app);

  assert!(!get::<GroundContact>(&app, player).0);
}

#[test]
fn ground_contact_drops_after_leaving_the_slab() {
  let mut app = physics_app();
  spawn_slab(&mut app, Some(crate::world::TerrainLayer::Foreground));
  let player = spawn_standing_player(&mut app);
  settle(&mut app);
  assert!(get::<GroundContact>(&app, player).0);

  app.world_mut().get_mut::<Transform>(player).unwrap().translation.y = 200.0;
  settle(&mut app);

  assert!(!get::<GroundContact>(&app, player).0);
}
