use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_rapier2d::prelude::*;

use super::animation::{MotionFlags, PlayerAnimator, SPEED_EPSILON};
use super::components::{
  ControlIntent, Facing, GroundContact, Opacity, Player, PlayerTuning, SequenceTimings, Vitals,
};
use super::commands::{Cues, die};
use super::landing::{LandingPoll, LandingWatch};
use super::possession::Possession;
use crate::audio::SoundCue;
use crate::input::{Interact, Jump, Move, PlayerInput, Restart};

fn button_held(state: &ActionState) -> bool {
  matches!(state, ActionState::Fired | ActionState::Ongoing)
}

/// Flattens the player's input actions into `ControlIntent`.
pub fn gather_control_intent(
  mut players: Query<(&Actions<PlayerInput>, &mut ControlIntent), With<Player>>,
  move_actions: Query<(&Action<Move>, &ActionState)>,
  jump_actions: Query<&ActionState, With<Action<Jump>>>,
  interact_actions: Query<&ActionState, With<Action<Interact>>>,
  restart_actions: Query<&ActionState, With<Action<Restart>>>,
) {
  for (actions, mut intent) in &mut players {
    let mut axis = 0.0;
    let mut jump = false;
    let mut interact = false;
    let mut restart = false;

    for action_entity in actions.iter() {
      if let Ok((action, state)) = move_actions.get(action_entity) {
        if button_held(state) {
          axis = **action;
        }
      }
      jump |= jump_actions.get(action_entity).is_ok_and(button_held);
      interact |= interact_actions.get(action_entity).is_ok_and(button_held);
      restart |= restart_actions.get(action_entity).is_ok_and(button_held);
    }

    intent.update(axis, jump, interact, restart);
  }
}

/// Run, jump and animation flags. Only a living, unpossessing player moves.
pub fn drive_movement(
  mut players: Query<
    (
      &ControlIntent,
      &PlayerTuning,
      &SequenceTimings,
      &Vitals,
      &Possession,
      &GroundContact,
      &mut Velocity,
      &mut LandingWatch,
      &mut PlayerAnimator,
      &mut Facing,
    ),
    With<Player>,
  >,
  mut sounds: MessageWriter<SoundCue>,
) {
  for (
    intent,
    tuning,
    timings,
    vitals,
    possession,
    ground,
    mut velocity,
    mut landing,
    mut animator,
    mut facing,
  ) in &mut players
  {
    if !vitals.alive || possession.is_possessing() {
      continue;
    }

    velocity.linvel.x = intent.axis * tuning.move_speed;

    if intent.jump_pressed && ground.0 {
      velocity.linvel.y += tuning.jump_speed;
      sounds.write(SoundCue::Jump);
      landing.start(LandingPoll::new(
        timings.0.landing_poll_interval,
        timings.0.landing_poll_timeout,
      ));
      debug!("Jump, vy={:.1}", velocity.linvel.y);
    }

    animator.set_motion(MotionFlags::from_motion(
      velocity.linvel,
      ground.0,
      landing.is_latched(),
    ));

    // Keep the last facing while standing still
    if velocity.linvel.x.abs() > SPEED_EPSILON {
      let next = Facing::from_sign(velocity.linvel.x);
      if *facing != next {
        *facing = next;
      }
    }
  }
}

/// Ghosts fade every frame while alive; the frame alpha runs out, they die.
pub fn fade_ghost(
  mut players: Query<
    (
      &PlayerTuning,
      &Possession,
      &mut Vitals,
      &mut Opacity,
      &mut Velocity,
    ),
    With<Player>,
  >,
  time: Res<Time>,
  mut cues: Cues,
) {
  for (tuning, possession, mut vitals, mut opacity, mut velocity) in &mut players {
    if !vitals.alive || !vitals.ghost || possession.is_possessing() {
      continue;
    }
    if opacity.fade(time.delta_secs(), tuning.fade_duration) {
      if tuning.fade_duration <= 0.0 {
        warn!(
          "Fade duration is {}, ghost expired immediately",
          tuning.fade_duration
        );
      }
      info!("Ghost faded away");
      die(&mut vitals, &mut velocity, &mut cues);
    }
  }
}

/// The dead stay put.
pub fn freeze_dead(mut players: Query<(&Vitals, &mut Velocity), With<Player>>) {
  for (vitals, mut velocity) in &mut players {
    if !vitals.alive && velocity.linvel != Vec2::ZERO {
      velocity.linvel = Vec2::ZERO;
    }
  }
}
