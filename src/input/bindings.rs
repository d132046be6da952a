use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::actions::{Interact, Jump, Move, PlayerInput, Restart};

pub fn player_input_actions() -> impl Bundle {
  actions!(PlayerInput[
      (
          Action::<Move>::new(),
          Bindings::spawn((
              Bidirectional::ad_keys(),
              Bidirectional::left_right_arrow(),
          )),
      ),
      (
          Action::<Jump>::new(),
          bindings![KeyCode::Space, KeyCode::ArrowUp],
      ),
      (
          Action::<Interact>::new(),
          bindings![KeyCode::KeyE],
      ),
      (
          Action::<Restart>::new(),
          bindings![KeyCode::KeyR],
      ),
  ])
}
