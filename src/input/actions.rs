use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

#[derive(Component)]
pub struct PlayerInput;

/// Horizontal run axis, -1.0 to 1.0.
#[derive(Debug, InputAction)]
#[action_output(f32)]
pub struct Move;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Jump;

/// Possess the nearest vessel, or leave the current one.
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Interact;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Restart;
