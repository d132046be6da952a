use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use bevy_rapier2d::prelude::*;

use crate::player::animation::PlayerAnimator;
use crate::player::components::{ControlIntent, GroundContact, Opacity, Player, Vitals};
use crate::player::landing::LandingWatch;
use crate::player::possession::Possession;
use crate::player::rebirth::RebirthTimeline;
use crate::session::CurrentLevel;

/// Resource for frame-by-frame debug mode
#[derive(Resource, Default)]
pub struct FrameStepMode {
  pub enabled: bool,
  advance_requested: bool,
}

pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    if !app.is_plugin_added::<EguiPlugin>() {
      app.add_plugins(EguiPlugin::default());
    }
    app
      .add_plugins(RapierDebugRenderPlugin::default())
      .init_resource::<FrameStepMode>()
      .add_systems(PreUpdate, frame_step_control)
      .add_systems(Update, draw_debug_vectors)
      .add_systems(EguiPrimaryContextPass, render_player_panel);
  }
}

/// F5 toggles frame-step mode, Right Arrow advances one frame while it is on.
fn frame_step_control(
  keyboard: Res<ButtonInput<KeyCode>>,
  mut frame_step: ResMut<FrameStepMode>,
  mut time: ResMut<Time<Virtual>>,
) {
  if keyboard.just_pressed(KeyCode::F5) {
    frame_step.enabled = !frame_step.enabled;
    if frame_step.enabled {
      time.pause();
      info!("Frame-step mode ENABLED (press Right Arrow to advance, F5 to disable)");
    } else {
      time.unpause();
      info!("Frame-step mode DISABLED");
    }
  }

  if frame_step.enabled {
    if keyboard.just_pressed(KeyCode::ArrowRight) {
      frame_step.advance_requested = true;
      time.unpause();
    } else if frame_step.advance_requested {
      frame_step.advance_requested = false;
      time.pause();
    }
  }
}

/// Velocity in yellow, horizontal intent in green.
fn draw_debug_vectors(
  mut gizmos: Gizmos,
  players: Query<(&Transform, &Velocity, &ControlIntent, &GroundContact), With<Player>>,
) {
  const VELOCITY_SCALE: f32 = 0.25;
  const INPUT_LENGTH: f32 = 40.0;

  for (transform, velocity, intent, ground) in &players {
    let player_pos = transform.translation.truncate();

    if velocity.linvel.length_squared() > 0.01 {
      let velocity_end = player_pos + velocity.linvel * VELOCITY_SCALE;
      gizmos.line_2d(player_pos, velocity_end, Color::srgb(1.0, 1.0, 0.0));
    }

    if intent.axis.abs() > 0.01 {
      let input_end = player_pos + Vec2::new(intent.axis.signum() * INPUT_LENGTH, 0.0);
      gizmos.line_2d(player_pos, input_end, Color::srgb(0.0, 1.0, 0.0));
    }

    let ground_color = if ground.0 {
      Color::srgb(0.2, 0.9, 0.3)
    } else {
      Color::srgb(0.9, 0.2, 0.2)
    };
    gizmos.circle_2d(player_pos, 4.0, ground_color);
  }
}

fn render_player_panel(
  mut contexts: EguiContexts,
  players: Query<
    (
      &Vitals,
      &Opacity,
      &Possession,
      &GroundContact,
      &LandingWatch,
      &PlayerAnimator,
      Option<&RebirthTimeline>,
    ),
    With<Player>,
  >,
  level: Option<Res<CurrentLevel>>,
) {
  let Ok(ctx) = contexts.ctx_mut() else {
    return;
  };

  egui::Window::new("Player")
    .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
    .resizable(false)
    .show(ctx, |ui| {
      if let Some(level) = level {
        ui.label(format!("Level: {}", level.0));
      }
      let Ok((vitals, opacity, possession, ground, landing, animator, rebirth)) = players.single()
      else {
        ui.label("No player");
        return;
      };
      ui.label(format!("Alive: {}  Ghost: {}", vitals.alive, vitals.ghost));
      ui.label(format!("Alpha: {:.2}", opacity.alpha()));
      ui.label(format!("Grounded: {}", ground.0));
      ui.label(format!("Jump latched: {}", landing.is_latched()));
      ui.label(format!("Clip: {:?}", animator.clip()));
      match possession.vessel() {
        Some(vessel) => ui.label(format!("Possessing: {:?}", vessel)),
        None => ui.label("Possessing: none"),
      };
      if let Some(rebirth) = rebirth {
        ui.label(format!("Rebirth next: {:?}", rebirth.next_step()));
      }
    });
}
