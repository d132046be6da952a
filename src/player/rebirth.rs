//! The scripted human-to-ghost rebirth.

use bevy::prelude::*;

use super::animation::PlayerAnimator;
use super::commands::Cues;
use super::components::{Opacity, Player, Vitals};
use super::timeline::Timeline;
use crate::audio::{SoundCue, VoiceClip, VoiceCue};
use crate::config::TimingsConfig;
use crate::effects::SoulBurst;
use crate::reaper::SummonReaper;
use crate::session::SessionNotice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebirthStep {
  /// Body drops dead and plays the death animation.
  Collapse,
  /// Soul rises out of the body, which vanishes.
  Rise,
  /// Reappears as a ghost with the reaper in tow.
  Reform,
  RevealWorld,
  /// Starts fading and the cave music.
  Haunt,
}

/// Non-cancellable; only despawning the player stops it.
#[derive(Component, Debug, Clone)]
pub struct RebirthTimeline(Timeline<RebirthStep>);

impl RebirthTimeline {
  pub fn new(timings: &TimingsConfig) -> Self {
    Self(Timeline::new([
      (timings.collapse_delay, RebirthStep::Collapse),
      (timings.rise_delay, RebirthStep::Rise),
      (timings.reform_delay, RebirthStep::Reform),
      (timings.world_ui_delay, RebirthStep::RevealWorld),
      (timings.haunt_delay, RebirthStep::Haunt),
    ]))
  }

  pub fn next_step(&self) -> Option<RebirthStep> {
    self.0.next_step()
  }
}

pub fn advance_rebirth(
  mut commands: Commands,
  mut players: Query<
    (
      Entity,
      &mut RebirthTimeline,
      &mut Vitals,
      &mut PlayerAnimator,
      &mut Opacity,
      &Transform,
    ),
    With<Player>,
  >,
  time: Res<Time>,
  mut cues: Cues,
) {
  for (entity, mut timeline, mut vitals, mut animator, mut opacity, transform) in &mut players {
    for step in timeline.0.tick(time.delta_secs()) {
      debug!("Rebirth step {:?}", step);
      match step {
        RebirthStep::Collapse => {
          vitals.alive = false;
          animator.trigger_die();
        }
        RebirthStep::Rise => {
          cues.bursts.write(SoulBurst {
            at: transform.translation,
          });
          cues.sounds.write(SoundCue::Soul);
          opacity.set_alpha(0.0);
        }
        RebirthStep::Reform => {
          animator.play_ghost_idle();
          opacity.set_alpha(1.0);
          vitals.alive = true;
          cues.reapers.write(SummonReaper {
            near: transform.translation,
          });
        }
        RebirthStep::RevealWorld => {
          cues.session.write(SessionNotice::ShowWorldUi);
        }
        RebirthStep::Haunt => {
          if !vitals.alive {
            warn!("Rebirth finished on a dead player; haunting anyway");
          }
          vitals.ghost = true;
          cues.voice.write(VoiceCue {
            clip: VoiceClip::DarkCaveMusic,
            looping: true,
          });
          info!("Ghost is fading");
        }
      }
    }

    if timeline.0.is_finished() {
      commands.entity(entity).remove::<RebirthTimeline>();
    }
  }
}
