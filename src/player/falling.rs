use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use super::components::Player;
use super::timeline::Timeline;
use crate::audio::{VoiceClip, VoiceCue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallingStage {
  Impact,
}

/// Falling scream, then the death clip once the fall is over.
#[derive(Component, Debug, Clone)]
pub struct FallingCue(Timeline<FallingStage>);

impl FallingCue {
  pub fn new(delay: f32) -> Self {
    Self(Timeline::new([(delay, FallingStage::Impact)]))
  }
}

pub fn advance_falling_cue(
  mut commands: Commands,
  mut players: Query<(Entity, &mut FallingCue), With<Player>>,
  time: Res<Time>,
  mut voice: MessageWriter<VoiceCue>,
) {
  for (entity, mut cue) in &mut players {
    for stage in cue.0.tick(time.delta_secs()) {
      match stage {
        FallingStage::Impact => {
          voice.write(VoiceCue {
            clip: VoiceClip::Die,
            looping: false,
          });
        }
      }
    }
    if cue.0.is_finished() {
      commands.entity(entity).remove::<FallingCue>();
    }
  }
}
