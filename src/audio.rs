//! Sound playback for player cues.
//!
//! One-shots spawn a self-despawning audio entity each. The player's voice
//! is a single child entity that is replaced whenever a new clip starts, so
//! the falling scream, level fanfare and cave music never overlap.

use bevy::audio::Volume;
use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::player::components::Player;

/// Fire-and-forget sounds.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
  Jump,
  /// Death by fading out.
  Fade,
  /// Soul leaving or entering a body.
  Soul,
  Reaper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceClip {
  Falling,
  Die,
  LevelComplete,
  DarkCaveMusic,
}

/// Switches the player's voice channel to `clip`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceCue {
  pub clip: VoiceClip,
  pub looping: bool,
}

#[derive(Resource)]
pub struct SoundBank {
  jump: Handle<AudioSource>,
  fade: Handle<AudioSource>,
  soul: Handle<AudioSource>,
  reaper: Handle<AudioSource>,
  falling: Handle<AudioSource>,
  die: Handle<AudioSource>,
  level_complete: Handle<AudioSource>,
  dark_cave_music: Handle<AudioSource>,
  one_shot_volume: f32,
}

impl SoundBank {
  fn one_shot(&self, cue: SoundCue) -> &Handle<AudioSource> {
    match cue {
      SoundCue::Jump => &self.jump,
      SoundCue::Fade => &self.fade,
      SoundCue::Soul => &self.soul,
      SoundCue::Reaper => &self.reaper,
    }
  }

  fn voice(&self, clip: VoiceClip) -> &Handle<AudioSource> {
    match clip {
      VoiceClip::Falling => &self.falling,
      VoiceClip::Die => &self.die,
      VoiceClip::LevelComplete => &self.level_complete,
      VoiceClip::DarkCaveMusic => &self.dark_cave_music,
    }
  }
}

/// Marker for the player's voice channel entity.
#[derive(Component)]
pub struct PlayerVoice;

pub struct AudioCuePlugin;

impl Plugin for AudioCuePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<SoundCue>()
      .add_message::<VoiceCue>()
      .add_systems(Startup, load_sound_bank)
      .add_systems(Update, (play_sound_cues, play_voice_cues));
  }
}

fn load_sound_bank(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  asset_server: Res<AssetServer>,
) {
  let audio = &config.audio;
  commands.insert_resource(SoundBank {
    jump: asset_server.load(audio.jump.clone()),
    fade: asset_server.load(audio.fade.clone()),
    soul: asset_server.load(audio.soul.clone()),
    reaper: asset_server.load(audio.reaper.clone()),
    falling: asset_server.load(audio.falling.clone()),
    die: asset_server.load(audio.die.clone()),
    level_complete: asset_server.load(audio.level_complete.clone()),
    dark_cave_music: asset_server.load(audio.dark_cave_music.clone()),
    one_shot_volume: audio.one_shot_volume,
  });
}

fn play_sound_cues(
  mut commands: Commands,
  mut cues: MessageReader<SoundCue>,
  bank: Option<Res<SoundBank>>,
) {
  let Some(bank) = bank else {
    if !cues.is_empty() {
      warn!("Sound bank not loaded, dropping {} sound cues", cues.len());
      cues.clear();
    }
    return;
  };

  for cue in cues.read() {
    trace!("Sound cue {:?}", cue);
    commands.spawn((
      AudioPlayer::new(bank.one_shot(*cue).clone()),
      PlaybackSettings::DESPAWN.with_volume(Volume::Linear(bank.one_shot_volume)),
    ));
  }
}

fn play_voice_cues(
  mut commands: Commands,
  mut cues: MessageReader<VoiceCue>,
  bank: Option<Res<SoundBank>>,
  players: Query<Entity, With<Player>>,
  voices: Query<Entity, With<PlayerVoice>>,
) {
  // Only the newest clip survives a frame
  let Some(cue) = cues.read().last().copied() else {
    return;
  };
  let Some(bank) = bank else {
    warn!("Sound bank not loaded, dropping voice cue {:?}", cue.clip);
    return;
  };
  let Ok(player) = players.single() else {
    warn!("No player to voice {:?}", cue.clip);
    return;
  };

  for voice in &voices {
    commands.entity(voice).try_despawn();
  }

  let settings = if cue.looping {
    PlaybackSettings::LOOP
  } else {
    PlaybackSettings::REMOVE
  };
  debug!("Voice clip {:?} (looping: {})", cue.clip, cue.looping);
  commands.spawn((
    PlayerVoice,
    AudioPlayer::new(bank.voice(cue.clip).clone()),
    settings,
    ChildOf(player),
  ));
}
