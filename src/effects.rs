//! Soul burst particles.

use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;
use rand::Rng;

const BURST_COUNT: usize = 24;
const PARTICLE_SIZE: f32 = 3.0;
const LIFETIME_RANGE: std::ops::Range<f32> = 0.6..1.4;
const SPEED_RANGE: std::ops::Range<f32> = 20.0..90.0;
/// Upward drift, world units per second squared.
const BUOYANCY: f32 = 60.0;

#[derive(Message, Debug, Clone, Copy)]
pub struct SoulBurst {
  pub at: Vec3,
}

#[derive(Component)]
pub struct SoulParticle {
  velocity: Vec2,
  remaining: f32,
  lifetime: f32,
}

impl SoulParticle {
  /// Moves the particle forward by `dt` and returns its new opacity. Zero
  /// means it has burned out.
  fn advance(&mut self, dt: f32) -> (Vec2, f32) {
    self.remaining -= dt;
    self.velocity.y += BUOYANCY * dt;
    let alpha = (self.remaining / self.lifetime).clamp(0.0, 1.0);
    (self.velocity * dt, alpha)
  }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<SoulBurst>()
      .add_systems(Update, (emit_soul_bursts, animate_soul_particles));
  }
}

fn emit_soul_bursts(mut commands: Commands, mut bursts: MessageReader<SoulBurst>) {
  let mut rng = rand::rng();

  for burst in bursts.read() {
    for _ in 0..BURST_COUNT {
      let angle = rng.random_range(0.0..std::f32::consts::TAU);
      let speed = rng.random_range(SPEED_RANGE);
      let lifetime = rng.random_range(LIFETIME_RANGE);
      commands.spawn((
        SoulParticle {
          velocity: Vec2::from_angle(angle) * speed,
          remaining: lifetime,
          lifetime,
        },
        Sprite {
          color: Color::srgba(0.75, 0.9, 1.0, 1.0),
          custom_size: Some(Vec2::splat(PARTICLE_SIZE)),
          ..default()
        },
        Transform::from_translation(burst.at + Vec3::Z),
      ));
    }
  }
}

fn animate_soul_particles(
  mut commands: Commands,
  mut particles: Query<(Entity, &mut SoulParticle, &mut Transform, &mut Sprite)>,
  time: Res<Time>,
) {
  let dt = time.delta_secs();
  for (entity, mut particle, mut transform, mut sprite) in &mut particles {
    let (step, alpha) = particle.advance(dt);
    if alpha <= 0.0 {
      commands.entity(entity).try_despawn();
      continue;
    }
    transform.translation += step.extend(0.0);
    sprite.color.set_alpha(alpha);
  }
}
