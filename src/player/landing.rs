//! Bounded landing poll started by each jump.

use bevy::prelude::*;

use super::components::{GroundContact, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
  Pending,
  Landed,
  TimedOut,
}

/// Rechecks ground contact every `interval` seconds until it is found or
/// `timeout` seconds have passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingPoll {
  interval: f32,
  timeout: f32,
  since_check: f32,
  elapsed: f32,
}

impl LandingPoll {
  pub fn new(interval: f32, timeout: f32) -> Self {
    Self {
      interval,
      timeout,
      since_check: 0.0,
      elapsed: 0.0,
    }
  }

  pub fn elapsed(&self) -> f32 {
    self.elapsed
  }

  pub fn tick(&mut self, dt: f32, grounded: bool) -> PollOutcome {
    let dt = dt.max(0.0);
    self.elapsed += dt;
    self.since_check += dt;

    if self.since_check < self.interval {
      return PollOutcome::Pending;
    }
    // Several intervals inside one frame see the same ground state
    self.since_check %= self.interval;

    if grounded {
      PollOutcome::Landed
    } else if self.elapsed >= self.timeout {
      PollOutcome::TimedOut
    } else {
      PollOutcome::Pending
    }
  }
}

/// The jump latch. Jumping stays flagged while a poll is in flight.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct LandingWatch(Option<LandingPoll>);

impl LandingWatch {
  /// Starts a fresh poll, replacing any poll already in flight.
  pub fn start(&mut self, poll: LandingPoll) {
    self.0 = Some(poll);
  }

  pub fn is_latched(&self) -> bool {
    self.0.is_some()
  }
}

pub fn poll_landing(
  mut players: Query<(&GroundContact, &mut LandingWatch), With<Player>>,
  time: Res<Time>,
) {
  for (ground, mut watch) in &mut players {
    let Some(poll) = watch.0.as_mut() else {
      continue;
    };
    match poll.tick(time.delta_secs(), ground.0) {
      PollOutcome::Pending => {}
      PollOutcome::Landed => {
        trace!("Landed after {:.2}s", poll.elapsed());
        watch.0 = None;
      }
      PollOutcome::TimedOut => {
        warn!(
          "No ground contact {:.2}s after jumping, dropping the landing poll",
          poll.elapsed()
        );
        watch.0 = None;
      }
    }
  }
}
