//! Delayed step scheduling for scripted player sequences.
//!
//! A [`Timeline`] is a linear chain of steps. Each step is released a fixed
//! delay after the previous one, measured in seconds of game time. Timelines
//! are ticked by systems with `Time::delta_secs()`, so a long frame can
//! release several steps at once, always in order.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Timeline<S> {
  steps: VecDeque<(f32, S)>,
  waited: f32,
}

impl<S: Copy> Timeline<S> {
  /// Builds a timeline from `(delay, step)` pairs. Negative delays count as
  /// zero.
  pub fn new(steps: impl IntoIterator<Item = (f32, S)>) -> Self {
    Self {
      steps: steps
        .into_iter()
        .map(|(delay, step)| (delay.max(0.0), step))
        .collect(),
      waited: 0.0,
    }
  }

  pub fn is_finished(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn remaining(&self) -> usize {
    self.steps.len()
  }

  /// The step that will be released next, if any.
  pub fn next_step(&self) -> Option<S> {
    self.steps.front().map(|&(_, step)| step)
  }

  /// Advances by `dt` seconds and returns every step that came due.
  pub fn tick(&mut self, dt: f32) -> Vec<S> {
    self.waited += dt.max(0.0);

    let mut due = Vec::new();
    while let Some(&(delay, step)) = self.steps.front() {
      if self.waited < delay {
        break;
      }
      // Carry the overshoot into the next wait
      self.waited -= delay;
      self.steps.pop_front();
      due.push(step);
    }
    if self.steps.is_empty() {
      self.waited = 0.0;
    }
    due
  }
}
