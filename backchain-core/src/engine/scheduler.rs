//! Host frame deltas → simulation step sizes.

use tracing::trace;

use crate::engine::config::{SchedulerConfig, StepMode};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    accumulator: f32,
}

impl FrameScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
        }
    }

    /// Step sizes to run for a host frame of `frame_delta` seconds.
    ///
    /// Variable mode yields one step clamped to `max_frame_delta`. Fixed mode
    /// yields whole `1/hz` steps, at most `max_catch_up_steps`; time beyond
    /// that is dropped rather than carried.
    pub fn steps(&mut self, frame_delta: f32) -> Vec<f32> {
        let delta = if frame_delta.is_finite() { frame_delta.max(0.0) } else { 0.0 };
        match self.config.step_mode {
            StepMode::Variable => {
                let dt = delta.min(self.config.max_frame_delta);
                if dt > 0.0 {
                    vec![dt]
                } else {
                    Vec::new()
                }
            }
            StepMode::Fixed { hz } => {
                let step = 1.0 / hz.max(1) as f32;
                self.accumulator += delta;
                let mut steps = Vec::new();
                while self.accumulator >= step && steps.len() < self.config.max_catch_up_steps as usize {
                    self.accumulator -= step;
                    steps.push(step);
                }
                if self.accumulator >= step {
                    trace!(dropped = self.accumulator, "scheduler fell behind");
                    self.accumulator %= step;
                }
                steps
            }
        }
    }

    /// Forget banked time, e.g. after a pause
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
