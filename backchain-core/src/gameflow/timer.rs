//! Run clock: a countdown with threshold warnings, or a plain stopwatch.

use serde::{Deserialize, Serialize};

use crate::constants::WARNING_RESET;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerKind {
    Countdown,
    Stopwatch,
}

/// What one tick of the clock produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerTick {
    /// Thresholds crossed this tick, each fires one warning
    pub warnings: usize,
    /// Countdown reached zero
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTimer {
    kind: TimerKind,
    /// Remaining seconds for a countdown, elapsed seconds for a stopwatch
    value: f32,
    budget: f32,
    /// Remaining time seen at the end of the previous tick
    last_seen: f32,
    thresholds: Vec<f32>,
}

impl Default for RunTimer {
    fn default() -> Self {
        Self::stopwatch()
    }
}

impl RunTimer {
    pub fn countdown(budget: f32, thresholds: &[f32]) -> Self {
        Self {
            kind: TimerKind::Countdown,
            value: budget,
            budget,
            last_seen: WARNING_RESET,
            thresholds: thresholds.to_vec(),
        }
    }

    pub fn stopwatch() -> Self {
        Self {
            kind: TimerKind::Stopwatch,
            value: 0.0,
            budget: 0.0,
            last_seen: WARNING_RESET,
            thresholds: Vec::new(),
        }
    }

    pub fn tick(&mut self, dt: f32) -> TimerTick {
        match self.kind {
            TimerKind::Stopwatch => {
                self.value += dt;
                TimerTick::default()
            }
            TimerKind::Countdown => {
                self.value -= dt;
                let (now, before) = (self.value, self.last_seen);
                let warnings = self
                    .thresholds
                    .iter()
                    .filter(|&&t| now < t && before >= t)
                    .count();
                self.last_seen = now;
                TimerTick {
                    warnings,
                    expired: now <= 0.0,
                }
            }
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Displayed value: remaining or elapsed seconds
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Countdown budget the run started with; zero for a stopwatch
    pub fn budget(&self) -> f32 {
        self.budget
    }

    pub fn remaining(&self) -> Option<f32> {
        match self.kind {
            TimerKind::Countdown => Some(self.value),
            TimerKind::Stopwatch => None,
        }
    }

    pub fn elapsed(&self) -> f32 {
        match self.kind {
            TimerKind::Countdown => self.budget - self.value,
            TimerKind::Stopwatch => self.value,
        }
    }
}

/// Format seconds as `M:SS.ss`; negative values show as zero
pub fn format_time(seconds: f32) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6000;
    let rest = (centis % 6000) as f64 / 100.0;
    format!("{minutes}:{rest:05.2}")
}
