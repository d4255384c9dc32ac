//! Difficulty ramp
//!
//! `DifficultyState` holds the obstacle speed; `SpeedRamp` is the periodic
//! wall-clock timer that raises it. The session keeps the ramp in an `Option`
//! that only holds a value while playing, so dropping it is the cancel.

use serde::{Deserialize, Serialize};

use crate::tuning::SpeedRampConfig;

/// Obstacle speed in pixels per frame, bounded to `[initial, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub current_speed: f32,
    initial: f32,
    step: f32,
    max: f32,
}

impl DifficultyState {
    pub fn new(config: &SpeedRampConfig) -> Self {
        Self {
            current_speed: config.initial,
            initial: config.initial,
            step: config.step,
            max: config.max,
        }
    }

    pub fn reset(&mut self) {
        self.current_speed = self.initial;
    }

    /// Raise speed by one step. Returns true if it changed.
    pub fn tick(&mut self) -> bool {
        if self.current_speed >= self.max {
            return false;
        }
        self.current_speed = (self.current_speed + self.step).min(self.max);
        true
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Periodic timer on wall-clock milliseconds, independent of frame rate
#[derive(Debug)]
pub struct SpeedRamp {
    started_at: f64,
    interval_ms: f64,
    fired: u64,
}

impl SpeedRamp {
    /// Acquire the timer at `now_ms`
    pub fn start(now_ms: f64, interval_ms: f64) -> Self {
        log::debug!("Speed ramp started (every {} ms)", interval_ms);
        Self {
            started_at: now_ms,
            interval_ms: interval_ms.max(1.0),
            fired: 0,
        }
    }

    /// Number of intervals that elapsed since the last poll
    pub fn poll(&mut self, now_ms: f64) -> u64 {
        let elapsed = (now_ms - self.started_at).max(0.0);
        let due = (elapsed / self.interval_ms).floor() as u64;
        let ticks = due.saturating_sub(self.fired);
        self.fired = self.fired.max(due);
        ticks
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Drop for SpeedRamp {
    fn drop(&mut self) {
        log::debug!("Speed ramp released after {} ticks", self.fired);
    }
}
