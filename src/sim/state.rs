//! Core simulation types
//!
//! Plain data owned by a `Session`; the update functions live in sibling modules.

use std::fmt;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Configuration, no simulation
    Setup,
    /// Run initialized, player idle, waiting for the first activation
    Ready,
    /// Simulation advancing every frame
    Playing,
    /// Run ended, last frame frozen
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::GameOver => "gameover",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands accepted from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    /// Jump (key press, click, tap)
    Activate,
    Reset,
    PlayAgain,
}

/// Events emitted to the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    SpeedChanged(f32),
    /// Collision feedback (hit sound)
    HitFeedback,
    GameOver { score: u32, new_best: bool },
}

/// The player's sprite body. Horizontal position is fixed by the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top edge of the sprite box
    pub y: f32,
    /// Pixels per frame, positive is down
    pub velocity: f32,
}

impl PlayerBody {
    pub fn at_rest(y: f32) -> Self {
        Self { y, velocity: 0.0 }
    }

    /// Sprite tilt for rendering, nose up when rising
    pub fn rotation(&self) -> f32 {
        (self.velocity * 0.05).min(1.5)
    }
}

/// A gapped obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top of the gap band (= height of the upper segment)
    pub gap_top: f32,
    /// Set once the trailing edge passes the player
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            scored: false,
        }
    }

    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }
}

/// Decorative cloud, drifts independently and wraps around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
}

/// Cloud layout for an 800x600 playfield, scaled to the actual size
pub fn seed_clouds(width: f32, height: f32) -> Vec<Cloud> {
    let sx = width / crate::consts::PLAYFIELD_WIDTH;
    let sy = height / crate::consts::PLAYFIELD_HEIGHT;
    [
        (100.0, 80.0, 60.0, 0.5),
        (300.0, 150.0, 80.0, 0.3),
        (500.0, 100.0, 70.0, 0.4),
        (700.0, 180.0, 90.0, 0.35),
    ]
    .into_iter()
    .map(|(x, y, size, speed)| Cloud {
        x: x * sx,
        y: y * sy,
        size,
        speed,
    })
    .collect()
}

/// RNG state wrapper: a run seed plus a per-run stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Cosmetic RNG for the upcoming run. Even streams, so it never shares
    /// draws with the gameplay stream `next_run` hands out.
    pub fn clouds(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream.wrapping_mul(2))
    }

    /// RNG for the next run; each run gets its own stream
    pub fn next_run(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream.wrapping_mul(2).wrapping_add(1));
        self.stream += 1;
        rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_clouds_scale_with_playfield() {
        let clouds = seed_clouds(400.0, 600.0);
        assert_eq!(clouds.len(), 4);
        assert_eq!(clouds[0].x, 50.0);
        assert_eq!(clouds[3].y, 180.0);
    }

    #[test]
    fn test_runs_get_distinct_streams() {
        let mut state = RngState::new(42);
        let a: u32 = state.next_run().random();
        let b: u32 = state.next_run().random();
        assert_ne!(a, b);

        let mut again = RngState::new(42);
        let a2: u32 = again.next_run().random();
        assert_eq!(a, a2);
    }

    #[test]
    fn test_cloud_stream_differs_from_run_stream() {
        let mut state = RngState::new(42);
        let cloud: u32 = state.clouds().random();
        let run: u32 = state.next_run().random();
        assert_ne!(cloud, run);
        // Reading the cloud stream does not advance the run streams
        assert_eq!(state.stream, 1);
    }

    #[test]
    fn test_rotation_clamped() {
        let body = PlayerBody { y: 0.0, velocity: 100.0 };
        assert_eq!(body.rotation(), 1.5);
        let rising = PlayerBody { y: 0.0, velocity: -10.0 };
        assert!(rising.rotation() < 0.0);
    }
}
