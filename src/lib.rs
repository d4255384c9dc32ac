//! Skyhop - a Flappy-style gap runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, scoring, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser glue (frame loop, timers, input, sprite loading)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation settings and viewport layout
//! - `audio`: Hit feedback sound (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{RunSummary, SessionBest};
pub use settings::{Layout, Settings};
pub use tuning::{ConfigError, GameConfig, Profile, Tuning};

/// Game configuration constants
pub mod consts {
    /// Reference playfield (desktop layout)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Height of the ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Player sprite is a square of this side
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Player's fixed horizontal position as a fraction of playfield width
    pub const PLAYER_X_FRACTION: f32 = 0.25;

    /// Per-frame gravity and jump impulse (standard profile)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_IMPULSE: f32 = -10.0;
    /// Reduced profile (compact viewports) - finer control
    pub const REDUCED_GRAVITY: f32 = 0.4;
    pub const REDUCED_JUMP_IMPULSE: f32 = -8.5;

    /// Obstacle geometry (standard profile)
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const GAP_HEIGHT: f32 = 230.0;
    pub const OBSTACLE_SPACING: f32 = 300.0;
    /// Obstacle geometry (reduced profile)
    pub const REDUCED_OBSTACLE_WIDTH: f32 = 64.0;
    pub const REDUCED_GAP_HEIGHT: f32 = 200.0;
    pub const REDUCED_OBSTACLE_SPACING: f32 = 220.0;

    /// Gap placement margins
    pub const MIN_TOP_MARGIN: f32 = 60.0;
    pub const MIN_BOTTOM_MARGIN: f32 = 60.0;
    /// First obstacle of a run: x as a fraction of width, gap top range
    pub const FIRST_OBSTACLE_X_FRACTION: f32 = 0.75;
    pub const FIRST_GAP_MIN: f32 = 100.0;
    pub const FIRST_GAP_SPAN: f32 = 200.0;

    /// Obstacle speed ramp (pixels per frame)
    pub const INITIAL_SPEED: f32 = 3.0;
    pub const SPEED_STEP: f32 = 0.4;
    pub const MAX_SPEED: f32 = 8.0;
    /// Wall-clock interval between speed increases
    pub const SPEED_INTERVAL_MS: f64 = 10_000.0;

    /// Cloud respawn band: y in [CLOUD_MIN_Y, CLOUD_MIN_Y + height * CLOUD_BAND)
    pub const CLOUD_MIN_Y: f32 = 50.0;
    pub const CLOUD_BAND: f32 = 0.4;

    /// Hit sound auto-stop
    pub const HIT_SOUND_DURATION_MS: i32 = 3000;
    pub const HIT_SOUND_VOLUME: f64 = 0.5;

    /// Viewport width below which the compact layout and reduced profile apply
    pub const COMPACT_BREAKPOINT: f32 = 768.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
