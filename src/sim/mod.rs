//! Simulation module
//!
//! All gameplay logic lives here. It is pure and deterministic given a
//! random source and wall-clock samples:
//! - One step per displayed frame
//! - Injected unit source (seeded PCG by default)
//! - Obstacles kept oldest first
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod decor;
pub mod difficulty;
pub mod obstacles;
pub mod physics;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ObstacleBounds, obstacle_hit, score_crossing};
pub use difficulty::{DifficultyState, SpeedRamp};
pub use obstacles::{FixedUnits, GapRange, UnitSource};
pub use session::{Run, Session, SourceFactory, SpriteSource, Sprites, TransitionError};
pub use snapshot::{DrawState, ObstacleView, PlayerView, Rect};
pub use state::{Cloud, Command, GameEvent, Obstacle, Phase, PlayerBody, RngState};
pub use tick::{FrameInput, StepOutcome, tick};
