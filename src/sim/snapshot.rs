//! Read-only view of a session for drawing and the HUD
//!
//! The renderer never touches `Session` directly; it gets a `DrawState`
//! built once per frame (and once more on game over for the frozen frame).

use serde::Serialize;

use super::collision::ObstacleBounds;
use super::session::{Session, Sprites};
use super::state::{Cloud, Phase};

/// Segment rectangle in playfield pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// One obstacle pair: the upper and lower segments around the gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub upper: Rect,
    pub lower: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    /// Radians, positive tilts the nose down
    pub rotation: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawState {
    pub phase: Phase,
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub player: Option<PlayerView>,
    pub obstacles: Vec<ObstacleView>,
    pub clouds: Vec<Cloud>,
    pub sprites: Sprites,
    pub score: u32,
    pub high_score: u32,
    pub speed: f32,
}

impl DrawState {
    pub fn capture(session: &Session) -> Self {
        let config = session.config();
        let tuning = config.tuning();
        let ground_y = config.ground_y();

        let (player, obstacles, clouds) = match session.run() {
            Some(run) => {
                let player = PlayerView {
                    rect: Rect::new(
                        config.player_x(),
                        run.player.y,
                        config.player_size,
                        config.player_size,
                    ),
                    rotation: run.player.rotation(),
                };
                let obstacles = run
                    .obstacles
                    .iter()
                    .map(|o| {
                        let bounds = ObstacleBounds::of(o, tuning.obstacle_width, tuning.gap_height);
                        let upper = bounds.upper();
                        let lower = bounds.lower(ground_y);
                        ObstacleView {
                            upper: Rect::new(upper.min.x, upper.min.y, upper.width(), upper.height()),
                            lower: Rect::new(lower.min.x, lower.min.y, lower.width(), lower.height()),
                        }
                    })
                    .collect();
                (Some(player), obstacles, run.clouds.clone())
            }
            None => (None, Vec::new(), Vec::new()),
        };

        Self {
            phase: session.phase(),
            width: config.width,
            height: config.height,
            ground_y,
            player,
            obstacles,
            clouds,
            sprites: session.sprites(),
            score: session.score(),
            high_score: session.high_score(),
            speed: session.current_speed(),
        }
    }

    /// Serialized frame, for debugging hosts
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Session {
    pub fn draw_state(&self) -> DrawState {
        DrawState::capture(self)
    }
}
