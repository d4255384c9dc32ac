//! Collision detection and scoring
//!
//! Everything is axis-aligned: the player is a square box at a fixed x, an
//! obstacle is a full-height column with the gap band cut out.

use glam::Vec2;

use super::state::Obstacle;

/// Axis-aligned bounding box in playfield coordinates (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square box of side `size` with its top-left corner at (x, y)
    pub fn square(x: f32, y: f32, size: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + size, y + size))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict horizontal overlap (touching edges do not count)
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }

    /// Fully inside the vertical band [top, bottom]
    pub fn within_band(&self, top: f32, bottom: f32) -> bool {
        self.min.y >= top && self.max.y <= bottom
    }
}

/// Obstacle geometry needed for hit-testing and placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleBounds {
    pub left: f32,
    pub right: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
}

impl ObstacleBounds {
    pub fn of(obstacle: &Obstacle, width: f32, gap_height: f32) -> Self {
        Self {
            left: obstacle.x,
            right: obstacle.x + width,
            gap_top: obstacle.gap_top,
            gap_bottom: obstacle.gap_top + gap_height,
        }
    }

    /// Upper segment box, from the top of the playfield to the gap
    pub fn upper(&self) -> Aabb {
        Aabb::new(Vec2::new(self.left, 0.0), Vec2::new(self.right, self.gap_top))
    }

    /// Lower segment box, from the gap to the ground line
    pub fn lower(&self, ground_y: f32) -> Aabb {
        Aabb::new(
            Vec2::new(self.left, self.gap_bottom),
            Vec2::new(self.right, ground_y.max(self.gap_bottom)),
        )
    }
}

/// Terminal collision: horizontal overlap and not contained in the gap band
pub fn obstacle_hit(player: &Aabb, bounds: &ObstacleBounds) -> bool {
    player.overlaps_x(bounds.left, bounds.right)
        && !player.within_band(bounds.gap_top, bounds.gap_bottom)
}

/// Award the obstacle if its trailing edge has passed `player_x`.
/// Returns true exactly once per obstacle.
pub fn score_crossing(obstacle: &mut Obstacle, width: f32, player_x: f32) -> bool {
    if obstacle.scored || obstacle.right(width) >= player_x {
        return false;
    }
    obstacle.scored = true;
    true
}
