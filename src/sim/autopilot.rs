//! Demo/idle mode: a simple pilot that keeps the sprite near the next gap

use super::collision::ObstacleBounds;
use super::session::Run;
use crate::tuning::GameConfig;

/// Decide whether to jump this frame.
///
/// Targets the lower third of the next gap that is still ahead of (or under)
/// the player, or the middle of the sky when there is none. Only jumps when
/// falling, so it doesn't stack impulses.
pub fn should_flap(run: &Run, config: &GameConfig) -> bool {
    let tuning = config.tuning();
    let player_x = config.player_x();
    let size = config.player_size;

    let target = run
        .obstacles
        .iter()
        .map(|o| ObstacleBounds::of(o, tuning.obstacle_width, tuning.gap_height))
        .find(|b| b.right >= player_x)
        .map(|b| b.gap_bottom - tuning.gap_height / 3.0)
        .unwrap_or(config.ground_y() / 2.0 + size);

    let bottom = run.player.y + size;
    // Predicted bottom after this frame's gravity
    let next_bottom = bottom + run.player.velocity + tuning.gravity;
    run.player.velocity >= 0.0 && next_bottom > target
}
