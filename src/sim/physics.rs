//! Player integration and playfield bounds

use super::state::PlayerBody;
use crate::tuning::Tuning;

/// One frame of gravity: velocity first, then position
pub fn integrate(body: &mut PlayerBody, tuning: &Tuning) {
    body.velocity += tuning.gravity;
    body.y += body.velocity;
}

/// Activation replaces velocity with the jump impulse
pub fn jump(body: &mut PlayerBody, tuning: &Tuning) {
    body.velocity = tuning.jump_impulse;
}

/// Ground or ceiling contact
pub fn out_of_bounds(body: &PlayerBody, size: f32, ground_y: f32) -> bool {
    body.y + size > ground_y || body.y < 0.0
}

/// Pull the player back inside `[0, ground_y - size]` after a playfield resize
pub fn clamp_into_bounds(body: &mut PlayerBody, size: f32, ground_y: f32) {
    let max_y = (ground_y - size).max(0.0);
    body.y = body.y.clamp(0.0, max_y);
}
