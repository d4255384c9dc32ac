//! Parallax clouds. Cosmetic only, no gameplay effect.

use super::obstacles::UnitSource;
use super::state::Cloud;
use crate::consts::{CLOUD_BAND, CLOUD_MIN_Y};

/// Drift every cloud left; wrap a cloud to the right edge once it is fully
/// off-screen and give it a fresh height.
pub fn drift(clouds: &mut [Cloud], width: f32, height: f32, source: &mut dyn UnitSource) {
    for cloud in clouds {
        cloud.x -= cloud.speed;
        if cloud.x + cloud.size < 0.0 {
            cloud.x = width + cloud.size;
            cloud.y = CLOUD_MIN_Y + source.next_unit() * height * CLOUD_BAND;
        }
    }
}
