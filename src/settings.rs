//! Presentation settings and viewport layout
//!
//! Nothing here affects the simulation beyond choosing the playfield size and
//! profile at session start.

use serde::{Deserialize, Serialize};

use crate::consts::{
    COMPACT_BREAKPOINT, HIT_SOUND_DURATION_MS, HIT_SOUND_VOLUME, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH,
};
use crate::tuning::{GameConfig, Profile};

/// Compact layout limits
const COMPACT_MAX_WIDTH: f32 = 400.0;
const COMPACT_SIDE_PADDING: f32 = 32.0;
const COMPACT_CHROME_HEIGHT: f32 = 200.0;
/// Never shrink the playfield below this
const MIN_PLAYFIELD: f32 = 160.0;

/// Host-side settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Hit sound volume (0.0 - 1.0)
    pub hit_volume: f64,
    /// Hit sound auto-stop
    pub hit_duration_ms: i32,
    /// Skip the hit sound entirely
    pub muted: bool,

    // === Layout ===
    /// Window width below which the compact layout applies
    pub compact_breakpoint: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hit_volume: HIT_SOUND_VOLUME,
            hit_duration_ms: HIT_SOUND_DURATION_MS,
            muted: false,
            compact_breakpoint: COMPACT_BREAKPOINT,
        }
    }
}

impl Settings {
    /// Parse settings, falling back to defaults for anything missing or bad
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring bad settings: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp values into their usable ranges
    pub fn sanitized(mut self) -> Self {
        self.hit_volume = if self.hit_volume.is_finite() {
            self.hit_volume.clamp(0.0, 1.0)
        } else {
            HIT_SOUND_VOLUME
        };
        self.hit_duration_ms = self.hit_duration_ms.max(0);
        if !(self.compact_breakpoint.is_finite() && self.compact_breakpoint > 0.0) {
            self.compact_breakpoint = COMPACT_BREAKPOINT;
        }
        self
    }

    /// Effective playback volume (0 when muted)
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.hit_volume }
    }

    pub fn layout(&self, window_width: f32, window_height: f32) -> Layout {
        Layout::for_window_with_breakpoint(window_width, window_height, self.compact_breakpoint)
    }
}

/// Playfield size and profile chosen from the window size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub profile: Profile,
    pub compact: bool,
}

impl Layout {
    pub fn for_window(window_width: f32, window_height: f32) -> Self {
        Self::for_window_with_breakpoint(window_width, window_height, COMPACT_BREAKPOINT)
    }

    pub fn for_window_with_breakpoint(window_width: f32, window_height: f32, breakpoint: f32) -> Self {
        if window_width < breakpoint {
            let width = (window_width - COMPACT_SIDE_PADDING).min(COMPACT_MAX_WIDTH);
            let height = (window_height - COMPACT_CHROME_HEIGHT).min(PLAYFIELD_HEIGHT);
            Self {
                width: width.max(MIN_PLAYFIELD),
                height: height.max(MIN_PLAYFIELD),
                profile: Profile::for_compact(true),
                compact: true,
            }
        } else {
            Self {
                width: PLAYFIELD_WIDTH,
                height: PLAYFIELD_HEIGHT,
                profile: Profile::for_compact(false),
                compact: false,
            }
        }
    }

    /// Session config for this layout
    pub fn game_config(&self, seed: u64) -> GameConfig {
        GameConfig::new(self.width, self.height, self.profile).with_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_layout() {
        let layout = Layout::for_window(1280.0, 900.0);
        assert_eq!(layout.width, 800.0);
        assert_eq!(layout.height, 600.0);
        assert_eq!(layout.profile, Profile::Standard);
        assert!(!layout.compact);
    }

    #[test]
    fn test_compact_layout() {
        let layout = Layout::for_window(375.0, 812.0);
        assert_eq!(layout.width, 343.0);
        assert_eq!(layout.height, 600.0);
        assert_eq!(layout.profile, Profile::Reduced);

        let wide_phone = Layout::for_window(700.0, 640.0);
        assert_eq!(wide_phone.width, 400.0);
        assert_eq!(wide_phone.height, 440.0);
    }

    #[test]
    fn test_tiny_window_keeps_minimum() {
        let layout = Layout::for_window(100.0, 250.0);
        assert_eq!(layout.width, MIN_PLAYFIELD);
        assert_eq!(layout.height, MIN_PLAYFIELD);
    }

    #[test]
    fn test_layout_config() {
        let config = Layout::for_window(1024.0, 768.0).game_config(42);
        assert_eq!(config.seed, 42);
        assert_eq!(config.width, 800.0);
        assert_eq!(config.profile, Profile::Standard);
    }

    #[test]
    fn test_settings_defaults_and_sanitize() {
        let settings = Settings::default();
        assert_eq!(settings.hit_volume, 0.5);
        assert_eq!(settings.hit_duration_ms, 3000);

        let loud = Settings::from_json_or_default(r#"{"hit_volume": 4.0, "muted": true}"#);
        assert_eq!(loud.hit_volume, 1.0);
        assert_eq!(loud.effective_volume(), 0.0);
        assert_eq!(loud.compact_breakpoint, 768.0);

        assert_eq!(Settings::from_json_or_default("not json"), Settings::default());
    }

    #[test]
    fn test_custom_breakpoint() {
        let settings = Settings {
            compact_breakpoint: 1000.0,
            ..Default::default()
        };
        assert!(settings.layout(900.0, 900.0).compact);
    }
}
