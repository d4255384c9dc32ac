//! Data-driven game balance
//!
//! `Profile` picks a set of physics/geometry constants, `GameConfig` carries
//! everything a run needs and can be loaded from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics/geometry profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Standard,
    /// Compact/narrow viewports: weaker gravity, smaller impulse, tighter obstacles
    Reduced,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Reduced => "reduced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "desktop" => Some(Profile::Standard),
            "reduced" | "compact" | "mobile" => Some(Profile::Reduced),
            _ => None,
        }
    }

    /// Profile for a presentation mode flag
    pub fn for_compact(compact: bool) -> Self {
        if compact {
            Profile::Reduced
        } else {
            Profile::Standard
        }
    }

    /// Resolve the profile's constants
    pub fn tuning(&self) -> Tuning {
        match self {
            Profile::Standard => Tuning {
                gravity: GRAVITY,
                jump_impulse: JUMP_IMPULSE,
                gap_height: GAP_HEIGHT,
                obstacle_width: OBSTACLE_WIDTH,
                spacing: OBSTACLE_SPACING,
            },
            Profile::Reduced => Tuning {
                gravity: REDUCED_GRAVITY,
                jump_impulse: REDUCED_JUMP_IMPULSE,
                gap_height: REDUCED_GAP_HEIGHT,
                obstacle_width: REDUCED_OBSTACLE_WIDTH,
                spacing: REDUCED_OBSTACLE_SPACING,
            },
        }
    }
}

/// Profile-dependent constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Velocity set on activation (negative = up)
    pub jump_impulse: f32,
    pub gap_height: f32,
    pub obstacle_width: f32,
    /// Horizontal distance between consecutive obstacles
    pub spacing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Profile::Standard.tuning()
    }
}

/// Speed ramp parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedRampConfig {
    pub initial: f32,
    pub step: f32,
    pub max: f32,
    pub interval_ms: f64,
}

impl Default for SpeedRampConfig {
    fn default() -> Self {
        Self {
            initial: INITIAL_SPEED,
            step: SPEED_STEP,
            max: MAX_SPEED,
            interval_ms: SPEED_INTERVAL_MS,
        }
    }
}

/// Everything fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub ground_height: f32,
    pub player_size: f32,
    pub profile: Profile,
    /// Overrides the profile's constants when present
    pub tuning: Option<Tuning>,
    pub min_top_margin: f32,
    pub min_bottom_margin: f32,
    pub speed: SpeedRampConfig,
    /// Run seed (browser uses the current time)
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,
            player_size: PLAYER_SIZE,
            profile: Profile::Standard,
            tuning: None,
            min_top_margin: MIN_TOP_MARGIN,
            min_bottom_margin: MIN_BOTTOM_MARGIN,
            speed: SpeedRampConfig::default(),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Config for a playfield and profile, everything else default
    pub fn new(width: f32, height: f32, profile: Profile) -> Self {
        Self {
            width,
            height,
            profile,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Effective constants (override or profile)
    pub fn tuning(&self) -> Tuning {
        self.tuning.unwrap_or_else(|| self.profile.tuning())
    }

    /// Player's fixed horizontal position
    pub fn player_x(&self) -> f32 {
        self.width * PLAYER_X_FRACTION
    }

    /// Y of the ground line
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Parse)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 || self.player_size <= 0.0 {
            return Err(ConfigError::Invalid("playfield and player sizes must be positive"));
        }
        if self.ground_height < 0.0 || self.ground_height + self.player_size >= self.height {
            return Err(ConfigError::Invalid("ground leaves no room for the player"));
        }
        let tuning = self.tuning();
        if tuning.gap_height <= 0.0 || tuning.gap_height >= self.ground_y() {
            return Err(ConfigError::Invalid("gap height must fit above the ground"));
        }
        if tuning.obstacle_width <= 0.0 || tuning.spacing <= 0.0 {
            return Err(ConfigError::Invalid("obstacle width and spacing must be positive"));
        }
        if tuning.jump_impulse >= 0.0 {
            return Err(ConfigError::Invalid("jump impulse must point up (negative)"));
        }
        let speed = &self.speed;
        if speed.initial <= 0.0 || speed.max < speed.initial || speed.step < 0.0 {
            return Err(ConfigError::Invalid("speed ramp needs 0 < initial <= max and step >= 0"));
        }
        if speed.interval_ms <= 0.0 {
            return Err(ConfigError::Invalid("speed interval must be positive"));
        }
        Ok(())
    }
}

/// Config loading/validation failure
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}
