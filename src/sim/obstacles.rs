//! Procedural obstacle generation
//!
//! Spacing is distance-based: a new obstacle enters at the right edge once the
//! newest one has travelled `spacing` pixels. Gap placement draws from an
//! injectable `UnitSource`.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Obstacle;
use crate::consts::{FIRST_GAP_MIN, FIRST_GAP_SPAN, FIRST_OBSTACLE_X_FRACTION};
use crate::lerp;
use crate::tuning::GameConfig;

/// Source of uniform draws in [0, 1)
pub trait UnitSource {
    fn next_unit(&mut self) -> f32;
}

impl UnitSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Fixed draw sequence, repeats the last value once exhausted
#[derive(Debug, Clone)]
pub struct FixedUnits {
    values: Vec<f32>,
    next: usize,
}

impl FixedUnits {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }
}

impl UnitSource for FixedUnits {
    fn next_unit(&mut self) -> f32 {
        let value = match self.values.get(self.next) {
            Some(v) => *v,
            None => self.values.last().copied().unwrap_or(0.0),
        };
        self.next += 1;
        value.clamp(0.0, 1.0)
    }
}

/// Legal `[min, max]` range for a gap top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapRange {
    pub min: f32,
    pub max: f32,
}

impl GapRange {
    /// Range for regular spawns. Collapses to `min` if the playfield is too short.
    pub fn for_config(config: &GameConfig) -> Self {
        let gap = config.tuning().gap_height;
        let min = config.min_top_margin;
        let max = config.ground_y() - gap - config.min_bottom_margin;
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Fixed range for the first obstacle of a run. Margins do not apply;
    /// `seed_first` only keeps both segments non-negative.
    pub fn first() -> Self {
        Self {
            min: FIRST_GAP_MIN,
            max: FIRST_GAP_MIN + FIRST_GAP_SPAN,
        }
    }

    pub fn sample(&self, source: &mut dyn UnitSource) -> f32 {
        lerp(self.min, self.max, source.next_unit())
    }

    pub fn clamp(&self, y: f32) -> f32 {
        y.clamp(self.min, self.max)
    }
}

/// Clamp a gap top so both segments have non-negative height
pub fn clamp_gap_top(gap_top: f32, gap_height: f32, ground_y: f32) -> f32 {
    gap_top.clamp(0.0, (ground_y - gap_height).max(0.0))
}

/// Seed the single obstacle that opens a run
pub fn seed_first(obstacles: &mut Vec<Obstacle>, config: &GameConfig, source: &mut dyn UnitSource) {
    let gap_top = GapRange::first().sample(source);
    let gap_top = clamp_gap_top(gap_top, config.tuning().gap_height, config.ground_y());
    obstacles.clear();
    obstacles.push(Obstacle::new(config.width * FIRST_OBSTACLE_X_FRACTION, gap_top));
}

/// Move every obstacle left by `speed`
pub fn advance(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Append a new obstacle at the right edge if the newest one has cleared the
/// spacing threshold (or there are none). Returns true when one was spawned.
pub fn spawn_if_due(
    obstacles: &mut Vec<Obstacle>,
    config: &GameConfig,
    source: &mut dyn UnitSource,
) -> bool {
    let tuning = config.tuning();
    let due = match obstacles.last() {
        None => true,
        Some(newest) => newest.x < config.width - tuning.spacing,
    };
    if !due {
        return false;
    }
    let gap_top = GapRange::for_config(config).sample(source);
    let gap_top = clamp_gap_top(gap_top, tuning.gap_height, config.ground_y());
    obstacles.push(Obstacle::new(config.width, gap_top));
    true
}

/// Drop obstacles that are fully off the left edge, keeping order
pub fn prune(obstacles: &mut Vec<Obstacle>, width: f32) {
    obstacles.retain(|o| o.right(width) >= 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Profile;
    use rand::SeedableRng;

    fn config() -> GameConfig {
        GameConfig::new(800.0, 600.0, Profile::Standard)
    }

    #[test]
    fn test_gap_range_standard() {
        // 600 - 100 ground - 230 gap - 60 margin = 210
        let range = GapRange::for_config(&config());
        assert_eq!(range.min, 60.0);
        assert_eq!(range.max, 210.0);
    }

    #[test]
    fn test_gap_range_collapses_when_too_short() {
        let mut short = config();
        short.height = 420.0;
        let range = GapRange::for_config(&short);
        assert_eq!(range.min, range.max);
    }

    #[test]
    fn test_seed_first_exact_placement() {
        let mut obstacles = vec![Obstacle::new(10.0, 10.0)];
        let mut units = FixedUnits::new([0.5]);
        seed_first(&mut obstacles, &config(), &mut units);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].x, 600.0);
        assert_eq!(obstacles[0].gap_top, 200.0);
        assert!(!obstacles[0].scored);
    }

    #[test]
    fn test_seed_first_ignores_margins() {
        // Above the 210 margin limit but the lower segment still fits
        let mut obstacles = Vec::new();
        seed_first(&mut obstacles, &config(), &mut FixedUnits::new([0.8]));
        assert_eq!(obstacles[0].gap_top, 260.0);

        // Past 270 the lower segment would go negative
        seed_first(&mut obstacles, &config(), &mut FixedUnits::new([1.0]));
        assert_eq!(obstacles[0].gap_top, 270.0);
    }

    #[test]
    fn test_spawn_when_empty() {
        let mut obstacles = Vec::new();
        let mut units = FixedUnits::new([0.0]);
        assert!(spawn_if_due(&mut obstacles, &config(), &mut units));
        assert_eq!(obstacles[0].x, 800.0);
        assert_eq!(obstacles[0].gap_top, 60.0);
    }

    #[test]
    fn test_spawn_respects_spacing() {
        let mut obstacles = vec![Obstacle::new(500.0, 100.0)];
        let mut units = FixedUnits::new([1.0]);
        // 500 is not left of 800 - 300
        assert!(!spawn_if_due(&mut obstacles, &config(), &mut units));
        obstacles[0].x = 499.0;
        assert!(spawn_if_due(&mut obstacles, &config(), &mut units));
        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[1].gap_top, 210.0);
    }

    #[test]
    fn test_prune_keeps_order() {
        let mut obstacles = vec![
            Obstacle::new(-81.0, 1.0),
            Obstacle::new(-80.0, 2.0),
            Obstacle::new(300.0, 3.0),
        ];
        prune(&mut obstacles, 80.0);
        let gaps: Vec<f32> = obstacles.iter().map(|o| o.gap_top).collect();
        assert_eq!(gaps, vec![2.0, 3.0]);
    }

    #[test]
    fn test_pcg_draws_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let range = GapRange::for_config(&config());
        for _ in 0..1000 {
            let y = range.sample(&mut rng);
            assert!(y >= range.min && y <= range.max);
        }
    }

    #[test]
    fn test_clamp_gap_top() {
        assert_eq!(clamp_gap_top(-5.0, 230.0, 500.0), 0.0);
        assert_eq!(clamp_gap_top(400.0, 230.0, 500.0), 270.0);
    }
}
