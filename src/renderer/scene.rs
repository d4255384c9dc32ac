//! Frame composition: `DrawState` to draw batches
//!
//! Pure CPU side of the render pipeline. Draw order is background, clouds,
//! obstacles (image badges over the pipes), ground, player; each run of
//! same-texture geometry becomes one batch.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{DrawState, Rect, SpriteSource};

/// Texture a batch samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// 1x1 white, plain colored geometry
    White,
    Player,
    Obstacle,
}

/// RGBA8 image supplied by the host
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Returns `None` unless `rgba` holds exactly `width * height` pixels
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return None;
        }
        Some(Self { width, height, rgba })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureSlot,
    pub vertices: Vec<Vertex>,
}

/// All geometry for one frame in playfield pixels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub batches: Vec<Batch>,
}

impl Scene {
    fn push(&mut self, texture: TextureSlot, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.vertices.extend(vertices),
            _ => self.batches.push(Batch { texture, vertices }),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }
}

/// Which sprites actually have an image uploaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadedSprites {
    pub player: bool,
    pub obstacle: bool,
}

impl LoadedSprites {
    fn uses_image(source: SpriteSource, loaded: bool) -> bool {
        matches!(source, SpriteSource::Image(_)) && loaded
    }
}

/// Build the frame. Image sprites that are not loaded fall back to the
/// procedural drawing.
pub fn build(draw: &DrawState, loaded: LoadedSprites) -> Scene {
    let mut scene = Scene {
        width: draw.width,
        height: draw.height,
        batches: Vec::new(),
    };

    // Sky: two gradient bands, 70% split
    let split = draw.height * 0.7;
    let mut sky = shapes::gradient_rect(0.0, 0.0, draw.width, split, colors::SKY_TOP, colors::SKY_MID);
    sky.extend(shapes::gradient_rect(
        0.0,
        split,
        draw.width,
        draw.height - split,
        colors::SKY_MID,
        colors::SKY_BOTTOM,
    ));
    scene.push(TextureSlot::White, sky);

    for cloud in &draw.clouds {
        scene.push(TextureSlot::White, shapes::cloud(cloud.x, cloud.y, cloud.size));
    }

    let obstacle_image = LoadedSprites::uses_image(draw.sprites.obstacle, loaded.obstacle);
    for pair in &draw.obstacles {
        let Rect { x, y, w, h } = pair.upper;
        scene.push(TextureSlot::White, shapes::pipe_segment(x, y, w, h, true));
        let Rect { x, y, w, h } = pair.lower;
        scene.push(TextureSlot::White, shapes::pipe_segment(x, y, w, h, false));
        if obstacle_image {
            scene.push(TextureSlot::Obstacle, gap_badges(&pair.upper, &pair.lower));
        }
    }

    scene.push(
        TextureSlot::White,
        shapes::ground(draw.width, draw.ground_y, draw.height),
    );

    if let Some(player) = draw.player {
        let Rect { x, y, w, h } = player.rect;
        let center = Vec2::new(x + w * 0.5, y + h * 0.5);
        if LoadedSprites::uses_image(draw.sprites.player, loaded.player) {
            scene.push(
                TextureSlot::Player,
                shapes::sprite_quad(center, Vec2::new(w, h), player.rotation, false),
            );
        } else {
            scene.push(TextureSlot::White, shapes::bird(center, w, player.rotation));
        }
    }

    scene
}

/// Obstacle image badge diameter
const BADGE_SIZE: f32 = 60.0;
/// Badge center distance from the gap edge, inside the segment
const BADGE_INSET: f32 = 15.0;
const BADGE_SEGMENTS: u32 = 24;

/// Round image badges on each segment's gap edge. A segment with no height
/// gets none.
fn gap_badges(upper: &Rect, lower: &Rect) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let radius = BADGE_SIZE * 0.5;
    if upper.h > 0.0 {
        let center = Vec2::new(upper.x + upper.w * 0.5, upper.y + upper.h - BADGE_INSET);
        vertices.extend(shapes::sprite_disc(center, radius, BADGE_SEGMENTS));
    }
    if lower.h > 0.0 {
        let center = Vec2::new(lower.x + lower.w * 0.5, lower.y + BADGE_INSET);
        vertices.extend(shapes::sprite_disc(center, radius, BADGE_SEGMENTS));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Session, Sprites};
    use crate::tuning::{GameConfig, Profile};

    fn playing_draw(sprites: Sprites) -> DrawState {
        let mut session = Session::scripted(GameConfig::new(800.0, 600.0, Profile::Standard), vec![0.5]);
        session.set_sprites(sprites);
        session.start().unwrap();
        session.activate(0.0).unwrap();
        session.draw_state()
    }

    #[test]
    fn test_sprite_image_validates_size() {
        assert!(SpriteImage::new(2, 2, vec![0; 16]).is_some());
        assert!(SpriteImage::new(2, 2, vec![0; 15]).is_none());
        assert!(SpriteImage::new(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_procedural_scene_is_one_batch() {
        let scene = build(&playing_draw(Sprites::default()), LoadedSprites::default());
        assert_eq!(scene.batches.len(), 1);
        assert_eq!(scene.batches[0].texture, TextureSlot::White);
        assert!(scene.vertex_count() > 0);
        assert_eq!(scene.width, 800.0);
    }

    #[test]
    fn test_image_sprites_get_their_own_batches() {
        let sprites = Sprites {
            player: SpriteSource::Image(1),
            obstacle: SpriteSource::Image(2),
        };
        let loaded = LoadedSprites {
            player: true,
            obstacle: true,
        };
        let scene = build(&playing_draw(sprites), loaded);
        let slots: Vec<TextureSlot> = scene.batches.iter().map(|b| b.texture).collect();
        assert_eq!(
            slots,
            vec![
                TextureSlot::White,
                TextureSlot::Obstacle,
                TextureSlot::White,
                TextureSlot::Player
            ]
        );
        // One badge per segment
        assert_eq!(scene.batches[1].vertices.len(), 2 * 24 * 3);
    }

    #[test]
    fn test_obstacle_image_overlays_pipe() {
        let sprites = Sprites {
            player: SpriteSource::Procedural,
            obstacle: SpriteSource::Image(2),
        };
        let with_image = build(
            &playing_draw(sprites),
            LoadedSprites {
                player: false,
                obstacle: true,
            },
        );
        let plain = build(&playing_draw(Sprites::default()), LoadedSprites::default());
        // Pipe geometry is drawn either way, the badges come on top
        let white = |scene: &Scene| -> usize {
            scene
                .batches
                .iter()
                .filter(|b| b.texture == TextureSlot::White)
                .map(|b| b.vertices.len())
                .sum()
        };
        assert_eq!(white(&with_image), white(&plain));

        // Gap is [200, 430] at x 600..680
        let badges = &with_image.batches[1].vertices;
        assert_eq!(badges[0].position, [640.0, 185.0]);
        assert_eq!(badges[0].uv, [0.5, 0.5]);
        assert_eq!(badges[24 * 3].position, [640.0, 445.0]);
    }

    #[test]
    fn test_gap_badges_skip_empty_segment() {
        let upper = Rect::new(600.0, 0.0, 80.0, 0.0);
        let lower = Rect::new(600.0, 230.0, 80.0, 270.0);
        assert_eq!(gap_badges(&upper, &lower).len(), 24 * 3);
    }

    #[test]
    fn test_unloaded_image_falls_back() {
        let sprites = Sprites {
            player: SpriteSource::Image(1),
            obstacle: SpriteSource::Procedural,
        };
        let scene = build(&playing_draw(sprites), LoadedSprites::default());
        assert!(scene.batches.iter().all(|b| b.texture == TextureSlot::White));
    }
}
