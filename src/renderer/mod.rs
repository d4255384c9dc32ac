//! WebGPU rendering module
//!
//! `scene` turns a `DrawState` into textured triangle batches on the CPU;
//! `pipeline` uploads and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, playfield_to_ndc};
pub use scene::{Batch, LoadedSprites, Scene, SpriteImage, TextureSlot};
pub use vertex::Vertex;
