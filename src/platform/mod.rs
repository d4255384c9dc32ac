//! Platform abstraction layer
//!
//! Handles browser specifics for:
//! - Input mapping (keys and pointers to session commands)
//! - Overlay visibility per phase
//! - Frame scheduling and timers (scoped handles, wasm only)
//! - Sprite loading from `<img>` elements (wasm only)

pub mod input;
pub mod overlay;

#[cfg(target_arch = "wasm32")]
pub mod frame;
#[cfg(target_arch = "wasm32")]
pub mod sprites;

pub use input::{InputAction, map_key, pointer_activates};
pub use overlay::overlay_visibility;
