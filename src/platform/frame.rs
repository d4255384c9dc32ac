//! Scoped browser scheduling handles
//!
//! `AnimationFrame` and `Timeout` own their callback closure and cancel the
//! pending browser request when dropped, so replacing or clearing the handle
//! is the teardown.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A pending `requestAnimationFrame` callback
pub struct AnimationFrame {
    id: i32,
    _closure: Closure<dyn FnMut(f64)>,
}

impl AnimationFrame {
    /// Request one frame. Returns `None` if the browser refused.
    pub fn request(callback: impl FnOnce(f64) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(callback) = callback.take() {
                callback(time);
            }
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => Some(Self {
                id,
                _closure: closure,
            }),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            // No-op if the frame already ran
            let _ = window.cancel_animation_frame(self.id);
        }
    }
}

/// A pending `setTimeout` callback
pub struct Timeout {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn start(delay_ms: i32, callback: impl FnOnce() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        ) {
            Ok(id) => Some(Self {
                id,
                _closure: closure,
            }),
            Err(e) => {
                log::warn!("setTimeout failed: {:?}", e);
                None
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.id);
        }
    }
}
