//! Sprite loading from `<img>` elements
//!
//! Pixels are read back through an offscreen 2D canvas. An image that has not
//! finished loading (or is cross-origin tainted) yields `None` and the caller
//! keeps drawing the procedural shape.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::renderer::SpriteImage;

/// Find an `<img>` by id
pub fn image_element(document: &Document, id: &str) -> Option<HtmlImageElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

/// The image is decoded and has pixels
pub fn is_ready(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0 && img.natural_height() > 0
}

/// Read an image's pixels as RGBA8
pub fn read_rgba(document: &Document, img: &HtmlImageElement) -> Option<SpriteImage> {
    if !is_ready(img) {
        return None;
    }
    let (width, height) = (img.natural_width(), img.natural_height());

    let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

    if let Err(e) = ctx.draw_image_with_html_image_element(img, 0.0, 0.0) {
        log::warn!("Could not draw sprite image: {:?}", e);
        return None;
    }
    let data = match ctx.get_image_data(0.0, 0.0, width as f64, height as f64) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Could not read sprite pixels (cross-origin?): {:?}", e);
            return None;
        }
    };
    SpriteImage::new(width, height, data.data().0)
}

/// Load the sprite in `<img id=...>`, logging the fallback once at info
pub fn load(document: &Document, id: &str) -> Option<SpriteImage> {
    let image = image_element(document, id).and_then(|img| read_rgba(document, &img));
    match &image {
        Some(image) => log::info!("Sprite #{} loaded ({}x{})", id, image.width, image.height),
        None => log::info!("Sprite #{} unavailable, using procedural drawing", id),
    }
    image
}
