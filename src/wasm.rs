//! WASM bindings for layered-layout.
//!
//! Exposes `layout` and `layoutWithDirection` to JavaScript via wasm-bindgen.
//! Both take and return the JSON shapes of `layout_json`.

use wasm_bindgen::prelude::*;

/// Lay out a JSON graph description with its own config.
#[wasm_bindgen]
pub fn layout(src: &str) -> Result<String, JsError> {
    crate::layout_json(src, None).map_err(|e| JsError::new(&e.to_string()))
}

/// Lay out a JSON graph description in the given direction.
///
/// - `direction`: "LR", "TB", or empty string for the request's own config
#[wasm_bindgen(js_name = "layoutWithDirection")]
pub fn layout_with_direction(src: &str, direction: &str) -> Result<String, JsError> {
    let dir = if direction.is_empty() {
        None
    } else {
        Some(direction)
    };
    crate::layout_json(src, dir).map_err(|e| JsError::new(&e.to_string()))
}
