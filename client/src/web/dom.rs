use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlButtonElement, HtmlCanvasElement, PointerEvent};

use drawsync_shared::Point;

use crate::input::SurfaceBounds;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn on_event<E: FromWasmAbi + 'static>(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Canvas-relative position of `event`, or `None` when it lies off the canvas.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    let bounds = SurfaceBounds {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    };
    bounds.locate(event.client_x() as f64, event.client_y() as f64)
}

pub fn set_eraser_ui(canvas: &HtmlCanvasElement, button: &HtmlButtonElement, erasing: bool) {
    let cursor = if erasing { "cell" } else { "crosshair" };
    let _ = canvas.style().set_property("cursor", cursor);
    let label = if erasing {
        "Disable Eraser"
    } else {
        "Enable Eraser"
    };
    button.set_text_content(Some(label));
    let _ = button.set_attribute("aria-pressed", if erasing { "true" } else { "false" });
}
