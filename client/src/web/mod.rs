use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    Event, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent,
};

use drawsync_shared::BrushStyle;

use crate::engine::{EngineConfig, SyncEngine};

mod canvas;
mod dom;
mod ws;

use canvas::CanvasSurface;
use dom::{event_to_point, get_element, on_event, set_eraser_ui};
use ws::{connect, listen, WsChannel, WsEvent};

type Engine = Rc<RefCell<SyncEngine<CanvasSurface, WsChannel>>>;

fn initial_brush(size_input: &HtmlInputElement, color_input: &HtmlInputElement) -> BrushStyle {
    let mut brush = BrushStyle::default();
    let width = size_input.value_as_number();
    if width.is_finite() && width > 0.0 {
        brush.width = width;
    }
    let color = color_input.value();
    if !color.is_empty() {
        brush.color = color;
    }
    brush
}

#[wasm_bindgen]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "board")?;
    let size_input: HtmlInputElement = get_element(&document, "brushSize")?;
    let color_input: HtmlInputElement = get_element(&document, "brushColor")?;
    let eraser_button: HtmlButtonElement = get_element(&document, "eraser")?;
    let undo_button: HtmlButtonElement = get_element(&document, "undo")?;
    let redo_button: HtmlButtonElement = get_element(&document, "redo")?;

    let mut surface = CanvasSurface::new(canvas.clone())?;
    surface.resize(&window);
    let (channel, socket) = connect(&window)?;
    let config = EngineConfig {
        brush: initial_brush(&size_input, &color_input),
        ..EngineConfig::default()
    };
    let engine: Engine = Rc::new(RefCell::new(SyncEngine::with_config(
        surface, channel, config,
    )));
    set_eraser_ui(&canvas, &eraser_button, false);

    {
        let engine = engine.clone();
        listen(&socket, move |event| match event {
            WsEvent::Open => log::info!("sync channel open"),
            WsEvent::Close => log::warn!("sync channel closed; drawing continues locally"),
            WsEvent::Error => log::warn!("sync channel error"),
            WsEvent::Text(text) => engine.borrow_mut().handle_text_frame(&text),
            WsEvent::Binary(bytes) => engine.borrow_mut().handle_binary_frame(&bytes),
        });
    }

    {
        let engine = engine.clone();
        let down_canvas = canvas.clone();
        on_event(&canvas, "pointerdown", move |event: PointerEvent| {
            let Some(point) = event_to_point(&down_canvas, &event) else {
                return;
            };
            engine.borrow_mut().on_pointer_down(event.pointer_id(), point);
        })?;
    }

    {
        let engine = engine.clone();
        let move_canvas = canvas.clone();
        on_event(&canvas, "pointermove", move |event: PointerEvent| {
            let mut engine = engine.borrow_mut();
            match event_to_point(&move_canvas, &event) {
                Some(point) => engine.on_pointer_move(event.pointer_id(), point),
                None => engine.on_pointer_leave(event.pointer_id()),
            }
        })?;
    }

    for kind in ["pointerup", "pointercancel"] {
        let engine = engine.clone();
        on_event(&canvas, kind, move |event: PointerEvent| {
            engine.borrow_mut().on_pointer_up(event.pointer_id());
        })?;
    }

    {
        let engine = engine.clone();
        on_event(&canvas, "pointerleave", move |event: PointerEvent| {
            engine.borrow_mut().on_pointer_leave(event.pointer_id());
        })?;
    }

    {
        let engine = engine.clone();
        let size_cb = size_input.clone();
        on_event(&size_input, "input", move |_: Event| {
            engine
                .borrow_mut()
                .on_brush_size_changed(size_cb.value_as_number());
        })?;
    }

    {
        let engine = engine.clone();
        let color_cb = color_input.clone();
        on_event(&color_input, "input", move |_: Event| {
            engine.borrow_mut().on_brush_color_changed(color_cb.value());
        })?;
    }

    {
        let engine = engine.clone();
        let eraser_canvas = canvas.clone();
        let eraser_cb = eraser_button.clone();
        on_event(&eraser_button, "click", move |_: Event| {
            let mut engine = engine.borrow_mut();
            engine.on_eraser_toggled();
            set_eraser_ui(&eraser_canvas, &eraser_cb, engine.brush().erasing);
        })?;
    }

    {
        let engine = engine.clone();
        on_event(&undo_button, "click", move |_: Event| {
            engine.borrow_mut().undo();
        })?;
    }

    {
        let engine = engine.clone();
        on_event(&redo_button, "click", move |_: Event| {
            engine.borrow_mut().redo();
        })?;
    }

    {
        let engine = engine.clone();
        on_event(&window, "keydown", move |event: KeyboardEvent| {
            if !(event.ctrl_key() || event.meta_key()) {
                return;
            }
            let key = event.key().to_lowercase();
            let redo = key == "y" || (key == "z" && event.shift_key());
            if redo {
                event.prevent_default();
                engine.borrow_mut().redo();
            } else if key == "z" {
                event.prevent_default();
                engine.borrow_mut().undo();
            }
        })?;
    }

    {
        let engine = engine.clone();
        let resize_window = window.clone();
        on_event(&window, "resize", move |_: Event| {
            engine.borrow_mut().surface_mut().resize(&resize_window);
        })?;
    }

    log::info!("board ready");
    Ok(())
}
