use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlCanvasElement, HtmlInputElement, HtmlSpanElement, PointerEvent, Window,
};

use inkboard_shared::{Point, ShapeKind};

use crate::geometry::normalize_point;
use crate::state::{State, Tool};

/// Margins the canvas leaves for the toolbar chrome.
const CANVAS_MARGIN_X: f64 = 40.0;
const CANVAS_MARGIN_Y: f64 = 100.0;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn update_size_label(input: &HtmlInputElement, value: &HtmlSpanElement) {
    value.set_text_content(Some(&input.value()));
}

pub fn set_tool_button(button: &web_sys::HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_status(status_el: &Element, status_text: &Element, state: &str, text: &str) {
    let _ = status_el.set_attribute("data-state", state);
    status_text.set_text_content(Some(text));
}

fn window_dimension(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Sizes the canvas to the window, carrying the drawn pixels across the
/// resize. Resizing resets the 2d context, so the round line caps are
/// reapplied afterwards.
pub fn resize_canvas(window: &Window, state: &State) {
    let width = (window_dimension(window.inner_width()) - CANVAS_MARGIN_X).max(1.0);
    let height = (window_dimension(window.inner_height()) - CANVAS_MARGIN_Y).max(1.0);

    let snapshot = state
        .ctx
        .get_image_data(
            0.0,
            0.0,
            state.canvas.width() as f64,
            state.canvas.height() as f64,
        )
        .ok();

    state.canvas.set_width(width as u32);
    state.canvas.set_height(height as u32);
    state.ctx.set_line_cap("round");
    state.ctx.set_line_join("round");

    if let Some(snapshot) = snapshot {
        let _ = state.ctx.put_image_data(&snapshot, 0.0, 0.0);
    }
}

pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    normalize_point(Point::new(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    ))
}

pub fn set_canvas_cursor(state: &State) {
    let cursor = match state.tool {
        Tool::Shape(ShapeKind::Text) => "text",
        Tool::Pencil | Tool::Shape(_) => "crosshair",
    };
    if let Ok(element) = state.canvas.clone().dyn_into::<web_sys::HtmlElement>() {
        let _ = element.style().set_property("cursor", cursor);
    }
}
