use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use inkboard_shared::{Operation, Point};

use crate::geometry::normalize_point;
use crate::render::{clear_surface, draw_segment, draw_shape};
use crate::state::State;

pub fn sanitize_color(mut color: String) -> String {
    if color.is_empty() {
        return crate::state::DEFAULT_COLOR.to_string();
    }
    if color.len() > 32 {
        color.truncate(32);
    }
    color
}

pub fn sanitize_size(size: f64) -> f64 {
    let size = if size.is_finite() {
        size
    } else {
        crate::state::DEFAULT_SIZE
    };
    size.clamp(1.0, 60.0)
}

/// Applies a remote operation to the local raster. Strokes and shapes go
/// through the same routines as local commits; `clear` never touches
/// history, which is local to the peer that draws.
pub fn apply_remote(state: &State, operation: Operation) {
    match operation {
        Operation::Draw {
            x,
            y,
            start_x,
            start_y,
            color,
            size,
        } => {
            let Some(from) = normalize_point(Point::new(start_x, start_y)) else {
                return;
            };
            let Some(to) = normalize_point(Point::new(x, y)) else {
                return;
            };
            draw_segment(&state.ctx, from, to, &sanitize_color(color), sanitize_size(size));
        }
        Operation::Shape {
            tool,
            start_x,
            start_y,
            end_x,
            end_y,
            color,
            size,
            fill,
        } => {
            let Some(anchor) = normalize_point(Point::new(start_x, start_y)) else {
                return;
            };
            let Some(end) = normalize_point(Point::new(end_x, end_y)) else {
                return;
            };
            draw_shape(
                &state.ctx,
                tool,
                anchor,
                end,
                &sanitize_color(color),
                sanitize_size(size),
                fill,
            );
        }
        Operation::Clear => clear_surface(state),
        Operation::Image { data } => apply_snapshot(state, &data),
    }
}

/// Replaces the raster with a decoded snapshot. Decoding goes through an
/// `HtmlImageElement`, so the swap happens in its load callback; a
/// payload that fails to decode fires `error` instead and the raster is
/// left as it was.
pub fn apply_snapshot(state: &State, data: &str) {
    let Ok(image) = HtmlImageElement::new() else {
        return;
    };

    let ctx = state.ctx.clone();
    let canvas = state.canvas.clone();
    let loaded = image.clone();
    let onload = Closure::<dyn FnMut()>::new(move || {
        ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        let _ = ctx.draw_image_with_html_image_element(&loaded, 0.0, 0.0);
    });
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let onerror = Closure::<dyn FnMut()>::new(move || {
        web_sys::console::warn_1(&"snapshot decode failed, raster left unchanged".into());
    });
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    image.set_src(data);
}

/// Encodes the current raster for history or an `image` payload.
pub fn snapshot_raster(state: &State) -> Option<String> {
    state.canvas.to_data_url().ok()
}

/// Takes a history entry of the raster as it stands. Called at stroke
/// end, shape commit and local clear; never per pencil segment and never
/// for remote operations.
pub fn record_history(state: &mut State) {
    if let Some(snapshot) = snapshot_raster(state) {
        state.history.record(snapshot);
    }
}

/// What undo publishes: blank every peer, then hand them the restored
/// raster. Sent as a pair so peers that joined mid-session converge too.
pub fn undo_operations(snapshot: String) -> [Operation; 2] {
    [Operation::Clear, Operation::Image { data: snapshot }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_publishes_clear_then_the_snapshot() {
        let [first, second] = undo_operations("data:image/png;base64,AAAA".to_string());
        assert_eq!(first, Operation::Clear);
        assert_eq!(
            second,
            Operation::Image {
                data: "data:image/png;base64,AAAA".to_string()
            }
        );
    }

    #[test]
    fn style_inputs_are_clamped() {
        assert_eq!(sanitize_color(String::new()), "#1f1f1f");
        assert_eq!(sanitize_color("#ff0000".to_string()), "#ff0000");
        assert_eq!(sanitize_size(0.2), 1.0);
        assert_eq!(sanitize_size(400.0), 60.0);
        assert_eq!(sanitize_size(f64::NAN), crate::state::DEFAULT_SIZE);
    }
}
