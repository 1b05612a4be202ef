use web_sys::{CanvasRenderingContext2d, ImageData};

use inkboard_shared::{Point, ShapeKind};

use crate::render::draw_shape;
use crate::state::State;

/// Snapshot of the raster taken at shape-tool pointer-down. Every preview
/// frame repaints from this copy, so the drag never accumulates pixels.
pub fn capture_pristine(state: &State) -> Option<ImageData> {
    state
        .ctx
        .get_image_data(
            0.0,
            0.0,
            state.canvas.width() as f64,
            state.canvas.height() as f64,
        )
        .ok()
}

/// Pristine raster plus the would-be shape. Idempotent: called on every
/// pointer-move during the drag, and once more with the final end point
/// when the shape commits. Emits nothing; the network only hears about
/// the shape at commit time.
#[allow(clippy::too_many_arguments)]
pub fn render_preview(
    ctx: &CanvasRenderingContext2d,
    pristine: &ImageData,
    kind: ShapeKind,
    anchor: Point,
    end: Point,
    color: &str,
    size: f64,
    fill: bool,
) {
    let _ = ctx.put_image_data(pristine, 0.0, 0.0);
    draw_shape(ctx, kind, anchor, end, color, size, fill);
}
